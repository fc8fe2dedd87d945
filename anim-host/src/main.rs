//! # anim-host
//!
//! 在虚拟时钟上回放框架动画。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p anim-host -- --config frames/resize.json
//! cargo run -p anim-host -- --config frames/slide.json --timeline "forward@0,backward@120"
//! cargo run -p anim-host -- --config frames/slide.json --json -vv
//! ```

use std::path::PathBuf;

use anim_host::{Geometry, HostConfig, RunReport, WidgetSummary, parse_timeline, run};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::Level;

#[derive(Parser)]
#[command(name = "anim-host")]
#[command(about = "在虚拟时钟上回放缩放/滑动框架动画")]
#[command(version)]
struct Cli {
    /// 框架配置文件（JSON）
    #[arg(short, long)]
    config: PathBuf,

    /// 调用时间线，覆盖配置文件中的时间线（如 "backward@0,forward@120"）
    #[arg(short, long)]
    timeline: Option<String>,

    /// 以 JSON 输出完整运行报告
    #[arg(long)]
    json: bool,

    /// 最多投递的 tick 数（默认取配置文件）
    #[arg(long)]
    max_ticks: Option<usize>,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// 日志级别，优先于 -v
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl Cli {
    fn log_level(&self) -> Level {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, 0) => Level::WARN,
            (None, 1) => Level::INFO,
            (None, 2) => Level::DEBUG,
            (None, _) => Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = HostConfig::load(&cli.config)
        .with_context(|| format!("无法加载配置 {}", cli.config.display()))?;
    let timeline = match &cli.timeline {
        Some(text) => parse_timeline(text)?,
        None => config.timeline.clone(),
    };
    let max_ticks = cli.max_ticks.unwrap_or(config.max_ticks);

    let report = run(&config, &timeline, max_ticks)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("框架类型: {}", report.kind);
    match report.geometry {
        Geometry::Resize(size) => println!("最终尺寸: {} x {}", size.width, size.height),
        Geometry::Slide(position) => println!("最终位置: ({}, {})", position.x, position.y),
    }
    println!("tick 数: {}", report.ticks);
    println!("虚拟时间: {} ms", report.elapsed_ms);
    println!("阶段: {:?}", report.phase);
    for record in &report.actions {
        println!("  @{} ms {} -> {:?}", record.at_ms, record.action, record.outcome);
    }
    let summary = WidgetSummary::from_events(&report.events);
    println!(
        "控件调用: configure {} 次，place {} 次，grid {} 次",
        summary.configure, summary.place, summary.grid
    );
    if report.truncated {
        println!("⚠️ 达到 tick 上限，动画未完成");
    }
}
