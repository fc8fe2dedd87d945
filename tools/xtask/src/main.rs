//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 anim-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `config-check`: 检查框架配置文件（解析、校验、试运行）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anim_host::{HostConfig, HostError, run as run_frame};
use walkdir::WalkDir;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "anim-runtime", "--html"]);
            run("cargo llvm-cov -p anim-runtime --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // 排除 xtask，只统计 runtime 与 host
            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "--workspace", "--exclude", "xtask", "--html"]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "config-check" => {
            let path = args.next();
            config_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 anim-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  config-check    检查框架配置文件

CONFIG-CHECK:
  cargo xtask config-check [path]

  不带参数：检查 frames/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 语法与字段
    - 尺寸、坐标顺序、偏移量、速度等校验
    - 按文件内时间线试运行，是否在 max_ticks 内结束

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo config-check  -> cargo xtask config-check
"#
    );
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 默认配置目录（相对于 workspace root）
const DEFAULT_FRAMES_DIR: &str = "frames";

/// 单个文件的检查结论
enum Verdict {
    Ok { ticks: usize, elapsed_ms: u64 },
    Truncated { max_ticks: usize },
    Invalid(HostError),
}

/// 执行配置检查
fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_config_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_FRAMES_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认配置目录不存在: {}\n请在 workspace 根目录运行，或指定配置路径",
                    dir.display()
                );
            }
            collect_config_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let mut errors = 0;
    let mut warnings = 0;
    for file in &files {
        match check_config_file(file) {
            Verdict::Ok { ticks, elapsed_ms } => {
                eprintln!("[OK] {}: {} 个 tick，{} ms", file.display(), ticks, elapsed_ms);
            }
            Verdict::Truncated { max_ticks } => {
                eprintln!("[WARN] {}: {} 个 tick 内未结束", file.display(), max_ticks);
                warnings += 1;
            }
            Verdict::Invalid(e) => {
                eprintln!("[ERROR] {e}");
                errors += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个配置", files.len());
    if errors > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", errors, warnings);
        anyhow::bail!("配置检查发现错误");
    } else if warnings > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warnings);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
    Ok(())
}

/// 收集目录下的所有 .json 文件
fn collect_config_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个配置文件
fn check_config_file(file: &Path) -> Verdict {
    let config = match HostConfig::load(file) {
        Ok(config) => config,
        Err(e) => return Verdict::Invalid(e),
    };
    match run_frame(&config, &config.timeline, config.max_ticks) {
        Ok(report) if report.truncated => Verdict::Truncated {
            max_ticks: config.max_ticks,
        },
        Ok(report) => Verdict::Ok {
            ticks: report.ticks,
            elapsed_ms: report.elapsed_ms,
        },
        Err(e) => Verdict::Invalid(e),
    }
}
