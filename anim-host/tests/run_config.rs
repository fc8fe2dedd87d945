//! # 配置文件回放集成测试
//!
//! 测试 配置文件 → HostConfig → run 的完整链路。

use std::fs;
use std::path::PathBuf;

use anim_host::{
    Action, FrameConfig, Geometry, HostConfig, HostError, HostFrame, TimelineEntry, parse_timeline,
    run,
};
use anim_runtime::{AnimatorPhase, Position, RequestOutcome, ResizeConfig, Size, WidgetCall};
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// 仓库自带的示例配置
fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../frames")
        .join(name)
}

#[test]
fn test_load_and_run_slide() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "slide.json",
        r#"{
            "frame": {
                "kind": "slide",
                "animation": { "override_fps": true, "opened": true },
                "slide_direction": "top",
                "xstart": 0.5,
                "ystart": 1.0,
                "yend": 0.0,
                "forward_offset": 0.5
            },
            "timeline": [{ "action": "forward" }]
        }"#,
    );

    let config = HostConfig::load(&path).unwrap();
    let report = run(&config, &config.timeline, config.max_ticks).unwrap();

    assert_eq!(report.kind, "slide");
    assert_eq!(report.geometry, Geometry::Slide(Position::new(0.5, 0.0)));
    assert_eq!(report.phase, AnimatorPhase::Idle);

    let ys: Vec<f64> = report
        .events
        .iter()
        .filter_map(|e| match e.call {
            WidgetCall::Place(p) => Some(p.rely),
            _ => None,
        })
        .collect();
    assert_eq!(ys, vec![1.0, 0.5, 0.0]);
}

#[test]
fn test_cli_timeline_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "resize.json",
        r#"{
            "frame": {
                "kind": "resize",
                "animation": { "override_fps": true },
                "initial_width": 10, "initial_height": 10,
                "final_width": 50, "final_height": 30,
                "offsets": { "hforward": 10, "vforward": 5, "hbackward": 10, "vbackward": 5 }
            },
            "timeline": [{ "action": "forward", "at_ms": 0 }]
        }"#,
    );
    let config = HostConfig::load(&path).unwrap();

    // 文件时间线：关闭状态下 forward 被忽略
    let report = run(&config, &config.timeline, config.max_ticks).unwrap();
    assert_eq!(report.actions[0].outcome, RequestOutcome::Ignored);
    assert_eq!(report.ticks, 0);

    let timeline = parse_timeline("backward@0").unwrap();
    let report = run(&config, &timeline, config.max_ticks).unwrap();
    assert_eq!(report.geometry, Geometry::Resize(Size::new(50.0, 30.0)));
}

#[test]
fn test_load_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(HostConfig::load(&missing), Err(HostError::Io { .. })));

    let broken = write_config(&dir, "broken.json", "{ not json");
    assert!(matches!(HostConfig::load(&broken), Err(HostError::Json { .. })));

    let invalid = write_config(
        &dir,
        "invalid.json",
        r#"{ "frame": { "kind": "slide", "slide_direction": "right", "xstart": 0.8, "xend": 0.2 } }"#,
    );
    let err = HostConfig::load(&invalid).unwrap_err();
    assert!(matches!(err, HostError::Anim(_)));
    assert!(err.to_string().contains("right"));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");

    let mut config = HostConfig::new(FrameConfig::Resize(ResizeConfig::default()));
    config.timeline = vec![
        TimelineEntry::new(Action::Backward, 0),
        TimelineEntry::new(Action::Toggle, 300),
    ];
    config.save(&path).unwrap();

    assert_eq!(HostConfig::load(&path).unwrap(), config);
}

#[test]
fn test_build_frame_traces_attach() {
    let frame = HostFrame::build(&FrameConfig::Resize(ResizeConfig::default())).unwrap();
    let calls = frame.widget().calls();
    assert!(matches!(calls[0], WidgetCall::Configure(size) if size == Size::new(1.0, 1.0)));
    assert!(matches!(calls[1], WidgetCall::Grid(_)));
}

#[test]
fn test_sample_configs_run_to_completion() {
    for name in ["resize.json", "slide.json", "drawer.json"] {
        let config = HostConfig::load(sample(name)).unwrap();
        let report = run(&config, &config.timeline, config.max_ticks).unwrap();
        assert!(!report.truncated, "{name}");
        assert_eq!(report.phase, AnimatorPhase::Idle, "{name}");
    }
}
