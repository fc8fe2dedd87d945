//! # Config 模块
//!
//! 宿主配置文件：一个框架 + 一条时间线。
//!
//! ```json
//! {
//!   "frame": { "kind": "slide", "slide_direction": "left", "xstart": 1.0, "xend": 0.0 },
//!   "timeline": [{ "action": "forward", "at_ms": 0 }],
//!   "max_ticks": 10000
//! }
//! ```
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（`--timeline`、`--max-ticks`）
//! 2. 配置文件
//! 3. 默认值

use std::fs;
use std::path::Path;

use anim_runtime::{AnimationConfig, ResizeConfig, SlideConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HostError, HostResult};
use crate::timeline::{TimelineEntry, sort_timeline};

/// 框架配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FrameConfig {
    Resize(ResizeConfig),
    Slide(SlideConfig),
}

impl FrameConfig {
    /// 框架类型名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resize(_) => "resize",
            Self::Slide(_) => "slide",
        }
    }

    /// 共享动画配置
    pub fn animation(&self) -> &AnimationConfig {
        match self {
            Self::Resize(config) => &config.animation,
            Self::Slide(config) => &config.animation,
        }
    }

    pub fn validate(&self) -> HostResult<()> {
        match self {
            Self::Resize(config) => config.validate()?,
            Self::Slide(config) => config.validate()?,
        }
        Ok(())
    }
}

/// 宿主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// 被驱动的框架
    pub frame: FrameConfig,

    /// 调用时间线（加载后按时刻排序）
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,

    /// 最多投递的 tick 数
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
}

impl HostConfig {
    pub fn new(frame: FrameConfig) -> Self {
        Self {
            frame,
            timeline: Vec::new(),
            max_ticks: default_max_ticks(),
        }
    }

    /// 从 JSON 文本解析，时间线按时刻排序（不做校验）
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(text)?;
        sort_timeline(&mut config.timeline);
        Ok(config)
    }

    /// 加载并验证配置文件
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| HostError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(
            path = %path.display(),
            kind = config.frame.kind(),
            timeline = config.timeline.len(),
            max_ticks = config.max_ticks,
            "配置文件加载成功"
        );
        Ok(config)
    }

    /// 保存为格式化的 JSON
    pub fn save(&self, path: impl AsRef<Path>) -> HostResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| HostError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> HostResult<()> {
        self.frame.validate()?;
        if self.max_ticks == 0 {
            return Err(HostError::Anim(anim_runtime::AnimError::InvalidConfig {
                message: "max_ticks 必须大于零".to_string(),
            }));
        }
        Ok(())
    }
}

// 默认值函数
fn default_max_ticks() -> usize {
    100_000
}
