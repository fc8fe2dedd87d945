//! # Timeline 模块
//!
//! 按虚拟时间排布的框架调用序列。
//!
//! 文本形式为逗号分隔的 `动作@毫秒`，例如 `backward@0,forward@120,toggle@400`。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

/// 时间线动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Forward,
    Backward,
    /// `do_animation`
    Toggle,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
            Self::Toggle => write!(f, "toggle"),
        }
    }
}

impl FromStr for Action {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Ok(Self::Forward),
            "backward" | "bwd" => Ok(Self::Backward),
            "toggle" | "do_animation" => Ok(Self::Toggle),
            other => Err(HostError::Timeline {
                entry: other.to_string(),
                message: "未知动作，可选 forward / backward / toggle".to_string(),
            }),
        }
    }
}

/// 时间线条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// 触发时刻（虚拟毫秒）
    #[serde(default)]
    pub at_ms: u64,
    pub action: Action,
}

impl TimelineEntry {
    pub fn new(action: Action, at_ms: u64) -> Self {
        Self { at_ms, action }
    }
}

impl fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.action, self.at_ms)
    }
}

impl FromStr for TimelineEntry {
    type Err = HostError;

    /// 解析 `动作@毫秒`；省略 `@毫秒` 时为 0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (action, at_ms) = match s.split_once('@') {
            Some((action, at)) => {
                let at_ms = at.trim().parse::<u64>().map_err(|e| HostError::Timeline {
                    entry: s.to_string(),
                    message: format!("时刻必须是非负整数毫秒: {e}"),
                })?;
                (action, at_ms)
            }
            None => (s, 0),
        };
        let action = action.parse::<Action>().map_err(|_| HostError::Timeline {
            entry: s.to_string(),
            message: "未知动作，可选 forward / backward / toggle".to_string(),
        })?;
        Ok(Self { at_ms, action })
    }
}

/// 解析逗号分隔的时间线，并按时刻稳定排序
pub fn parse_timeline(text: &str) -> HostResult<Vec<TimelineEntry>> {
    let mut entries = text
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<HostResult<Vec<TimelineEntry>>>()?;
    sort_timeline(&mut entries);
    Ok(entries)
}

/// 按时刻稳定排序（同一时刻保持书写顺序）
pub fn sort_timeline(entries: &mut [TimelineEntry]) {
    entries.sort_by_key(|entry| entry.at_ms);
}
