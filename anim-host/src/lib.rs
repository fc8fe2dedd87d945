//! # Anim Host
//!
//! `anim-runtime` 的 headless 宿主。
//!
//! 读取框架配置与调用时间线，在虚拟时钟上回放，
//! 输出控件收到的全部几何调用与最终状态。
//!
//! ## 模块结构
//!
//! - [`config`]：配置文件（框架 + 时间线）
//! - [`timeline`]：时间线条目与解析
//! - [`trace`]：记录调用的控件
//! - [`runner`]：回放循环与运行报告
//! - [`error`]：错误类型定义

pub mod config;
pub mod error;
pub mod runner;
pub mod timeline;
pub mod trace;

pub use config::{FrameConfig, HostConfig};
pub use error::{HostError, HostResult};
pub use runner::{ActionRecord, Geometry, HostFrame, RunReport, run};
pub use timeline::{Action, TimelineEntry, parse_timeline};
pub use trace::{TraceEvent, TraceWidget, WidgetSummary};
