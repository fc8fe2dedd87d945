//! # Anim Runtime
//!
//! 框架类容器的动画扩展层：可缩放框架与可滑动框架。
//!
//! ## 架构概述
//!
//! `anim-runtime` 不依赖任何 GUI 工具包。它通过两个接口与宿主通信：
//!
//! ```text
//! Host                              Runtime
//!   │                                  │
//!   │──── forward() / backward() ────►│ Animator（请求状态机）
//!   │                                  │     │
//!   │◄─── Scheduler::schedule(Tick) ──│     ▼
//!   │──── on_tick(Tick) ─────────────►│ Stepper（几何推进）
//!   │                                  │     │
//!   │◄─── Widget::configure/place ────│◄────┘
//! ```
//!
//! ## 核心类型
//!
//! - [`Animator`]：请求的排队、中断与抢占
//! - [`ResizeStepper`] / [`SlideStepper`]：两种几何推进策略
//! - [`Widget`]：被驱动的控件
//! - [`Scheduler`] / [`VirtualScheduler`]：tick 调度
//!
//! ## 使用示例
//!
//! ```ignore
//! use anim_runtime::{ResizableFrame, ResizeConfig, RecordingWidget, VirtualScheduler};
//!
//! let mut frame = ResizableFrame::resizable(&ResizeConfig::default(), RecordingWidget::new())?;
//! let mut scheduler = VirtualScheduler::new();
//!
//! frame.backward(&mut scheduler);
//! scheduler.run_until_idle(&mut frame, 10_000);
//! ```
//!
//! ## 模块结构
//!
//! - [`request`]：方向、轴、请求与 2×2 查找表
//! - [`config`]：动画配置
//! - [`widget`]：控件接口与几何类型
//! - [`scheduler`]：调度接口与虚拟时钟
//! - [`stepper`]：步进器
//! - [`controller`]：请求状态机
//! - [`error`]：错误类型定义

pub mod config;
pub mod controller;
pub mod error;
pub mod request;
pub mod scheduler;
pub mod stepper;
pub mod widget;

// 重导出核心类型
pub use config::{AnimationConfig, MAX_OFFSET_PRECISION, ResizeConfig, SlideConfig, round_to};
pub use controller::{Animator, AnimatorPhase, RequestOutcome, ResizableFrame, SlideFrame};
pub use error::{AnimError, AnimResult};
pub use request::{Axis, Direction, DirectionalTable, Request, RequestId};
pub use scheduler::{Scheduler, Tick, TickHandler, VirtualScheduler};
pub use stepper::{
    AxisTrack, FPS_OFFSET_BIAS, Position, ResizeStepper, ResizeTuning, SlideStepper, StepOutcome,
    Stepper,
};
pub use widget::{
    GridCell, Orientation, Placement, RecordingWidget, Size, SlideDirection, Widget, WidgetCall,
};
