//! # Stepper 模块
//!
//! 单个 tick 的几何推进策略。
//!
//! 控制器（`Animator`）负责请求的排队、中断与抢占；步进器只回答两个问题：
//!
//! 1. 新请求开始时需要调度哪些轨道（`begin`）
//! 2. 某条轨道的一次 tick 之后下一步做什么（`step`）
//!
//! 两种实现：
//!
//! - [`ResizeStepper`]：宽高两条轨道独立推进
//! - [`SlideStepper`]：单条轨道推进 x 或 y

mod resize;
mod slide;

pub use resize::{AxisTrack, ResizeStepper, ResizeTuning, FPS_OFFSET_BIAS};
pub use slide::{Position, SlideStepper};

use crate::config::AnimationConfig;
use crate::request::{Axis, Direction};

/// 一次 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 轨道继续，`delay_ms` 后再次 tick
    Continue { delay_ms: u64 },
    /// 本轨道已到达目标，但请求仍有其他轨道在运行
    Settled,
    /// 请求的所有轨道都已到达目标
    Terminated,
}

/// 步进器接口
pub trait Stepper {
    /// 共享动画配置
    fn config(&self) -> &AnimationConfig;

    /// 切换抢占模式
    fn set_ignore_inputs(&mut self, ignore: bool);

    /// 开关多 tick 动画，下一个请求生效
    fn set_enable_animation(&mut self, enabled: bool);

    /// 为新请求重置轨道状态，返回需要调度的轨道
    ///
    /// 剩余工作量必须由当前实际几何计算，而不是原始总距离。
    fn begin(&mut self, direction: Direction) -> Vec<Axis>;

    /// 推进一条轨道一次
    fn step(&mut self, direction: Direction, axis: Axis) -> StepOutcome;
}

/// 每 tick 偏移量对应的所需调用次数
///
/// 禁用动画时，只要还有距离就只需 1 次。
pub(crate) fn calls_for(distance: f64, offset: f64, enable_animation: bool) -> u32 {
    if distance <= 0.0 {
        return 0;
    }
    if !enable_animation {
        return 1;
    }
    (distance / offset).ceil() as u32
}
