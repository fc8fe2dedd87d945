//! # Runner 模块
//!
//! 在虚拟时钟上回放时间线，驱动框架直到空闲。
//!
//! ## 执行顺序
//!
//! 每一步比较下一条时间线动作与下一个 tick 的到期时刻：
//! 动作时刻不晚于 tick 时先执行动作，否则投递 tick。
//! 两者都没有时结束；投递的 tick 达到上限时截断。

use anim_runtime::{
    AnimatorPhase, Position, RequestOutcome, ResizableFrame, Scheduler, Size, SlideFrame, Tick,
    TickHandler, VirtualScheduler,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{FrameConfig, HostConfig};
use crate::error::HostResult;
use crate::timeline::{Action, TimelineEntry};
use crate::trace::{TraceEvent, TraceWidget};

/// 宿主驱动的框架
#[derive(Debug)]
pub enum HostFrame {
    Resize(ResizableFrame<TraceWidget>),
    Slide(SlideFrame<TraceWidget>),
}

/// 框架当前几何
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Resize(Size),
    Slide(Position),
}

impl HostFrame {
    /// 按配置创建框架
    pub fn build(config: &FrameConfig) -> HostResult<Self> {
        let frame = match config {
            FrameConfig::Resize(config) => {
                Self::Resize(ResizableFrame::resizable(config, TraceWidget::new("resize"))?)
            }
            FrameConfig::Slide(config) => {
                Self::Slide(SlideFrame::sliding(config, TraceWidget::new("slide"))?)
            }
        };
        Ok(frame)
    }

    /// 执行一个时间线动作
    pub fn apply(&mut self, action: Action, scheduler: &mut dyn Scheduler) -> RequestOutcome {
        match self {
            Self::Resize(frame) => match action {
                Action::Forward => frame.forward(scheduler),
                Action::Backward => frame.backward(scheduler),
                Action::Toggle => frame.do_animation(scheduler),
            },
            Self::Slide(frame) => match action {
                Action::Forward => frame.forward(scheduler),
                Action::Backward => frame.backward(scheduler),
                Action::Toggle => frame.do_animation(scheduler),
            },
        }
    }

    pub fn phase(&self) -> AnimatorPhase {
        match self {
            Self::Resize(frame) => frame.phase(),
            Self::Slide(frame) => frame.phase(),
        }
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            Self::Resize(frame) => Geometry::Resize(frame.stepper().actual()),
            Self::Slide(frame) => Geometry::Slide(frame.stepper().actual()),
        }
    }

    pub fn widget(&self) -> &TraceWidget {
        match self {
            Self::Resize(frame) => frame.stepper().widget(),
            Self::Slide(frame) => frame.stepper().widget(),
        }
    }

    pub fn widget_mut(&mut self) -> &mut TraceWidget {
        match self {
            Self::Resize(frame) => frame.stepper_mut().widget_mut(),
            Self::Slide(frame) => frame.stepper_mut().widget_mut(),
        }
    }
}

impl TickHandler for HostFrame {
    fn on_tick(&mut self, tick: Tick, scheduler: &mut dyn Scheduler) {
        match self {
            Self::Resize(frame) => frame.on_tick(tick, scheduler),
            Self::Slide(frame) => frame.on_tick(tick, scheduler),
        }
    }
}

/// 一次时间线动作的执行记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionRecord {
    pub at_ms: u64,
    pub action: Action,
    #[serde(flatten)]
    pub outcome: RequestOutcome,
}

/// 运行报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub kind: &'static str,
    /// 投递的 tick 数（含被丢弃的过期 tick）
    pub ticks: usize,
    /// 结束时的虚拟时间
    pub elapsed_ms: u64,
    /// 是否因 tick 上限而截断
    pub truncated: bool,
    pub phase: AnimatorPhase,
    pub geometry: Geometry,
    pub actions: Vec<ActionRecord>,
    pub events: Vec<TraceEvent>,
}

/// 回放时间线
///
/// `timeline` 须已按时刻排序。
pub fn run(config: &HostConfig, timeline: &[TimelineEntry], max_ticks: usize) -> HostResult<RunReport> {
    let mut frame = HostFrame::build(&config.frame)?;
    let mut scheduler = VirtualScheduler::new();

    let mut events = frame.widget_mut().drain_new(0);
    let mut actions = Vec::with_capacity(timeline.len());
    let mut pending = timeline.iter().peekable();
    let mut ticks = 0;
    let mut truncated = false;

    loop {
        let next_action = pending.peek().map(|entry| entry.at_ms);
        let action_first = match (next_action, scheduler.next_due_ms()) {
            (None, None) => break,
            (Some(at), Some(due)) => at <= due,
            (Some(_), None) => true,
            (None, Some(_)) => false,
        };

        if action_first {
            let Some(entry) = pending.next() else { break };
            scheduler.advance_to(entry.at_ms);
            let outcome = frame.apply(entry.action, &mut scheduler);
            debug!(at_ms = scheduler.now_ms(), action = %entry.action, ?outcome, "执行时间线动作");
            actions.push(ActionRecord {
                at_ms: scheduler.now_ms(),
                action: entry.action,
                outcome,
            });
        } else {
            if ticks >= max_ticks {
                warn!(max_ticks, pending = scheduler.pending(), "达到 tick 上限，提前结束");
                truncated = true;
                break;
            }
            scheduler.step(&mut frame);
            ticks += 1;
        }

        let now = scheduler.now_ms();
        events.extend(frame.widget_mut().drain_new(now));
    }

    let report = RunReport {
        kind: config.frame.kind(),
        ticks,
        elapsed_ms: scheduler.now_ms(),
        truncated,
        phase: frame.phase(),
        geometry: frame.geometry(),
        actions,
        events,
    };
    info!(
        kind = report.kind,
        ticks = report.ticks,
        elapsed_ms = report.elapsed_ms,
        truncated = report.truncated,
        geometry = ?report.geometry,
        "运行结束"
    );
    Ok(report)
}
