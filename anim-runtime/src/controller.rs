//! # Controller 模块
//!
//! 动画请求的状态机：排队、中断、抢占与推进。
//!
//! ## 状态
//!
//! ```text
//!            forward()/backward()
//!   Idle ──────────────────────────► Running
//!    ▲                                 │  │
//!    │        Terminated               │  │ 反方向请求（ignore_inputs = false）
//!    └─────────────────────────────────┘  ▼
//!    ▲                              Interrupted ──下一个 tick──► 推进到排队请求
//!    │                                                              │
//!    └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ignore_inputs = true` 时反方向请求直接替换当前请求（抢占），
//! 旧请求已调度的 tick 因 `RequestId` 不匹配而被丢弃。
//!
//! ## 设计说明
//!
//! - 控制器不持有任何几何状态，几何推进全部委托给 [`Stepper`]
//! - tick 只携带 `RequestId` 与轴，过期判断只依赖这两项
//! - 调度器以参数传入，控制器本身不依赖任何宿主事件循环

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{AnimationConfig, ResizeConfig, SlideConfig};
use crate::error::AnimResult;
use crate::request::{Direction, Request, RequestId};
use crate::scheduler::{Scheduler, Tick, TickHandler};
use crate::stepper::{ResizeStepper, SlideStepper, StepOutcome, Stepper};
use crate::widget::Widget;

/// 控制器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimatorPhase {
    /// 当前请求已结束，没有排队请求
    Idle,
    /// 当前请求正在运行
    Running,
    /// 当前请求已被要求中断，排队请求等待其下一个 tick
    Interrupted,
}

/// `forward()`/`backward()` 的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "request", rename_all = "lowercase")]
pub enum RequestOutcome {
    /// 与当前方向相同，忽略
    Ignored,
    /// 当前请求已结束，新请求立即开始
    Started(RequestId),
    /// 当前请求运行中，新请求排队并要求中断
    Queued(RequestId),
    /// 抢占模式下直接替换当前请求
    Preempted(RequestId),
}

impl RequestOutcome {
    /// 新请求的 ID（被忽略时为 `None`）
    pub fn request(self) -> Option<RequestId> {
        match self {
            Self::Ignored => None,
            Self::Started(id) | Self::Queued(id) | Self::Preempted(id) => Some(id),
        }
    }
}

/// 动画控制器
#[derive(Debug)]
pub struct Animator<S: Stepper> {
    stepper: S,
    current: Request,
    queued: Option<Request>,
    next_id: u64,
}

/// 缩放框架
pub type ResizableFrame<W> = Animator<ResizeStepper<W>>;

/// 滑动框架
pub type SlideFrame<W> = Animator<SlideStepper<W>>;

impl<W: Widget> Animator<ResizeStepper<W>> {
    /// 创建缩放框架
    pub fn resizable(config: &ResizeConfig, widget: W) -> AnimResult<Self> {
        Ok(Self::new(ResizeStepper::new(config, widget)?))
    }
}

impl<W: Widget> Animator<SlideStepper<W>> {
    /// 创建滑动框架
    pub fn sliding(config: &SlideConfig, widget: W) -> AnimResult<Self> {
        Ok(Self::new(SlideStepper::new(config, widget)?))
    }
}

impl<S: Stepper> Animator<S> {
    /// 以步进器创建控制器
    ///
    /// 初始请求已结束，方向与几何一致：
    /// `opened` 时为 `Backward`（位于展开位置），否则为 `Forward`。
    pub fn new(stepper: S) -> Self {
        let direction = if stepper.config().opened {
            Direction::Backward
        } else {
            Direction::Forward
        };
        Self {
            stepper,
            current: Request::settled(RequestId(0), direction),
            queued: None,
            next_id: 1,
        }
    }

    /// 当前请求
    pub fn current(&self) -> &Request {
        &self.current
    }

    /// 排队中的请求
    pub fn queued(&self) -> Option<&Request> {
        self.queued.as_ref()
    }

    /// 当前请求是否在运行
    pub fn is_running(&self) -> bool {
        self.current.is_running()
    }

    /// 当前阶段
    pub fn phase(&self) -> AnimatorPhase {
        match (self.current.is_running(), self.current.interrupt) {
            (false, _) => AnimatorPhase::Idle,
            (true, false) => AnimatorPhase::Running,
            (true, true) => AnimatorPhase::Interrupted,
        }
    }

    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    pub fn stepper_mut(&mut self) -> &mut S {
        &mut self.stepper
    }

    pub fn config(&self) -> &AnimationConfig {
        self.stepper.config()
    }

    /// 切换抢占模式
    pub fn set_ignore_inputs(&mut self, ignore: bool) {
        self.stepper.set_ignore_inputs(ignore);
    }

    /// 开关多 tick 动画
    pub fn set_enable_animation(&mut self, enabled: bool) {
        self.stepper.set_enable_animation(enabled);
    }

    /// 请求 forward（收起）
    pub fn forward(&mut self, scheduler: &mut dyn Scheduler) -> RequestOutcome {
        self.request(Direction::Forward, scheduler)
    }

    /// 请求 backward（展开）
    pub fn backward(&mut self, scheduler: &mut dyn Scheduler) -> RequestOutcome {
        self.request(Direction::Backward, scheduler)
    }

    /// 切换方向：当前为 backward 时 forward，否则 backward
    pub fn do_animation(&mut self, scheduler: &mut dyn Scheduler) -> RequestOutcome {
        match self.current.direction {
            Direction::Backward => self.forward(scheduler),
            Direction::Forward => self.backward(scheduler),
        }
    }

    /// 按方向发出请求
    pub fn request(&mut self, direction: Direction, scheduler: &mut dyn Scheduler) -> RequestOutcome {
        if self.current.direction == direction {
            debug!(
                %direction,
                current = %self.current.id,
                running = self.current.is_running(),
                "同方向请求，忽略"
            );
            return RequestOutcome::Ignored;
        }

        let request = Request::new(self.allocate_id(), direction);
        let id = request.id;

        if self.stepper.config().ignore_inputs {
            debug!(
                %direction,
                request = %id,
                replaced = %self.current.id,
                "抢占当前请求"
            );
            self.queued = None;
            self.current = request;
            self.start_current(scheduler);
            return RequestOutcome::Preempted(id);
        }

        if let Some(old) = self.queued.replace(request) {
            debug!(dropped = %old.id, "覆盖未开始的排队请求");
        }

        if self.current.terminated {
            self.advance(scheduler);
            RequestOutcome::Started(id)
        } else {
            self.current.interrupt = true;
            debug!(
                %direction,
                request = %id,
                interrupted = %self.current.id,
                "请求排队，等待当前请求中断"
            );
            RequestOutcome::Queued(id)
        }
    }

    fn allocate_id(&mut self) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        id
    }

    /// 排队请求成为当前请求并启动
    fn advance(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(next) = self.queued.take() {
            self.current = next;
            self.start_current(scheduler);
        }
    }

    fn start_current(&mut self, scheduler: &mut dyn Scheduler) {
        let axes = self.stepper.begin(self.current.direction);
        debug!(
            request = %self.current.id,
            direction = %self.current.direction,
            tracks = axes.len(),
            "请求开始"
        );
        for axis in axes {
            scheduler.schedule(
                0,
                Tick {
                    request: self.current.id,
                    axis,
                },
            );
        }
    }

    fn terminate_current(&mut self, scheduler: &mut dyn Scheduler) {
        self.current.terminated = true;
        debug!(
            request = %self.current.id,
            direction = %self.current.direction,
            interrupted = self.current.interrupt,
            "请求结束"
        );
        self.advance(scheduler);
    }
}

impl<S: Stepper> TickHandler for Animator<S> {
    fn on_tick(&mut self, tick: Tick, scheduler: &mut dyn Scheduler) {
        if tick.request != self.current.id || self.current.terminated {
            trace!(tick = %tick.request, axis = %tick.axis, current = %self.current.id, "丢弃过期 tick");
            return;
        }

        if self.current.interrupt {
            self.terminate_current(scheduler);
            return;
        }

        match self.stepper.step(self.current.direction, tick.axis) {
            StepOutcome::Continue { delay_ms } => scheduler.schedule(delay_ms, tick),
            StepOutcome::Settled => {
                trace!(request = %tick.request, axis = %tick.axis, "轨道到达目标");
            }
            StepOutcome::Terminated => self.terminate_current(scheduler),
        }
    }
}
