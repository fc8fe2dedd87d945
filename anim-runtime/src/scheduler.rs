//! # Scheduler 模块
//!
//! tick 调度接口与确定性的虚拟时钟实现。
//!
//! ## 执行模型
//!
//! ```text
//! Animator ──schedule(delay_ms, Tick)──► Scheduler
//!    ▲                                      │
//!    └────────── on_tick(Tick) ◄────────────┘  （到期后由宿主回调）
//! ```
//!
//! 调度是"发射后不管"的：已调度的 tick 无法撤销，过期的 tick 由
//! `Animator` 按 `RequestId` 识别后丢弃。所有回调都在同一逻辑线程上执行。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::request::{Axis, RequestId};

/// 一次待执行的 tick
///
/// 携带所属请求和轨道（轴），不携带任何几何状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tick {
    /// 所属请求
    pub request: RequestId,
    /// 所属轨道
    pub axis: Axis,
}

/// 调度器接口
pub trait Scheduler {
    /// 在 `delay_ms` 毫秒后投递 `tick`
    fn schedule(&mut self, delay_ms: u64, tick: Tick);
}

/// tick 处理者
///
/// 宿主在 tick 到期时调用 `on_tick`，处理者可以在其中继续调度。
pub trait TickHandler {
    fn on_tick(&mut self, tick: Tick, scheduler: &mut dyn Scheduler);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    due_ms: u64,
    seq: u64,
    tick: Tick,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap 是大顶堆，反转得到最早到期优先，同时刻按调度顺序
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 虚拟时钟调度器
///
/// 不依赖真实时间：`pop_due` 直接把时钟拨到下一个 tick 的到期时刻。
/// 适用于测试和 headless 宿主。
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Pending>,
    delivered: u64,
}

impl VirtualScheduler {
    /// 创建时钟为 0 的调度器
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前虚拟时间（毫秒）
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// 待执行的 tick 数量
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// 是否没有待执行的 tick
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// 已投递的 tick 总数
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// 下一个 tick 的到期时刻
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.peek().map(|p| p.due_ms)
    }

    /// 取出最早到期的 tick，并把时钟拨到它的到期时刻
    pub fn pop_due(&mut self) -> Option<Tick> {
        let pending = self.queue.pop()?;
        self.now_ms = self.now_ms.max(pending.due_ms);
        self.delivered += 1;
        Some(pending.tick)
    }

    /// 把时钟拨到 `ms`（只前进不后退），不投递任何 tick
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// 投递单个 tick
    ///
    /// 返回 `false` 表示队列已空。
    pub fn step(&mut self, handler: &mut dyn TickHandler) -> bool {
        match self.pop_due() {
            Some(tick) => {
                handler.on_tick(tick, self);
                true
            }
            None => false,
        }
    }

    /// 运行直到队列为空或投递了 `max_ticks` 个 tick
    ///
    /// 返回本次投递的 tick 数。
    pub fn run_until_idle(&mut self, handler: &mut dyn TickHandler, max_ticks: usize) -> usize {
        let mut count = 0;
        while count < max_ticks && self.step(handler) {
            count += 1;
        }
        count
    }

    /// 投递所有在 `now + ms` 之前（含）到期的 tick，然后把时钟拨到该时刻
    pub fn run_for(&mut self, handler: &mut dyn TickHandler, ms: u64) -> usize {
        let deadline = self.now_ms + ms;
        let mut count = 0;
        while self.next_due_ms().is_some_and(|due| due <= deadline) {
            self.step(handler);
            count += 1;
        }
        self.advance_to(deadline);
        count
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay_ms: u64, tick: Tick) {
        let pending = Pending {
            due_ms: self.now_ms + delay_ms,
            seq: self.next_seq,
            tick,
        };
        self.next_seq += 1;
        self.queue.push(pending);
    }
}
