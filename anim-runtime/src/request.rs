//! # Request 模块
//!
//! 动画请求与方向/轴的基础定义。
//!
//! ## 设计说明
//!
//! - `Request` 是一次动画意图的最小单位：方向 + 生命周期标志
//! - `RequestId` 由控制器单调分配，随 tick 一起下发，用于识别过期回调
//! - `DirectionalTable` 是 (方向 × 轴) 的固定 2×2 表，替代按字符串拼接的属性名

use serde::{Deserialize, Serialize};
use std::fmt;

/// 动画方向
///
/// - `Forward`：收起（缩放到初始尺寸 / 滑到终点）
/// - `Backward`：展开（缩放到最终尺寸 / 滑回起点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// 相反方向
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// 动画轴
///
/// 每个轴对应一条独立的 tick 链（track）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// 两个轴，水平在前
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// 请求标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 动画请求
///
/// 同一时刻恰好有一个"当前"请求；`terminated = true` 表示它已被消费。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// 请求 ID
    pub id: RequestId,
    /// 请求方向
    pub direction: Direction,
    /// 是否已结束
    pub terminated: bool,
    /// 是否被要求中断（由运行中的 tick 链观察）
    pub interrupt: bool,
}

impl Request {
    /// 创建新的待执行请求
    pub fn new(id: RequestId, direction: Direction) -> Self {
        Self {
            id,
            direction,
            terminated: false,
            interrupt: false,
        }
    }

    /// 创建已结束的请求（控制器的初始状态）
    pub fn settled(id: RequestId, direction: Direction) -> Self {
        Self {
            terminated: true,
            ..Self::new(id, direction)
        }
    }

    /// 是否仍在运行
    pub fn is_running(&self) -> bool {
        !self.terminated
    }
}

/// (方向 × 轴) 的 2×2 查找表
///
/// JSON 形式为 `{"hforward": .., "vforward": .., "hbackward": .., "vbackward": ..}`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalTable<T> {
    pub hforward: T,
    pub vforward: T,
    pub hbackward: T,
    pub vbackward: T,
}

impl<T: Copy> DirectionalTable<T> {
    /// 所有格子取同一个值
    pub fn splat(value: T) -> Self {
        Self {
            hforward: value,
            vforward: value,
            hbackward: value,
            vbackward: value,
        }
    }

    /// 由函数逐格生成
    pub fn from_fn(mut f: impl FnMut(Direction, Axis) -> T) -> Self {
        Self {
            hforward: f(Direction::Forward, Axis::Horizontal),
            vforward: f(Direction::Forward, Axis::Vertical),
            hbackward: f(Direction::Backward, Axis::Horizontal),
            vbackward: f(Direction::Backward, Axis::Vertical),
        }
    }

    /// 读取一格
    pub fn get(&self, direction: Direction, axis: Axis) -> T {
        *self.cell(direction, axis)
    }

    /// 写入一格
    pub fn set(&mut self, direction: Direction, axis: Axis, value: T) {
        *self.cell_mut(direction, axis) = value;
    }

    /// 格子名（用于错误信息和日志）
    pub fn name(direction: Direction, axis: Axis) -> &'static str {
        match (direction, axis) {
            (Direction::Forward, Axis::Horizontal) => "hforward",
            (Direction::Forward, Axis::Vertical) => "vforward",
            (Direction::Backward, Axis::Horizontal) => "hbackward",
            (Direction::Backward, Axis::Vertical) => "vbackward",
        }
    }

    /// 按 (方向, 轴, 值) 遍历
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Axis, T)> + '_ {
        [Direction::Forward, Direction::Backward]
            .into_iter()
            .flat_map(move |d| Axis::ALL.into_iter().map(move |a| (d, a, self.get(d, a))))
    }

    fn cell(&self, direction: Direction, axis: Axis) -> &T {
        match (direction, axis) {
            (Direction::Forward, Axis::Horizontal) => &self.hforward,
            (Direction::Forward, Axis::Vertical) => &self.vforward,
            (Direction::Backward, Axis::Horizontal) => &self.hbackward,
            (Direction::Backward, Axis::Vertical) => &self.vbackward,
        }
    }

    fn cell_mut(&mut self, direction: Direction, axis: Axis) -> &mut T {
        match (direction, axis) {
            (Direction::Forward, Axis::Horizontal) => &mut self.hforward,
            (Direction::Forward, Axis::Vertical) => &mut self.vforward,
            (Direction::Backward, Axis::Horizontal) => &mut self.hbackward,
            (Direction::Backward, Axis::Vertical) => &mut self.vbackward,
        }
    }
}
