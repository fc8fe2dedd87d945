//! # Widget 模块
//!
//! 被动画驱动的外部控件接口定义。
//!
//! 运行时不做任何渲染，只通过 `Widget` trait 把几何变化推给宿主：
//!
//! ```text
//! Stepper ──configure(Size)────► Widget (宿主实现)
//!         ──place(Placement)───►
//!         ──grid(GridCell)─────►
//! ```
//!
//! `RecordingWidget` 记录所有调用，供测试和 headless 宿主使用。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnimError;
use crate::request::Axis;

/// 控件尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// 创建尺寸
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 读取某个轴上的分量
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// 写入某个轴上的分量
    pub fn set_along(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }
}

/// 相对父容器的放置参数（0.0 - 1.0 为父容器内）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub relx: f64,
    pub rely: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relwidth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relheight: Option<f64>,
}

impl Placement {
    /// 仅指定位置
    pub fn at(relx: f64, rely: f64) -> Self {
        Self {
            relx,
            rely,
            relwidth: None,
            relheight: None,
        }
    }

    /// 指定位置并拉伸到填满父容器
    pub fn stretched(relx: f64, rely: f64) -> Self {
        Self {
            relwidth: Some(1.0),
            relheight: Some(1.0),
            ..Self::at(relx, rely)
        }
    }
}

/// 网格布局参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: u32,
    pub column: u32,
    pub sticky: Orientation,
}

/// 内部控件在框架内的锚点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Orientation {
    #[default]
    Center,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Orientation {
    /// 对应的 sticky 字符串
    pub fn sticky(self) -> &'static str {
        match self {
            Self::Center => "",
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sticky())
    }
}

impl FromStr for Orientation {
    type Err = AnimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "center" => Ok(Self::Center),
            "n" | "north" => Ok(Self::North),
            "s" | "south" => Ok(Self::South),
            "e" | "east" => Ok(Self::East),
            "w" | "west" => Ok(Self::West),
            "ne" | "north_east" => Ok(Self::NorthEast),
            "nw" | "north_west" => Ok(Self::NorthWest),
            "se" | "south_east" => Ok(Self::SouthEast),
            "sw" | "south_west" => Ok(Self::SouthWest),
            _ => Err(AnimError::UnknownVariant {
                kind: "orientation",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = AnimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Orientation> for String {
    fn from(value: Orientation) -> Self {
        value.sticky().to_string()
    }
}

/// 滑动方向
///
/// 决定哪个坐标被动画（LEFT/RIGHT → x，TOP/BOTTOM → y）以及终点的合法顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlideDirection {
    Left,
    Right,
    Top,
    Bottom,
}

impl SlideDirection {
    /// 被动画的坐标轴
    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// forward 时坐标是否递减
    pub fn is_decreasing(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for SlideDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideDirection {
    type Err = AnimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(AnimError::UnknownVariant {
                kind: "slide_direction",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SlideDirection {
    type Error = AnimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlideDirection> for String {
    fn from(value: SlideDirection) -> Self {
        value.as_str().to_string()
    }
}

/// 外部控件接口
///
/// 由宿主实现（GUI 工具包、终端、测试替身……）。
pub trait Widget {
    /// 设置控件尺寸
    fn configure(&mut self, size: Size);

    /// 按相对坐标放置控件
    fn place(&mut self, placement: Placement);

    /// 把控件放入网格
    fn grid(&mut self, cell: GridCell);
}

impl<W: Widget + ?Sized> Widget for Box<W> {
    fn configure(&mut self, size: Size) {
        (**self).configure(size);
    }

    fn place(&mut self, placement: Placement) {
        (**self).place(placement);
    }

    fn grid(&mut self, cell: GridCell) {
        (**self).grid(cell);
    }
}

/// 单次控件调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum WidgetCall {
    Configure(Size),
    Place(Placement),
    Grid(GridCell),
}

/// 记录所有调用的控件
#[derive(Debug, Clone, Default)]
pub struct RecordingWidget {
    calls: Vec<WidgetCall>,
}

impl RecordingWidget {
    /// 创建空记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有调用（按发生顺序）
    pub fn calls(&self) -> &[WidgetCall] {
        &self.calls
    }

    /// 清空记录
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// 所有 configure 调用的尺寸
    pub fn sizes(&self) -> Vec<Size> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                WidgetCall::Configure(size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    /// 所有 place 调用的参数
    pub fn placements(&self) -> Vec<Placement> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                WidgetCall::Place(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// 最后一次 configure 的尺寸
    pub fn last_size(&self) -> Option<Size> {
        self.sizes().last().copied()
    }

    /// 最后一次 place 的参数
    pub fn last_placement(&self) -> Option<Placement> {
        self.placements().last().copied()
    }

    /// 最后一次 grid 的参数
    pub fn last_grid(&self) -> Option<GridCell> {
        self.calls.iter().rev().find_map(|c| match c {
            WidgetCall::Grid(cell) => Some(*cell),
            _ => None,
        })
    }
}

impl Widget for RecordingWidget {
    fn configure(&mut self, size: Size) {
        self.calls.push(WidgetCall::Configure(size));
    }

    fn place(&mut self, placement: Placement) {
        self.calls.push(WidgetCall::Place(placement));
    }

    fn grid(&mut self, cell: GridCell) {
        self.calls.push(WidgetCall::Grid(cell));
    }
}
