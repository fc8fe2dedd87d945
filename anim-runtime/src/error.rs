//! # Error 模块
//!
//! 定义 anim-runtime 中使用的错误类型。
//!
//! 所有校验都在构造或属性赋值时同步完成；tick 循环本身没有失败路径。

use thiserror::Error;

use crate::request::Axis;
use crate::widget::SlideDirection;

/// 动画配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// 尺寸必须大于零
    #[error("尺寸 '{name}' 必须大于零，实际为 {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    /// 最终尺寸小于初始尺寸
    #[error("{axis} 方向的最终尺寸 {final_} 必须大于或等于初始尺寸 {initial}")]
    DimensionOrder {
        axis: Axis,
        initial: f64,
        final_: f64,
    },

    /// 每 tick 偏移量必须为正数
    #[error("偏移量 '{name}' 必须为正数，实际为 {value}")]
    InvalidOffset { name: &'static str, value: f64 },

    /// tick 间隔必须为正数
    #[error("速度 '{name}' 必须为正数（毫秒），实际为 {value}")]
    InvalidSpeed { name: &'static str, value: u64 },

    /// 终点坐标与滑动方向矛盾
    #[error("滑动方向 {slide_direction} 下终点 {end} 与起点 {start} 的顺序无效")]
    CoordinateOrder {
        slide_direction: SlideDirection,
        start: f64,
        end: f64,
    },

    /// 通用配置错误（fps、精度等）
    #[error("无效的动画配置: {message}")]
    InvalidConfig { message: String },

    /// 无法识别的枚举取值
    #[error("无法识别的 {kind} 取值 '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// JSON 解析失败
    #[error("配置 JSON 解析失败: {message}")]
    Json { message: String },
}

impl From<serde_json::Error> for AnimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            message: e.to_string(),
        }
    }
}

/// Result 类型别名
pub type AnimResult<T> = Result<T, AnimError>;
