//! # Config 模块
//!
//! 动画配置，集中管理所有可配置项。
//!
//! - `AnimationConfig`：两种框架共用的节奏/策略配置
//! - `ResizeConfig`：缩放框架
//! - `SlideConfig`：滑动框架
//!
//! 所有字段都有默认值函数，JSON 中省略的字段取默认值；
//! `validate()` 在构造步进器前调用，错误同步返回。

use serde::{Deserialize, Serialize};

use crate::error::{AnimError, AnimResult};
use crate::request::{Axis, DirectionalTable};
use crate::widget::{Orientation, SlideDirection};

/// 精度上限（f64 有效位数）
pub const MAX_OFFSET_PRECISION: u32 = 15;

/// 共享动画配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// 是否启用多 tick 动画；关闭时每个方向只需 1 次调用
    #[serde(default = "default_enable_animation")]
    pub enable_animation: bool,

    /// 输入策略
    ///
    /// - `true`：反向请求立即抢占当前动画
    /// - `false`：反向请求排队，并中断当前动画
    #[serde(default)]
    pub ignore_inputs: bool,

    /// 目标帧率
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// 帧率推导偏移量时的系数
    #[serde(default = "default_fps_factor")]
    pub fps_factor: f64,

    /// 是否直接使用调用方给出的偏移量/速度
    #[serde(default)]
    pub override_fps: bool,

    /// 偏移量与坐标的舍入位数
    #[serde(default = "default_offset_precision")]
    pub offset_precision: u32,

    /// 初始是否为展开状态
    #[serde(default)]
    pub opened: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enable_animation: default_enable_animation(),
            ignore_inputs: false,
            fps: default_fps(),
            fps_factor: default_fps_factor(),
            override_fps: false,
            offset_precision: default_offset_precision(),
            opened: false,
        }
    }
}

impl AnimationConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> AnimResult<()> {
        if self.fps == 0 {
            return Err(AnimError::InvalidConfig {
                message: "fps 必须大于零".to_string(),
            });
        }
        if !(self.fps_factor.is_finite() && self.fps_factor > 0.0) {
            return Err(AnimError::InvalidConfig {
                message: format!("fps_factor 必须为正数，实际为 {}", self.fps_factor),
            });
        }
        if self.offset_precision > MAX_OFFSET_PRECISION {
            return Err(AnimError::InvalidConfig {
                message: format!(
                    "offset_precision 不能超过 {}，实际为 {}",
                    MAX_OFFSET_PRECISION, self.offset_precision
                ),
            });
        }
        Ok(())
    }

    /// 按 `offset_precision` 舍入
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.offset_precision)
    }

    /// 由帧率推导的每 tick 偏移量（未加偏置）
    pub fn fps_offset(&self) -> f64 {
        self.round(self.fps_factor / f64::from(self.fps))
    }

    /// 由帧率推导的 tick 间隔（毫秒，至少 1）
    pub fn frame_interval_ms(&self) -> u64 {
        ((1000.0 / f64::from(self.fps)).round() as u64).max(1)
    }

    /// 精度允许的最小正偏移量
    pub fn min_offset(&self) -> f64 {
        10f64.powi(-(self.offset_precision as i32))
    }
}

/// 舍入到指定小数位
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // 去掉 -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// 缩放框架配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// 共享动画配置
    #[serde(default)]
    pub animation: AnimationConfig,

    /// 初始（收起）宽度
    #[serde(default = "default_initial_dimension")]
    pub initial_width: f64,

    /// 初始（收起）高度
    #[serde(default = "default_initial_dimension")]
    pub initial_height: f64,

    /// 最终（展开）宽度
    #[serde(default = "default_final_width")]
    pub final_width: f64,

    /// 最终（展开）高度
    #[serde(default = "default_final_height")]
    pub final_height: f64,

    /// 各 (方向 × 轴) 的 tick 间隔（毫秒）
    #[serde(default = "default_resize_speeds")]
    pub speeds: DirectionalTable<u64>,

    /// 各 (方向 × 轴) 的每 tick 偏移量（像素）
    #[serde(default = "default_resize_offsets")]
    pub offsets: DirectionalTable<f64>,

    /// 内部控件锚点
    #[serde(default)]
    pub orientation: Orientation,

    /// 是否按两轴距离比例同步两轴节奏
    #[serde(default = "default_relative_expansion")]
    pub relative_expansion: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            initial_width: default_initial_dimension(),
            initial_height: default_initial_dimension(),
            final_width: default_final_width(),
            final_height: default_final_height(),
            speeds: default_resize_speeds(),
            offsets: default_resize_offsets(),
            orientation: Orientation::default(),
            relative_expansion: default_relative_expansion(),
        }
    }
}

impl ResizeConfig {
    /// 从 JSON 解析并验证
    pub fn from_json(text: &str) -> AnimResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> AnimResult<()> {
        self.animation.validate()?;

        validate_dimension("initial_width", self.initial_width)?;
        validate_dimension("initial_height", self.initial_height)?;
        validate_dimension("final_width", self.final_width)?;
        validate_dimension("final_height", self.final_height)?;
        validate_order(Axis::Horizontal, self.initial_width, self.final_width)?;
        validate_order(Axis::Vertical, self.initial_height, self.final_height)?;

        for (direction, axis, offset) in self.offsets.iter() {
            validate_offset(DirectionalTable::<f64>::name(direction, axis), offset)?;
        }
        for (direction, axis, speed) in self.speeds.iter() {
            validate_speed(DirectionalTable::<u64>::name(direction, axis), speed)?;
        }
        Ok(())
    }
}

/// 滑动框架配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideConfig {
    /// 共享动画配置
    #[serde(default)]
    pub animation: AnimationConfig,

    /// 起点 x（相对父容器）
    #[serde(default)]
    pub xstart: f64,
    /// 起点 y（相对父容器）
    #[serde(default)]
    pub ystart: f64,
    /// 终点 x；仅 LEFT/RIGHT 使用
    #[serde(default)]
    pub xend: f64,
    /// 终点 y；仅 TOP/BOTTOM 使用
    #[serde(default)]
    pub yend: f64,

    /// 滑动方向
    pub slide_direction: SlideDirection,

    /// 终点改为完全移出父容器
    #[serde(default)]
    pub disappear: bool,

    /// 放置时拉伸到填满父容器
    #[serde(default)]
    pub automatic_scaling: bool,

    #[serde(default = "default_slide_offset")]
    pub forward_offset: f64,
    #[serde(default = "default_slide_offset")]
    pub backward_offset: f64,

    #[serde(default = "default_slide_speed")]
    pub forward_speed: u64,
    #[serde(default = "default_slide_speed")]
    pub backward_speed: u64,
}

impl SlideConfig {
    /// 以默认参数创建
    pub fn new(
        slide_direction: SlideDirection,
        (xstart, ystart): (f64, f64),
        (xend, yend): (f64, f64),
    ) -> Self {
        Self {
            animation: AnimationConfig::default(),
            xstart,
            ystart,
            xend,
            yend,
            slide_direction,
            disappear: false,
            automatic_scaling: false,
            forward_offset: default_slide_offset(),
            backward_offset: default_slide_offset(),
            forward_speed: default_slide_speed(),
            backward_speed: default_slide_speed(),
        }
    }

    /// 从 JSON 解析并验证
    pub fn from_json(text: &str) -> AnimResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 被动画坐标的实际终点（已应用 `disappear`）
    pub fn effective_end(&self) -> f64 {
        if self.disappear {
            if self.slide_direction.is_decreasing() {
                -1.0
            } else {
                1.0
            }
        } else {
            match self.slide_direction.axis() {
                Axis::Horizontal => self.xend,
                Axis::Vertical => self.yend,
            }
        }
    }

    /// 被动画坐标的起点
    pub fn active_start(&self) -> f64 {
        match self.slide_direction.axis() {
            Axis::Horizontal => self.xstart,
            Axis::Vertical => self.ystart,
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> AnimResult<()> {
        self.animation.validate()?;

        for (name, value) in [
            ("xstart", self.xstart),
            ("ystart", self.ystart),
            ("xend", self.xend),
            ("yend", self.yend),
        ] {
            if !value.is_finite() {
                return Err(AnimError::InvalidConfig {
                    message: format!("坐标 {name} 必须是有限数，实际为 {value}"),
                });
            }
        }

        let start = self.active_start();
        let end = self.effective_end();
        let ordered = if self.slide_direction.is_decreasing() {
            end <= start
        } else {
            end >= start
        };
        if !ordered {
            return Err(AnimError::CoordinateOrder {
                slide_direction: self.slide_direction,
                start,
                end,
            });
        }

        validate_offset("forward_offset", self.forward_offset)?;
        validate_offset("backward_offset", self.backward_offset)?;
        validate_speed("forward_speed", self.forward_speed)?;
        validate_speed("backward_speed", self.backward_speed)?;
        Ok(())
    }
}

pub(crate) fn validate_dimension(name: &'static str, value: f64) -> AnimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnimError::InvalidDimension { name, value })
    }
}

pub(crate) fn validate_order(axis: Axis, initial: f64, final_: f64) -> AnimResult<()> {
    if final_ < initial {
        return Err(AnimError::DimensionOrder {
            axis,
            initial,
            final_,
        });
    }
    Ok(())
}

pub(crate) fn validate_offset(name: &'static str, value: f64) -> AnimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnimError::InvalidOffset { name, value })
    }
}

pub(crate) fn validate_speed(name: &'static str, value: u64) -> AnimResult<()> {
    if value == 0 {
        return Err(AnimError::InvalidSpeed { name, value });
    }
    Ok(())
}

// 默认值函数
fn default_enable_animation() -> bool {
    true
}

fn default_fps() -> u32 {
    60
}

fn default_fps_factor() -> f64 {
    1.1
}

fn default_offset_precision() -> u32 {
    6
}

fn default_initial_dimension() -> f64 {
    1.0
}

fn default_final_width() -> f64 {
    500.0
}

fn default_final_height() -> f64 {
    250.0
}

fn default_resize_speeds() -> DirectionalTable<u64> {
    DirectionalTable::splat(10)
}

fn default_resize_offsets() -> DirectionalTable<f64> {
    DirectionalTable::splat(1.0)
}

fn default_relative_expansion() -> bool {
    true
}

fn default_slide_offset() -> f64 {
    0.001
}

fn default_slide_speed() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_animation_config() {
        let config = AnimationConfig::default();
        assert!(config.enable_animation);
        assert!(!config.ignore_inputs);
        assert_eq!(config.fps, 60);
        assert_eq!(config.offset_precision, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_animation_config_snapshot() {
        insta::assert_yaml_snapshot!(AnimationConfig::default(), @r"
        enable_animation: true
        ignore_inputs: false
        fps: 60
        fps_factor: 1.1
        override_fps: false
        offset_precision: 6
        opened: false
        ");
    }

    #[test]
    fn test_fps_derivations() {
        let config = AnimationConfig::default();
        // 1.1 / 60 = 0.0183333...
        assert_eq!(config.fps_offset(), 0.018333);
        assert_eq!(config.frame_interval_ms(), 17);
        assert!((config.min_offset() - 1e-6).abs() < 1e-15);

        let fast = AnimationConfig {
            fps: 5000,
            ..AnimationConfig::default()
        };
        assert_eq!(fast.frame_interval_ms(), 1);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456789, 3), 0.123);
        assert_eq!(round_to(1.0 - 0.1 - 0.1 - 0.1, 6), 0.7);
        assert_eq!(round_to(-0.0000001, 3), 0.0);
        assert!(round_to(-0.0000001, 3).is_sign_positive());
    }

    #[test]
    fn test_animation_config_validation() {
        let mut config = AnimationConfig {
            fps: 0,
            ..AnimationConfig::default()
        };
        assert!(config.validate().is_err());

        config.fps = 30;
        config.fps_factor = -1.0;
        assert!(config.validate().is_err());

        config.fps_factor = 1.0;
        config.offset_precision = 40;
        assert!(config.validate().is_err());

        config.offset_precision = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resize_config_validation() {
        assert!(ResizeConfig::default().validate().is_ok());

        let config = ResizeConfig {
            final_width: 0.5,
            ..ResizeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnimError::DimensionOrder {
                axis: Axis::Horizontal,
                ..
            })
        ));

        let config = ResizeConfig {
            initial_height: 0.0,
            ..ResizeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnimError::InvalidDimension {
                name: "initial_height",
                ..
            })
        ));

        let mut config = ResizeConfig::default();
        config.offsets.vbackward = 0.0;
        assert!(matches!(
            config.validate(),
            Err(AnimError::InvalidOffset {
                name: "vbackward",
                ..
            })
        ));

        let mut config = ResizeConfig::default();
        config.speeds.hforward = 0;
        assert!(matches!(
            config.validate(),
            Err(AnimError::InvalidSpeed {
                name: "hforward",
                ..
            })
        ));
    }

    #[test]
    fn test_resize_config_from_json_defaults() {
        let config = ResizeConfig::from_json(r#"{"final_width": 300, "orientation": "nw"}"#).unwrap();
        assert_eq!(config.final_width, 300.0);
        assert_eq!(config.final_height, 250.0);
        assert_eq!(config.orientation, Orientation::NorthWest);
        assert_eq!(config.speeds, DirectionalTable::splat(10));

        let err = ResizeConfig::from_json(r#"{"orientation": "up"}"#).unwrap_err();
        assert!(matches!(err, AnimError::Json { .. }));
    }

    #[test]
    fn test_slide_config_coordinate_order() {
        let ok = [
            (SlideDirection::Left, (1.0, 0.0), (0.0, 0.0)),
            (SlideDirection::Right, (0.0, 0.0), (1.0, 0.0)),
            (SlideDirection::Top, (0.0, 1.0), (0.0, 0.0)),
            (SlideDirection::Bottom, (0.0, 0.0), (0.0, 1.0)),
        ];
        for (dir, start, end) in ok {
            assert!(SlideConfig::new(dir, start, end).validate().is_ok(), "{dir}");
        }

        let bad = [
            (SlideDirection::Left, (0.0, 0.0), (1.0, 0.0)),
            (SlideDirection::Right, (1.0, 0.0), (0.0, 0.0)),
            (SlideDirection::Top, (0.0, 0.0), (0.0, 1.0)),
            (SlideDirection::Bottom, (0.0, 1.0), (0.0, 0.0)),
        ];
        for (dir, start, end) in bad {
            assert!(
                matches!(
                    SlideConfig::new(dir, start, end).validate(),
                    Err(AnimError::CoordinateOrder { .. })
                ),
                "{dir}"
            );
        }
    }

    #[test]
    fn test_slide_config_inactive_end_is_ignored() {
        // LEFT 只检查 x，y 终点任意
        let config = SlideConfig::new(SlideDirection::Left, (1.0, 0.2), (0.0, 99.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slide_config_disappear() {
        let mut config = SlideConfig::new(SlideDirection::Right, (0.0, 0.0), (0.5, 0.0));
        config.disappear = true;
        assert_eq!(config.effective_end(), 1.0);
        assert!(config.validate().is_ok());

        let mut config = SlideConfig::new(SlideDirection::Top, (0.0, 0.3), (0.0, 0.0));
        config.disappear = true;
        assert_eq!(config.effective_end(), -1.0);

        // 起点已在父容器左侧之外时，disappear 终点反而在起点右侧
        let mut config = SlideConfig::new(SlideDirection::Left, (-1.5, 0.0), (-2.0, 0.0));
        config.disappear = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_slide_config_from_json() {
        let config = SlideConfig::from_json(
            r#"{"xstart": 1.0, "ystart": 0.0, "xend": 0.0, "yend": 0.0, "slide_direction": "left"}"#,
        )
        .unwrap();
        assert_eq!(config.forward_offset, 0.001);
        assert_eq!(config.forward_speed, 10);

        let err = SlideConfig::from_json(
            r#"{"xstart": 0.0, "ystart": 0.0, "xend": 1.0, "yend": 0.0, "slide_direction": "left"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnimError::CoordinateOrder { .. }));
    }
}
