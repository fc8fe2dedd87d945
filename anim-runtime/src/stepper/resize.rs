//! # Resize 步进器
//!
//! 在初始尺寸与最终尺寸之间缩放内部控件。
//!
//! ## 轨道模型
//!
//! 宽、高各一条轨道，独立调度、共享同一个请求：
//!
//! ```text
//! begin(dir) ─┬─► step(dir, Horizontal) ─► ... ─► snap ─► Settled/Terminated
//!             └─► step(dir, Vertical)   ─► ... ─► snap ─► Settled/Terminated
//! ```
//!
//! 两条轨道都到达目标后请求才算结束。
//!
//! ## 调优表
//!
//! 每个 (方向 × 轴) 有独立的偏移量、tick 间隔和所需调用次数。
//! 开启 `relative_expansion` 时，距离较短的轴按距离比例缩小偏移量，
//! 使两轴的调用次数一致，同时到达目标。

use tracing::{debug, trace};

use super::{StepOutcome, Stepper, calls_for};
use crate::config::{AnimationConfig, ResizeConfig, validate_dimension, validate_order};
use crate::error::AnimResult;
use crate::request::{Axis, Direction, DirectionalTable};
use crate::widget::{GridCell, Orientation, Size, Widget};

/// 由帧率推导偏移量时附加的固定偏置（像素）
pub const FPS_OFFSET_BIAS: f64 = 5.0;

/// 单个 (方向 × 轴) 的调优结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeTuning {
    /// 每 tick 偏移量
    pub offset: f64,
    /// tick 间隔（毫秒）
    pub speed_ms: u64,
    /// 覆盖整段距离所需的调用次数（至少 1）
    pub required_calls: u32,
}

/// 单条轨道的运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisTrack {
    /// 已执行的调用次数（含续跑时折算的部分）
    pub calls: u32,
    /// 是否已到达目标
    pub settled: bool,
}

/// 缩放步进器
#[derive(Debug)]
pub struct ResizeStepper<W: Widget> {
    widget: W,
    config: AnimationConfig,
    initial: Size,
    final_: Size,
    actual: Size,
    requested_offsets: DirectionalTable<f64>,
    requested_speeds: DirectionalTable<u64>,
    tuning: DirectionalTable<ResizeTuning>,
    tracks: [AxisTrack; 2],
    orientation: Orientation,
    relative_expansion: bool,
}

impl<W: Widget> ResizeStepper<W> {
    /// 创建步进器并把控件放到起始尺寸
    ///
    /// `opened = true` 时从最终尺寸开始，否则从初始尺寸开始。
    pub fn new(config: &ResizeConfig, widget: W) -> AnimResult<Self> {
        config.validate()?;

        let initial = Size::new(config.initial_width, config.initial_height);
        let final_ = Size::new(config.final_width, config.final_height);
        let actual = if config.animation.opened {
            final_
        } else {
            initial
        };

        let mut stepper = Self {
            widget,
            config: config.animation.clone(),
            initial,
            final_,
            actual,
            requested_offsets: config.offsets,
            requested_speeds: config.speeds,
            tuning: DirectionalTable::splat(ResizeTuning {
                offset: 1.0,
                speed_ms: 1,
                required_calls: 1,
            }),
            tracks: [AxisTrack::default(); 2],
            orientation: config.orientation,
            relative_expansion: config.relative_expansion,
        };
        stepper.retune();

        stepper.widget.configure(stepper.actual);
        stepper.widget.grid(stepper.grid_cell());

        debug!(
            initial = ?stepper.initial,
            final_size = ?stepper.final_,
            actual = ?stepper.actual,
            orientation = %stepper.orientation,
            relative_expansion = stepper.relative_expansion,
            "缩放框架已创建"
        );
        for (direction, axis, tuning) in stepper.tuning.iter() {
            debug!(
                cell = DirectionalTable::<ResizeTuning>::name(direction, axis),
                offset = tuning.offset,
                speed_ms = tuning.speed_ms,
                required_calls = tuning.required_calls,
                "缩放调优"
            );
        }

        Ok(stepper)
    }

    /// 当前实际尺寸
    pub fn actual(&self) -> Size {
        self.actual
    }

    /// 初始（收起）尺寸
    pub fn initial(&self) -> Size {
        self.initial
    }

    /// 最终（展开）尺寸
    pub fn final_size(&self) -> Size {
        self.final_
    }

    /// 某个 (方向 × 轴) 的调优结果
    pub fn tuning(&self, direction: Direction, axis: Axis) -> ResizeTuning {
        self.tuning.get(direction, axis)
    }

    /// 某条轨道的运行状态
    pub fn track(&self, axis: Axis) -> AxisTrack {
        self.tracks[slot(axis)]
    }

    /// 内部控件锚点
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// 是否按距离比例同步两轴
    pub fn relative_expansion(&self) -> bool {
        self.relative_expansion
    }

    /// 被驱动的控件
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// 被驱动的控件（可变）
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// 修改初始尺寸
    ///
    /// 实际尺寸会被夹到新的范围内；调优表随之重算。
    pub fn set_initial_size(&mut self, size: Size) -> AnimResult<()> {
        validate_dimension("initial_width", size.width)?;
        validate_dimension("initial_height", size.height)?;
        validate_order(Axis::Horizontal, size.width, self.final_.width)?;
        validate_order(Axis::Vertical, size.height, self.final_.height)?;
        self.initial = size;
        self.clamp_actual();
        self.retune();
        Ok(())
    }

    /// 修改最终尺寸
    pub fn set_final_size(&mut self, size: Size) -> AnimResult<()> {
        validate_dimension("final_width", size.width)?;
        validate_dimension("final_height", size.height)?;
        validate_order(Axis::Horizontal, self.initial.width, size.width)?;
        validate_order(Axis::Vertical, self.initial.height, size.height)?;
        self.final_ = size;
        self.clamp_actual();
        self.retune();
        Ok(())
    }

    /// 修改锚点并重新放入网格
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.widget.grid(self.grid_cell());
    }

    /// 开关按距离比例同步
    pub fn set_relative_expansion(&mut self, enabled: bool) {
        self.relative_expansion = enabled;
        self.retune();
    }

    fn grid_cell(&self) -> GridCell {
        GridCell {
            row: 0,
            column: 0,
            sticky: self.orientation,
        }
    }

    fn clamp_actual(&mut self) {
        self.actual = Size::new(
            self.actual.width.clamp(self.initial.width, self.final_.width),
            self.actual
                .height
                .clamp(self.initial.height, self.final_.height),
        );
        self.widget.configure(self.actual);
    }

    /// 两轴的总距离
    fn total_distance(&self) -> Size {
        Size::new(
            self.final_.width - self.initial.width,
            self.final_.height - self.initial.height,
        )
    }

    /// 方向对应的目标尺寸
    fn target(&self, direction: Direction) -> Size {
        match direction {
            Direction::Forward => self.initial,
            Direction::Backward => self.final_,
        }
    }

    /// 从当前实际尺寸到目标的剩余距离
    fn remaining_distance(&self, direction: Direction, axis: Axis) -> f64 {
        let remaining = match direction {
            Direction::Forward => self.actual.along(axis) - self.initial.along(axis),
            Direction::Backward => self.final_.along(axis) - self.actual.along(axis),
        };
        remaining.max(0.0)
    }

    fn retune(&mut self) {
        let distance = self.total_distance();
        let major = if distance.width >= distance.height {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let tuning = DirectionalTable::from_fn(|direction, axis| {
            let offset = self.derive_offset(direction, axis, distance, major);
            let speed_ms = if self.config.override_fps {
                self.requested_speeds.get(direction, axis)
            } else {
                self.config.frame_interval_ms()
            };
            let required_calls =
                calls_for(distance.along(axis), offset, self.config.enable_animation).max(1);
            ResizeTuning {
                offset,
                speed_ms,
                required_calls,
            }
        });
        self.tuning = tuning;
    }

    fn derive_offset(&self, direction: Direction, axis: Axis, distance: Size, major: Axis) -> f64 {
        if self.config.override_fps {
            return self.requested_offsets.get(direction, axis);
        }

        let base = self.config.fps_offset() + FPS_OFFSET_BIAS;
        if !self.relative_expansion || axis == major {
            return base;
        }

        let major_distance = distance.along(major);
        let minor_distance = distance.along(axis);
        if minor_distance <= 0.0 || major_distance <= 0.0 {
            return base;
        }
        self.config
            .round(base * minor_distance / major_distance)
            .max(self.config.min_offset())
    }

    fn tracks_settled(&self) -> bool {
        self.tracks.iter().all(|t| t.settled)
    }
}

impl<W: Widget> Stepper for ResizeStepper<W> {
    fn config(&self) -> &AnimationConfig {
        &self.config
    }

    fn set_ignore_inputs(&mut self, ignore: bool) {
        self.config.ignore_inputs = ignore;
    }

    fn set_enable_animation(&mut self, enabled: bool) {
        self.config.enable_animation = enabled;
        // 禁用动画时 required_calls 变为 1
        self.retune();
    }

    fn begin(&mut self, direction: Direction) -> Vec<Axis> {
        for axis in Axis::ALL {
            let tuning = self.tuning.get(direction, axis);
            let remaining = self.remaining_distance(direction, axis);
            let remaining_calls = calls_for(remaining, tuning.offset, self.config.enable_animation);
            self.tracks[slot(axis)] = AxisTrack {
                calls: tuning.required_calls.saturating_sub(remaining_calls),
                settled: false,
            };
            debug!(
                %direction,
                %axis,
                remaining,
                remaining_calls,
                calls = self.tracks[slot(axis)].calls,
                required_calls = tuning.required_calls,
                "缩放轨道开始"
            );
        }
        Axis::ALL.to_vec()
    }

    fn step(&mut self, direction: Direction, axis: Axis) -> StepOutcome {
        let tuning = self.tuning.get(direction, axis);
        let target = self.target(direction).along(axis);
        let track = &mut self.tracks[slot(axis)];

        if track.settled {
            return if self.tracks_settled() {
                StepOutcome::Terminated
            } else {
                StepOutcome::Settled
            };
        }

        if track.calls >= tuning.required_calls {
            // 吸附到精确目标，消除浮点累积误差
            track.settled = true;
            self.actual.set_along(axis, target);
            self.widget.configure(self.actual);
            trace!(%direction, %axis, actual = ?self.actual, "缩放轨道到达目标");
            return if self.tracks_settled() {
                StepOutcome::Terminated
            } else {
                StepOutcome::Settled
            };
        }

        track.calls += 1;
        let current = self.actual.along(axis);
        let next = if !self.config.enable_animation {
            target
        } else {
            match direction {
                Direction::Forward => (current - tuning.offset).max(target),
                Direction::Backward => (current + tuning.offset).min(target),
            }
        };
        self.actual.set_along(axis, next);
        self.widget.configure(self.actual);
        trace!(%direction, %axis, actual = ?self.actual, "缩放 tick");

        StepOutcome::Continue {
            delay_ms: tuning.speed_ms,
        }
    }
}

fn slot(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{RecordingWidget, WidgetCall};

    fn override_config(initial: (f64, f64), final_: (f64, f64), offset: f64) -> ResizeConfig {
        ResizeConfig {
            animation: AnimationConfig {
                override_fps: true,
                opened: true,
                ..AnimationConfig::default()
            },
            initial_width: initial.0,
            initial_height: initial.1,
            final_width: final_.0,
            final_height: final_.1,
            offsets: DirectionalTable::splat(offset),
            speeds: DirectionalTable::splat(10),
            ..ResizeConfig::default()
        }
    }

    /// 反复推进一条轨道直到它不再 Continue
    fn drain(stepper: &mut ResizeStepper<RecordingWidget>, direction: Direction, axis: Axis) -> (u32, StepOutcome) {
        let mut ticks = 0;
        loop {
            let outcome = stepper.step(direction, axis);
            ticks += 1;
            if !matches!(outcome, StepOutcome::Continue { .. }) {
                return (ticks, outcome);
            }
        }
    }

    #[test]
    fn test_attach_configures_and_grids_widget() {
        let mut config = ResizeConfig::default();
        config.orientation = Orientation::NorthWest;
        let stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();

        let calls = stepper.widget().calls();
        assert_eq!(calls[0], WidgetCall::Configure(Size::new(1.0, 1.0)));
        assert_eq!(
            calls[1],
            WidgetCall::Grid(GridCell {
                row: 0,
                column: 0,
                sticky: Orientation::NorthWest,
            })
        );
    }

    #[test]
    fn test_opened_starts_at_final_size() {
        let config = override_config((1.0, 1.0), (10.0, 20.0), 1.0);
        let stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();
        assert_eq!(stepper.actual(), Size::new(10.0, 20.0));
    }

    #[test]
    fn test_override_uses_requested_offsets() {
        let mut config = override_config((1.0, 1.0), (11.0, 21.0), 1.0);
        config.offsets.hforward = 3.0;
        config.speeds.vbackward = 7;
        let stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();

        let h = stepper.tuning(Direction::Forward, Axis::Horizontal);
        assert_eq!(h.offset, 3.0);
        // ceil(10 / 3) = 4
        assert_eq!(h.required_calls, 4);
        assert_eq!(stepper.tuning(Direction::Forward, Axis::Vertical).required_calls, 20);
        assert_eq!(stepper.tuning(Direction::Backward, Axis::Vertical).speed_ms, 7);
    }

    #[test]
    fn test_fps_offsets_with_relative_expansion() {
        // 水平距离 499，垂直距离 249
        let config = ResizeConfig::default();
        let stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();

        let h = stepper.tuning(Direction::Forward, Axis::Horizontal);
        let v = stepper.tuning(Direction::Forward, Axis::Vertical);
        assert_eq!(h.offset, 0.018333 + FPS_OFFSET_BIAS);
        assert!(v.offset < h.offset);
        assert!((v.offset - h.offset * 249.0 / 499.0).abs() < 1e-6);
        // 两轴调用次数几乎一致
        assert!(h.required_calls.abs_diff(v.required_calls) <= 1);
        assert_eq!(h.speed_ms, 17);
    }

    #[test]
    fn test_fps_offsets_without_relative_expansion() {
        let config = ResizeConfig {
            relative_expansion: false,
            ..ResizeConfig::default()
        };
        let stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();
        let h = stepper.tuning(Direction::Backward, Axis::Horizontal);
        let v = stepper.tuning(Direction::Backward, Axis::Vertical);
        assert_eq!(h.offset, v.offset);
        assert!(h.required_calls > v.required_calls);
    }

    #[test]
    fn test_vertical_major_axis() {
        let config = ResizeConfig {
            final_width: 50.0,
            final_height: 400.0,
            ..ResizeConfig::default()
        };
        let stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();
        let h = stepper.tuning(Direction::Forward, Axis::Horizontal);
        let v = stepper.tuning(Direction::Forward, Axis::Vertical);
        assert!(h.offset < v.offset);
    }

    #[test]
    fn test_forward_reaches_initial_exactly() {
        let config = override_config((1.0, 1.0), (10.0, 7.0), 2.5);
        let mut stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();

        let tracks = stepper.begin(Direction::Forward);
        assert_eq!(tracks, vec![Axis::Horizontal, Axis::Vertical]);

        // ceil(9 / 2.5) = 4 次移动 + 1 次吸附
        let (ticks, outcome) = drain(&mut stepper, Direction::Forward, Axis::Horizontal);
        assert_eq!(ticks, 5);
        assert_eq!(outcome, StepOutcome::Settled);
        assert_eq!(stepper.actual().width, 1.0);

        let (_, outcome) = drain(&mut stepper, Direction::Forward, Axis::Vertical);
        assert_eq!(outcome, StepOutcome::Terminated);
        assert_eq!(stepper.actual(), Size::new(1.0, 1.0));
    }

    #[test]
    fn test_step_never_crosses_target() {
        let config = override_config((1.0, 1.0), (10.0, 10.0), 4.0);
        let mut stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();
        stepper.begin(Direction::Forward);
        drain(&mut stepper, Direction::Forward, Axis::Horizontal);

        for size in stepper.widget().sizes() {
            assert!(size.width >= 1.0);
        }
    }

    #[test]
    fn test_begin_counts_from_actual_position() {
        let config = override_config((1.0, 1.0), (11.0, 11.0), 1.0);
        let mut stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();
        stepper.begin(Direction::Forward);
        for _ in 0..4 {
            stepper.step(Direction::Forward, Axis::Horizontal);
        }
        assert_eq!(stepper.actual().width, 7.0);

        // 反向：剩余 4 像素，已完成 10 - 4 = 6 次
        stepper.begin(Direction::Backward);
        assert_eq!(stepper.track(Axis::Horizontal).calls, 6);
        // 垂直轴未动过，反向无剩余距离
        assert_eq!(stepper.track(Axis::Vertical).calls, 10);

        let (ticks, _) = drain(&mut stepper, Direction::Backward, Axis::Horizontal);
        assert_eq!(ticks, 5);
        assert_eq!(stepper.actual().width, 11.0);
    }

    #[test]
    fn test_disabled_animation_jumps_to_target() {
        let mut config = override_config((1.0, 1.0), (100.0, 50.0), 1.0);
        config.animation.enable_animation = false;
        let mut stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();
        assert_eq!(stepper.tuning(Direction::Forward, Axis::Horizontal).required_calls, 1);

        stepper.begin(Direction::Forward);
        assert!(matches!(
            stepper.step(Direction::Forward, Axis::Horizontal),
            StepOutcome::Continue { .. }
        ));
        assert_eq!(stepper.actual().width, 1.0);
        assert_eq!(stepper.step(Direction::Forward, Axis::Horizontal), StepOutcome::Settled);
    }

    #[test]
    fn test_setters_validate_and_retune() {
        let config = override_config((1.0, 1.0), (10.0, 10.0), 1.0);
        let mut stepper = ResizeStepper::new(&config, RecordingWidget::new()).unwrap();

        assert!(stepper.set_final_size(Size::new(0.5, 10.0)).is_err());
        assert!(stepper.set_initial_size(Size::new(0.0, 1.0)).is_err());

        stepper.set_final_size(Size::new(5.0, 10.0)).unwrap();
        assert_eq!(stepper.actual().width, 5.0);
        assert_eq!(stepper.tuning(Direction::Forward, Axis::Horizontal).required_calls, 4);

        stepper.set_orientation(Orientation::South);
        assert_eq!(stepper.widget().last_grid().unwrap().sticky, Orientation::South);

        stepper.set_enable_animation(false);
        assert_eq!(stepper.tuning(Direction::Forward, Axis::Vertical).required_calls, 1);
    }
}
