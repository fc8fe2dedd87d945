//! # Slide 步进器
//!
//! 在起点与终点之间滑动框架（相对父容器的坐标）。
//!
//! 每个实例只动画一个坐标：LEFT/RIGHT 动 x，TOP/BOTTOM 动 y，
//! 另一个坐标固定为起点上的取值。forward 滑向终点，backward 滑回起点。

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{StepOutcome, Stepper};
use crate::config::{AnimationConfig, SlideConfig};
use crate::error::AnimResult;
use crate::request::{Axis, Direction};
use crate::widget::{Placement, SlideDirection, Widget};

/// 相对父容器的位置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn set_along(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }
}

/// 滑动步进器
#[derive(Debug)]
pub struct SlideStepper<W: Widget> {
    widget: W,
    config: AnimationConfig,
    slide_direction: SlideDirection,
    start: Position,
    /// 被动画坐标的终点（已应用 disappear）
    end: f64,
    actual: Position,
    forward_offset: f64,
    backward_offset: f64,
    forward_speed: u64,
    backward_speed: u64,
    automatic_scaling: bool,
    disappear: bool,
}

impl<W: Widget> SlideStepper<W> {
    /// 创建步进器并把框架放到起始位置
    ///
    /// `opened = true` 时位于起点，否则位于终点。
    pub fn new(config: &SlideConfig, widget: W) -> AnimResult<Self> {
        config.validate()?;

        let animation = config.animation.clone();
        let start = Position::new(config.xstart, config.ystart);
        let end = config.effective_end();

        let (forward_offset, backward_offset) = if animation.override_fps {
            (config.forward_offset, config.backward_offset)
        } else {
            let derived = animation.fps_offset().max(animation.min_offset());
            (derived, derived)
        };
        let (forward_speed, backward_speed) = if animation.override_fps {
            (config.forward_speed, config.backward_speed)
        } else {
            let derived = animation.frame_interval_ms();
            (derived, derived)
        };

        let mut stepper = Self {
            widget,
            config: animation,
            slide_direction: config.slide_direction,
            start,
            end,
            actual: start,
            forward_offset,
            backward_offset,
            forward_speed,
            backward_speed,
            automatic_scaling: config.automatic_scaling,
            disappear: config.disappear,
        };
        if !stepper.config.opened {
            stepper.actual = stepper.end_position();
        }
        stepper.place();

        debug!(
            slide_direction = %stepper.slide_direction,
            start = ?stepper.start,
            end = stepper.end,
            actual = ?stepper.actual,
            disappear = stepper.disappear,
            automatic_scaling = stepper.automatic_scaling,
            forward_offset = stepper.forward_offset,
            backward_offset = stepper.backward_offset,
            forward_speed = stepper.forward_speed,
            backward_speed = stepper.backward_speed,
            "滑动框架已创建"
        );

        Ok(stepper)
    }

    /// 当前实际位置
    pub fn actual(&self) -> Position {
        self.actual
    }

    /// 起点
    pub fn start(&self) -> Position {
        self.start
    }

    /// 某个轴上的终点
    ///
    /// 不被动画的轴返回 `None`：该轴没有终点，只保持起点坐标。
    pub fn end(&self, axis: Axis) -> Option<f64> {
        (axis == self.active_axis()).then_some(self.end)
    }

    /// 终点位置（非动画轴取起点坐标）
    pub fn end_position(&self) -> Position {
        let mut position = self.start;
        position.set_along(self.active_axis(), self.end);
        position
    }

    /// 滑动方向
    pub fn slide_direction(&self) -> SlideDirection {
        self.slide_direction
    }

    /// 被动画的坐标轴
    pub fn active_axis(&self) -> Axis {
        self.slide_direction.axis()
    }

    /// 某方向的每 tick 偏移量
    pub fn offset(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Forward => self.forward_offset,
            Direction::Backward => self.backward_offset,
        }
    }

    /// 某方向的 tick 间隔（毫秒）
    pub fn speed_ms(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Forward => self.forward_speed,
            Direction::Backward => self.backward_speed,
        }
    }

    /// 被驱动的控件
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// 被驱动的控件（可变）
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// 开关自动拉伸，并立即重新放置
    pub fn set_automatic_scaling(&mut self, enabled: bool) {
        self.automatic_scaling = enabled;
        self.place();
    }

    /// 当前方向是否已到达边界
    pub fn reached(&self, direction: Direction) -> bool {
        let value = self.actual.along(self.active_axis());
        let start = self.start.along(self.active_axis());
        match (self.slide_direction.is_decreasing(), direction) {
            (true, Direction::Forward) => value <= self.end,
            (true, Direction::Backward) => value >= start,
            (false, Direction::Forward) => value >= self.end,
            (false, Direction::Backward) => value <= start,
        }
    }

    /// 把被动画坐标向目标推进一个偏移量，不越过边界
    fn advance(&mut self, direction: Direction) {
        let axis = self.active_axis();
        let current = self.actual.along(axis);
        let target = match direction {
            Direction::Forward => self.end,
            Direction::Backward => self.start.along(axis),
        };

        let next = if !self.config.enable_animation {
            target
        } else {
            let offset = self.offset(direction);
            let decreasing = self.slide_direction.is_decreasing() == (direction == Direction::Forward);
            if decreasing {
                self.config.round(current - offset).max(target)
            } else {
                self.config.round(current + offset).min(target)
            }
        };
        self.actual.set_along(axis, next);
    }

    fn place(&mut self) {
        let x = self.config.round(self.actual.x);
        let y = self.config.round(self.actual.y);
        let placement = if self.automatic_scaling {
            Placement::stretched(x, y)
        } else {
            Placement::at(x, y)
        };
        self.widget.place(placement);
    }
}

impl<W: Widget> Stepper for SlideStepper<W> {
    fn config(&self) -> &AnimationConfig {
        &self.config
    }

    fn set_ignore_inputs(&mut self, ignore: bool) {
        self.config.ignore_inputs = ignore;
    }

    fn set_enable_animation(&mut self, enabled: bool) {
        self.config.enable_animation = enabled;
    }

    fn begin(&mut self, direction: Direction) -> Vec<Axis> {
        debug!(
            %direction,
            actual = ?self.actual,
            reached = self.reached(direction),
            "滑动轨道开始"
        );
        vec![self.active_axis()]
    }

    fn step(&mut self, direction: Direction, _axis: Axis) -> StepOutcome {
        if self.reached(direction) {
            trace!(%direction, actual = ?self.actual, "滑动到达边界");
            return StepOutcome::Terminated;
        }

        self.advance(direction);
        self.place();
        trace!(%direction, actual = ?self.actual, "滑动 tick");

        StepOutcome::Continue {
            delay_ms: self.speed_ms(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::RecordingWidget;

    fn config(dir: SlideDirection, start: (f64, f64), end: (f64, f64)) -> SlideConfig {
        let mut config = SlideConfig::new(dir, start, end);
        config.animation.override_fps = true;
        config.animation.opened = true;
        config.forward_offset = 0.25;
        config.backward_offset = 0.5;
        config.forward_speed = 5;
        config.backward_speed = 8;
        config
    }

    fn drain(stepper: &mut SlideStepper<RecordingWidget>, direction: Direction) -> usize {
        let axis = stepper.active_axis();
        stepper.begin(direction);
        let mut ticks = 0;
        while stepper.step(direction, axis) != StepOutcome::Terminated {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_initial_placement() {
        let mut cfg = config(SlideDirection::Left, (1.0, 0.3), (0.0, 0.9));
        let opened = SlideStepper::new(&cfg, RecordingWidget::new()).unwrap();
        assert_eq!(opened.widget().last_placement(), Some(Placement::at(1.0, 0.3)));

        cfg.animation.opened = false;
        let closed = SlideStepper::new(&cfg, RecordingWidget::new()).unwrap();
        // y 保持起点坐标，yend 不参与
        assert_eq!(closed.actual(), Position::new(0.0, 0.3));
    }

    #[test]
    fn test_unused_axis_has_no_end() {
        let stepper =
            SlideStepper::new(&config(SlideDirection::Top, (0.2, 1.0), (0.7, 0.0)), RecordingWidget::new())
                .unwrap();
        assert_eq!(stepper.active_axis(), Axis::Vertical);
        assert_eq!(stepper.end(Axis::Vertical), Some(0.0));
        assert_eq!(stepper.end(Axis::Horizontal), None);
        assert_eq!(stepper.end_position(), Position::new(0.2, 0.0));
    }

    #[test]
    fn test_reached_predicates() {
        let cases = [
            (SlideDirection::Left, (1.0, 0.0), (0.0, 0.0)),
            (SlideDirection::Right, (0.0, 0.0), (1.0, 0.0)),
            (SlideDirection::Top, (0.0, 1.0), (0.0, 0.0)),
            (SlideDirection::Bottom, (0.0, 0.0), (0.0, 1.0)),
        ];
        for (dir, start, end) in cases {
            let stepper = SlideStepper::new(&config(dir, start, end), RecordingWidget::new()).unwrap();
            // opened：位于起点
            assert!(stepper.reached(Direction::Backward), "{dir}");
            assert!(!stepper.reached(Direction::Forward), "{dir}");
        }
    }

    #[test]
    fn test_forward_and_back_in_every_direction() {
        let cases = [
            (SlideDirection::Left, (1.0, 0.0), (0.0, 0.0)),
            (SlideDirection::Right, (0.0, 0.0), (1.0, 0.0)),
            (SlideDirection::Top, (0.0, 1.0), (0.0, 0.0)),
            (SlideDirection::Bottom, (0.0, 0.0), (0.0, 1.0)),
        ];
        for (dir, start, end) in cases {
            let mut stepper = SlideStepper::new(&config(dir, start, end), RecordingWidget::new()).unwrap();

            // 距离 1.0，forward 偏移 0.25
            assert_eq!(drain(&mut stepper, Direction::Forward), 4, "{dir}");
            assert_eq!(stepper.actual(), Position::new(end.0, end.1), "{dir}");

            // backward 偏移 0.5
            assert_eq!(drain(&mut stepper, Direction::Backward), 2, "{dir}");
            assert_eq!(stepper.actual(), Position::new(start.0, start.1), "{dir}");
        }
    }

    #[test]
    fn test_clamped_at_boundary() {
        let mut cfg = config(SlideDirection::Right, (0.0, 0.0), (0.6, 0.0));
        cfg.forward_offset = 0.25;
        let mut stepper = SlideStepper::new(&cfg, RecordingWidget::new()).unwrap();
        drain(&mut stepper, Direction::Forward);

        let xs: Vec<f64> = stepper.widget().placements().iter().map(|p| p.relx).collect();
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.6]);
    }

    #[test]
    fn test_speed_per_direction() {
        let mut stepper =
            SlideStepper::new(&config(SlideDirection::Left, (1.0, 0.0), (0.0, 0.0)), RecordingWidget::new())
                .unwrap();
        assert_eq!(
            stepper.step(Direction::Forward, Axis::Horizontal),
            StepOutcome::Continue { delay_ms: 5 }
        );
        assert_eq!(
            stepper.step(Direction::Backward, Axis::Horizontal),
            StepOutcome::Continue { delay_ms: 8 }
        );
    }

    #[test]
    fn test_fps_derived_offsets() {
        let mut cfg = SlideConfig::new(SlideDirection::Left, (1.0, 0.0), (0.0, 0.0));
        cfg.forward_offset = 0.3;
        let stepper = SlideStepper::new(&cfg, RecordingWidget::new()).unwrap();
        assert_eq!(stepper.offset(Direction::Forward), 0.018333);
        assert_eq!(stepper.speed_ms(Direction::Backward), 17);
    }

    #[test]
    fn test_disappear_slides_out_of_parent() {
        let mut cfg = config(SlideDirection::Bottom, (0.0, 0.0), (0.0, 0.5));
        cfg.disappear = true;
        let mut stepper = SlideStepper::new(&cfg, RecordingWidget::new()).unwrap();
        assert_eq!(stepper.end(Axis::Vertical), Some(1.0));

        drain(&mut stepper, Direction::Forward);
        assert_eq!(stepper.actual().y, 1.0);
    }

    #[test]
    fn test_automatic_scaling_stretches() {
        let mut cfg = config(SlideDirection::Left, (1.0, 0.0), (0.0, 0.0));
        cfg.automatic_scaling = true;
        let mut stepper = SlideStepper::new(&cfg, RecordingWidget::new()).unwrap();
        assert_eq!(stepper.widget().last_placement(), Some(Placement::stretched(1.0, 0.0)));

        stepper.set_automatic_scaling(false);
        assert_eq!(stepper.widget().last_placement(), Some(Placement::at(1.0, 0.0)));
    }

    #[test]
    fn test_disabled_animation_single_move() {
        let mut stepper =
            SlideStepper::new(&config(SlideDirection::Left, (1.0, 0.0), (0.0, 0.0)), RecordingWidget::new())
                .unwrap();
        stepper.set_enable_animation(false);
        assert_eq!(drain(&mut stepper, Direction::Forward), 1);
        assert_eq!(stepper.actual().x, 0.0);
    }
}
