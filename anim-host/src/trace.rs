//! # Trace 模块
//!
//! headless 控件：记录框架发出的每一次几何调用，并通过 tracing 输出。

use anim_runtime::{GridCell, Placement, RecordingWidget, Size, Widget, WidgetCall};
use serde::Serialize;
use tracing::trace;

/// 带时间戳的控件调用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    /// 虚拟时间（毫秒）
    pub at_ms: u64,
    #[serde(flatten)]
    pub call: WidgetCall,
}

/// 按调用类型计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WidgetSummary {
    pub configure: usize,
    pub place: usize,
    pub grid: usize,
}

impl WidgetSummary {
    pub fn from_events(events: &[TraceEvent]) -> Self {
        events.iter().fold(Self::default(), |mut summary, event| {
            match event.call {
                WidgetCall::Configure(_) => summary.configure += 1,
                WidgetCall::Place(_) => summary.place += 1,
                WidgetCall::Grid(_) => summary.grid += 1,
            }
            summary
        })
    }
}

/// 记录并输出所有调用的控件
#[derive(Debug, Default)]
pub struct TraceWidget {
    name: String,
    recorder: RecordingWidget,
    /// 已被 `drain_new` 取走的调用数
    drained: usize,
}

impl TraceWidget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 全部调用
    pub fn calls(&self) -> &[WidgetCall] {
        self.recorder.calls()
    }

    pub fn last_size(&self) -> Option<Size> {
        self.recorder.last_size()
    }

    pub fn last_placement(&self) -> Option<Placement> {
        self.recorder.last_placement()
    }

    /// 取出上次以来的新调用，并打上时间戳
    pub fn drain_new(&mut self, at_ms: u64) -> Vec<TraceEvent> {
        let events = self.recorder.calls()[self.drained..]
            .iter()
            .map(|call| TraceEvent {
                at_ms,
                call: call.clone(),
            })
            .collect::<Vec<_>>();
        self.drained = self.recorder.calls().len();
        events
    }
}

impl Widget for TraceWidget {
    fn configure(&mut self, size: Size) {
        trace!(widget = %self.name, width = size.width, height = size.height, "configure");
        self.recorder.configure(size);
    }

    fn place(&mut self, placement: Placement) {
        trace!(
            widget = %self.name,
            relx = placement.relx,
            rely = placement.rely,
            relwidth = ?placement.relwidth,
            relheight = ?placement.relheight,
            "place"
        );
        self.recorder.place(placement);
    }

    fn grid(&mut self, cell: GridCell) {
        trace!(widget = %self.name, row = cell.row, column = cell.column, sticky = %cell.sticky, "grid");
        self.recorder.grid(cell);
    }
}
