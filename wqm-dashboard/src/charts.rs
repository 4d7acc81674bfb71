//! Chart lifecycle: one live drawable per slot, always destroyed before it is replaced.

use log::{debug, warn};
use std::fmt;
use wqm_data::{ChartData, ChartSlot};
use wqm_feed::ReadingSeries;

/// The sink refused to build a chart.
#[derive(Debug, PartialEq, Clone)]
pub struct ChartError(pub String);

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chart error: {}", self.0)
    }
}

impl std::error::Error for ChartError {}

/// Which chart panels are shown.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ChartFocus {
    #[default]
    All,
    Only(ChartSlot),
}

impl ChartFocus {
    pub fn is_visible(&self, slot: ChartSlot) -> bool {
        match self {
            ChartFocus::All => true,
            ChartFocus::Only(focused) => *focused == slot,
        }
    }

    /// Focus on `slot`, or go back to showing everything if it already has focus.
    pub fn toggled(self, slot: ChartSlot) -> ChartFocus {
        match self {
            ChartFocus::Only(focused) if focused == slot => ChartFocus::All,
            _ => ChartFocus::Only(slot),
        }
    }
}

/// The drawable-series sink: builds and tears down chart instances on canvas targets.
pub trait ChartSink {
    /// Handle to one drawn chart.
    type Chart;

    /// Whether the canvas for `slot` currently exists in the view.
    fn target_exists(&self, slot: ChartSlot) -> bool;

    fn construct(&mut self, slot: ChartSlot, data: &ChartData) -> Result<Self::Chart, ChartError>;

    fn destroy(&mut self, slot: ChartSlot, chart: Self::Chart);

    /// Called when panel visibility changes so the view can mount or unmount targets.
    fn set_focus(&mut self, _focus: ChartFocus) {}
}

/// Construction and destruction counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct ChartStats {
    pub constructed: usize,
    pub destroyed: usize,
    pub live: usize,
}

/// Owns the three chart slots.
pub struct ChartStateManager<S: ChartSink> {
    sink: S,
    slots: [Option<S::Chart>; 3],
    constructed: usize,
    destroyed: usize,
}

impl<S: ChartSink> ChartStateManager<S> {
    pub fn new(sink: S) -> Self {
        ChartStateManager {
            sink,
            slots: [None, None, None],
            constructed: 0,
            destroyed: 0,
        }
    }

    /// Rebuild every slot whose target exists from the full series.
    ///
    /// Slots without a target are skipped and keep whatever they had.
    /// Returns the number of charts built.
    pub fn render(&mut self, series: &ReadingSeries) -> usize {
        let mut built = 0;
        for slot in ChartSlot::ALL {
            if self.render_slot(slot, series) {
                built += 1;
            }
        }
        built
    }

    /// Replace the chart in one slot. Returns `false` if nothing was built.
    pub fn render_slot(&mut self, slot: ChartSlot, series: &ReadingSeries) -> bool {
        if !self.sink.target_exists(slot) {
            debug!("No canvas for {} chart yet; deferring", slot);
            return false;
        }
        self.destroy_slot(slot);
        let data = ChartData::from_series(slot, series);
        match self.sink.construct(slot, &data) {
            Ok(chart) => {
                self.slots[slot.index()] = Some(chart);
                self.constructed += 1;
                true
            }
            Err(e) => {
                warn!("Failed to build {} chart: {}", slot, e);
                false
            }
        }
    }

    fn destroy_slot(&mut self, slot: ChartSlot) -> bool {
        match self.slots[slot.index()].take() {
            Some(chart) => {
                self.sink.destroy(slot, chart);
                self.destroyed += 1;
                true
            }
            None => false,
        }
    }

    /// Destroy every live chart. Safe to call repeatedly.
    pub fn destroy_all(&mut self) -> usize {
        let mut destroyed = 0;
        for slot in ChartSlot::ALL {
            if self.destroy_slot(slot) {
                destroyed += 1;
            }
        }
        destroyed
    }

    pub fn is_live(&self, slot: ChartSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    pub fn stats(&self) -> ChartStats {
        ChartStats {
            constructed: self.constructed,
            destroyed: self.destroyed,
            live: self.slots.iter().filter(|s| s.is_some()).count(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: ChartSink> Drop for ChartStateManager<S> {
    fn drop(&mut self) {
        let leaked = self.destroy_all();
        if leaked > 0 {
            warn!("{} chart(s) still live when the chart manager was dropped", leaked);
        }
    }
}
