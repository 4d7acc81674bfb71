//! Projection of a reading series into drawable line-chart data.

use serde::Serialize;
use std::fmt;
use wqm_feed::{Parameter, ReadingSeries};

/// One of the three fixed line charts.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSlot {
    Ph,
    Turbidity,
    /// Water quality, plotted as total dissolved solids. Residue is reported on
    /// the `StatusBoard` instead of getting a chart of its own.
    Quality,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 3] = [ChartSlot::Ph, ChartSlot::Turbidity, ChartSlot::Quality];

    pub fn index(&self) -> usize {
        match self {
            ChartSlot::Ph => 0,
            ChartSlot::Turbidity => 1,
            ChartSlot::Quality => 2,
        }
    }

    pub fn parameter(&self) -> Parameter {
        match self {
            ChartSlot::Ph => Parameter::Ph,
            ChartSlot::Turbidity => Parameter::Turbidity,
            ChartSlot::Quality => Parameter::Tds,
        }
    }

    pub fn style(&self) -> ChartStyle {
        match self {
            ChartSlot::Ph => ChartStyle {
                label: "pH",
                border_color: "#60a5fa",
                fill_color: "rgba(96,165,250,0.2)",
            },
            ChartSlot::Turbidity => ChartStyle {
                label: "Turbidity (NTU)",
                border_color: "#a78bfa",
                fill_color: "rgba(167,139,250,0.2)",
            },
            ChartSlot::Quality => ChartStyle {
                label: "TDS (ppm)",
                border_color: "#f472b6",
                fill_color: "rgba(244,114,182,0.2)",
            },
        }
    }
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartSlot::Ph => "ph",
            ChartSlot::Turbidity => "turbidity",
            ChartSlot::Quality => "quality",
        })
    }
}

/// Fixed visual parameters of a chart slot.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct ChartStyle {
    pub label: &'static str,
    pub border_color: &'static str,
    pub fill_color: &'static str,
}

/// A construction request for the drawable-series sink.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: ChartStyle,
}

impl ChartData {
    /// Build the full chart for `slot` from every reading in `series`.
    pub fn from_series(slot: ChartSlot, series: &ReadingSeries) -> Self {
        ChartData {
            labels: series.labels(),
            values: series.values(slot.parameter()),
            style: slot.style(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
