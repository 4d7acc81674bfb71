//! Water-quality thresholds and status classification.
//!
//! | Parameter | Good       | Fair                    | Poor            |
//! |-----------|------------|-------------------------|-----------------|
//! | pH        | 6.5 - 8.5  | 6.0 - 6.4, 8.6 - 9.5    | everything else |
//! | Turbidity | 0          | 0.1 - 5                 | everything else |
//! | TDS       | 50 - 300   | above 300 up to 600     | below 50, above 600 |
//!
//! Bounds are inclusive. Values falling between two stated bands (pH 6.45,
//! turbidity 0.05) are poor: only the listed ranges count as good or fair.

use log::warn;
use serde::{Deserialize, Serialize};
use wqm_feed::{Parameter, Reading, ReadingSeries};

/// Status label used when there is nothing to classify.
pub const NO_DATA: &str = "no data";

/// Three-level health classification.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Fair,
    Poor,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Good => "Good",
            Severity::Fair => "Fair",
            Severity::Poor => "Poor",
        }
    }
}

/// A classified value: `(value, status, severity)`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ParameterStatus {
    pub value: f64,
    pub status: String,
    pub severity: Severity,
}

impl ParameterStatus {
    /// The degraded result for unknown parameters or missing data.
    pub fn no_data(value: f64) -> Self {
        ParameterStatus {
            value,
            status: NO_DATA.to_string(),
            severity: Severity::Fair,
        }
    }
}

fn within(value: f64, low: f64, high: f64) -> bool {
    value >= low && value <= high
}

pub fn ph_severity(value: f64) -> Severity {
    if within(value, 6.5, 8.5) {
        Severity::Good
    } else if within(value, 6.0, 6.4) || within(value, 8.6, 9.5) {
        Severity::Fair
    } else {
        Severity::Poor
    }
}

pub fn turbidity_severity(value: f64) -> Severity {
    if value == 0.0 {
        Severity::Good
    } else if within(value, 0.1, 5.0) {
        Severity::Fair
    } else {
        Severity::Poor
    }
}

pub fn tds_severity(value: f64) -> Severity {
    if within(value, 50.0, 300.0) {
        Severity::Good
    } else if value > 300.0 && value <= 600.0 {
        Severity::Fair
    } else {
        Severity::Poor
    }
}

/// Classify one parameter value. Pure and deterministic.
pub fn classify(parameter: Parameter, value: f64) -> ParameterStatus {
    let severity = match parameter {
        Parameter::Ph => ph_severity(value),
        Parameter::Turbidity => turbidity_severity(value),
        Parameter::Tds => tds_severity(value),
    };
    ParameterStatus {
        value,
        status: severity.label().to_string(),
        severity,
    }
}

/// Classify by parameter name; unknown names get the `fair` / "no data" default.
pub fn classify_named(name: &str, value: f64) -> ParameterStatus {
    match name.parse::<Parameter>() {
        Ok(parameter) => classify(parameter, value),
        Err(_) => ParameterStatus::no_data(value),
    }
}

/// Status cards for the current reading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StatusBoard {
    pub ph: ParameterStatus,
    pub turbidity: ParameterStatus,
    pub tds: ParameterStatus,
    /// Residual solids (%) of the same reading. Shown as-is, never classified.
    pub residue: f64,
}

impl StatusBoard {
    pub fn no_data() -> Self {
        StatusBoard {
            ph: ParameterStatus::no_data(0.0),
            turbidity: ParameterStatus::no_data(0.0),
            tds: ParameterStatus::no_data(0.0),
            residue: 0.0,
        }
    }

    pub fn from_reading(reading: &Reading) -> Self {
        StatusBoard {
            ph: classify(Parameter::Ph, reading.ph),
            turbidity: classify(Parameter::Turbidity, reading.turbidity),
            tds: classify(Parameter::Tds, reading.tds),
            residue: reading.residue,
        }
    }

    /// Classify the latest reading of `series`, warning about zeros that look
    /// like field-name mismatches. An empty series has no data.
    pub fn from_series(series: &ReadingSeries) -> Self {
        match series.latest() {
            Some(reading) => {
                for parameter in Parameter::ALL {
                    if reading.value(parameter) == 0.0 && reading.is_suspect(parameter) {
                        warn!(
                            "{} read as 0 but the record looked like it carried a value; field name mismatch?",
                            parameter
                        );
                    }
                }
                StatusBoard::from_reading(reading)
            }
            None => StatusBoard::no_data(),
        }
    }

    pub fn get(&self, parameter: Parameter) -> &ParameterStatus {
        match parameter {
            Parameter::Ph => &self.ph,
            Parameter::Turbidity => &self.turbidity,
            Parameter::Tds => &self.tds,
        }
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        StatusBoard::no_data()
    }
}
