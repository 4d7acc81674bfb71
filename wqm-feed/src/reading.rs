use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A measured water-quality parameter.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Ph,
    Turbidity,
    Tds,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Ph, Parameter::Turbidity, Parameter::Tds];

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Turbidity => "turbidity",
            Parameter::Tds => "tds",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a parameter name is not one of `ph`, `turbidity` or `tds`.
#[derive(Debug, PartialEq, Clone)]
pub struct UnknownParameter(pub String);

impl fmt::Display for UnknownParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown parameter: {}", self.0)
    }
}

impl std::error::Error for UnknownParameter {}

impl FromStr for Parameter {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ph" => Ok(Parameter::Ph),
            "turbidity" | "turbidez" => Ok(Parameter::Turbidity),
            "tds" => Ok(Parameter::Tds),
            other => Err(UnknownParameter(other.to_string())),
        }
    }
}

/// Coerce a loosely-typed JSON value into a number.
///
/// Numbers pass through, strings are trimmed and parsed, booleans become
/// 1 or 0. Everything else (null, arrays, objects, unparseable text,
/// non-finite results) becomes 0.
pub fn to_number_or_zero(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_or_zero(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Like [`to_number_or_zero`], but strips a trailing `%` from strings first.
pub fn percent_to_number_or_zero(value: &Value) -> f64 {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            let n = parse_or_zero(trimmed.strip_suffix('%').unwrap_or(trimmed));
            if n.is_finite() {
                n
            } else {
                0.0
            }
        }
        other => to_number_or_zero(other),
    }
}

fn parse_or_zero(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(0.0)
}

/// Whether the raw text of a field reads as a literal zero (or nothing at all).
fn looks_like_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            let s = s.strip_suffix('%').unwrap_or(s).trim();
            s.is_empty() || s.parse::<f64>().map(|f| f == 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

const PH_KEYS: [&str; 3] = ["PH", "ph", "pH"];
const TURBIDITY_KEYS: [&str; 3] = ["Turbidez", "turbidity", "turbidez"];
const TDS_KEYS: [&str; 2] = ["TDS", "tds"];
const RESIDUE_KEYS: [&str; 3] = ["Resíduos Sólidos", "residue", "residuos"];

/// One reading as the remote service sends it, split into known and unknown keys.
#[derive(Debug, Default)]
struct RawReading {
    timestamp: Option<Value>,
    ph: Option<Value>,
    turbidity: Option<Value>,
    tds: Option<Value>,
    residue: Option<Value>,
    extra: Map<String, Value>,
}

/// Remove the first of `keys` present in `fields`; the remaining spellings stay behind as unknown keys.
fn take_field(fields: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|key| fields.remove(*key))
}

impl From<Value> for RawReading {
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                debug!("Reading is not an object: {}", other);
                return RawReading::default();
            }
        };
        RawReading {
            timestamp: fields.remove("timestamp"),
            ph: take_field(&mut fields, &PH_KEYS),
            turbidity: take_field(&mut fields, &TURBIDITY_KEYS),
            tds: take_field(&mut fields, &TDS_KEYS),
            residue: take_field(&mut fields, &RESIDUE_KEYS),
            extra: fields,
        }
    }
}

/// One sensor sample, coerced at ingestion.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Reading {
    pub timestamp: Option<String>,
    pub ph: f64,
    pub turbidity: f64,
    pub tds: f64,
    /// Residual solids, in percent.
    pub residue: f64,
    /// Parameters whose 0 probably hides a real value.
    #[serde(skip)]
    pub suspect: Vec<Parameter>,
}

impl Reading {
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Turbidity => self.turbidity,
            Parameter::Tds => self.tds,
        }
    }

    /// True when `parameter` coerced to 0 although the source looked like it carried a value.
    pub fn is_suspect(&self, parameter: Parameter) -> bool {
        self.suspect.contains(&parameter)
    }
}

fn timestamp_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl From<Value> for Reading {
    fn from(value: Value) -> Self {
        let raw = RawReading::from(value);
        let has_unknown_keys = !raw.extra.is_empty();
        let mut suspect = Vec::new();
        let mut coerce = |parameter: Parameter, field: &Option<Value>| -> f64 {
            match field {
                Some(v) => {
                    let n = to_number_or_zero(v);
                    if n == 0.0 && !looks_like_zero(v) {
                        suspect.push(parameter);
                    }
                    n
                }
                None => {
                    if has_unknown_keys {
                        suspect.push(parameter);
                    }
                    0.0
                }
            }
        };
        let ph = coerce(Parameter::Ph, &raw.ph);
        let turbidity = coerce(Parameter::Turbidity, &raw.turbidity);
        let tds = coerce(Parameter::Tds, &raw.tds);
        Reading {
            timestamp: timestamp_text(raw.timestamp),
            ph,
            turbidity,
            tds,
            residue: raw
                .residue
                .as_ref()
                .map(percent_to_number_or_zero)
                .unwrap_or(0.0),
            suspect,
        }
    }
}

/// Readings in arrival order, oldest first. Replaced wholesale, never edited.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingSeries(Vec<Reading>);

impl ReadingSeries {
    pub fn new(readings: Vec<Reading>) -> Self {
        ReadingSeries(readings)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.0.iter()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.0
    }

    /// The most recent reading, if any.
    pub fn latest(&self) -> Option<&Reading> {
        self.0.last()
    }

    /// The reading shown on the status cards: the latest one, or an empty record.
    pub fn current(&self) -> Reading {
        self.latest().cloned().unwrap_or_default()
    }

    /// X-axis labels: each reading's timestamp, or `Reading <n>` (1-based) when it has none.
    pub fn labels(&self) -> Vec<String> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, r)| match &r.timestamp {
                Some(t) => t.clone(),
                None => format!("Reading {}", i + 1),
            })
            .collect()
    }

    pub fn values(&self, parameter: Parameter) -> Vec<f64> {
        self.0.iter().map(|r| r.value(parameter)).collect()
    }
}

impl From<Vec<Reading>> for ReadingSeries {
    fn from(readings: Vec<Reading>) -> Self {
        ReadingSeries(readings)
    }
}

impl<'a> IntoIterator for &'a ReadingSeries {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
