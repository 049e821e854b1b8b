//! Typed parameter values and their wire encoding
//!
//! Heat pump data points carry one of three value types (`BOOL`, `INT`,
//! `FLOAT`). On the wire booleans are `0`/`1`, integers are plain decimal
//! and floats use a fixed decimal form where integral values still render
//! with one decimal place (`21.0`), matching what the device emits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HtpError, HtpResult};

/// Data type of a heat pump parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    Float,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Bool => "BOOL",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
        };
        f.write_str(s)
    }
}

impl FromStr for DataType {
    type Err = HtpError;

    fn from_str(s: &str) -> HtpResult<Self> {
        match s {
            "BOOL" => Ok(DataType::Bool),
            "INT" => Ok(DataType::Int),
            "FLOAT" => Ok(DataType::Float),
            other => Err(HtpError::CatalogFormat(format!(
                "unknown data type {other:?}"
            ))),
        }
    }
}

/// Kind of a heat pump data point
///
/// `SP` ("setting parameter") data points are user-configurable values,
/// `MP` ("measurement parameter") data points are read-only telemetry.
/// The two kinds use different read/write command verbs on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataPointKind {
    Setting,
    Measurement,
}

impl DataPointKind {
    /// The wire verb of this kind (`SP` or `MP`).
    pub fn as_wire(&self) -> &'static str {
        match self {
            DataPointKind::Setting => "SP",
            DataPointKind::Measurement => "MP",
        }
    }
}

impl fmt::Display for DataPointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for DataPointKind {
    type Err = HtpError;

    fn from_str(s: &str) -> HtpResult<Self> {
        match s {
            "SP" => Ok(DataPointKind::Setting),
            "MP" => Ok(DataPointKind::Measurement),
            other => Err(HtpError::CatalogFormat(format!(
                "unknown data point kind {other:?}"
            ))),
        }
    }
}

/// A typed heat pump parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Value {
    /// The data type this value carries.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
        }
    }

    /// Widen this value to the given data type where lossless.
    ///
    /// Integers widen to floats (a set request for a `FLOAT` parameter may
    /// pass `21`); every other combination must match exactly.
    pub fn widen_to(self, ty: DataType) -> Option<Value> {
        match (self, ty) {
            (Value::Bool(_), DataType::Bool) => Some(self),
            (Value::Int(_), DataType::Int) => Some(self),
            (Value::Float(_), DataType::Float) => Some(self),
            (Value::Int(i), DataType::Float) => Some(Value::Float(i as f64)),
            _ => None,
        }
    }

    /// Parse a wire string into a value of the expected data type.
    ///
    /// With `strict` set, a `FLOAT` field must not look like a plain
    /// integer; responses from the device always carry the decimal point,
    /// so a missing one indicates a mis-typed catalog entry.
    pub fn parse(s: &str, ty: DataType, strict: bool) -> HtpResult<Value> {
        let s = s.trim();
        match ty {
            DataType::Bool => match s {
                "0" => Ok(Value::Bool(false)),
                "1" => Ok(Value::Bool(true)),
                other => Err(HtpError::InvalidData(format!(
                    "invalid BOOL representation {other:?}"
                ))),
            },
            DataType::Int => s.parse::<i64>().map(Value::Int).map_err(|_| {
                HtpError::InvalidData(format!("invalid INT representation {s:?}"))
            }),
            DataType::Float => {
                if strict && s.parse::<i64>().is_ok() {
                    return Err(HtpError::InvalidData(format!(
                        "invalid FLOAT representation {s:?}"
                    )));
                }
                s.parse::<f64>().map(Value::Float).map_err(|_| {
                    HtpError::InvalidData(format!("invalid FLOAT representation {s:?}"))
                })
            }
        }
    }

    /// Render this value in the device's wire form.
    pub fn to_wire(&self) -> String {
        match self {
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    format!("{f:.1}")
                } else {
                    format!("{f}")
                }
            }
        }
    }

    /// Numeric view used for range comparisons (`false` < `true`).
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Bool(b) => *b as u8 as f64,
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            _ => f.write_str(&self.to_wire()),
        }
    }
}
