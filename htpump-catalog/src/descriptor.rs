//! Parameter descriptors

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use htpump_core::{DataPointKind, DataType, HtpError, HtpResult, Value};

/// Access rights of a data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub read: bool,
    pub write: bool,
}

impl Access {
    pub const READ_ONLY: Access = Access {
        read: true,
        write: false,
    };
    pub const READ_WRITE: Access = Access {
        read: true,
        write: true,
    };
}

impl FromStr for Access {
    type Err = HtpError;

    /// Parse an access string like `r-` or `rw`.
    fn from_str(s: &str) -> HtpResult<Self> {
        let access = Access {
            read: s.contains('r'),
            write: s.contains('w'),
        };
        if !access.read && !access.write {
            return Err(HtpError::CatalogFormat(format!(
                "unknown access rights {s:?}"
            )));
        }
        Ok(access)
    }
}

/// Static description of one heat pump parameter
///
/// The value limits are not fixed for the lifetime of a descriptor:
/// every parameter answer from the device carries its current `MIN` and
/// `MAX`, and firmware revisions are known to shift them. The catalog
/// updates the limits in place from such answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    name: String,
    kind: DataPointKind,
    number: u16,
    access: Access,
    data_type: DataType,
    min: Option<Value>,
    max: Option<Value>,
}

impl ParameterDescriptor {
    pub fn new(
        name: impl Into<String>,
        kind: DataPointKind,
        number: u16,
        access: Access,
        data_type: DataType,
        min: Option<Value>,
        max: Option<Value>,
    ) -> HtpResult<Self> {
        let name = name.into();
        for (label, bound) in [("minimal", &min), ("maximal", &max)] {
            if let Some(value) = bound {
                if value.data_type() != data_type {
                    return Err(HtpError::CatalogFormat(format!(
                        "parameter {name:?}: {label} value {value} is not of type {data_type}"
                    )));
                }
            }
        }
        Ok(Self {
            name,
            kind,
            number,
            access,
            data_type,
            min,
            max,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DataPointKind {
        self.kind
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn min(&self) -> Option<Value> {
        self.min
    }

    pub fn max(&self) -> Option<Value> {
        self.max
    }

    /// The read command of this data point, e.g. `SP,NR=9`.
    pub fn command(&self) -> String {
        format!("{},NR={}", self.kind.as_wire(), self.number)
    }

    /// Whether `value` lies within the closed limit interval.
    ///
    /// A missing bound does not constrain the value.
    pub fn in_limits(&self, value: &Value) -> bool {
        let v = value.as_f64();
        if let Some(min) = &self.min {
            if v < min.as_f64() {
                return false;
            }
        }
        if let Some(max) = &self.max {
            if v > max.as_f64() {
                return false;
            }
        }
        true
    }

    /// Replace the limits, reporting whether anything changed.
    pub fn set_limits(&mut self, min: Option<Value>, max: Option<Value>) -> bool {
        let changed = self.min != min || self.max != max;
        self.min = min;
        self.max = max;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_temp() -> ParameterDescriptor {
        ParameterDescriptor::new(
            "HKR Soll_Raum",
            DataPointKind::Setting,
            69,
            Access::READ_WRITE,
            DataType::Float,
            Some(Value::Float(10.0)),
            Some(Value::Float(25.0)),
        )
        .unwrap()
    }

    #[test]
    fn test_command_string() {
        assert_eq!(room_temp().command(), "SP,NR=69");
    }

    #[test]
    fn test_limits_are_a_closed_interval() {
        let desc = room_temp();
        assert!(desc.in_limits(&Value::Float(10.0)));
        assert!(desc.in_limits(&Value::Float(25.0)));
        assert!(desc.in_limits(&Value::Float(21.5)));
        assert!(!desc.in_limits(&Value::Float(9.9)));
        assert!(!desc.in_limits(&Value::Float(25.1)));
    }

    #[test]
    fn test_missing_bound_does_not_constrain() {
        let desc = ParameterDescriptor::new(
            "Temp. Aussen",
            DataPointKind::Measurement,
            0,
            Access::READ_ONLY,
            DataType::Float,
            None,
            None,
        )
        .unwrap();
        assert!(desc.in_limits(&Value::Float(-273.0)));
    }

    #[test]
    fn test_bounds_must_match_data_type() {
        let result = ParameterDescriptor::new(
            "Betriebsart",
            DataPointKind::Setting,
            13,
            Access::READ_WRITE,
            DataType::Int,
            Some(Value::Float(0.0)),
            Some(Value::Int(7)),
        );
        assert!(matches!(result, Err(HtpError::CatalogFormat(_))));
    }

    #[test]
    fn test_access_parsing() {
        assert_eq!("r-".parse::<Access>().unwrap(), Access::READ_ONLY);
        assert_eq!("rw".parse::<Access>().unwrap(), Access::READ_WRITE);
        assert!("--".parse::<Access>().is_err());
    }

    #[test]
    fn test_set_limits_reports_change() {
        let mut desc = room_temp();
        assert!(!desc.set_limits(Some(Value::Float(10.0)), Some(Value::Float(25.0))));
        assert!(desc.set_limits(Some(Value::Float(10.0)), Some(Value::Float(30.0))));
        assert_eq!(desc.max(), Some(Value::Float(30.0)));
    }
}
