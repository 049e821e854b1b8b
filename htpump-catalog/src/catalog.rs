//! The parameter catalog

use std::collections::BTreeMap;

use log::warn;

use htpump_core::{DataPointKind, HtpError, HtpResult, Value};

use crate::descriptor::ParameterDescriptor;
use crate::loader;

/// Catalog of the data points a heat pump controller exposes
///
/// All name based operations of the driver resolve through a catalog
/// instance. The built-in definitions cover the common Heliotherm data
/// points; site specific catalogs can be loaded from a CSV file or built
/// programmatically.
#[derive(Debug, Clone, Default)]
pub struct ParameterCatalog {
    params: BTreeMap<String, ParameterDescriptor>,
}

impl ParameterCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the built-in parameter definitions.
    pub fn builtin() -> HtpResult<Self> {
        loader::parse_catalog(loader::BUILTIN_CSV)
    }

    /// Add or replace a descriptor, keyed by its name.
    pub fn insert(&mut self, descriptor: ParameterDescriptor) {
        self.params.insert(descriptor.name().to_string(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.params.get(name)
    }

    /// Resolve a parameter name, failing for names not in the catalog.
    pub fn resolve(&self, name: &str) -> HtpResult<&ParameterDescriptor> {
        self.params
            .get(name)
            .ok_or_else(|| HtpError::UnknownParameter(name.to_string()))
    }

    /// Check a value against a descriptor and widen it to the declared
    /// data type.
    ///
    /// # Errors
    ///
    /// [`HtpError::TypeMismatch`] if the value cannot losslessly take the
    /// declared type, [`HtpError::OutOfRange`] if it falls outside the
    /// closed limit interval.
    pub fn validate(&self, name: &str, value: Value) -> HtpResult<Value> {
        let desc = self.resolve(name)?;
        let widened = value
            .widen_to(desc.data_type())
            .ok_or_else(|| HtpError::TypeMismatch {
                param: name.to_string(),
                expected: desc.data_type(),
                actual: value.data_type(),
            })?;
        if !desc.in_limits(&widened) {
            return Err(HtpError::OutOfRange {
                param: name.to_string(),
                value: widened,
                min: desc.min().unwrap_or(widened),
                max: desc.max().unwrap_or(widened),
            });
        }
        Ok(widened)
    }

    /// Parse a wire string as a value of the parameter's data type.
    pub fn decode_value(&self, name: &str, raw: &str, strict: bool) -> HtpResult<Value> {
        let desc = self.resolve(name)?;
        Value::parse(raw, desc.data_type(), strict)
    }

    /// Update the stored limits of a parameter from a device answer.
    ///
    /// Returns whether the limits actually changed.
    pub fn refresh_limits(
        &mut self,
        name: &str,
        min: Option<Value>,
        max: Option<Value>,
    ) -> HtpResult<bool> {
        let desc = self
            .params
            .get_mut(name)
            .ok_or_else(|| HtpError::UnknownParameter(name.to_string()))?;
        let changed = desc.set_limits(min, max);
        if changed {
            warn!(
                "limits of parameter {name:?} updated to [{:?}, {:?}]",
                desc.min(),
                desc.max()
            );
        }
        Ok(changed)
    }

    /// All descriptors of the given data point kind, in name order.
    pub fn of_kind(&self, kind: DataPointKind) -> impl Iterator<Item = &ParameterDescriptor> {
        self.params.values().filter(move |d| d.kind() == kind)
    }

    /// All parameter names, in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use htpump_core::DataType;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ParameterCatalog::builtin().unwrap();
        assert!(catalog.len() > 20);
        let desc = catalog.resolve("HKR Soll_Raum").unwrap();
        assert_eq!(desc.command(), "SP,NR=69");
        assert_eq!(desc.data_type(), DataType::Float);
        assert_eq!(desc.min(), Some(Value::Float(10.0)));
        assert_eq!(desc.max(), Some(Value::Float(25.0)));
    }

    #[test]
    fn test_resolve_unknown_parameter() {
        let catalog = ParameterCatalog::builtin().unwrap();
        assert!(matches!(
            catalog.resolve("No Such Param"),
            Err(HtpError::UnknownParameter(name)) if name == "No Such Param"
        ));
    }

    #[test]
    fn test_validate_widens_and_checks_range() {
        let catalog = ParameterCatalog::builtin().unwrap();
        // an integer request against a FLOAT parameter widens
        assert_eq!(
            catalog.validate("HKR Soll_Raum", Value::Int(20)).unwrap(),
            Value::Float(20.0)
        );
        assert!(matches!(
            catalog.validate("HKR Soll_Raum", Value::Float(30.0)),
            Err(HtpError::OutOfRange { .. })
        ));
        assert!(matches!(
            catalog.validate("HKR Soll_Raum", Value::Bool(true)),
            Err(HtpError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_refresh_limits_only_touches_bounds() {
        let mut catalog = ParameterCatalog::builtin().unwrap();
        let before = catalog.resolve("HKR Soll_Raum").unwrap().clone();
        let changed = catalog
            .refresh_limits(
                "HKR Soll_Raum",
                Some(Value::Float(5.0)),
                Some(Value::Float(30.0)),
            )
            .unwrap();
        assert!(changed);
        let after = catalog.resolve("HKR Soll_Raum").unwrap();
        assert_eq!(after.min(), Some(Value::Float(5.0)));
        assert_eq!(after.max(), Some(Value::Float(30.0)));
        assert_eq!(after.name(), before.name());
        assert_eq!(after.number(), before.number());
        assert_eq!(after.data_type(), before.data_type());
    }

    #[test]
    fn test_of_kind_partitions_the_catalog() {
        let catalog = ParameterCatalog::builtin().unwrap();
        let settings = catalog.of_kind(DataPointKind::Setting).count();
        let measurements = catalog.of_kind(DataPointKind::Measurement).count();
        assert_eq!(settings + measurements, catalog.len());
        assert!(settings > 0);
        assert!(measurements > 0);
    }
}
