//! CSV catalog loading
//!
//! A catalog file has one record per data point with seven fields:
//! name, data point kind, data point number, access rights, data type,
//! minimal value and maximal value. `None` leaves a bound open, lines
//! starting with `#` are comments.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;

use htpump_core::{DataPointKind, DataType, HtpError, HtpResult, Value};

use crate::catalog::ParameterCatalog;
use crate::descriptor::{Access, ParameterDescriptor};

/// The built-in parameter definitions.
pub(crate) const BUILTIN_CSV: &str = include_str!("../data/params.csv");

/// Load a catalog, preferring a site specific file over the built-in
/// definitions.
pub fn load_catalog(override_path: Option<&Path>) -> HtpResult<ParameterCatalog> {
    match override_path {
        Some(path) => {
            info!("loading parameter definitions from {}", path.display());
            let content = fs::read_to_string(path)?;
            parse_catalog(&content)
        }
        None => parse_catalog(BUILTIN_CSV),
    }
}

/// Parse catalog CSV content.
pub fn parse_catalog(content: &str) -> HtpResult<ParameterCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(content.as_bytes());

    let mut catalog = ParameterCatalog::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|err| HtpError::CatalogFormat(format!("record {line}: {err}")))?;
        if record.len() != 7 {
            return Err(HtpError::CatalogFormat(format!(
                "record {line}: expected 7 fields, found {}",
                record.len()
            )));
        }
        let name = &record[0];
        let kind = DataPointKind::from_str(&record[1])?;
        let number = record[2].parse::<u16>().map_err(|_| {
            HtpError::CatalogFormat(format!(
                "parameter {name:?}: invalid data point number {:?}",
                &record[2]
            ))
        })?;
        let access = Access::from_str(&record[3])?;
        let data_type = DataType::from_str(&record[4])?;
        let min = parse_bound(name, &record[5], data_type)?;
        let max = parse_bound(name, &record[6], data_type)?;
        catalog.insert(ParameterDescriptor::new(
            name, kind, number, access, data_type, min, max,
        )?);
    }
    Ok(catalog)
}

fn parse_bound(name: &str, field: &str, data_type: DataType) -> HtpResult<Option<Value>> {
    if field == "None" {
        return Ok(None);
    }
    Value::parse(field, data_type, false)
        .map(Some)
        .map_err(|_| {
            HtpError::CatalogFormat(format!(
                "parameter {name:?}: invalid {data_type} bound {field:?}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let csv = "\
# name, kind, number, access, type, min, max
\"Betriebsart\", SP, 13, rw, INT, 0, 7
\"Temp. Aussen\", MP, 0, r-, FLOAT, None, None
";
        let catalog = parse_catalog(csv).unwrap();
        assert_eq!(catalog.len(), 2);
        let mode = catalog.resolve("Betriebsart").unwrap();
        assert_eq!(mode.number(), 13);
        assert_eq!(mode.min(), Some(Value::Int(0)));
        let outdoor = catalog.resolve("Temp. Aussen").unwrap();
        assert_eq!(outdoor.kind(), DataPointKind::Measurement);
        assert_eq!(outdoor.min(), None);
    }

    #[test]
    fn test_parse_catalog_rejects_wrong_field_count() {
        assert!(matches!(
            parse_catalog("\"Betriebsart\", SP, 13, rw, INT, 0\n"),
            Err(HtpError::CatalogFormat(_))
        ));
    }

    #[test]
    fn test_parse_catalog_rejects_mistyped_bound() {
        assert!(matches!(
            parse_catalog("\"Betriebsart\", SP, 13, rw, INT, x, 7\n"),
            Err(HtpError::CatalogFormat(_))
        ));
    }
}
