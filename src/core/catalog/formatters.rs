//! Column value formatters
//!
//! A formatter rewrites the text of one cell. Blank input is passed through
//! unchanged: dbexport writes NULL dates as empty cells and those must stay
//! empty rather than fail to parse.

use crate::domain::{MigrationError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signature shared by all formatters
pub type FormatFn = fn(&str) -> std::result::Result<String, String>;

/// Year used for month-day values that carry no year of their own
pub const MONTH_DAY_EPOCH_YEAR: i32 = 1970;

/// A named text transform applied to one column
#[derive(Clone, Copy, Serialize)]
#[serde(into = "String")]
pub struct ColumnFormatter {
    name: &'static str,
    apply: FormatFn,
}

impl ColumnFormatter {
    /// `dd.MM.yyyy` to `yyyy-MM-dd`
    pub const DATE: Self = Self {
        name: "date",
        apply: format_date,
    };

    /// `MM-dd` to `1970-MM-dd`
    pub const MONTH_DAY: Self = Self {
        name: "month_day",
        apply: format_month_day,
    };

    /// All formatters selectable from a catalog
    pub const ALL: [Self; 2] = [Self::DATE, Self::MONTH_DAY];

    /// Catalog name of the formatter
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Formats the raw text of `column`
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::CellFormat`] if a non-blank value cannot be parsed.
    pub fn format(&self, column: &str, raw: &str) -> Result<String> {
        if raw.trim().is_empty() {
            return Ok(raw.to_string());
        }
        (self.apply)(raw).map_err(|reason| MigrationError::CellFormat {
            column: column.to_string(),
            value: raw.to_string(),
            reason,
        })
    }
}

impl fmt::Debug for ColumnFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnFormatter").field(&self.name).finish()
    }
}

impl PartialEq for ColumnFormatter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ColumnFormatter {}

impl FromStr for ColumnFormatter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|formatter| formatter.name == s)
            .ok_or_else(|| {
                format!(
                    "Unknown formatter '{s}'. Expected one of: {}",
                    Self::ALL.map(|f| f.name).join(", ")
                )
            })
    }
}

impl<'de> Deserialize<'de> for ColumnFormatter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl From<ColumnFormatter> for String {
    fn from(formatter: ColumnFormatter) -> Self {
        formatter.name.to_string()
    }
}

fn format_date(raw: &str) -> std::result::Result<String, String> {
    NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("expected dd.MM.yyyy: {e}"))
}

fn format_month_day(raw: &str) -> std::result::Result<String, String> {
    // Validated against a leap year so 02-29 is accepted
    let date = NaiveDate::parse_from_str(&format!("2000-{}", raw.trim()), "%Y-%m-%d")
        .map_err(|e| format!("expected MM-dd: {e}"))?;
    Ok(format!(
        "{MONTH_DAY_EPOCH_YEAR:04}-{:02}-{:02}",
        date.month(),
        date.day()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("01.02.2020", "2020-02-01" ; "day month year")]
    #[test_case("31.12.1999", "1999-12-31" ; "end of year")]
    #[test_case("29.02.2024", "2024-02-29" ; "leap day")]
    #[test_case("", "" ; "empty")]
    #[test_case("   ", "   " ; "blank kept verbatim")]
    fn test_date_formatter(input: &str, expected: &str) {
        assert_eq!(ColumnFormatter::DATE.format("te_datum", input).unwrap(), expected);
    }

    #[test_case("04-01", "1970-04-01" ; "fiscal year start")]
    #[test_case("12-31", "1970-12-31" ; "fiscal year end")]
    #[test_case("02-29", "1970-02-29" ; "leap day accepted")]
    #[test_case(" ", " " ; "blank")]
    fn test_month_day_formatter(input: &str, expected: &str) {
        assert_eq!(
            ColumnFormatter::MONTH_DAY.format("gj_beginn", input).unwrap(),
            expected
        );
    }

    #[test_case("2020-02-01" ; "iso input")]
    #[test_case("32.01.2020" ; "day out of range")]
    #[test_case("01.13.2020" ; "month out of range")]
    #[test_case("heute" ; "not a date")]
    fn test_date_formatter_rejects(input: &str) {
        let err = ColumnFormatter::DATE.format("te_datum", input).unwrap_err();
        match err {
            MigrationError::CellFormat { column, value, .. } => {
                assert_eq!(column, "te_datum");
                assert_eq!(value, input);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_month_day_rejects_invalid() {
        assert!(ColumnFormatter::MONTH_DAY.format("gj_ende", "02-30").is_err());
        assert!(ColumnFormatter::MONTH_DAY.format("gj_ende", "13-01").is_err());
    }

    #[test]
    fn test_formatter_from_str() {
        assert_eq!("date".parse::<ColumnFormatter>().unwrap(), ColumnFormatter::DATE);
        assert_eq!(
            "month_day".parse::<ColumnFormatter>().unwrap(),
            ColumnFormatter::MONTH_DAY
        );
        let err = "julian".parse::<ColumnFormatter>().unwrap_err();
        assert!(err.contains("date, month_day"));
    }

    #[test]
    fn test_formatters_deserialize_from_owned_text() {
        let text = String::from("te_datum = \"date\"\ngj_beginn = \"month_day\"\n");
        let formatters: std::collections::BTreeMap<String, ColumnFormatter> =
            toml::from_str(&text).unwrap();
        assert_eq!(formatters["te_datum"], ColumnFormatter::DATE);
        assert_eq!(formatters["gj_beginn"], ColumnFormatter::MONTH_DAY);

        let err = toml::from_str::<std::collections::BTreeMap<String, ColumnFormatter>>(
            "x = \"julian\"",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown formatter 'julian'"));
    }

    #[test]
    fn test_formatter_serializes_as_name() {
        let value = toml::Value::try_from(ColumnFormatter::MONTH_DAY).unwrap();
        assert_eq!(value.as_str(), Some("month_day"));
    }

    #[test]
    fn test_formatter_debug_shows_name() {
        assert_eq!(format!("{:?}", ColumnFormatter::DATE), "ColumnFormatter(\"date\")");
    }
}
