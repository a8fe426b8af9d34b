//! Structural cell typing used by the weighted scorer.
//!
//! Each trimmed cell gets exactly one [`CellType`]; rules are tried in a fixed
//! priority order and the first match wins. The numeric rule tolerates
//! currency symbols and OCR noise, but it never claims values that carry a
//! digit-separator-digit group (`12/04/2025`, `10:30`) or a trailing `%`, so
//! those reach the date and percentage rules.

use std::{fmt, str::FromStr, sync::LazyLock};

use anyhow::anyhow;
use regex::Regex;
use serde::{Deserialize, Serialize};

const NUMERIC_NOISE_ALLOWANCE: usize = 10;

static NUMERIC_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\d.]").expect("valid numeric noise regex"));
static PLAIN_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid decimal regex"));
static GROUPED_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d{1,3}(,\d{3})*(\.\d+)?$").expect("valid grouped regex"));
static SIMPLE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").expect("valid simple decimal regex"));
static SEPARATED_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[/:]\d").expect("valid separator regex"));
static DATE_FORMATS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\d{4}-\d{2}-\d{2}$",
        r"^\d{2}[/-]\d{2}[/-]\d{4}$",
        r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$",
        r"^\d{1,2}:\d{2}(:\d{2})?$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid date regex"))
    .collect()
});
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?%$").expect("valid percentage regex"));
static BOOLEAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(yes|no|true|false)$").expect("valid boolean regex"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_/-]+$").expect("valid code regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Number,
    Date,
    Email,
    Percentage,
    Boolean,
    Code,
    String,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Number => "number",
            CellType::Date => "date",
            CellType::Email => "email",
            CellType::Percentage => "percentage",
            CellType::Boolean => "boolean",
            CellType::Code => "code",
            CellType::String => "string",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "number",
            "date",
            "email",
            "percentage",
            "boolean",
            "code",
            "string",
        ]
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(CellType::Number),
            "date" => Ok(CellType::Date),
            "email" => Ok(CellType::Email),
            "percentage" => Ok(CellType::Percentage),
            "boolean" => Ok(CellType::Boolean),
            "code" => Ok(CellType::Code),
            "string" => Ok(CellType::String),
            _ => Err(anyhow!(
                "Unknown cell type '{value}'. Supported types: {}",
                CellType::variants().join(", ")
            )),
        }
    }
}

pub fn detect_cell_type(value: &str) -> CellType {
    let trimmed = value.trim();
    if looks_numeric(trimmed) {
        CellType::Number
    } else if DATE_FORMATS.iter().any(|format| format.is_match(trimmed)) {
        CellType::Date
    } else if EMAIL.is_match(trimmed) {
        CellType::Email
    } else if PERCENTAGE.is_match(trimmed) {
        CellType::Percentage
    } else if BOOLEAN.is_match(trimmed) {
        CellType::Boolean
    } else if CODE.is_match(trimmed) {
        CellType::Code
    } else {
        CellType::String
    }
}

fn looks_numeric(trimmed: &str) -> bool {
    if trimmed.ends_with('%') || SEPARATED_GROUPS.is_match(trimmed) {
        return false;
    }
    let stripped = NUMERIC_NOISE.replace_all(trimmed, "");
    if PLAIN_DECIMAL.is_match(&stripped) || GROUPED_DECIMAL.is_match(trimmed) {
        return true;
    }
    let overhead = trimmed.chars().count() - stripped.chars().count();
    overhead <= NUMERIC_NOISE_ALLOWANCE && SIMPLE_DECIMAL.is_match(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numbers_tolerate_grouping_and_currency_noise() {
        for value in ["11", "16,965.00", "00.00", "-3.5", "$1,200.50", " 42 ", "INR 525.00"] {
            assert_eq!(detect_cell_type(value), CellType::Number, "{value}");
        }
    }

    #[test]
    fn slash_dates_are_not_numbers() {
        assert_eq!(detect_cell_type("12/04/2025"), CellType::Date);
        assert_eq!(detect_cell_type("15-04-2025"), CellType::Date);
        assert_eq!(detect_cell_type("1993-05-15"), CellType::Date);
        assert_eq!(detect_cell_type("2023-05-02T14:45:00Z"), CellType::Date);
        assert_eq!(detect_cell_type("10:30"), CellType::Date);
        assert_eq!(detect_cell_type("9:05:59"), CellType::Date);
    }

    #[test]
    fn percentages_are_not_numbers() {
        assert_eq!(detect_cell_type("50%"), CellType::Percentage);
        assert_eq!(detect_cell_type("12.5%"), CellType::Percentage);
    }

    #[test]
    fn remaining_rules_follow_priority() {
        assert_eq!(detect_cell_type("john@example.com"), CellType::Email);
        assert_eq!(detect_cell_type("YES"), CellType::Boolean);
        assert_eq!(detect_cell_type("false"), CellType::Boolean);
        assert_eq!(detect_cell_type("Corporate"), CellType::Code);
        assert_eq!(detect_cell_type("ID123/126"), CellType::Code);
        assert_eq!(detect_cell_type("0307051124P101014688/0"), CellType::Code);
        assert_eq!(detect_cell_type("TOP IN TOWN"), CellType::String);
        assert_eq!(detect_cell_type(""), CellType::String);
    }

    #[test]
    fn cell_type_round_trips_through_its_name() {
        for name in CellType::variants() {
            let parsed: CellType = name.parse().expect("known type");
            assert_eq!(parsed.as_str(), *name);
        }
        assert!("money".parse::<CellType>().is_err());
    }

    proptest! {
        #[test]
        fn detection_is_deterministic(value in "\\PC{0,24}") {
            prop_assert_eq!(detect_cell_type(&value), detect_cell_type(&value));
        }
    }
}
