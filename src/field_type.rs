//! Record-field typing used by the field-similarity path and the strict
//! classifier.
//!
//! This taxonomy is independent of [`crate::cell_type`]: its rules are tuned
//! for person-record fields and are tried in a different order.

use std::{fmt, str::FromStr, sync::LazyLock};

use anyhow::anyhow;
use regex::Regex;
use serde::{Deserialize, Serialize};

const PHONE_MIN_LEN: usize = 7;
const PHONE_MAX_LEN: usize = 15;
const FREE_TEXT_MIN_LEN: usize = 50;

static COORDINATE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,}[-_/\\]\d{2,}$").expect("valid coordinate regex"));
static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid digits regex"));
static ALPHA_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid alpha words regex"));
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+[-_/\\]?[A-Za-z0-9]+$").expect("valid identifier regex")
});
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static SINGLE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid word regex"));
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").expect("valid url regex")
});
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s+\-()]+$").expect("valid phone regex"));
static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(,[a-zA-Z]+)*$").expect("valid tags regex"));
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").expect("valid time regex"));
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z$").expect("valid timestamp regex")
});
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("valid duration regex"));
static FILE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+/)?(?:\w+\.)+\w+$").expect("valid file path regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Id,
    Name,
    Date,
    Category,
    Url,
    Email,
    PhoneNumber,
    Currency,
    Number,
    Text,
    Tags,
    Time,
    Timestamp,
    Duration,
    Boolean,
    FilePath,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Id => "id",
            FieldType::Name => "name",
            FieldType::Date => "date",
            FieldType::Category => "category",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::PhoneNumber => "phone_number",
            FieldType::Currency => "currency",
            FieldType::Number => "number",
            FieldType::Text => "text",
            FieldType::Tags => "tags",
            FieldType::Time => "time",
            FieldType::Timestamp => "timestamp",
            FieldType::Duration => "duration",
            FieldType::Boolean => "boolean",
            FieldType::FilePath => "file_path",
        }
    }

    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::Id,
            FieldType::Name,
            FieldType::Date,
            FieldType::Category,
            FieldType::Url,
            FieldType::Email,
            FieldType::PhoneNumber,
            FieldType::Currency,
            FieldType::Number,
            FieldType::Text,
            FieldType::Tags,
            FieldType::Time,
            FieldType::Timestamp,
            FieldType::Duration,
            FieldType::Boolean,
            FieldType::FilePath,
        ]
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        FieldType::all()
            .iter()
            .copied()
            .find(|ty| ty.as_str() == normalized)
            .ok_or_else(|| anyhow!("Unknown field type '{value}'"))
    }
}

pub fn detect_field_type(value: &str) -> FieldType {
    let value = value.trim();
    if is_identifier(value) {
        FieldType::Id
    } else if is_person_name(value) {
        FieldType::Name
    } else if ISO_DATE.is_match(value) {
        FieldType::Date
    } else if SINGLE_WORD.is_match(value) {
        FieldType::Category
    } else if URL.is_match(value) {
        FieldType::Url
    } else if EMAIL.is_match(value) {
        FieldType::Email
    } else if is_phone_number(value) {
        FieldType::PhoneNumber
    } else if is_currency(value) {
        FieldType::Currency
    } else if parse_finite(value).is_some() {
        FieldType::Number
    } else if value.chars().count() > FREE_TEXT_MIN_LEN {
        FieldType::Text
    } else if TAGS.is_match(value) {
        FieldType::Tags
    } else if CLOCK_TIME.is_match(value) {
        FieldType::Time
    } else if TIMESTAMP.is_match(value) {
        FieldType::Timestamp
    } else if DURATION.is_match(value) {
        FieldType::Duration
    } else if value == "true" || value == "false" {
        FieldType::Boolean
    } else if FILE_PATH.is_match(value) {
        FieldType::FilePath
    } else {
        FieldType::Text
    }
}

/// Mixed alphanumerics with at most one separator. Pure numbers, pure words
/// and `12-34` style coordinate pairs are excluded.
fn is_identifier(value: &str) -> bool {
    !COORDINATE_PAIR.is_match(value)
        && !DIGITS_ONLY.is_match(value)
        && !ALPHA_WORDS.is_match(value)
        && IDENTIFIER.is_match(value)
}

fn is_person_name(value: &str) -> bool {
    let words = value.split(' ').count();
    ALPHA_WORDS.is_match(value) && (2..=4).contains(&words)
}

fn is_phone_number(value: &str) -> bool {
    let len = value.chars().count();
    PHONE.is_match(value) && (PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len)
}

/// A number with exactly one decimal point once thousands separators are
/// removed.
fn is_currency(value: &str) -> bool {
    let ungrouped = value.replace(',', "");
    ungrouped.trim().parse::<f64>().is_ok() && ungrouped.matches('.').count() == 1
}

pub(crate) fn parse_finite(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}
