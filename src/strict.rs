//! Strict type-match classifier.
//!
//! Two fragments continue each other when every column has the same majority
//! [`FieldType`] on both sides. `text` and `name` are interchangeable. No
//! value-level comparison takes place.

use log::debug;

use crate::{
    field_type::{FieldType, detect_field_type},
    model::{Row, column, table_width},
};

pub fn is_strict_continuation(table1: &[Row], table2: &[Row]) -> bool {
    if table1.is_empty() || table2.is_empty() {
        return false;
    }
    let width = table_width(table1);
    if width != table_width(table2) {
        debug!(
            "Column counts differ ({} vs {}); not a continuation",
            width,
            table_width(table2)
        );
        return false;
    }

    (0..width).all(|index| {
        let left = majority_field_type(&column(table1, index));
        let right = majority_field_type(&column(table2, index));
        let compatible = match (left, right) {
            (Some(left), Some(right)) => types_compatible(left, right),
            _ => false,
        };
        if !compatible {
            debug!("Column {index} majority types disagree: {left:?} vs {right:?}");
        }
        compatible
    })
}

/// Most frequent field type; ties go to the type that reached the winning
/// count first, scanning top to bottom.
pub fn majority_field_type(cells: &[&str]) -> Option<FieldType> {
    let types: Vec<FieldType> = cells.iter().map(|cell| detect_field_type(cell)).collect();
    let mut best: Option<(FieldType, usize)> = None;
    for candidate in &types {
        let count = types.iter().filter(|ty| *ty == candidate).count();
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((*candidate, count));
        }
    }
    best.map(|(field_type, _)| field_type)
}

pub fn types_compatible(left: FieldType, right: FieldType) -> bool {
    left == right
        || matches!(
            (left, right),
            (FieldType::Text, FieldType::Name) | (FieldType::Name, FieldType::Text)
        )
}
