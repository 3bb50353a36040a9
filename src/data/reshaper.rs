//! Data Reshaper Module
//! Handles the wide-to-long transformation (stack operation) and class ordering.

use crate::data::Dataset;
use std::cmp::Ordering;

/// Long-format tuple: one per (record, feature) pair.
///
/// `value` and `class` stay raw strings; numeric interpretation happens only
/// where a consumer needs it (`class_key`, `numeric_value`).
#[derive(Debug, Clone, PartialEq)]
pub struct LongTuple {
    /// Row id of the originating record.
    pub group: usize,
    /// Feature name.
    pub variable: String,
    /// Raw cell value.
    pub value: String,
    /// Raw classification label.
    pub class: String,
}

impl LongTuple {
    /// Numeric sort key for the class label. Unparseable labels become NaN,
    /// which compares equal to everything in `sort_by_class`.
    pub fn class_key(&self) -> f64 {
        self.class.trim().parse().unwrap_or(f64::NAN)
    }

    /// Numeric cell value, NaN when the raw string does not parse.
    pub fn numeric_value(&self) -> f64 {
        self.value.trim().parse().unwrap_or(f64::NAN)
    }
}

/// Handles the wide-to-long reshape of a loaded dataset.
pub struct Reshaper;

impl Reshaper {
    /// Feature order: the declared list when given, otherwise the dataset
    /// header order with the group-exclusion label removed.
    pub fn feature_columns(
        dataset: &Dataset,
        group_label: &str,
        declared: Option<&[String]>,
    ) -> Vec<String> {
        match declared {
            Some(features) => features.to_vec(),
            None => dataset
                .columns
                .iter()
                .filter(|c| c.as_str() != group_label)
                .cloned()
                .collect(),
        }
    }

    /// Transform wide records to long format.
    ///
    /// One tuple per (record, feature) pair, skipping the class column in the
    /// inner loop: `|records| * (|features| - 1)` tuples when the class column
    /// is among the features. Output order is record-major, feature order
    /// within each record.
    pub fn stack_to_long(
        dataset: &Dataset,
        class_column: &str,
        group_label: &str,
        declared: Option<&[String]>,
    ) -> Vec<LongTuple> {
        let features = Self::feature_columns(dataset, group_label, declared);

        let mut tuples = Vec::with_capacity(dataset.records.len() * features.len());
        for record in &dataset.records {
            let class = record
                .fields
                .get(class_column)
                .cloned()
                .unwrap_or_default();

            for feature in &features {
                if feature == class_column {
                    continue;
                }
                let value = record.fields.get(feature).cloned().unwrap_or_default();
                tuples.push(LongTuple {
                    group: record.id,
                    variable: feature.clone(),
                    value,
                    class: class.clone(),
                });
            }
        }

        tuples
    }

    /// Stable ascending sort by numeric class key.
    ///
    /// Ties (and NaN keys, which compare equal to everything) keep their
    /// enumeration order, so the downstream boundary scan is deterministic.
    pub fn sort_by_class(tuples: &mut [LongTuple]) {
        tuples.sort_by(|a, b| {
            a.class_key()
                .partial_cmp(&b.class_key())
                .unwrap_or(Ordering::Equal)
        });
    }
}
