//! Cross-reference index between net fields and point indices
//!
//! For one message, builds the bidirectional mapping between net fields
//! and the 1-based point indices they reference, merging the field's
//! declared `values` with the placeholder tokens in its name. The index
//! is a derived, disposable view: rebuild it after any edit to the
//! message's points or fields, never cache it across mutation.
//!
//! Lookups are best-effort and never fail. Out-of-range references are
//! retained (so consumers can surface them) but flagged via
//! [`CrossRefIndex::unresolved_references`]; unknown names and indices
//! simply yield empty sets.

use crate::placeholder::resolve_references;
use crate::types::CanMessage;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Derived field/point reference mapping for a single message
#[derive(Debug, Clone)]
pub struct CrossRefIndex {
    field_to_points: HashMap<String, BTreeSet<usize>>,
    point_to_fields: BTreeMap<usize, BTreeSet<String>>,
    point_count: usize,
}

impl CrossRefIndex {
    /// Build the index for a message
    ///
    /// O(fields + placeholder matches); out-of-range indices are kept
    /// and logged, not rejected.
    pub fn build(message: &CanMessage) -> Self {
        let mut field_to_points: HashMap<String, BTreeSet<usize>> = HashMap::new();
        let mut point_to_fields: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        let point_count = message.points.len();

        for field in &message.fields {
            let entry = field_to_points.entry(field.name.clone()).or_default();
            for index in field
                .values
                .iter()
                .copied()
                .chain(resolve_references(&field.name))
            {
                if index == 0 || index > point_count {
                    log::debug!(
                        "message {}: field '{}' references point {} outside 1..={}",
                        message.id,
                        field.name,
                        index,
                        point_count
                    );
                }
                entry.insert(index);
                point_to_fields
                    .entry(index)
                    .or_default()
                    .insert(field.name.clone());
            }
        }

        Self {
            field_to_points,
            point_to_fields,
            point_count,
        }
    }

    /// Point indices a field references, union of its declared `values`
    /// and the placeholder tokens in its name. Empty for unknown names.
    pub fn point_indices_for_field(&self, field_name: &str) -> BTreeSet<usize> {
        self.field_to_points
            .get(field_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of the fields referencing a 1-based point index. Empty for
    /// unreferenced or out-of-range indices.
    pub fn fields_referencing_point(&self, point_index: usize) -> BTreeSet<String> {
        self.point_to_fields
            .get(&point_index)
            .cloned()
            .unwrap_or_default()
    }

    /// True when the index falls inside the message's 1-based point space
    pub fn is_in_range(&self, point_index: usize) -> bool {
        (1..=self.point_count).contains(&point_index)
    }

    /// All (field name, point index) references that fall outside the
    /// point space, sorted by field name then index
    pub fn unresolved_references(&self) -> Vec<(String, usize)> {
        let mut unresolved: Vec<(String, usize)> = self
            .field_to_points
            .iter()
            .flat_map(|(name, indices)| {
                indices
                    .iter()
                    .filter(|index| !self.is_in_range(**index))
                    .map(|index| (name.clone(), *index))
            })
            .collect();
        unresolved.sort();
        unresolved
    }
}
