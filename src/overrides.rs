//! Merging of caller-supplied row filters with stored defaults.

use std::collections::HashSet;

use crate::model::RowFilter;

/// Something carrying the identifier overrides are matched on.
pub trait Identified {
    fn identifier(&self) -> &str;
}

impl Identified for RowFilter {
    fn identifier(&self) -> &str {
        &self.metadata.identifier
    }
}

/// Every `primary` item in order, then each `secondary` item whose
/// identifier does not appear in `primary`, in `secondary` order.
///
/// Duplicates within `primary` are kept; `secondary` items are only ever
/// dropped, never reordered.
pub fn resolve<T: Identified + Clone>(primary: &[T], secondary: &[T]) -> Vec<T> {
    let overridden: HashSet<&str> = primary.iter().map(Identified::identifier).collect();

    let resolved: Vec<T> = primary
        .iter()
        .cloned()
        .chain(
            secondary
                .iter()
                .filter(|item| !overridden.contains(item.identifier()))
                .cloned(),
        )
        .collect();

    tracing::trace!(
        primary = primary.len(),
        secondary = secondary.len(),
        resolved = resolved.len(),
        "Resolved row filter overrides"
    );
    resolved
}
