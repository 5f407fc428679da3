//! Result projection: payloads to renderable rows.

use typeahead_core::{Projection, ResultPayload, ResultRow};

/// Zip labels and links into rows, or [`Projection::Empty`] when there is
/// nothing usable (missing list, unequal lengths, zero rows).
pub fn project(payload: &ResultPayload) -> Projection {
    match payload.aligned() {
        Some((labels, links)) if !labels.is_empty() => Projection::Rows(
            labels
                .iter()
                .zip(links)
                .map(|(label, link)| ResultRow::new(label.clone(), link.clone()))
                .collect(),
        ),
        _ => Projection::Empty,
    }
}
