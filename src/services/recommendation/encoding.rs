//! Interaction ingestion: weight assignment and dense identifier indexing.

use std::collections::HashMap;

use crate::models::InteractionRecord;

/// Map an interaction type to its signal strength.
///
/// view=1.0, cart=3.0, purchase=5.0. Types outside the table (historical rows,
/// renamed events) fall back to 1.0 rather than being dropped.
pub fn interaction_weight(interaction_type: &str) -> f64 {
    match interaction_type {
        "view" => 1.0,
        "cart" => 3.0,
        "purchase" => 5.0,
        _ => 1.0,
    }
}

/// Bijection between opaque identifiers and dense zero-based indices.
///
/// Built once per training pass from the identifiers observed in that pass's
/// interaction snapshot, in first-observed order. An identifier that never
/// appears gets no index and cannot be queried against the resulting model.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    positions: HashMap<String, usize>,
    ids: Vec<String>,
}

impl IdentityIndex {
    /// Index an identifier, returning its position. Re-inserting a known
    /// identifier returns the existing position.
    fn insert(&mut self, id: &str) -> usize {
        if let Some(&position) = self.positions.get(id) {
            return position;
        }
        let position = self.ids.len();
        self.positions.insert(id.to_string(), position);
        self.ids.push(id.to_string());
        position
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn id_at(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One interaction after weighting and index resolution.
#[derive(Debug, Clone, Copy)]
pub struct WeightedInteraction {
    pub user_idx: usize,
    pub item_idx: usize,
    pub weight: f64,
}

/// Result of the encoding pass over a raw interaction snapshot.
#[derive(Debug, Default)]
pub struct EncodedInteractions {
    pub users: IdentityIndex,
    pub items: IdentityIndex,
    pub weighted: Vec<WeightedInteraction>,
    /// Records dropped for missing fields. Unrecognized interaction types are
    /// not malformed; they are weighted 1.0 and kept.
    pub skipped: usize,
}

/// Encode a raw interaction snapshot into weighted, index-resolved form.
///
/// Records missing a user id, product id, or interaction type are skipped
/// individually; they never abort the pass. The order of `weighted` follows
/// the input order, which matters for the last-write-wins matrix fill.
pub fn encode_interactions(records: &[InteractionRecord]) -> EncodedInteractions {
    let mut encoded = EncodedInteractions::default();

    for record in records {
        if record.user_id.trim().is_empty()
            || record.product_id.trim().is_empty()
            || record.interaction_type.trim().is_empty()
        {
            encoded.skipped += 1;
            continue;
        }

        let user_idx = encoded.users.insert(&record.user_id);
        let item_idx = encoded.items.insert(&record.product_id);
        encoded.weighted.push(WeightedInteraction {
            user_idx,
            item_idx,
            weight: interaction_weight(&record.interaction_type),
        });
    }

    encoded
}
