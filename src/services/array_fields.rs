// ==================== ARRAY FIELD TRANSFORMS ====================
// Pure list operations behind the append/edit/delete routes. The service
// reads the current array, runs one of these, and writes the whole result
// back.

use mongodb::bson::{Bson, Document};

/// A lone payload element is treated as a one-element list.
pub fn normalize_items(payload: Bson) -> Vec<Bson> {
    match payload {
        Bson::Array(items) => items,
        single => vec![single],
    }
}

/// Existing items first, new items appended at the tail, both in order.
pub fn append_items(existing: &[Bson], incoming: Vec<Bson>) -> Vec<Bson> {
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());
    merged.extend_from_slice(existing);
    merged.extend(incoming);
    merged
}

fn has_id(item: &Bson, id: &str) -> bool {
    match item {
        Bson::Document(doc) => doc.get_str("id").map(|v| v == id).unwrap_or(false),
        _ => false,
    }
}

/// Shallow-merges `patch` over every element whose `id` equals `id`.
///
/// Returns the new list and whether any element matched.
pub fn patch_by_id(items: &[Bson], id: &str, patch: &Document) -> (Vec<Bson>, bool) {
    let mut matched = false;
    let patched = items
        .iter()
        .map(|item| match item {
            Bson::Document(doc) if has_id(item, id) => {
                matched = true;
                let mut merged = doc.clone();
                for (field, value) in patch {
                    merged.insert(field.clone(), value.clone());
                }
                Bson::Document(merged)
            }
            other => other.clone(),
        })
        .collect();
    (patched, matched)
}

/// Drops every element whose `id` equals `id`.
pub fn remove_by_id(items: &[Bson], id: &str) -> Vec<Bson> {
    items.iter().filter(|item| !has_id(item, id)).cloned().collect()
}
