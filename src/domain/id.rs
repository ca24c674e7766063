//! Generated item IDs
//!
//! Items may omit `id` in the document. They get `i-{7-char-hash}` where the
//! hash is derived from the lane id, label and position in the `items` array,
//! so re-parsing the same text yields the same ids.

/// Prefix of every generated item id
pub const GENERATED_PREFIX: &str = "i-";

/// Generates a 7-character hash from the item's identifying fields
fn generate_hash(lane_id: &str, label: &str, position: usize) -> String {
    let input = format!("{}\u{1f}{}\u{1f}{}", lane_id, label, position);
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Builds the id for an item that did not declare one
pub fn generate_item_id(lane_id: &str, label: &str, position: usize) -> String {
    format!("{}{}", GENERATED_PREFIX, generate_hash(lane_id, label, position))
}
