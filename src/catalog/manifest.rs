//! Manifest normalization.
//!
//! Accepts a bare array of entries or an `{ updatedAt, items }` envelope and
//! maps every entry onto [`DocumentItem`]. Field aliases are resolved here
//! and nowhere else.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::loader::FetchError;
use crate::models::{DocumentItem, Manifest, UNCATEGORIZED, UNTITLED};

const TITLE_KEYS: &[&str] = &["title", "judul"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "deskripsi"];
const CATEGORY_KEYS: &[&str] = &["category", "kategori"];
const URL_KEYS: &[&str] = &["url", "link", "file"];
const PREVIEW_KEYS: &[&str] = &["previewUrl", "preview", "embed"];
const UPDATED_AT_KEYS: &[&str] = &["updatedAt", "updated_at"];

/// Parse a manifest from a response body.
pub fn parse_manifest(body: &[u8]) -> Result<Manifest, FetchError> {
    let raw: Value = serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    normalize_manifest(&raw)
}

/// Normalize an already-decoded manifest payload.
pub fn normalize_manifest(raw: &Value) -> Result<Manifest, FetchError> {
    match raw {
        Value::Array(entries) => Ok(Manifest {
            items: normalize_items(entries),
            updated_at: None,
        }),
        Value::Object(map) => {
            let items = match map.get("items") {
                Some(Value::Array(entries)) => normalize_items(entries),
                Some(other) => {
                    warn!("Manifest 'items' is {}, expected an array", json_kind(other));
                    Vec::new()
                }
                None => Vec::new(),
            };

            Ok(Manifest {
                items,
                updated_at: first_string(map, UPDATED_AT_KEYS),
            })
        }
        other => Err(FetchError::Parse(format!(
            "expected an array or object, found {}",
            json_kind(other)
        ))),
    }
}

fn normalize_items(entries: &[Value]) -> Vec<DocumentItem> {
    let items: Vec<DocumentItem> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(map) => Some(normalize_item(map)),
            other => {
                warn!("Skipping manifest entry {}: {} is not an object", index, json_kind(other));
                None
            }
        })
        .collect();

    debug!("Normalized {} of {} manifest entries", items.len(), entries.len());
    items
}

fn normalize_item(map: &Map<String, Value>) -> DocumentItem {
    DocumentItem {
        title: first_string(map, TITLE_KEYS).unwrap_or_else(|| UNTITLED.to_string()),
        description: first_string(map, DESCRIPTION_KEYS).unwrap_or_default(),
        category: first_string(map, CATEGORY_KEYS).unwrap_or_else(|| UNCATEGORIZED.to_string()),
        url: first_string(map, URL_KEYS).unwrap_or_default(),
        preview_url: first_string(map, PREVIEW_KEYS),
        updated_at: first_string(map, UPDATED_AT_KEYS),
    }
}

/// First non-blank string value among `keys`, trimmed.
fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FetchErrorKind;
    use serde_json::json;

    #[test]
    fn test_bare_array_has_no_update_time() {
        let raw = json!([
            {"title": "A", "url": "pdf/a.pdf"},
            {"title": "B", "url": "pdf/b.pdf"}
        ]);
        let manifest = normalize_manifest(&raw).unwrap();
        assert_eq!(manifest.updated_at, None);
        let titles: Vec<_> = manifest.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_envelope_keeps_update_time_and_order() {
        let raw = json!({
            "updatedAt": "2024-01-01T00:00:00Z",
            "items": [
                {"title": "Zeta", "category": "Finance"},
                {"title": "Alpha", "category": "Legal"}
            ]
        });
        let manifest = normalize_manifest(&raw).unwrap();
        assert_eq!(manifest.updated_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(manifest.items[0].title, "Zeta");
        assert_eq!(manifest.items[1].title, "Alpha");
    }

    #[test]
    fn test_snake_case_update_time_alias() {
        let raw = json!({"updated_at": "2024-05-02", "items": []});
        let manifest = normalize_manifest(&raw).unwrap();
        assert_eq!(manifest.updated_at.as_deref(), Some("2024-05-02"));
    }

    #[test]
    fn test_envelope_without_items_is_empty() {
        let manifest = normalize_manifest(&json!({"updatedAt": "2024-01-01"})).unwrap();
        assert!(manifest.items.is_empty());

        let manifest = normalize_manifest(&json!({"items": "nope"})).unwrap();
        assert!(manifest.items.is_empty());
    }

    #[test]
    fn test_scalar_payload_is_parse_error() {
        let err = normalize_manifest(&json!(42)).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Parse);

        let err = normalize_manifest(&Value::Null).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Parse);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_manifest(b"{not json").unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Parse);
    }

    #[test]
    fn test_aliases_resolve_to_canonical_fields() {
        let raw = json!([{
            "judul": "Laporan",
            "deskripsi": "Ringkasan tahunan",
            "kategori": "  Keuangan ",
            "link": "/pdf/laporan.pdf",
            "embed": "preview/laporan.html",
            "updated_at": "2024-02-03"
        }]);
        let item = &normalize_manifest(&raw).unwrap().items[0];
        assert_eq!(item.title, "Laporan");
        assert_eq!(item.description, "Ringkasan tahunan");
        assert_eq!(item.category, "Keuangan");
        assert_eq!(item.url, "/pdf/laporan.pdf");
        assert_eq!(item.preview_url.as_deref(), Some("preview/laporan.html"));
        assert_eq!(item.updated_at.as_deref(), Some("2024-02-03"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let raw = json!([{"title": "   ", "category": "", "url": 7}]);
        let item = &normalize_manifest(&raw).unwrap().items[0];
        assert_eq!(item.title, UNTITLED);
        assert_eq!(item.category, UNCATEGORIZED);
        assert_eq!(item.url, "");
        assert_eq!(item.preview_url, None);
    }

    #[test]
    fn test_blank_primary_key_falls_through_to_alias() {
        let raw = json!([{"title": "", "judul": "Cadangan"}]);
        let item = &normalize_manifest(&raw).unwrap().items[0];
        assert_eq!(item.title, "Cadangan");
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let raw = json!([{"title": "Kept"}, "stray", 3, null]);
        let manifest = normalize_manifest(&raw).unwrap();
        assert_eq!(manifest.items.len(), 1);
        assert_eq!(manifest.items[0].title, "Kept");
    }
}
