//! Builders for raw API payloads in the service's wire format.

use serde_json::{Map, Value, json};

/// Leaf of a link tree; `size` is omitted from the payload when `None`.
#[must_use]
pub fn link_leaf(name: &str, size: Option<u64>) -> Value {
    let mut node = Map::new();
    node.insert("n".to_string(), Value::from(name));
    if let Some(size) = size {
        node.insert("s".to_string(), Value::from(size));
    }
    Value::Object(node)
}

/// Leaf of a download tree carrying a link.
#[must_use]
pub fn file_leaf(name: &str, size: u64, link: &str) -> Value {
    json!({ "n": name, "s": size, "l": link })
}

/// Directory node wrapping `children` in order.
#[must_use]
pub fn directory(name: &str, children: Vec<Value>) -> Value {
    json!({ "n": name, "e": children })
}

/// Chain of nested directories ending in `leaf`, outermost name first.
#[must_use]
pub fn nested(names: &[&str], leaf: Value) -> Value {
    names
        .iter()
        .rev()
        .fold(leaf, |child, name| directory(name, vec![child]))
}

/// Complete status record for the given magnet id.
#[must_use]
pub fn status_record(id: u64) -> Value {
    json!({
        "id": id,
        "filename": format!("torrent-{id}"),
        "size": 4_096,
        "hash": format!("{id:040x}"),
        "status": "Ready",
        "statusCode": 4,
        "downloaded": 4_096,
        "uploaded": 1_024,
        "seeders": 3,
        "downloadSpeed": 0,
        "uploadSpeed": 0,
        "uploadDate": 1_700_000_000,
        "completionDate": 1_700_000_600,
        "type": "m",
        "notified": false,
        "version": 2
    })
}

/// File listing record for the given magnet id.
#[must_use]
pub fn files_record(id: u64, roots: Vec<Value>) -> Value {
    json!({ "id": id, "files": roots })
}

/// Successful magnet upload item.
#[must_use]
pub fn uploaded_magnet(magnet: &str, id: u64) -> Value {
    json!({
        "magnet": magnet,
        "name": format!("upload-{id}"),
        "id": id,
        "hash": format!("{id:040x}"),
        "size": 2_048,
        "ready": false
    })
}

/// Per-item failure keyed by `source_key` (`magnet` or `file`).
#[must_use]
pub fn item_error(source_key: &str, source: &str, code: &str, message: &str) -> Value {
    let mut item = Map::new();
    item.insert(source_key.to_string(), Value::from(source));
    item.insert(
        "error".to_string(),
        json!({ "code": code, "message": message }),
    );
    Value::Object(item)
}

/// Wrap `payload` under `key`, as the service does for every body.
#[must_use]
pub fn body(key: &str, payload: Value) -> Value {
    let mut root = Map::new();
    root.insert(key.to_string(), payload);
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_leaf_omits_missing_size() {
        assert_eq!(link_leaf("a", None), json!({"n": "a"}));
        assert_eq!(link_leaf("a", Some(3)), json!({"n": "a", "s": 3}));
    }

    #[test]
    fn nested_builds_outermost_first() {
        let tree = nested(&["a", "b"], link_leaf("f", None));
        assert_eq!(
            tree,
            json!({"n": "a", "e": [{"n": "b", "e": [{"n": "f"}]}]})
        );
    }

    #[test]
    fn item_error_uses_the_given_source_key() {
        assert_eq!(
            item_error("file", "x.torrent", "E", "bad"),
            json!({"file": "x.torrent", "error": {"code": "E", "message": "bad"}})
        );
    }
}
