//! Conversion between nested documents and flat dotted-path maps.
//!
//! Object keys and array indices both become path segments, so
//! `{"a": {"b": [1, 2]}}` flattens to `{"a.b.0": 1, "a.b.1": 2}`. Empty
//! objects and arrays are kept as leaves so that they survive the round trip.

use serde_json::{Map, Value};

pub fn flatten(document: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    match document {
        Value::Object(_) | Value::Array(_) => flatten_into(document, None, &mut out),
        leaf => {
            out.insert(String::new(), leaf.clone());
        }
    }
    out
}

fn flatten_into(value: &Value, prefix: Option<&str>, out: &mut Map<String, Value>) {
    let join = |segment: &str| match prefix {
        Some(prefix) => format!("{prefix}.{segment}"),
        None => segment.to_string(),
    };

    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(child, Some(&join(key)), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, Some(&join(&index.to_string())), out);
            }
        }
        leaf => {
            out.insert(prefix.unwrap_or_default().to_string(), leaf.clone());
        }
    }
}

/// Rebuilds the nested document. A segment that parses as an index and
/// whose siblings are all indices produces an array.
pub fn unflatten(flat: &Map<String, Value>) -> Value {
    if flat.len() == 1
        && let Some(root) = flat.get("")
    {
        return root.clone();
    }

    let mut root = Value::Object(Map::new());
    for (path, leaf) in flat {
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut root, &segments, leaf.clone());
    }
    arrays_from_index_maps(root)
}

fn insert_path(node: &mut Value, segments: &[&str], leaf: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };

    if rest.is_empty() {
        map.insert(head.to_string(), leaf);
    } else {
        let child = map
            .entry(head.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_path(child, rest, leaf);
    }
}

fn arrays_from_index_maps(node: Value) -> Value {
    match node {
        Value::Object(map) => {
            let is_sequence = !map.is_empty()
                && (0..map.len()).all(|index| map.contains_key(&index.to_string()));

            if is_sequence {
                let mut map = map;
                let items = (0..map.len())
                    .filter_map(|index| map.remove(&index.to_string()))
                    .map(arrays_from_index_maps)
                    .collect();
                Value::Array(items)
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(key, child)| (key, arrays_from_index_maps(child)))
                        .collect(),
                )
            }
        }
        other => other,
    }
}
