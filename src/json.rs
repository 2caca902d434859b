// Safe navigation over schema-less GraphQL responses.
//
// Every lookup tolerates missing keys, wrong types and out-of-range
// indices: an absent path yields `Value::Null` and the typed helpers
// fall back to an empty string, empty slice or zero.

use serde_json::Value;

static NULL: Value = Value::Null;

/// Follow `path` through nested objects. Numeric segments index arrays.
pub fn dig<'a>(value: &'a Value, path: &[&str]) -> &'a Value {
    let mut current = value;
    for key in path {
        let next = match current {
            Value::Object(map) => map.get(*key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return &NULL,
        }
    }
    current
}

/// `true` when the path resolves to something, even an explicit null.
pub fn has_path(value: &Value, path: &[&str]) -> bool {
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => return true,
    };
    match dig(value, parents) {
        Value::Object(map) => map.contains_key(*last),
        Value::Array(items) => last.parse::<usize>().map(|i| i < items.len()).unwrap_or(false),
        _ => false,
    }
}

pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> &'a str {
    dig(value, path).as_str().unwrap_or("")
}

pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    dig(value, path).as_array().map(Vec::as_slice).unwrap_or(&[])
}

pub fn i64_at(value: &Value, path: &[&str]) -> i64 {
    dig(value, path).as_i64().unwrap_or(0)
}

/// Render a scalar the way it should appear in a CSV cell. Strings are
/// unquoted, null is empty, nested values fall back to compact JSON.
pub fn to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_paths_default() {
        let v = json!({"data": {"foods": {"search": {"totalCount": 3}}}});
        assert_eq!(i64_at(&v, &["data", "foods", "search", "totalCount"]), 3);
        assert_eq!(i64_at(&v, &["data", "labels", "search", "totalCount"]), 0);
        assert_eq!(str_at(&v, &["data", "foods", "search", "totalCount"]), "");
        assert!(array_at(&v, &["data", "foods", "search", "foodSearchResults"]).is_empty());
        assert!(dig(&v, &["data", "foods", "missing", "deeper"]).is_null());
    }

    #[test]
    fn null_is_distinct_from_absent() {
        let v = json!({"data": null});
        assert!(has_path(&v, &["data"]));
        assert!(!has_path(&v, &["data", "foods"]));
        assert!(!has_path(&v, &["errors"]));
    }

    #[test]
    fn numeric_segments_index_arrays() {
        let v = json!([{"id": "a"}, {"id": "b"}]);
        assert_eq!(str_at(&v, &["1", "id"]), "b");
        assert_eq!(str_at(&v, &["5", "id"]), "");
    }

    #[test]
    fn cells_render_scalars_plainly() {
        assert_eq!(to_cell(&json!("x")), "x");
        assert_eq!(to_cell(&json!(1.5)), "1.5");
        assert_eq!(to_cell(&Value::Null), "");
        assert_eq!(to_cell(&json!(true)), "true");
    }
}
