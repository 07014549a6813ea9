use serde_json::Value;

/// Walks `value` along a dot-separated path.
///
/// Numeric segments index arrays, every other segment indexes objects:
/// `"MRData.RaceTable.Races.0"`. An empty path returns `value` itself.
pub fn pluck<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |cur, segment| match cur {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// Like [`pluck`] but takes ownership and returns the subtree by value.
pub fn take(mut value: Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(value);
    }
    for segment in path.split('.') {
        value = match value {
            Value::Array(mut items) => {
                let i = segment.parse::<usize>().ok()?;
                if i >= items.len() {
                    return None;
                }
                items.swap_remove(i)
            }
            Value::Object(mut map) => map.remove(segment)?,
            _ => return None,
        };
    }
    Some(value)
}
