//! Dotted field paths (`slimepedia.risks`) over JSON records.

use serde_json::{Map, Value};

/// Resolve a dotted path inside a record
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.get(segment))
}

/// Copy the value at `path` from `source` into `target`, creating parents
pub fn copy_path(source: &Value, target: &mut Map<String, Value>, path: &str) {
    let Some(value) = lookup(source, path) else {
        return;
    };

    let mut segments = path.split('.').peekable();
    let mut current = target;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value.clone());
            return;
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(inner) => current = inner,
            _ => return,
        }
    }
}

/// Remove the value at `path`, leaving parents in place
pub fn remove_path(record: &mut Value, path: &str) {
    match path.rsplit_once('.') {
        None => {
            if let Value::Object(obj) = record {
                obj.remove(path);
            }
        }
        Some((parent, leaf)) => {
            let parent = parent
                .split('.')
                .try_fold(record, |current, segment| current.get_mut(segment));
            if let Some(Value::Object(obj)) = parent {
                obj.remove(leaf);
            }
        }
    }
}
