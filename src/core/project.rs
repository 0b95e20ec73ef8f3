use serde_json::{Map, Value};

/// Output of a projection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub items: Vec<Value>,
    pub applied_projection: bool,
}

/// Reduce each item to the given dotted paths, keeping nesting.
///
/// A path whose intermediate segment is absent (or not an object) is skipped
/// for that item. Overlapping paths merge into the same nested object. Array
/// values are copied whole. An empty field list leaves the items untouched.
pub fn project_fields(items: Vec<Value>, fields: &[String]) -> ProjectionResult {
    let paths: Vec<Vec<&str>> = fields
        .iter()
        .map(|f| f.split('.').collect::<Vec<_>>())
        .filter(|segs| segs.iter().all(|s| !s.is_empty()))
        .collect();

    if paths.is_empty() {
        return ProjectionResult {
            items,
            applied_projection: false,
        };
    }

    let items = items
        .iter()
        .map(|item| {
            let mut out = Map::new();
            for segs in &paths {
                if let Some(value) = lookup(item, segs) {
                    insert(&mut out, segs, value.clone());
                }
            }
            Value::Object(out)
        })
        .collect();

    ProjectionResult {
        items,
        applied_projection: true,
    }
}

fn lookup<'a>(item: &'a Value, segs: &[&str]) -> Option<&'a Value> {
    segs.iter().try_fold(item, |node, seg| node.as_object()?.get(*seg))
}

fn insert(out: &mut Map<String, Value>, segs: &[&str], value: Value) {
    match segs {
        [] => {}
        [last] => {
            out.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let child = out
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert(map, rest, value);
            }
        }
    }
}
