//! Property-based tests for the path-addressed document

use kkconsole_core::spec::{ClusterSpecification, SpecDocument};
use proptest::prelude::*;
use serde_yaml::Value;

fn segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("spec".to_string()),
        Just("metadata".to_string()),
        Just("network".to_string()),
        Just("kubernetes".to_string()),
        Just("registry".to_string()),
        "[a-z]{1,6}",
    ]
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..5).prop_map(|segments| segments.join("."))
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9./-]{0,12}".prop_map(Value::from),
        any::<u16>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn default_document() -> SpecDocument {
    SpecDocument::from_specification(&ClusterSpecification::install_defaults()).unwrap()
}

/// Dotted paths of every non-mapping value
fn leaf_paths(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value.as_mapping() {
        Some(map) if !map.is_empty() => {
            for (key, child) in map {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", prefix, key)
                };
                leaf_paths(child, &path, out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}

fn related(a: &str, b: &str) -> bool {
    a == b || a.starts_with(&format!("{}.", b)) || b.starts_with(&format!("{}.", a))
}

proptest! {
    #[test]
    fn prop_set_then_get_returns_value(path in path_strategy(), value in value_strategy()) {
        let mut doc = default_document();
        if doc.set(&path, value.clone()).is_ok() {
            prop_assert_eq!(doc.get(&path), Some(&value));
        }
    }

    #[test]
    fn prop_set_leaves_unrelated_fields(path in path_strategy(), value in value_strategy()) {
        let original = default_document();
        let mut leaves = Vec::new();
        leaf_paths(original.root(), "", &mut leaves);

        let mut doc = original.clone();
        match doc.set(&path, value) {
            Ok(()) => {
                for leaf in leaves.iter().filter(|leaf| !related(leaf, &path)) {
                    // label keys contain dots and cannot be addressed
                    if leaf.starts_with("metadata.labels") {
                        continue;
                    }
                    prop_assert_eq!(doc.get(leaf), original.get(leaf), "{} changed", leaf);
                }
            }
            Err(_) => prop_assert_eq!(&doc, &original),
        }
    }

    #[test]
    fn prop_set_is_idempotent(path in path_strategy(), value in value_strategy()) {
        let mut once = default_document();
        let first = once.set(&path, value.clone());

        let mut twice = once.clone();
        let second = twice.set(&path, value);

        prop_assert_eq!(first.is_ok(), second.is_ok());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_set_sequence_last_write_wins(
        writes in prop::collection::vec((path_strategy(), value_strategy()), 1..8)
    ) {
        let original = default_document();
        let mut leaves = Vec::new();
        leaf_paths(original.root(), "", &mut leaves);

        let mut doc = original.clone();
        let mut applied: Vec<(String, Value)> = Vec::new();
        for (path, value) in writes {
            let before = doc.clone();
            match doc.set(&path, value.clone()) {
                Ok(()) => applied.push((path, value)),
                Err(_) => prop_assert_eq!(&doc, &before),
            }
        }

        for (i, (path, value)) in applied.iter().enumerate() {
            let overwritten = applied[i + 1..].iter().any(|(later, _)| related(later, path));
            if !overwritten {
                prop_assert_eq!(doc.get(path), Some(value), "{} lost its last write", path);
            }
        }

        for leaf in &leaves {
            if leaf.starts_with("metadata.labels") || applied.iter().any(|(p, _)| related(leaf, p)) {
                continue;
            }
            prop_assert_eq!(doc.get(leaf), original.get(leaf), "{} changed", leaf);
        }
    }
}
