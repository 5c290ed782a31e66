//! Merge engine properties

use dripconf::{Config, ConfigNode, ConfigValue, configify};
use dripconf_test_utils::ConfigDir;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn node(value: serde_json::Value) -> ConfigNode {
    ConfigNode::try_from(value).unwrap()
}

#[test]
fn test_json_file_and_inline_json_agree() {
    let text = r#"{
        // service settings
        "service": {"name": "demo", "workers": [1, 2, 3]},
        /* feature flags */
        "flags": {"beta": false, "url": "http://example.org/*not-a-comment*/"}
    }"#;
    let dir = ConfigDir::new();
    let path = dir.write_json("service", text);

    let mut from_file = Config::new();
    from_file.merge(path).unwrap();
    let mut inline = Config::new();
    inline.merge(text).unwrap();

    assert_eq!(from_file.node(), inline.node());
    assert_eq!(inline["flags"]["url"], "http://example.org/*not-a-comment*/");
}

#[test]
fn test_layered_formats() {
    let dir = ConfigDir::new();
    let ini = dir.write_ini("base", "[main]\nenv = dev\n\n[db]\nhost = localhost\nport = 5432\n");
    let yaml = dir.write_yaml("override", "db:\n  port: 6432\n  replicas: [a, b]\n");

    let mut config = Config::new();
    config.merge(ini).unwrap();
    config.merge_yaml_file(yaml).unwrap();
    config.merge(json!({"db": {"replicas": ["c"]}})).unwrap();

    assert_eq!(
        config.to_json(),
        json!({
            "env": "dev",
            "db": {"host": "localhost", "port": 6432, "replicas": ["c"]}
        })
    );
}

#[test]
fn test_shape_changes_in_both_directions() {
    let mut config = Config::new();
    config.merge(json!({"a": 1, "b": {"c": 2}})).unwrap();
    config.merge(json!({"a": {"nested": true}, "b": "flat"})).unwrap();

    assert_eq!(config.to_json(), json!({"a": {"nested": true}, "b": "flat"}));
}

#[test]
fn test_merged_values_are_independent_copies() {
    let source = configify(json!({"shared": {"x": 1}}));
    let mut config = Config::new();
    config.merge(source.clone()).unwrap();
    config.get_mut("shared").unwrap().as_node_mut().unwrap().insert("x", 2);

    assert_eq!(source["shared"]["x"], 1);
    assert_eq!(config["shared"]["x"], 2);
}

#[test]
fn test_key_and_path_access_agree() {
    let tree = Config::from_data(json!({"y": {"z": 2, "w": [1, 2, {"v": 22}]}})).unwrap();

    assert_eq!(tree.get_path("y.z"), Some(&tree["y"]["z"]));
    assert_eq!(tree.get_path("y.w.2.v"), Some(&ConfigValue::Int(22)));
    assert_eq!(tree["y"]["w"][2]["v"], 22);
    assert!(tree.get_path("y.missing").is_none());
}

fn leaf() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-z]{0,6}".prop_map(serde_json::Value::from),
        prop::collection::vec(any::<i32>(), 0..3).prop_map(serde_json::Value::from),
    ]
}

fn tree() -> impl Strategy<Value = serde_json::Value> {
    let value = leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-d]", inner, 0..4)
            .prop_map(|m| serde_json::Value::Object(m.into_iter().collect()))
    });
    prop::collection::btree_map("[a-d]", value, 0..5)
        .prop_map(|m| serde_json::Value::Object(m.into_iter().collect()))
}

proptest! {
    #[test]
    fn prop_merge_is_idempotent(base in tree(), overlay in tree()) {
        let mut once = node(base);
        once.merge_dict(node(overlay.clone()));
        let mut twice = once.clone();
        twice.merge_dict(node(overlay));

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_overlay_keys_win_and_other_keys_survive(base in tree(), overlay in tree()) {
        let original = node(base);
        let incoming = node(overlay);
        let mut merged = original.clone();
        merged.merge_dict(incoming.clone());

        for (key, value) in &original {
            if !incoming.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
        for (key, value) in &incoming {
            let both_nodes = value.is_node() && original.get(key).is_some_and(ConfigValue::is_node);
            if !both_nodes {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    #[test]
    fn prop_merging_into_empty_reproduces_the_input(input in tree()) {
        let mut config = Config::new();
        config.merge(input.clone()).unwrap();
        prop_assert_eq!(config.to_json(), input);
    }
}
