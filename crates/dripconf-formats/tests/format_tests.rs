//! Tests for reading and parsing configuration files

use dripconf_formats::{Error, Format, Sections, jsonc, read_text, yaml};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_commented_json_matches_uncommented() {
    let commented = r#"{
        "a": 11,
        "z": 99, /* here is a comment */
        "b": {
            "c": 22,
            "e": {"y": 999},
            // another sort of comment
            "g": [77,88]
        }
        /*
        this might be a rather long
        type of comment that spans several lines...
        */
    }"#;
    let plain = r#"{
        "a": 11,
        "z": 99,
        "b": {"c": 22, "e": {"y": 999}, "g": [77, 88]}
    }"#;

    assert_eq!(jsonc::parse(commented).unwrap(), jsonc::parse(plain).unwrap());
}

#[rstest]
#[case("settings.ini", Some(Format::Ini))]
#[case("settings.json", Some(Format::Json))]
#[case("settings.yaml", Some(Format::Yaml))]
#[case("settings.yml", Some(Format::Yaml))]
#[case("settings.toml", None)]
#[case("settings", None)]
fn test_format_from_path(#[case] path: &str, #[case] expected: Option<Format>) {
    assert_eq!(Format::from_path(std::path::Path::new(path)), expected);
}

#[test]
fn test_read_ini_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.ini");
    fs::write(&path, "[main]\nname = app\n\n[whoa]\nfoo = bar\n").unwrap();

    let sections = Sections::read(&path).unwrap();
    assert_eq!(sections.section("whoa").unwrap().get("foo"), Some("bar"));
    assert_eq!(sections.section("main").unwrap().get("name"), Some("app"));
}

#[test]
fn test_read_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.ini");

    let err = read_text(&path).unwrap_err();
    match err {
        Error::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected Io error, got {:?}", other),
    }
    assert!(Sections::read(&path).is_err());
}

#[test]
fn test_yaml_and_json_agree_on_structure() {
    let from_yaml = yaml::parse("a: 1\nb:\n  c: [1, 2]\n").unwrap();
    let from_json = jsonc::parse(r#"{"a": 1, "b": {"c": [1, 2]}}"#).unwrap();

    let yaml_as_json = serde_json::to_value(&from_yaml).unwrap();
    assert_eq!(yaml_as_json, from_json);
}

proptest! {
    #[test]
    fn test_strip_comments_never_touches_strings(s in "[a-z/*\\\\ ]{0,24}") {
        // A JSON string literal holding arbitrary comment-like text
        let literal = serde_json::to_string(&s).unwrap();
        let source = format!("{{\"k\": {literal}}} // trailing");

        let value = jsonc::parse(&source).unwrap();
        prop_assert_eq!(value["k"].as_str(), Some(s.as_str()));
    }

    #[test]
    fn test_line_comments_are_transparent(n in any::<i64>(), note in "[a-z ]{0,16}") {
        let source = format!("{{\"n\": {n} // {note}\n}}");
        let value = jsonc::parse(&source).unwrap();
        prop_assert_eq!(value["n"].as_i64(), Some(n));
    }
}
