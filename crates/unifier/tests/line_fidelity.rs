use nfprep_unifier::{line_count, unify, unify_or_fallback, FormatTag, UnifiedNode};
use proptest::prelude::*;

fn assert_sibling_lines_monotonic(node: &UnifiedNode) {
    for pair in node.children.windows(2) {
        assert!(
            pair[0].line <= pair[1].line,
            "siblings out of order: {:?} then {:?}",
            pair[0].key,
            pair[1].key
        );
    }
    for child in &node.children {
        assert_sibling_lines_monotonic(child);
    }
}

fn assert_lines_in_range(node: &UnifiedNode, max_line: usize) {
    assert!(node.line >= 1 && node.line <= max_line);
    for child in &node.children {
        assert_lines_in_range(child, max_line);
    }
}

#[test]
fn xml_json_yaml_ini_agree_on_shape() {
    let inputs = [
        (
            FormatTag::Xml,
            "<amf>\n  <name>amf01</name>\n  <plmn>46001</plmn>\n</amf>\n",
        ),
        (
            FormatTag::Json,
            "{\n  \"amf\": {\n    \"name\": \"amf01\",\n    \"plmn\": \"46001\"\n  }\n}\n",
        ),
        (FormatTag::Yaml, "amf:\n  name: amf01\n  plmn: '46001'\n"),
        (FormatTag::Ini, "[amf]\nname = amf01\nplmn = 46001\n"),
    ];

    for (format, text) in inputs {
        let doc = unify(text, format).unwrap();
        assert_eq!(
            doc.root.to_json(),
            serde_json::json!({"amf": {"name": "amf01", "plmn": "46001"}}),
            "{format}"
        );
        assert!(doc.line_map.get("amf.name").is_some(), "{format}");
        assert_sibling_lines_monotonic(&doc.root);
    }
}

#[test]
fn fallback_keeps_unified_output_populated() {
    let (doc, err) = unify_or_fallback("{\"amf\": ", FormatTag::Json);
    assert!(err.is_some());
    assert!(doc.degraded);
    assert_eq!(doc.root.leaf_count(), 1);
}

proptest! {
    #[test]
    fn yaml_lines_stay_in_range(
        keys in proptest::collection::vec("[a-z]{1,6}", 1..12),
        values in proptest::collection::vec(0i64..1000, 12),
    ) {
        let mut text = String::new();
        for (idx, key) in keys.iter().enumerate() {
            text.push_str(&format!("{key}{idx}:\n  value: {}\n", values[idx]));
        }
        let doc = unify(&text, FormatTag::Yaml).unwrap();
        assert_lines_in_range(&doc.root, line_count(&text).max(1));
        assert_sibling_lines_monotonic(&doc.root);
        for (idx, key) in keys.iter().enumerate() {
            let path = format!("{key}{idx}.value");
            prop_assert_eq!(doc.line_map.get(&path), Some(idx * 2 + 2));
        }
    }

    #[test]
    fn any_text_unifies_with_fallback(text in "\\PC{0,200}") {
        for format in [FormatTag::Xml, FormatTag::Json, FormatTag::Yaml, FormatTag::Ini, FormatTag::Text] {
            let (doc, _) = unify_or_fallback(&text, format);
            assert_lines_in_range(&doc.root, line_count(&text).max(1));
        }
    }
}
