use nfprep_metadata::{extract, ComplexityLevel};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

const SAMPLE: &str = r#"# Customer: Example Telecom
# Region: EU-West
amf:
  - name: amf01
    sbi: http://amf01.core.example.org:29518/namf-comm
    plmn: 26201
    guami: AMF region 1
  - name: amf02
smf:
  name: SMF-east
  upf_peer: upf-1
  n4_address: 10.20.1.5
  session:
    dnn: internet
    qos: 5qi 9
"#;

#[test]
fn counts_each_network_function_occurrence() {
    let text = "AMF one\nAMF two\nAMF three\nlink AMF to SMF\nAMF\nSMF\n";
    let meta = extract(text);

    let counts: Vec<(&str, usize)> = meta
        .network_functions
        .iter()
        .map(|(name, stats)| (name.as_str(), stats.count))
        .collect();
    assert_eq!(counts, vec![("AMF", 5), ("SMF", 2)]);
}

#[test]
fn extracts_a_realistic_document() {
    let meta = extract(SAMPLE);

    assert_eq!(meta.project.customer.as_deref(), Some("Example Telecom"));
    assert_eq!(meta.project.region.as_deref(), Some("EU-West"));
    assert_eq!(meta.network_function_names(), vec!["AMF", "SMF", "UPF"]);
    assert_eq!(meta.network_functions["AMF"].count, 5);
    assert_eq!(
        meta.features.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["qos", "session"]
    );
    assert_eq!(meta.identifiers["PLMN"], vec!["26201"]);
    assert_eq!(meta.identifiers["DNN"], vec!["internet"]);
    assert_eq!(meta.network.ip_addresses.samples, vec!["10.20.1.5"]);
    assert_eq!(meta.network.domains, vec!["amf01.core.example.org"]);
    assert!(meta.network.ports.contains(&29518));
    assert_eq!(meta.statistics.comment_lines, 2);
    assert_eq!(meta.complexity.level, ComplexityLevel::Medium);
}

#[test]
fn serializes_with_stable_section_names() {
    let value = serde_json::to_value(extract("UPF: upf1\n")).unwrap();
    assert_eq!(
        value["network_functions"],
        json!({"UPF": {"count": 2, "instances": ["UPF", "upf1"]}})
    );
    assert!(value.get("project").is_none());
    assert!(value.get("version").is_none());
    assert_eq!(value["complexity"]["level"], json!("low"));
    assert_eq!(value["network"]["ports"], json!([]));
}

proptest! {
    #[test]
    fn adding_config_items_never_lowers_complexity(extra in 0usize..400) {
        let mut grown = SAMPLE.to_string();
        for i in 0..extra {
            grown.push_str(&format!("item{i}: {i}\n"));
        }
        let base = extract(SAMPLE).complexity;
        let after = extract(&grown).complexity;
        prop_assert!(after.score >= base.score);
        prop_assert!(after.level >= base.level);
    }
}
