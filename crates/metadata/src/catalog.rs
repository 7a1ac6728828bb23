//! Fixed 5GC vocabulary shared by the extractor and the feature tagger.

/// Core-network element abbreviations, matched case-insensitively
pub const NETWORK_FUNCTIONS: &[&str] = &[
    "AMF", "SMF", "UPF", "NRF", "UDM", "UDR", "AUSF", "NSSF", "PCF", "BSF", "CHF", "SEPP", "SCP",
    "NEF", "NWDAF",
];

/// Capability keyword groups: `(label, keywords)`
pub const FEATURE_GROUPS: &[(&str, &[&str])] = &[
    (
        "authentication",
        &["authentication", "authenticate", "auth", "aka", "5g-aka", "eap-aka", "suci", "supi"],
    ),
    (
        "security",
        &["security", "tls", "ipsec", "cipher", "ciphering", "encryption", "integrity", "certificate"],
    ),
    ("policy", &["policy", "policies", "pcc", "ursp"]),
    ("session", &["session", "sessions", "pdu", "pdn", "bearer"]),
    ("handover", &["handover", "handovers", "hand-over", "mobility"]),
    ("slice", &["slice", "slices", "slicing", "nssai", "s-nssai", "snssai"]),
    ("roaming", &["roaming", "vplmn", "hplmn", "home-routed", "local-breakout"]),
    ("qos", &["qos", "5qi", "qfi", "qci", "gbr", "ambr"]),
    ("routing", &["routing", "route", "routes", "dnai", "ulcl"]),
    ("charging", &["charging", "billing", "cdr"]),
    ("registration", &["registration", "register", "attach"]),
];

/// Regex alternation of the network-function names
pub(crate) fn nf_alternation() -> String {
    NETWORK_FUNCTIONS.join("|")
}

/// Word-bounded, case-insensitive regex for one keyword group
pub(crate) fn keyword_group_pattern(keywords: &[&str]) -> String {
    let alternation = keywords
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)\b(?:{alternation})\b")
}

/// Case-insensitive regex matching one network-function name whose
/// suffix does not start with a letter
pub(crate) fn nf_pattern(name: &str) -> String {
    format!(r"(?i)\b{name}(?:$|[^A-Za-z])")
}
