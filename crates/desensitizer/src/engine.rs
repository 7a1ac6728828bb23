use crate::catalog::PatternCatalog;
use crate::mapping::{DesensitizeStats, MappingBuilder, ReplacementMapping};
use std::collections::BTreeMap;

/// Output of one desensitization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desensitized {
    /// Masked text; same line count as the input
    pub text: String,
    pub mapping: ReplacementMapping,
    pub stats: DesensitizeStats,
}

/// A claimed byte range of the original text
struct Claim {
    end: usize,
    /// `None` when the category's mask equals the original
    replacement: Option<String>,
}

fn overlaps_claim(claims: &BTreeMap<usize, Claim>, start: usize, end: usize) -> bool {
    claims
        .range(..end)
        .next_back()
        .is_some_and(|(_, claim)| claim.end > start)
}

/// Mask every catalog match in `text`.
///
/// All patterns run against the original text in catalog order. A match that
/// overlaps a span claimed by an earlier match is skipped, so masked output
/// is never re-matched by a later category. Matches spanning a line break
/// are skipped so the line count is preserved.
pub fn desensitize(text: &str, catalog: &PatternCatalog) -> Desensitized {
    let mut builder = MappingBuilder::new(catalog.names());
    let mut claims: BTreeMap<usize, Claim> = BTreeMap::new();

    for pattern in catalog.patterns() {
        let category = pattern.name();
        for caps in pattern.regex().captures_iter(text) {
            let Some(found) = caps.get(0) else {
                continue;
            };
            let (start, end) = (found.start(), found.end());
            if start == end || found.as_str().contains('\n') || overlaps_claim(&claims, start, end)
            {
                continue;
            }

            let original = found.as_str();
            let masked = match builder.lookup(category, original) {
                Some(existing) => existing.to_string(),
                None => pattern
                    .strategy()
                    .apply(&caps, builder.distinct(category) + 1),
            };
            let replacement = builder
                .record(category, original, &masked)
                .then_some(masked);
            claims.insert(start, Claim { end, replacement });
        }
    }

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for (&start, claim) in &claims {
        output.push_str(&text[cursor..start]);
        output.push_str(claim.replacement.as_deref().unwrap_or(&text[start..claim.end]));
        cursor = claim.end;
    }
    output.push_str(&text[cursor..]);

    let (mapping, stats) = builder.finish();
    log::debug!(
        "Desensitized {} occurrences ({} distinct values)",
        stats.total(),
        mapping.total_entries()
    );
    Desensitized {
        text: output,
        mapping,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn builtin() -> PatternCatalog {
        PatternCatalog::builtin().unwrap()
    }

    #[test]
    fn password_and_ip_scenario() {
        let out = desensitize("password: secret123\nip: 10.1.2.3\n", &builtin());
        assert_eq!(out.text, "password=********\nip: 10.1.xxx.xxx\n");
        assert_eq!(
            out.mapping.lookup("passwords", "password: secret123"),
            Some("password=********")
        );
        assert_eq!(
            out.mapping.lookup("ip_addresses", "10.1.2.3"),
            Some("10.1.xxx.xxx")
        );
        assert_eq!(out.mapping.total_entries(), 2);
        assert_eq!(
            serde_json::to_value(&out.mapping).unwrap(),
            serde_json::json!({
                "passwords": {"password: secret123": "password=********"},
                "ip_addresses": {"10.1.2.3": "10.1.xxx.xxx"}
            })
        );
    }

    #[test]
    fn earlier_category_claims_the_span() {
        let out = desensitize("nrf: http://10.1.2.3:8080/nnrf\n", &builtin());
        assert_eq!(out.text, "nrf: http://masked.domain/nnrf\n");
        assert!(out.mapping.get("ip_addresses").map_or(true, |c| c.is_empty()));
        assert_eq!(out.stats.get("urls"), 1);
    }

    #[test]
    fn imsi_before_imei_before_phone() {
        let text = "imsi=460001234567890 imei=862012345678901 msisdn=13812345678";
        let out = desensitize(text, &builtin());
        assert_eq!(
            out.text,
            "imsi=46000********90 imei=86201234******* msisdn=138****78"
        );
        assert_eq!(out.stats.get("imsi"), 1);
        assert_eq!(out.stats.get("imei"), 1);
        assert_eq!(out.stats.get("phone_numbers"), 1);
    }

    #[test]
    fn customers_are_numbered_by_first_appearance() {
        let out = desensitize("Vodafone, China Mobile, Vodafone", &builtin());
        assert_eq!(out.text, "CUSTOMER_001, CUSTOMER_002, CUSTOMER_001");
        assert_eq!(out.stats.get("customers"), 3);
        assert_eq!(out.mapping.get("customers").unwrap().len(), 2);
    }

    #[test]
    fn masked_urls_are_no_ops() {
        let out = desensitize("see https://masked.com/x", &builtin());
        assert_eq!(out.text, "see https://masked.com/x");
        assert!(out.mapping.is_empty());
        assert_eq!(out.stats.total(), 0);
    }

    #[test]
    fn empty_catalog_is_identity() {
        let out = desensitize("password=1", &PatternCatalog::empty());
        assert_eq!(out.text, "password=1");
        assert!(out.mapping.is_empty());
    }
}
