use crate::catalog::{keyword_group_pattern, nf_pattern, FEATURE_GROUPS, NETWORK_FUNCTIONS};
use once_cell::sync::Lazy;
use regex::RegexSet;
use std::collections::BTreeSet;

static SHARED: Lazy<FeatureTagger> = Lazy::new(FeatureTagger::new);

/// Per-line detector of network-function and capability labels.
///
/// One `RegexSet` pass per line. Network functions are labelled by their
/// upper-case name (`AMF`), capability groups by their lower-case group
/// name (`session`).
#[derive(Debug, Clone)]
pub struct FeatureTagger {
    set: RegexSet,
    labels: Vec<&'static str>,
}

impl FeatureTagger {
    pub fn new() -> Self {
        let mut patterns = Vec::with_capacity(NETWORK_FUNCTIONS.len() + FEATURE_GROUPS.len());
        let mut labels = Vec::with_capacity(patterns.capacity());
        for &name in NETWORK_FUNCTIONS {
            patterns.push(nf_pattern(name));
            labels.push(name);
        }
        for &(label, keywords) in FEATURE_GROUPS {
            patterns.push(keyword_group_pattern(keywords));
            labels.push(label);
        }
        let set = RegexSet::new(&patterns).expect("feature vocabulary should compile");
        Self { set, labels }
    }

    /// Process-wide instance
    pub fn shared() -> &'static FeatureTagger {
        &SHARED
    }

    /// Every label this tagger can emit, network functions first
    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    /// Labels present on one line
    pub fn tag_line<'a>(&'a self, line: &str) -> impl Iterator<Item = &'static str> + 'a {
        self.set
            .matches(line)
            .into_iter()
            .map(move |idx| self.labels[idx])
    }

    /// Add the labels present on `line` to `tags`
    pub fn tag_into(&self, line: &str, tags: &mut BTreeSet<String>) {
        for label in self.tag_line(line) {
            tags.insert(label.to_string());
        }
    }

    /// Labels present anywhere in `text`, scanned line by line
    pub fn tag_text(&self, text: &str) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for line in text.lines() {
            self.tag_into(line, &mut tags);
        }
        tags
    }
}

impl Default for FeatureTagger {
    fn default() -> Self {
        Self::new()
    }
}
