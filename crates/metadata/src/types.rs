use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Occurrences of one network function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkFunctionStats {
    pub count: usize,
    /// Distinct matched tokens, first-seen order
    pub instances: Vec<String>,
}

/// Project identification found in comments or keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl ProjectInfo {
    pub fn is_empty(&self) -> bool {
        self.customer.is_none()
            && self.site.is_none()
            && self.region.is_none()
            && self.project.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpSummary {
    /// Distinct addresses
    pub total: usize,
    pub samples: Vec<String>,
    /// Occurrences keyed by the first two octets
    pub subnets: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub ip_addresses: IpSummary,
    pub domains: Vec<String>,
    pub ports: BTreeSet<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileStatistics {
    pub total_lines: usize,
    pub non_empty_lines: usize,
    pub comment_lines: usize,
    pub char_count: usize,
    pub size_bytes: usize,
    pub config_items: usize,
    pub sections: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub score: u32,
    pub level: ComplexityLevel,
    /// Labels of the non-zero contributions
    pub factors: Vec<String>,
}

/// Domain metadata derived from one scan of a configuration text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "ProjectInfo::is_empty")]
    pub project: ProjectInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Keyed by upper-case name
    pub network_functions: BTreeMap<String, NetworkFunctionStats>,
    pub features: BTreeSet<String>,
    pub interfaces: Vec<String>,
    /// `PLMN`, `TAC`, `DNN`, `SST` values in first-seen order
    pub identifiers: BTreeMap<String, Vec<String>>,
    pub network: NetworkInfo,
    pub statistics: FileStatistics,
    pub complexity: Complexity,
}

impl Metadata {
    /// Names of the network functions seen at least once
    pub fn network_function_names(&self) -> Vec<&str> {
        self.network_functions.keys().map(String::as_str).collect()
    }
}
