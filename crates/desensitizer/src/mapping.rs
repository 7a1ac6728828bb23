use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct CategoryBuilder {
    name: String,
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    occurrences: usize,
}

/// Accumulates original → masked pairs for one desensitization call.
///
/// Owned by a single invocation and consumed by [`MappingBuilder::finish`];
/// nothing it holds outlives the call except the returned snapshot.
#[derive(Debug, Default)]
pub struct MappingBuilder {
    categories: Vec<CategoryBuilder>,
}

impl MappingBuilder {
    /// Create a builder with categories in priority order
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|name| CategoryBuilder {
                    name: name.to_string(),
                    ..CategoryBuilder::default()
                })
                .collect(),
        }
    }

    fn category(&self, name: &str) -> Option<&CategoryBuilder> {
        self.categories.iter().find(|c| c.name == name)
    }

    fn category_mut(&mut self, name: &str) -> &mut CategoryBuilder {
        if let Some(idx) = self.categories.iter().position(|c| c.name == name) {
            return &mut self.categories[idx];
        }
        self.categories.push(CategoryBuilder {
            name: name.to_string(),
            ..CategoryBuilder::default()
        });
        let last = self.categories.len() - 1;
        &mut self.categories[last]
    }

    /// Masked value already assigned to `original` in `category`
    pub fn lookup(&self, category: &str, original: &str) -> Option<&str> {
        let cat = self.category(category)?;
        cat.index
            .get(original)
            .map(|&idx| cat.entries[idx].1.as_str())
    }

    /// Number of distinct originals recorded for `category`
    pub fn distinct(&self, category: &str) -> usize {
        self.category(category).map_or(0, |c| c.entries.len())
    }

    /// Record one masked occurrence.
    ///
    /// Returns false, recording nothing, when `masked == original`. The first
    /// masked value for an original wins; later ones are counted against it.
    pub fn record(&mut self, category: &str, original: &str, masked: &str) -> bool {
        if original == masked {
            return false;
        }
        let cat = self.category_mut(category);
        if !cat.index.contains_key(original) {
            cat.index.insert(original.to_string(), cat.entries.len());
            cat.entries.push((original.to_string(), masked.to_string()));
        }
        cat.occurrences += 1;
        true
    }

    /// Snapshot the mapping and per-category occurrence counts
    pub fn finish(self) -> (ReplacementMapping, DesensitizeStats) {
        let counts = self
            .categories
            .iter()
            .map(|c| (c.name.clone(), c.occurrences))
            .collect();
        let categories = self
            .categories
            .into_iter()
            .map(|c| CategoryMapping {
                name: c.name,
                entries: c.entries,
            })
            .collect();
        (ReplacementMapping { categories }, DesensitizeStats { counts })
    }
}

/// Original → masked pairs of one category, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    name: String,
    entries: Vec<(String, String)>,
}

impl CategoryMapping {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(o, _)| o == original)
            .map(|(_, m)| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, m)| (o.as_str(), m.as_str()))
    }
}

impl Serialize for CategoryMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (original, masked) in &self.entries {
            map.serialize_entry(original, masked)?;
        }
        map.end()
    }
}

/// Immutable per-category mapping returned by a desensitization call.
///
/// Serializes as `{category: {original: masked}}`, omitting empty categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMapping {
    categories: Vec<CategoryMapping>,
}

impl ReplacementMapping {
    pub fn get(&self, category: &str) -> Option<&CategoryMapping> {
        self.categories.iter().find(|c| c.name == category)
    }

    /// Masked value for `original` in `category`
    pub fn lookup(&self, category: &str, original: &str) -> Option<&str> {
        self.get(category)?.get(original)
    }

    /// Non-empty categories in priority order
    pub fn categories(&self) -> impl Iterator<Item = &CategoryMapping> {
        self.categories.iter().filter(|c| !c.is_empty())
    }

    /// Total distinct originals across categories
    pub fn total_entries(&self) -> usize {
        self.categories.iter().map(CategoryMapping::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

impl Serialize for ReplacementMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for category in self.categories() {
            map.serialize_entry(category.name(), category)?;
        }
        map.end()
    }
}

/// Masked occurrences per category, in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesensitizeStats {
    counts: Vec<(String, usize)>,
}

impl DesensitizeStats {
    pub fn get(&self, category: &str) -> usize {
        self.counts
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl Serialize for DesensitizeStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (name, count) in &self.counts {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_no_op_masks() {
        let mut builder = MappingBuilder::new(["urls"]);
        assert!(!builder.record("urls", "https://masked.com", "https://masked.com"));
        let (mapping, stats) = builder.finish();
        assert!(mapping.is_empty());
        assert_eq!(stats.get("urls"), 0);
    }

    #[test]
    fn first_mask_wins_and_occurrences_accumulate() {
        let mut builder = MappingBuilder::new(["ip_addresses"]);
        builder.record("ip_addresses", "10.1.2.3", "10.1.xxx.xxx");
        builder.record("ip_addresses", "10.1.2.3", "other");
        assert_eq!(builder.lookup("ip_addresses", "10.1.2.3"), Some("10.1.xxx.xxx"));
        assert_eq!(builder.distinct("ip_addresses"), 1);

        let (mapping, stats) = builder.finish();
        assert_eq!(stats.get("ip_addresses"), 2);
        assert_eq!(mapping.total_entries(), 1);
    }

    #[test]
    fn serializes_only_populated_categories_in_order() {
        let mut builder = MappingBuilder::new(["passwords", "imsi", "ip_addresses"]);
        builder.record("ip_addresses", "10.1.2.3", "10.1.xxx.xxx");
        builder.record("passwords", "pwd=1", "pwd=********");
        let (mapping, stats) = builder.finish();

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(
            json,
            r#"{"passwords":{"pwd=1":"pwd=********"},"ip_addresses":{"10.1.2.3":"10.1.xxx.xxx"}}"#
        );
        let stats_json = serde_json::to_string(&stats).unwrap();
        assert_eq!(stats_json, r#"{"passwords":1,"imsi":0,"ip_addresses":1}"#);
    }
}
