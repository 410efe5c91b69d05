//! Immutable, indexed knowledge base snapshot

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::Path,
};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    error::{KnowledgeError, Result},
    models::{
        Catalog, Concept, KnowledgeStats, Protocol, ResearchPattern, SearchPattern, Specification,
    },
    relevance::RelevanceRanker,
};

/// Catalog shipped with the crate
const DEFAULT_CATALOG: &str = include_str!("../data/catalog.yaml");

static SPEC_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^TS (\d{2})\.(\d{3})(-\d+)?$").expect("specification id pattern is valid")
});

/// Read-only catalog of specifications, protocols, concepts, and research patterns.
///
/// Built once during initialization; every lookup afterwards is a pure read,
/// so a shared `Arc<KnowledgeBase>` can serve concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    version: String,
    specifications: BTreeMap<String, Specification>,
    protocols: BTreeMap<String, Protocol>,
    concepts: BTreeMap<String, Concept>,
    patterns: BTreeMap<String, ResearchPattern>,
    search_patterns: BTreeMap<String, SearchPattern>,
    keyword_index: HashMap<String, BTreeSet<String>>,
    ranker: RelevanceRanker,
}

impl KnowledgeBase {
    /// Build from the catalog embedded in the crate
    pub fn load_default() -> Result<Self> {
        debug!("Loading embedded catalog");
        let catalog: Catalog = serde_yaml::from_str(DEFAULT_CATALOG)?;
        Self::from_catalog(catalog)
    }

    /// Build from a YAML or JSON catalog file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from {}", path.display());

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let content = std::fs::read_to_string(path)?;
        let catalog: Catalog = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => return Err(KnowledgeError::UnsupportedFormat(path.display().to_string())),
        };

        Self::from_catalog(catalog)
    }

    /// Validate and index a catalog
    pub fn from_catalog(catalog: Catalog) -> Result<Self> {
        let mut specifications = BTreeMap::new();
        for spec in catalog.specifications {
            validate_specification_id(&spec)?;
            if specifications.contains_key(&spec.id) {
                return Err(KnowledgeError::DuplicateEntry {
                    kind: "specification",
                    name: spec.id,
                });
            }
            specifications.insert(spec.id.clone(), spec);
        }

        let known_ids: BTreeSet<String> = specifications.keys().cloned().collect();
        for spec in specifications.values_mut() {
            let dangling: Vec<String> = spec
                .dependencies
                .iter()
                .filter(|dep| !known_ids.contains(*dep))
                .cloned()
                .collect();
            for dep in dangling {
                warn!("{} depends on unknown specification {}, dropping", spec.id, dep);
                spec.dependencies.remove(&dep);
            }
            spec.dependencies.remove(&spec.id);
        }

        let mut protocols = index_unique(catalog.protocols, "protocol", |p| p.name.clone())?;
        let known_protocols: BTreeSet<String> = protocols.keys().cloned().collect();
        for protocol in protocols.values_mut() {
            protocol.related_protocols.retain(|related| {
                let known = known_protocols.contains(related) && *related != protocol.name;
                if !known {
                    warn!(
                        "{} relates to unknown protocol {}, dropping",
                        protocol.name, related
                    );
                }
                known
            });
        }
        let concepts = index_unique(catalog.concepts, "concept", |c| c.name.clone())?;
        let patterns = index_unique(catalog.research_patterns, "research pattern", |p| {
            p.name.clone()
        })?;
        let search_patterns = index_unique(catalog.search_patterns, "search pattern", |p| {
            p.domain.to_lowercase()
        })?;

        let mut keyword_index: HashMap<String, BTreeSet<String>> = HashMap::new();
        for spec in specifications.values() {
            for keyword in spec.keywords() {
                keyword_index
                    .entry(keyword)
                    .or_default()
                    .insert(spec.id.clone());
            }
        }

        let kb = Self {
            version: catalog.version,
            specifications,
            protocols,
            concepts,
            patterns,
            search_patterns,
            keyword_index,
            ranker: RelevanceRanker::new(),
        };

        let stats = kb.stats();
        info!(
            "Loaded knowledge base v{}: {} specifications, {} protocols, {} concepts, {} patterns, {} keywords",
            kb.version,
            stats.specifications,
            stats.protocols,
            stats.concepts,
            stats.research_patterns,
            stats.indexed_keywords
        );

        Ok(kb)
    }

    /// Catalog version string
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entry counts
    pub fn stats(&self) -> KnowledgeStats {
        KnowledgeStats {
            specifications: self.specifications.len(),
            protocols: self.protocols.len(),
            concepts: self.concepts.len(),
            research_patterns: self.patterns.len(),
            search_patterns: self.search_patterns.len(),
            indexed_keywords: self.keyword_index.len(),
        }
    }

    /// All specifications in ascending id order
    pub fn specifications(&self) -> impl Iterator<Item = &Specification> + '_ {
        self.specifications.values()
    }

    /// All concepts in name order
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> + '_ {
        self.concepts.values()
    }

    /// All protocols in name order
    pub fn protocols(&self) -> impl Iterator<Item = &Protocol> + '_ {
        self.protocols.values()
    }

    /// Exact-id specification lookup
    pub fn get_specification(&self, id: &str) -> Option<&Specification> {
        self.specifications.get(id.trim())
    }

    /// Protocol lookup by name, falling back to a case-insensitive match
    pub fn get_protocol(&self, name: &str) -> Option<&Protocol> {
        lookup_by_name(&self.protocols, name)
    }

    /// Concept lookup by name, falling back to a case-insensitive match
    pub fn get_concept(&self, name: &str) -> Option<&Concept> {
        lookup_by_name(&self.concepts, name)
    }

    /// Research pattern lookup by name
    pub fn get_pattern(&self, name: &str) -> Option<&ResearchPattern> {
        self.patterns.get(name)
    }

    /// Specifications relevant to a topic, most relevant first
    pub fn suggest_specifications_for_topic(&self, topic: &str) -> Vec<&Specification> {
        let ranked = self.ranker.rank(topic, self.specifications.values());
        debug!("Topic '{}' matched {} specifications", topic, ranked.len());
        ranked
    }

    /// Specifications sharing a dependency or keyword with `id`, excluding `id` itself.
    ///
    /// Direct dependency links in either direction count as a shared dependency.
    /// Ordered by overlap size, then id.
    pub fn get_related_specifications(&self, id: &str) -> Vec<&Specification> {
        let Some(target) = self.get_specification(id) else {
            return Vec::new();
        };

        let target_keywords: BTreeSet<String> = target.keywords().collect();
        let mut related: Vec<(&Specification, usize)> = self
            .specifications
            .values()
            .filter(|candidate| candidate.id != target.id)
            .filter_map(|candidate| {
                let shared_deps = candidate
                    .dependencies
                    .intersection(&target.dependencies)
                    .count();
                let direct = usize::from(
                    candidate.dependencies.contains(&target.id)
                        || target.dependencies.contains(&candidate.id),
                );
                let shared_keywords = candidate
                    .keywords()
                    .collect::<BTreeSet<_>>()
                    .intersection(&target_keywords)
                    .count();
                let overlap = shared_deps + direct + shared_keywords;
                (overlap > 0).then_some((candidate, overlap))
            })
            .collect();

        related.sort_by(|(a, overlap_a), (b, overlap_b)| {
            overlap_b.cmp(overlap_a).then_with(|| a.id.cmp(&b.id))
        });
        related.into_iter().map(|(spec, _)| spec).collect()
    }

    /// Search template for a domain
    pub fn get_search_pattern_for_domain(&self, domain: &str) -> Option<&SearchPattern> {
        self.search_patterns.get(&domain.trim().to_lowercase())
    }

    /// Topic suggestions that carry implementation notes
    pub fn get_implementation_guidance_for_topic(&self, topic: &str) -> Vec<&Specification> {
        self.suggest_specifications_for_topic(topic)
            .into_iter()
            .filter(|spec| spec.has_implementation_notes())
            .collect()
    }

    /// Protocols defined by a specification
    pub fn protocols_for_specification(&self, id: &str) -> Vec<&Protocol> {
        self.protocols
            .values()
            .filter(|protocol| protocol.defining_specs.contains(id))
            .collect()
    }

    /// Research patterns applicable to an intent or domain label
    pub fn patterns_for(&self, label: &str) -> Vec<&ResearchPattern> {
        let label = label.to_lowercase();
        self.patterns
            .values()
            .filter(|pattern| {
                pattern
                    .applicable_for
                    .iter()
                    .any(|applicable| applicable.to_lowercase() == label)
            })
            .collect()
    }

    /// Specifications indexed under a keyword (case-insensitive)
    pub fn specifications_for_keyword(&self, keyword: &str) -> Vec<&Specification> {
        self.keyword_index
            .get(&keyword.to_lowercase())
            .into_iter()
            .flatten()
            .filter_map(|id| self.specifications.get(id))
            .collect()
    }
}

fn validate_specification_id(spec: &Specification) -> Result<()> {
    let captures = SPEC_ID
        .captures(&spec.id)
        .ok_or_else(|| KnowledgeError::InvalidSpecificationId(spec.id.clone()))?;
    let implied = &captures[1];
    if implied != spec.series {
        return Err(KnowledgeError::SeriesMismatch {
            id: spec.id.clone(),
            declared: spec.series.clone(),
            implied: implied.to_string(),
        });
    }
    Ok(())
}

fn index_unique<T>(
    records: Vec<T>,
    kind: &'static str,
    key: impl Fn(&T) -> String,
) -> Result<BTreeMap<String, T>> {
    let mut indexed = BTreeMap::new();
    for record in records {
        let name = key(&record);
        if indexed.contains_key(&name) {
            return Err(KnowledgeError::DuplicateEntry { kind, name });
        }
        indexed.insert(name, record);
    }
    Ok(indexed)
}

fn lookup_by_name<'a, T>(records: &'a BTreeMap<String, T>, name: &str) -> Option<&'a T> {
    let name = name.trim();
    records.get(name).or_else(|| {
        records
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, record)| record)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, deps: &[&str], keywords: &[&str]) -> Specification {
        Specification {
            id: id.to_string(),
            series: id[3..5].to_string(),
            title: format!("Title of {}", id),
            working_group: "SA2".to_string(),
            purpose: String::new(),
            key_topics: BTreeSet::new(),
            search_keywords: keywords.iter().map(|s| s.to_string()).collect(),
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
            implementation_notes: vec![],
        }
    }

    #[test]
    fn test_default_catalog_loads() {
        let kb = KnowledgeBase::load_default().unwrap();
        let stats = kb.stats();
        assert!(stats.specifications >= 10);
        assert!(stats.concepts >= 10);
        assert!(stats.indexed_keywords > 0);
        assert!(kb.get_specification("TS 33.501").is_some());
    }

    #[test]
    fn test_rejects_malformed_id() {
        let catalog = Catalog {
            specifications: vec![spec("33.501", &[], &[])],
            ..Default::default()
        };
        let err = KnowledgeBase::from_catalog(catalog).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidSpecificationId(_)));
    }

    #[test]
    fn test_rejects_series_mismatch() {
        let mut bad = spec("TS 33.501", &[], &[]);
        bad.series = "23".to_string();
        let catalog = Catalog {
            specifications: vec![bad],
            ..Default::default()
        };
        let err = KnowledgeBase::from_catalog(catalog).unwrap_err();
        assert!(matches!(err, KnowledgeError::SeriesMismatch { .. }));
    }

    #[test]
    fn test_rejects_duplicates() {
        let catalog = Catalog {
            specifications: vec![spec("TS 33.501", &[], &[]), spec("TS 33.501", &[], &[])],
            ..Default::default()
        };
        let err = KnowledgeBase::from_catalog(catalog).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateEntry { kind: "specification", .. }));
    }

    #[test]
    fn test_dangling_dependencies_dropped() {
        let catalog = Catalog {
            specifications: vec![spec("TS 23.502", &["TS 23.501", "TS 99.999"], &[])],
            ..Default::default()
        };
        let kb = KnowledgeBase::from_catalog(catalog).unwrap();
        assert!(kb
            .get_specification("TS 23.502")
            .unwrap()
            .dependencies
            .is_empty());
    }

    #[test]
    fn test_dangling_related_protocols_dropped() {
        let protocol = |name: &str, related: &[&str]| Protocol {
            name: name.to_string(),
            full_name: name.to_string(),
            layer: "L3".to_string(),
            purpose: String::new(),
            defining_specs: BTreeSet::new(),
            related_protocols: related.iter().map(|s| s.to_string()).collect(),
            procedures: vec![],
        };
        let catalog = Catalog {
            protocols: vec![
                protocol("NAS", &["RRC", "GHOSTP", "NAS"]),
                protocol("RRC", &["NAS"]),
            ],
            ..Default::default()
        };
        let kb = KnowledgeBase::from_catalog(catalog).unwrap();

        let nas = kb.get_protocol("NAS").unwrap();
        assert_eq!(nas.related_protocols.iter().collect::<Vec<_>>(), vec!["RRC"]);
        for protocol in kb.protocols() {
            for related in &protocol.related_protocols {
                assert!(kb.get_protocol(related).is_some());
            }
        }
    }

    #[test]
    fn test_related_specifications_exclude_target() {
        let catalog = Catalog {
            specifications: vec![
                spec("TS 23.501", &[], &["architecture"]),
                spec("TS 23.502", &["TS 23.501"], &["procedures"]),
                spec("TS 24.501", &["TS 23.501"], &["nas"]),
                spec("TS 38.331", &[], &["rrc"]),
            ],
            ..Default::default()
        };
        let kb = KnowledgeBase::from_catalog(catalog).unwrap();

        let related: Vec<&str> = kb
            .get_related_specifications("TS 23.502")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(related, vec!["TS 23.501", "TS 24.501"]);
        assert!(kb.get_related_specifications("TS 00.000").is_empty());
    }

    #[test]
    fn test_case_insensitive_name_fallback() {
        let kb = KnowledgeBase::load_default().unwrap();
        assert_eq!(kb.get_concept("suci").unwrap().name, "SUCI");
        assert!(kb.get_protocol("nas").is_some());
        assert!(kb.get_concept("no-such-concept").is_none());
    }
}
