use tracing::debug;

use super::{contains_phrase, GENERAL_DOMAIN};

/// Keyword table mapping query words to a topic domain
#[derive(Debug, Clone)]
pub struct DomainExtractor {
    rules: Vec<DomainRule>,
}

/// Keywords that place a query in one domain
#[derive(Debug, Clone)]
pub struct DomainRule {
    domain: String,
    keywords: Vec<Vec<String>>,
    generic: bool,
}

impl DomainRule {
    /// Specific domain rule
    pub fn new(domain: &str, keywords: &[&str]) -> Self {
        Self {
            domain: domain.to_string(),
            keywords: keywords
                .iter()
                .map(|keyword| super::words(keyword))
                .filter(|phrase| !phrase.is_empty())
                .collect(),
            generic: false,
        }
    }

    /// Generic rule, chosen only when no specific rule matches
    pub fn generic(domain: &str, keywords: &[&str]) -> Self {
        Self {
            generic: true,
            ..Self::new(domain, keywords)
        }
    }

    /// Domain name
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether the rule yields to any specific match
    pub fn is_generic(&self) -> bool {
        self.generic
    }

    /// Length in characters of the longest keyword present in the words
    fn longest_match(&self, words: &[String]) -> Option<usize> {
        self.keywords
            .iter()
            .filter(|phrase| contains_phrase(words, phrase))
            .map(|phrase| phrase.join(" ").chars().count())
            .max()
    }
}

impl DomainExtractor {
    /// Extractor over a custom rule table
    pub fn new(rules: Vec<DomainRule>) -> Self {
        Self { rules }
    }

    /// Extractor with the built-in 3GPP domain table
    pub fn with_defaults() -> Self {
        Self::new(Self::default_rules())
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[DomainRule] {
        &self.rules
    }

    /// Pick the domain for normalized query words.
    ///
    /// Specific rules outrank generic ones, then the longest matching keyword
    /// wins, then declaration order. Falls back to [`GENERAL_DOMAIN`].
    pub fn extract(&self, words: &[String]) -> String {
        let mut best: Option<(&DomainRule, usize)> = None;
        for rule in &self.rules {
            let Some(length) = rule.longest_match(words) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((current, current_length)) => {
                    (current.generic && !rule.generic)
                        || (current.generic == rule.generic && length > current_length)
                }
            };
            if better {
                best = Some((rule, length));
            }
        }

        match best {
            Some((rule, length)) => {
                debug!("Domain {} matched on a {}-character keyword", rule.domain, length);
                rule.domain.clone()
            }
            None => {
                debug!("No domain keyword matched, using {}", GENERAL_DOMAIN);
                GENERAL_DOMAIN.to_string()
            }
        }
    }

    fn default_rules() -> Vec<DomainRule> {
        vec![
            DomainRule::new(
                "authentication",
                &["authentication", "authenticate", "auth", "aka", "ausf", "seaf"],
            ),
            DomainRule::new(
                "security",
                &[
                    "security",
                    "encryption",
                    "ciphering",
                    "suci",
                    "supi",
                    "privacy",
                    "integrity protection",
                    "identity protection",
                    "key hierarchy",
                ],
            ),
            DomainRule::new(
                "mobility",
                &["handover", "mobility", "tracking area", "registration", "paging"],
            ),
            DomainRule::new(
                "session_management",
                &["pdu session", "session management", "qos"],
            ),
            DomainRule::new("network_slicing", &["slice", "slicing", "nssai"]),
            DomainRule::new("charging", &["charging", "billing", "chf"]),
            DomainRule::generic(
                "protocol",
                &["protocol", "nas", "rrc", "pdcp", "ngap", "signaling", "signalling"],
            ),
        ]
    }
}

impl Default for DomainExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
