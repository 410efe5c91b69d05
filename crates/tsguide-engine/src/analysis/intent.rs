use tracing::debug;

use super::contains_phrase;
use crate::models::QueryIntent;

/// Ordered intent classification rules; the first matching rule wins
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

/// Trigger phrases that select one intent
#[derive(Debug, Clone)]
pub struct IntentRule {
    intent: QueryIntent,
    triggers: Vec<Vec<String>>,
}

impl IntentRule {
    /// Create a rule; each trigger is matched as a whole-word phrase
    pub fn new(intent: QueryIntent, triggers: &[&str]) -> Self {
        Self {
            intent,
            triggers: triggers
                .iter()
                .map(|trigger| super::words(trigger))
                .filter(|phrase| !phrase.is_empty())
                .collect(),
        }
    }

    /// Intent selected by this rule
    pub fn intent(&self) -> QueryIntent {
        self.intent
    }

    /// First trigger found in the query words
    fn matched_trigger(&self, words: &[String]) -> Option<&[String]> {
        self.triggers
            .iter()
            .find(|phrase| contains_phrase(words, phrase))
            .map(Vec::as_slice)
    }
}

impl IntentClassifier {
    /// Classifier over a custom rule table, evaluated in order
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Classifier with the built-in rule table
    pub fn with_defaults() -> Self {
        Self::new(Self::default_rules())
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify normalized query words, defaulting to discovery
    pub fn classify(&self, words: &[String]) -> QueryIntent {
        for rule in &self.rules {
            if let Some(trigger) = rule.matched_trigger(words) {
                debug!("Intent {} matched trigger '{}'", rule.intent, trigger.join(" "));
                return rule.intent;
            }
        }
        debug!("No intent trigger matched, defaulting to discovery");
        QueryIntent::Discovery
    }

    // Comparison runs first: comparison questions often also say "explain"
    // or "understand".
    fn default_rules() -> Vec<IntentRule> {
        vec![
            IntentRule::new(
                QueryIntent::Comparison,
                &[
                    "compare",
                    "comparison",
                    "vs",
                    "versus",
                    "difference between",
                    "differences",
                    "contrast",
                ],
            ),
            IntentRule::new(
                QueryIntent::Implementation,
                &[
                    "implement",
                    "implementing",
                    "implementation",
                    "build",
                    "develop",
                    "code",
                    "coding",
                    "deploy",
                    "integrate",
                    "configure",
                ],
            ),
            IntentRule::new(
                QueryIntent::Learning,
                &[
                    "explain",
                    "how does",
                    "how do",
                    "understand",
                    "learn",
                    "learn about",
                    "what is",
                    "what are",
                    "tutorial",
                ],
            ),
            IntentRule::new(
                QueryIntent::Discovery,
                &[
                    "find",
                    "search",
                    "specifications for",
                    "what specs",
                    "which specs",
                    "which specifications",
                    "list",
                ],
            ),
        ]
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}
