//! Pattern rule library
//!
//! Rules are loaded from TOML into an ordered [`RuleSet`]. Each rule carries a label, a
//! compiled regex and a [`ContextGate`] evaluated against the lowercased line text.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;

/// Rule definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDefinition {
    /// Category name this rule reports
    pub label: String,
    /// Regex pattern
    pub pattern: String,
    /// Compile the pattern case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
    /// Line must contain one of these substrings
    #[serde(default)]
    pub context_substrings: Vec<String>,
    /// Line must contain one of these as a whole word
    #[serde(default)]
    pub context_words: Vec<String>,
}

/// Rule library container
#[derive(Debug, Deserialize)]
struct RuleLibrary {
    rules: Vec<RuleDefinition>,
}

/// Predicate over the lowercased line text that must hold before a rule may fire
#[derive(Debug, Clone)]
pub enum ContextGate {
    /// Rule always fires
    Always,
    /// Line contains any of the substrings
    AnySubstring(Vec<String>),
    /// Line contains any of the words, bounded by `\b`
    AnyWord(Regex),
}

impl ContextGate {
    /// Build a substring gate; an empty list yields [`ContextGate::Always`]
    pub fn substrings<S: AsRef<str>>(needles: &[S]) -> Self {
        if needles.is_empty() {
            return Self::Always;
        }
        Self::AnySubstring(
            needles
                .iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// Build a whole-word gate; an empty list yields [`ContextGate::Always`]
    pub fn words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        if words.is_empty() {
            return Ok(Self::Always);
        }
        let alternatives: Vec<String> = words
            .iter()
            .map(|w| regex::escape(&w.as_ref().to_lowercase()))
            .collect();
        let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
        let regex = Regex::new(&pattern)
            .with_context(|| format!("Invalid context word gate: {pattern}"))?;
        Ok(Self::AnyWord(regex))
    }

    /// Evaluate the gate; `lower_text` must already be lowercased
    pub fn allows(&self, lower_text: &str) -> bool {
        match self {
            Self::Always => true,
            Self::AnySubstring(needles) => needles.iter().any(|n| lower_text.contains(n.as_str())),
            Self::AnyWord(regex) => regex.is_match(lower_text),
        }
    }

    /// True when the gate never blocks
    pub fn is_unconditional(&self) -> bool {
        matches!(self, Self::Always)
    }
}

/// Compiled rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Category name
    pub label: String,
    /// Compiled regex
    pub regex: Regex,
    /// Context gate
    pub gate: ContextGate,
}

impl PatternRule {
    /// Compile a rule definition
    pub fn compile(def: &RuleDefinition) -> Result<Self> {
        let regex = RegexBuilder::new(&def.pattern)
            .case_insensitive(def.case_insensitive)
            .build()
            .with_context(|| format!("Invalid regex in rule '{}': {}", def.label, def.pattern))?;

        let gate = match (def.context_substrings.is_empty(), def.context_words.is_empty()) {
            (true, true) => ContextGate::Always,
            (false, true) => ContextGate::substrings(&def.context_substrings),
            (true, false) => ContextGate::words(&def.context_words)
                .with_context(|| format!("Invalid context gate in rule '{}'", def.label))?,
            (false, false) => anyhow::bail!(
                "Rule '{}' sets both context_substrings and context_words; use one",
                def.label
            ),
        };

        Ok(Self {
            label: def.label.clone(),
            regex,
            gate,
        })
    }
}

/// Ordered, read-only set of pattern rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    /// Create a rule set from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read rule library: {}", path.as_ref().display())
        })?;

        Self::from_toml(&content)
    }

    /// Create a rule set from TOML content, keeping file order
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: RuleLibrary =
            toml::from_str(content).context("Failed to parse rule library TOML")?;

        let rules = library
            .rules
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// The built-in rules for the shipped categories
    pub fn builtin() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/default_rules.toml");
        Self::from_toml(default_toml)
    }

    /// All rules in application order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Look up a rule by label
    pub fn rule(&self, label: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.label == label)
    }

    /// Labels of all rules, in order
    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rule_order() {
        let rules = RuleSet::builtin().unwrap();
        assert_eq!(
            rules.labels(),
            vec!["NRIC/FIN", "MCR no.", "EMAIL", "PHONE", "DATE", "ID_NUMBER"]
        );
    }

    #[test]
    fn test_phone_and_email_are_ungated() {
        let rules = RuleSet::builtin().unwrap();
        assert!(rules.rule("PHONE").unwrap().gate.is_unconditional());
        assert!(rules.rule("EMAIL").unwrap().gate.is_unconditional());
        assert!(!rules.rule("MCR no.").unwrap().gate.is_unconditional());
    }

    #[test]
    fn test_word_gate_respects_boundaries() {
        let gate = ContextGate::words(&["fin", "id"]).unwrap();
        assert!(gate.allows("fin: g1234567x"));
        assert!(gate.allows("patient id 123"));
        assert!(!gate.allows("final report"));
        assert!(!gate.allows("provided by clinic"));
    }

    #[test]
    fn test_word_gate_escapes_punctuation() {
        let gate = ContextGate::words(&["med. number"]).unwrap();
        assert!(gate.allows("med. number: ab123456"));
        assert!(!gate.allows("medx number: ab123456"));
    }

    #[test]
    fn test_substring_gate() {
        let gate = ContextGate::substrings(&["MCR"]);
        assert!(gate.allows("mcr no: 123456"));
        assert!(gate.allows("doctormcr123456"));
        assert!(!gate.allows("ref 123456"));
    }

    #[test]
    fn test_nric_pattern_is_case_insensitive() {
        let rules = RuleSet::builtin().unwrap();
        let nric = rules.rule("NRIC/FIN").unwrap();
        assert!(nric.regex.is_match("S1234567A"));
        assert!(nric.regex.is_match("s1234567a"));
        assert!(!nric.regex.is_match("X1234567A"));
    }

    #[test]
    fn test_custom_library() {
        let toml = r#"
[[rules]]
label = "PASSPORT_NO"
pattern = 'K\d{7}[A-Z]'
context_words = ["passport"]

[[rules]]
label = "EMAIL"
pattern = '\S+@\S+'
"#;
        let rules = RuleSet::from_toml(toml).unwrap();
        assert_eq!(rules.labels(), vec!["PASSPORT_NO", "EMAIL"]);
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let toml = r#"
[[rules]]
label = "BROKEN"
pattern = '(unclosed'
"#;
        let err = RuleSet::from_toml(toml).unwrap_err();
        assert!(format!("{err:#}").contains("BROKEN"));
    }

    #[test]
    fn test_conflicting_gates_are_rejected() {
        let toml = r#"
[[rules]]
label = "X"
pattern = 'x'
context_substrings = ["a"]
context_words = ["b"]
"#;
        assert!(RuleSet::from_toml(toml).is_err());
    }
}
