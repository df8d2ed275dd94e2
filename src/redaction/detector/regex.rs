//! Regex-based pattern detector

use super::{char_offset, patterns::RuleSet, LineDetector};
use crate::domain::CategorySet;
use crate::redaction::models::{DetectionSource, Finding};
use anyhow::Result;
use std::sync::Arc;

/// Applies the context-gated pattern rules to a line
pub struct PatternDetector {
    rule_set: Arc<RuleSet>,
}

impl PatternDetector {
    /// Create a new pattern detector with the built-in rules
    pub fn new() -> Result<Self> {
        Ok(Self::with_rules(Arc::new(RuleSet::builtin()?)))
    }

    /// Create a new pattern detector over a shared rule set
    pub fn with_rules(rule_set: Arc<RuleSet>) -> Self {
        Self { rule_set }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }
}

impl LineDetector for PatternDetector {
    fn detect_line(&self, text: &str, lower_text: &str, categories: &CategorySet) -> Vec<Finding> {
        let mut findings = Vec::new();

        for rule in self.rule_set.rules() {
            if !categories.contains(&rule.label) {
                continue;
            }

            // A closed gate skips the rule outright, no partial application
            if !rule.gate.allows(lower_text) {
                tracing::trace!(rule = %rule.label, "Context gate closed");
                continue;
            }

            for matched in rule.regex.find_iter(text) {
                let start_char = char_offset(text, matched.start());
                let end_char = char_offset(text, matched.end());
                if start_char < end_char {
                    findings.push(Finding::new(
                        start_char,
                        end_char,
                        &rule.label,
                        DetectionSource::Pattern,
                    ));
                }
            }
        }

        findings
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use test_case::test_case;

    fn detect(text: &str, categories: &[&str]) -> Vec<Finding> {
        let detector = PatternDetector::new().unwrap();
        let categories: CategorySet = categories.iter().copied().collect();
        detector.detect_line(text, &text.to_lowercase(), &categories)
    }

    fn spans(text: &str, findings: &[Finding]) -> Vec<String> {
        findings.iter().map(|f| f.fragment(text)).collect()
    }

    #[test]
    fn test_nric_with_context() {
        let text = "NRIC: S1234567A";
        let findings = detect(text, &["NRIC/FIN"]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].label, "<NRIC/FIN>");
        assert_eq!((findings[0].start_char, findings[0].end_char), (6, 15));
    }

    #[test]
    fn test_nric_without_context_is_gated() {
        assert!(detect("Ref S1234567A", &["NRIC/FIN"]).is_empty());
    }

    #[test_case("Call 91234567 now", "91234567" ; "mobile")]
    #[test_case("Tel 6123 4567", "6123 4567" ; "landline with space")]
    #[test_case("Hotline 8123-4567 daily", "8123-4567" ; "hyphenated")]
    #[test_case("Overseas +65 6123 4567", "+65 6123 4567" ; "international")]
    fn test_phone_detected_without_context(text: &str, expected: &str) {
        let findings = detect(text, &["PHONE"]);
        assert_eq!(spans(text, &findings), vec![expected.to_string()]);
    }

    #[test]
    fn test_phone_requires_leading_digit_class() {
        assert!(detect("Order 71234567", &["PHONE"]).is_empty());
    }

    #[test]
    fn test_mcr_requires_context() {
        assert!(detect("Invoice 123456", &["MCR no."]).is_empty());
        let text = "MCR No: M12345 / 123456";
        let findings = detect(text, &["MCR no."]);
        assert_eq!(spans(text, &findings), vec!["123456".to_string()]);
    }

    #[test]
    fn test_date_only_near_birth_keywords() {
        assert!(detect("Visit date: 12/03/2024", &["DATE"]).is_empty());
        let text = "Date of Birth: 01-02-1985";
        assert_eq!(spans(text, &detect(text, &["DATE"])), vec!["01-02-1985"]);
        let text = "DOB 1.2.85";
        assert_eq!(spans(text, &detect(text, &["DATE"])), vec!["1.2.85"]);
    }

    #[test]
    fn test_id_number_shapes() {
        let text = "Med. Number: AB123456";
        assert_eq!(spans(text, &detect(text, &["ID_NUMBER"])), vec!["AB123456"]);

        let text = "IHI 8003 6012 3456 7890";
        assert_eq!(
            spans(text, &detect(text, &["ID_NUMBER"])),
            vec!["8003 6012 3456 7890"]
        );

        assert!(detect("Ticket AB123456", &["ID_NUMBER"]).is_empty());
    }

    #[test]
    fn test_email_detected() {
        let text = "Contact: jane.tan@clinic.com.sg";
        let findings = detect(text, &["EMAIL"]);
        assert_eq!(spans(text, &findings), vec!["jane.tan@clinic.com.sg"]);
    }

    #[test]
    fn test_unrequested_categories_are_ignored() {
        assert!(detect("Call 91234567 now", &["EMAIL"]).is_empty());
    }

    #[test]
    fn test_multiple_matches_in_order() {
        let text = "Phones 91234567 and 81234567";
        let findings = detect(text, &["PHONE"]);
        assert_eq!(spans(text, &findings), vec!["91234567", "81234567"]);
        assert!(findings[0].start_char < findings[1].start_char);
    }

    #[test]
    fn test_offsets_are_characters_after_multibyte_text() {
        let text = "Zoë: 91234567";
        let findings = detect(text, &[Category::Phone.as_str()]);
        assert_eq!(findings[0].start_char, 5);
        assert_eq!(findings[0].end_char, 13);
    }
}
