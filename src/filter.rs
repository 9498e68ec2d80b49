//! Post-scan filtering of collected hits.
//!
//! Criteria come from two sets: literal substrings (case-insensitive
//! containment) and regex patterns (case-insensitive, free-spacing). A hit
//! passes when it satisfies any criterion from either set, and every
//! satisfied criterion reports and counts independently, so one hit can
//! appear and be counted more than once. With no criteria configured, every
//! non-empty hit is reported once.

use crate::hits::{Hit, OffsetTag};
use crate::types::Diagnostic;
use regex::{Regex, RegexBuilder};

/// Compiled filter criteria. Built once before processing; malformed
/// patterns are dropped with a diagnostic and do not abort the others.
pub struct FilterCriteria {
    literals: Vec<String>,
    patterns: Vec<Regex>,
    /// Report the regex capture instead of the containing hit
    regex_only: bool,
}

impl FilterCriteria {
    pub fn new(
        literals: Vec<String>,
        patterns: Vec<String>,
        regex_only: bool,
    ) -> (Self, Vec<Diagnostic>) {
        let literals: Vec<String> = literals
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_lowercase())
            .collect();

        let mut diagnostics = Vec::new();
        let mut compiled = Vec::new();
        for pattern in patterns {
            if pattern.trim().is_empty() {
                continue;
            }
            match RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .ignore_whitespace(true)
                .build()
            {
                Ok(regex) => compiled.push(regex),
                Err(e) => diagnostics.push(Diagnostic::Pattern {
                    pattern,
                    detail: e.to_string(),
                }),
            }
        }

        (
            Self {
                literals,
                patterns: compiled,
                regex_only,
            },
            diagnostics,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.patterns.is_empty()
    }
}

/// Apply the criteria to an ordered hit list. Returns the reported hits in
/// input order and the number of satisfied criteria across all hits.
pub fn filter(hits: &[Hit], criteria: &FilterCriteria) -> (Vec<Hit>, u64) {
    let mut reported = Vec::new();
    let mut match_count = 0u64;

    for hit in hits {
        if hit.text.is_empty() {
            continue;
        }

        if criteria.is_empty() {
            match_count += 1;
            reported.push(hit.clone());
            continue;
        }

        let lowered = hit.text.to_lowercase();
        for literal in &criteria.literals {
            if lowered.contains(literal.as_str()) {
                match_count += 1;
                reported.push(hit.clone());
            }
        }

        for regex in &criteria.patterns {
            if !regex.is_match(&hit.text) {
                continue;
            }
            match_count += 1;

            if criteria.regex_only {
                // The capture's position inside the hit is unknown, so the
                // hit's own offset is carried over as approximate.
                let tag = hit.tag.map(|t| OffsetTag {
                    approximate: true,
                    ..t
                });
                for m in regex.find_iter(&hit.text) {
                    reported.push(Hit {
                        text: m.as_str().to_string(),
                        tag,
                        from_boundary: hit.from_boundary,
                    });
                }
            } else {
                reported.push(hit.clone());
            }
        }
    }

    (reported, match_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EncodingTag;

    fn hit(text: &str) -> Hit {
        Hit {
            text: text.to_string(),
            tag: None,
            from_boundary: false,
        }
    }

    fn hits(texts: &[&str]) -> Vec<Hit> {
        texts.iter().map(|t| hit(t)).collect()
    }

    #[test]
    fn test_literal_filter() {
        let (criteria, diags) =
            FilterCriteria::new(vec!["forensics".to_string()], vec![], false);
        assert!(diags.is_empty());

        let (reported, count) = filter(&hits(&["forensics", "unrelated"]), &criteria);
        assert_eq!(count, 1);
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].text, "forensics");
    }

    #[test]
    fn test_literal_containment_is_case_insensitive() {
        let (criteria, _) = FilterCriteria::new(vec!["URL".to_string()], vec![], false);
        let (reported, count) = filter(&hits(&["some-url-here"]), &criteria);
        assert_eq!(count, 1);
        assert_eq!(reported[0].text, "some-url-here");
    }

    #[test]
    fn test_union_counts_each_criterion() {
        let (criteria, _) = FilterCriteria::new(
            vec!["local".to_string()],
            vec![r"[a-z]+host".to_string()],
            false,
        );
        // Satisfies both the literal and the regex: reported twice
        let (reported, count) = filter(&hits(&["localhost"]), &criteria);
        assert_eq!(count, 2);
        assert_eq!(reported.len(), 2);
    }

    #[test]
    fn test_no_criteria_reports_non_empty() {
        let (criteria, _) = FilterCriteria::new(vec![], vec![], false);
        let (reported, count) = filter(&hits(&["one", "", "two"]), &criteria);
        assert_eq!(count, 2);
        assert_eq!(reported.len(), 2);
    }

    #[test]
    fn test_malformed_pattern_skipped_with_diagnostic() {
        let (criteria, diags) = FilterCriteria::new(
            vec![],
            vec!["[broken".to_string(), "good".to_string()],
            false,
        );
        assert_eq!(diags.len(), 1);

        let (reported, count) = filter(&hits(&["a good hit"]), &criteria);
        assert_eq!(count, 1);
        assert_eq!(reported.len(), 1);
    }

    #[test]
    fn test_regex_only_reports_captures() {
        let (criteria, _) =
            FilterCriteria::new(vec![], vec![r"\d{3}-\d{4}".to_string()], true);

        let mut input = hit("call 555-1234 or 555-9999");
        input.tag = Some(OffsetTag {
            offset: 4096,
            encoding: EncodingTag::Narrow,
            approximate: false,
        });

        let (reported, count) = filter(&[input], &criteria);
        assert_eq!(count, 1);
        assert_eq!(reported.len(), 2);
        assert_eq!(reported[0].text, "555-1234");
        assert_eq!(reported[1].text, "555-9999");
        // Offsets are carried over from the containing hit, marked approximate
        for r in &reported {
            let tag = r.tag.unwrap();
            assert_eq!(tag.offset, 4096);
            assert!(tag.approximate);
        }
    }

    #[test]
    fn test_blank_criteria_entries_ignored() {
        let (criteria, diags) =
            FilterCriteria::new(vec!["   ".to_string()], vec!["".to_string()], false);
        assert!(diags.is_empty());
        assert!(criteria.is_empty());
    }
}
