//! Compiled indicator matchers

use crate::error::ClassifyError;
use flowsmith_catalog::{Indicator, IndicatorTable, PatternType};
use regex::Regex;

/// Matchers for every scored pattern, in table order
type PatternMatchers = Vec<(PatternType, Vec<PhraseMatcher>)>;

/// Collapse whitespace and lowercase
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One compiled phrase
#[derive(Debug, Clone)]
pub(crate) struct PhraseMatcher {
    pub(crate) phrase: String,
    pub(crate) weight: f64,
    regex: Regex,
}

impl PhraseMatcher {
    fn compile(indicator: &Indicator) -> Result<Self, ClassifyError> {
        let regex = phrase_regex(&indicator.text(), indicator.is_stem()).map_err(|source| {
            ClassifyError::InvalidPhrase {
                phrase: indicator.phrase.clone(),
                source,
            }
        })?;
        Ok(Self {
            phrase: indicator.phrase.clone(),
            weight: indicator.weight,
            regex,
        })
    }

    pub(crate) fn is_match(&self, normalized: &str) -> bool {
        self.regex.is_match(normalized)
    }
}

fn phrase_regex(text: &str, stem: bool) -> Result<Regex, regex::Error> {
    let words: Vec<String> = text.split_whitespace().map(regex::escape).collect();
    let body = words.join(r"\s+");
    if stem {
        Regex::new(&format!(r"\b{body}"))
    } else {
        Regex::new(&format!(r"\b{body}\b"))
    }
}

/// Compiled form of an [`IndicatorTable`]
#[derive(Debug, Clone)]
pub(crate) struct CompiledTable {
    pub(crate) version: u32,
    patterns: PatternMatchers,
    conjunctions: Vec<Regex>,
}

impl CompiledTable {
    pub(crate) fn compile(table: &IndicatorTable) -> Result<Self, ClassifyError> {
        let mut patterns = Vec::with_capacity(table.patterns.len());
        for (pattern, indicators) in &table.patterns {
            let matchers = indicators
                .iter()
                .map(PhraseMatcher::compile)
                .collect::<Result<Vec<_>, _>>()?;
            patterns.push((*pattern, matchers));
        }

        let mut conjunctions = Vec::with_capacity(table.conjunctions.len());
        for cue in &table.conjunctions {
            let regex = phrase_regex(&cue.to_lowercase(), false).map_err(|source| {
                ClassifyError::InvalidPhrase {
                    phrase: cue.clone(),
                    source,
                }
            })?;
            conjunctions.push(regex);
        }

        Ok(Self {
            version: table.version,
            patterns,
            conjunctions,
        })
    }

    /// Score and matched phrases for a pattern; zero when it has no set
    pub(crate) fn score(&self, pattern: PatternType, normalized: &str) -> (f64, Vec<String>) {
        let Some((_, matchers)) = self.patterns.iter().find(|(p, _)| *p == pattern) else {
            return (0.0, Vec::new());
        };

        let total: f64 = matchers.iter().map(|m| m.weight).sum();
        if total <= 0.0 {
            return (0.0, Vec::new());
        }

        let mut matched_weight = 0.0;
        let mut matched = Vec::new();
        for matcher in matchers {
            if matcher.is_match(normalized) {
                matched_weight += matcher.weight;
                matched.push(matcher.phrase.clone());
            }
        }
        ((matched_weight / total).clamp(0.0, 1.0), matched)
    }

    pub(crate) fn has_conjunction(&self, normalized: &str) -> bool {
        self.conjunctions.iter().any(|c| c.is_match(normalized))
    }
}
