//! Requirement classification
//!
//! Scores normalized requirement text against every catalog pattern's
//! weighted indicator set and turns the ranking into a
//! [`PatternRecommendation`].

use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use crate::hints::ClassificationHints;
use crate::matcher::{normalize, CompiledTable};
use crate::recommendation::{PatternRecommendation, SecondaryPattern};
use flowsmith_catalog::{
    Complexity, IndicatorTable, PatternCatalog, PatternType, DEFAULT_PATTERN,
};

/// Score of one candidate pattern
#[derive(Debug, Clone)]
struct Scored {
    pattern: PatternType,
    score: f64,
    matched: Vec<String>,
}

impl Scored {
    fn to_secondary(&self) -> SecondaryPattern {
        SecondaryPattern {
            pattern: self.pattern,
            score: self.score,
            matched: self.matched.clone(),
        }
    }

    fn describe(&self) -> String {
        if self.matched.is_empty() {
            format!("{} scored {:.2}", self.pattern, self.score)
        } else {
            format!(
                "{} scored {:.2} on: {}",
                self.pattern,
                self.score,
                self.matched.join(", ")
            )
        }
    }
}

/// Weighted-indicator classifier bound to a catalog
#[derive(Debug, Clone)]
pub struct Classifier<'c> {
    catalog: &'c PatternCatalog,
    table: CompiledTable,
    config: ClassifierConfig,
}

impl Classifier<'static> {
    /// Classifier over the built-in catalog and indicator table
    ///
    /// # Errors
    /// Returns error if the embedded indicator data is malformed
    pub fn builtin() -> Result<Self, ClassifyError> {
        Self::new(
            PatternCatalog::builtin(),
            &IndicatorTable::builtin()?,
            ClassifierConfig::default(),
        )
    }
}

impl<'c> Classifier<'c> {
    /// Create a classifier
    ///
    /// # Errors
    /// Returns error if the config is out of range or a phrase does not compile
    pub fn new(
        catalog: &'c PatternCatalog,
        table: &IndicatorTable,
        config: ClassifierConfig,
    ) -> Result<Self, ClassifyError> {
        config.validate()?;
        table.validate()?;
        let table = CompiledTable::compile(table)?;
        tracing::debug!(
            indicator_version = table.version,
            catalog_version = catalog.version(),
            "classifier ready"
        );
        Ok(Self {
            catalog,
            table,
            config,
        })
    }

    /// Bound catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'c PatternCatalog {
        self.catalog
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Revision of the indicator table in use
    #[inline]
    #[must_use]
    pub fn indicator_version(&self) -> u32 {
        self.table.version
    }

    /// Normalized score of one pattern for a text
    #[must_use]
    pub fn score(&self, pattern: PatternType, text: &str) -> f64 {
        self.table.score(pattern, &normalize(text)).0
    }

    /// Classify a requirement
    ///
    /// # Errors
    /// - [`ClassifyError::EmptyRequirement`] for blank text
    /// - [`ClassifyError::RequirementTooLarge`] over the size cap
    /// - [`ClassifyError::Catalog`] for an unknown pattern name in the hints
    /// - [`ClassifyError::ForcedPatternExcluded`] when a pattern is both
    ///   forced and excluded
    /// - [`ClassifyError::AllPatternsExcluded`] when nothing is left
    pub fn classify(
        &self,
        text: &str,
        hints: &ClassificationHints,
    ) -> Result<PatternRecommendation, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyRequirement);
        }
        if text.len() > self.config.max_requirement_bytes {
            return Err(ClassifyError::RequirementTooLarge {
                size: text.len(),
                limit: self.config.max_requirement_bytes,
            });
        }

        let forced = hints.forced()?;
        let excluded = hints.excluded()?;
        if let Some(pattern) = forced {
            if excluded.contains(&pattern) {
                return Err(ClassifyError::ForcedPatternExcluded(pattern));
            }
        }

        let candidates: Vec<PatternType> = self
            .catalog
            .patterns()
            .into_iter()
            .filter(|p| !excluded.contains(p))
            .collect();
        if candidates.is_empty() && forced.is_none() {
            return Err(ClassifyError::AllPatternsExcluded);
        }

        let normalized = normalize(text);
        let ranked = self.rank(&candidates, &normalized);
        for scored in &ranked {
            tracing::debug!(pattern = %scored.pattern, score = scored.score, matched = ?scored.matched, "scored");
        }

        let recommendation = match forced {
            Some(pattern) => self.forced(pattern, &ranked),
            None => self.scored(&ranked, &candidates, &normalized, hints.complexity),
        }
        .with_complexity(hints.complexity);

        tracing::info!(
            primary = %recommendation.primary(),
            confidence = recommendation.confidence(),
            ambiguous = recommendation.is_ambiguous(),
            "requirement classified"
        );
        Ok(recommendation)
    }

    /// Candidates by descending score; ties keep catalog order
    fn rank(&self, candidates: &[PatternType], normalized: &str) -> Vec<Scored> {
        let mut ranked: Vec<Scored> = candidates
            .iter()
            .map(|&pattern| {
                let (score, matched) = self.table.score(pattern, normalized);
                Scored {
                    pattern,
                    score,
                    matched,
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Scores strictly above the secondary threshold
    fn above_threshold<'r>(&self, ranked: &'r [Scored]) -> impl Iterator<Item = &'r Scored> {
        let threshold = self.config.secondary_threshold;
        ranked.iter().filter(move |s| s.score > 0.0 && s.score > threshold)
    }

    fn forced(&self, pattern: PatternType, ranked: &[Scored]) -> PatternRecommendation {
        if pattern.is_hybrid() {
            // components come from the scores; the exclusion table is not
            // consulted here
            let mut components: Vec<PatternType> = self
                .above_threshold(ranked)
                .take(self.config.max_hybrid_components)
                .map(|s| s.pattern)
                .collect();
            if components.len() < 2 {
                components = ranked
                    .iter()
                    .filter(|s| s.score > 0.0)
                    .take(2)
                    .map(|s| s.pattern)
                    .collect();
            }
            let listed = join_patterns(&components);
            let secondary = self.above_threshold(ranked).map(Scored::to_secondary).collect();
            return PatternRecommendation::hybrid(components, 1.0)
                .with_secondary(secondary)
                .with_rationale("HYBRID forced by caller")
                .with_rationale(format!("components: {listed}"));
        }

        let secondary = self
            .above_threshold(ranked)
            .filter(|s| s.pattern != pattern)
            .map(Scored::to_secondary)
            .collect();
        PatternRecommendation::direct(pattern, 1.0)
            .with_secondary(secondary)
            .with_rationale(format!("{pattern} forced by caller"))
    }

    fn scored(
        &self,
        ranked: &[Scored],
        candidates: &[PatternType],
        normalized: &str,
        complexity: Option<Complexity>,
    ) -> PatternRecommendation {
        let Some(top) = ranked.first().filter(|s| s.score > 0.0) else {
            let fallback = if candidates.contains(&DEFAULT_PATTERN) {
                DEFAULT_PATTERN
            } else {
                candidates.first().copied().unwrap_or(DEFAULT_PATTERN)
            };
            return PatternRecommendation::direct(fallback, 0.0)
                .with_ambiguous(true)
                .with_rationale(format!("no indicators matched; defaulting to {fallback}"));
        };

        let runner_up = ranked.get(1).filter(|s| s.score > 0.0);
        let ambiguous =
            runner_up.is_some_and(|r| top.score - r.score < self.config.ambiguity_epsilon);

        if let Some(hybrid) = self.hybrid(ranked, normalized, complexity) {
            return hybrid;
        }

        let secondary = self
            .above_threshold(ranked)
            .skip(1)
            .map(Scored::to_secondary)
            .collect();
        let mut recommendation = PatternRecommendation::direct(top.pattern, top.score)
            .with_secondary(secondary)
            .with_ambiguous(ambiguous)
            .with_rationale(top.describe());

        if let Some(runner_up) = runner_up.filter(|_| ambiguous) {
            recommendation = recommendation
                .with_rationale(runner_up.describe())
                .with_rationale(format!(
                    "ambiguous between {} and {}",
                    top.pattern, runner_up.pattern
                ));
        }
        if let Some(reason) = self.suppressed_hybrid(ranked, normalized, complexity) {
            tracing::warn!(%reason, "hybrid recommendation suppressed");
            recommendation = recommendation.with_rationale(reason);
        }
        recommendation
    }

    fn hybrid_components<'a>(
        &self,
        ranked: &'a [Scored],
        normalized: &str,
        complexity: Option<Complexity>,
    ) -> Option<Vec<&'a Scored>> {
        if complexity == Some(Complexity::Simple) || !self.table.has_conjunction(normalized) {
            return None;
        }
        let components: Vec<&Scored> = self
            .above_threshold(ranked)
            .take(self.config.max_hybrid_components)
            .collect();
        (components.len() >= 2).then_some(components)
    }

    fn hybrid(
        &self,
        ranked: &[Scored],
        normalized: &str,
        complexity: Option<Complexity>,
    ) -> Option<PatternRecommendation> {
        let components = self.hybrid_components(ranked, normalized, complexity)?;
        let patterns: Vec<PatternType> = components.iter().map(|s| s.pattern).collect();
        if self.catalog.first_conflict(&patterns).is_some() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let confidence =
            components.iter().map(|s| s.score).sum::<f64>() / components.len() as f64;
        let secondary = components.iter().map(|s| s.to_secondary()).collect();
        let mut recommendation = PatternRecommendation::hybrid(patterns.clone(), confidence)
            .with_secondary(secondary)
            .with_rationale(format!("hybrid of {}", join_patterns(&patterns)));
        for component in components {
            recommendation = recommendation.with_rationale(component.describe());
        }
        Some(recommendation)
    }

    fn suppressed_hybrid(
        &self,
        ranked: &[Scored],
        normalized: &str,
        complexity: Option<Complexity>,
    ) -> Option<String> {
        let components = self.hybrid_components(ranked, normalized, complexity)?;
        let patterns: Vec<PatternType> = components.iter().map(|s| s.pattern).collect();
        let conflict = self.catalog.first_conflict(&patterns)?;
        Some(format!(
            "hybrid not emitted: {} and {} are incompatible ({})",
            conflict.first, conflict.second, conflict.reason
        ))
    }
}

fn join_patterns(patterns: &[PatternType]) -> String {
    patterns
        .iter()
        .map(PatternType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsmith_artifact::ErrorKind;

    fn classifier() -> Classifier<'static> {
        Classifier::builtin().unwrap()
    }

    #[test]
    fn empty_text_is_input_error() {
        let err = classifier()
            .classify("   \n", &ClassificationHints::default())
            .unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyRequirement));
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn oversized_text_is_resource_limit() {
        let text = "retrieve ".repeat(4000);
        let err = classifier()
            .classify(&text, &ClassificationHints::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceLimit);
    }

    #[test]
    fn zero_score_defaults_to_workflow() {
        let rec = classifier()
            .classify("Lorem ipsum dolor sit amet", &ClassificationHints::default())
            .unwrap();
        assert_eq!(rec.primary(), PatternType::Workflow);
        assert_eq!(rec.confidence(), 0.0);
        assert!(rec.is_ambiguous());
    }

    #[test]
    fn zero_score_with_workflow_excluded_uses_first_remaining() {
        let hints = ClassificationHints::new().with_excluded("WORKFLOW").with_excluded("RAG");
        let rec = classifier().classify("Lorem ipsum", &hints).unwrap();
        assert_eq!(rec.primary(), PatternType::Agent);
        assert!(rec.is_ambiguous());
    }

    #[test]
    fn excluded_pattern_is_never_primary() {
        let text = "Search internal documents and answer user questions with retrieved context";
        let hints = ClassificationHints::new().with_excluded("RAG");
        let rec = classifier().classify(text, &hints).unwrap();
        assert_ne!(rec.primary(), PatternType::Rag);
        assert!(rec.secondary().iter().all(|s| s.pattern != PatternType::Rag));
    }

    #[test]
    fn all_excluded_is_config_error() {
        let mut hints = ClassificationHints::new();
        for pattern in PatternType::CONCRETE {
            hints = hints.with_excluded(pattern.as_str());
        }
        let err = classifier().classify("anything", &hints).unwrap_err();
        assert!(matches!(err, ClassifyError::AllPatternsExcluded));
    }

    #[test]
    fn score_at_secondary_threshold_is_not_secondary() {
        let table = IndicatorTable::from_yaml_str(
            r#"
version: 1
patterns:
  RAG:
    - { phrase: "search", weight: 1.0 }
  TOOL:
    - { phrase: "api", weight: 1.0 }
    - { phrase: "webhook", weight: 3.0 }
"#,
        )
        .unwrap();
        let text = "search the api";

        // TOOL scores exactly 1/4
        let at = Classifier::new(
            PatternCatalog::builtin(),
            &table,
            ClassifierConfig::default().with_secondary_threshold(0.25),
        )
        .unwrap();
        assert_eq!(at.score(PatternType::Tool, text), 0.25);
        let rec = at.classify(text, &ClassificationHints::default()).unwrap();
        assert_eq!(rec.primary(), PatternType::Rag);
        assert!(rec.secondary().is_empty());

        let below = Classifier::new(
            PatternCatalog::builtin(),
            &table,
            ClassifierConfig::default().with_secondary_threshold(0.2),
        )
        .unwrap();
        let rec = below.classify(text, &ClassificationHints::default()).unwrap();
        assert_eq!(rec.secondary().len(), 1);
        assert_eq!(rec.secondary()[0].pattern, PatternType::Tool);
    }

    #[test]
    fn close_scores_are_ambiguous() {
        // RAG 3/14 and TOOL 2/11.5 differ by about 0.04
        let rec = classifier()
            .classify("retrieve via the tool", &ClassificationHints::default())
            .unwrap();
        assert!(rec.is_ambiguous());
        assert!(rec.rationale().iter().any(|r| r.starts_with("ambiguous between")));
    }
}
