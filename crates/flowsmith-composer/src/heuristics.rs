//! Collection-processing heuristic
//!
//! A sequential node is upgraded to a batch mode only when enough
//! independent cues agree. A single cue (a plural-looking name, say) is
//! never enough on its own.

use crate::naming::camel_words;
use flowsmith_catalog::{NodeTemplate, ProcessingMode};

/// Words that end in `s` without being plurals
const NON_PLURAL: &[&str] = &[
    "process", "analysis", "status", "business", "class", "address", "access", "progress",
    "success", "basis", "bus", "news", "series", "canvas", "alias", "previous", "various",
    "chaos", "this", "gas", "yes", "always", "perhaps", "corpus", "census",
];

/// Words signalling a collection
const COLLECTION_WORDS: &[&str] = &[
    "each", "every", "all", "list", "lists", "batch", "batches", "collection",
    "collections", "multiple", "many", "several", "items", "array", "arrays",
];

/// Stems signalling concurrent processing
const CONCURRENCY_STEMS: &[&str] = &["parallel", "concurren", "simultaneous"];

/// Independent signals that a node processes a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCues {
    /// Node name's last word looks plural
    pub plural_name: bool,
    /// Node purpose mentions a collection
    pub collection_purpose: bool,
    /// Project description mentions a collection
    pub collection_description: bool,
    /// Concurrency wording in purpose or description
    pub concurrent: bool,
}

impl BatchCues {
    /// Gather cues for one node
    #[must_use]
    pub fn gather(node: &NodeTemplate, description: &str) -> Self {
        Self {
            plural_name: looks_plural(&node.name),
            collection_purpose: mentions_collection(&node.purpose),
            collection_description: mentions_collection(description),
            concurrent: mentions_concurrency(&node.purpose) || mentions_concurrency(description),
        }
    }

    /// Number of agreeing collection cues
    #[must_use]
    pub fn count(&self) -> usize {
        [
            self.plural_name,
            self.collection_purpose,
            self.collection_description,
        ]
        .iter()
        .filter(|&&cue| cue)
        .count()
    }

    /// Mode the node should use given a cue threshold
    ///
    /// Only sequential nodes are ever upgraded.
    #[must_use]
    pub fn resolve(&self, current: ProcessingMode, min_cues: usize) -> ProcessingMode {
        if current != ProcessingMode::Sequential || self.count() < min_cues {
            return current;
        }
        if self.concurrent {
            ProcessingMode::ParallelBatch
        } else {
            ProcessingMode::Batch
        }
    }
}

/// Whether the last word of a CamelCase name looks like a plural noun
#[must_use]
pub fn looks_plural(name: &str) -> bool {
    let Some(last) = camel_words(name).pop() else {
        return false;
    };
    last.len() > 3
        && last.ends_with('s')
        && !["ss", "us", "is", "ous"].iter().any(|s| last.ends_with(s))
        && !NON_PLURAL.contains(&last.as_str())
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Whether free text mentions a collection
#[must_use]
pub fn mentions_collection(text: &str) -> bool {
    let tokens: Vec<String> = words(text).collect();
    tokens.iter().any(|w| COLLECTION_WORDS.contains(&w.as_str()))
        || tokens.windows(2).any(|pair| pair[0] == "set" && pair[1] == "of")
}

/// Whether free text asks for concurrency
#[must_use]
pub fn mentions_concurrency(text: &str) -> bool {
    words(text).any(|w| CONCURRENCY_STEMS.iter().any(|s| w.starts_with(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_detection() {
        assert!(looks_plural("LoadDocuments"));
        assert!(looks_plural("ScoreItems"));
        assert!(!looks_plural("ProcessData"));
        assert!(!looks_plural("CheckStatus"));
        assert!(!looks_plural("RunAnalysis"));
        assert!(!looks_plural("TrackProgress"));
        assert!(!looks_plural("Business"));
        assert!(!looks_plural("ReportBus"));
        assert!(!looks_plural("Summarizer"));
    }

    #[test]
    fn single_cue_does_not_upgrade() {
        let node = NodeTemplate::new("LoadDocuments", "Load the input");
        let cues = BatchCues::gather(&node, "A small tool");
        assert_eq!(cues.count(), 1);
        assert_eq!(cues.resolve(ProcessingMode::Sequential, 2), ProcessingMode::Sequential);
    }

    #[test]
    fn two_cues_upgrade_to_batch() {
        let node = NodeTemplate::new("LoadDocuments", "Load each file");
        let cues = BatchCues::gather(&node, "A small tool");
        assert_eq!(cues.resolve(ProcessingMode::Sequential, 2), ProcessingMode::Batch);
    }

    #[test]
    fn concurrency_upgrades_to_parallel_batch() {
        let node = NodeTemplate::new("ScoreItems", "Score every item");
        let cues = BatchCues::gather(&node, "Runs in parallel");
        assert_eq!(cues.count(), 2);
        assert_eq!(
            cues.resolve(ProcessingMode::Sequential, 2),
            ProcessingMode::ParallelBatch
        );
    }

    #[test]
    fn explicit_modes_are_kept() {
        let node = NodeTemplate::new("FetchPages", "Fetch all pages");
        let cues = BatchCues::gather(&node, "many pages");
        assert_eq!(cues.resolve(ProcessingMode::Async, 2), ProcessingMode::Async);
    }

    #[test]
    fn collection_words() {
        assert!(mentions_collection("Handle a set of records"));
        assert!(mentions_collection("for EACH record"));
        assert!(!mentions_collection("Summarize the report"));
        assert!(!mentions_collection("Install the tool"));
        assert!(!mentions_collection("Reset offsets"));
    }
}
