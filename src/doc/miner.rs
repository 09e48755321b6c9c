// Annotation and note-keyword mining over doc comment text

use crate::config::{MiningConfig, DEFAULT_ANNOTATION_PATTERN, DEFAULT_NOTE_KEYWORDS};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_ANNOTATION_PATTERN).unwrap());

/// Extracts `@token` annotations and note keywords from doc text.
///
/// Built once per run; the pattern is compiled at construction and the
/// keyword vocabulary is fixed from then on.
#[derive(Debug, Clone)]
pub struct CommentMiner {
    annotation: Regex,
    keywords: Vec<String>,
}

impl CommentMiner {
    pub fn new(config: &MiningConfig) -> Result<Self> {
        if config.note_keywords.iter().any(|k| k.is_empty()) {
            return Err(Error::config_validation("note keywords must not be empty"));
        }

        let annotation = if config.annotation_pattern == DEFAULT_ANNOTATION_PATTERN {
            DEFAULT_ANNOTATION.clone()
        } else {
            Regex::new(&config.annotation_pattern)?
        };

        Ok(Self {
            annotation,
            keywords: config.note_keywords.clone(),
        })
    }

    /// Every annotation match, left to right, duplicates kept
    pub fn annotations(&self, doc: &str) -> Vec<String> {
        self.annotation
            .find_iter(doc)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Keywords contained anywhere in the doc, in vocabulary order.
    /// Containment is a plain substring test: "ERRORS" contains "ERROR".
    pub fn notes(&self, doc: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|k| doc.contains(k.as_str()))
            .cloned()
            .collect()
    }
}

impl Default for CommentMiner {
    fn default() -> Self {
        Self {
            annotation: DEFAULT_ANNOTATION.clone(),
            keywords: DEFAULT_NOTE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}
