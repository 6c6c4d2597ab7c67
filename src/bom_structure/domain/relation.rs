use super::{ArticleCode, Quantity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored parent -> child relation of the legacy structure table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub parent_code: ArticleCode,
    pub child_code: ArticleCode,
    #[serde(default)]
    pub quantity: Quantity,
    pub sequence: i64,
    /// Set when the relation was retired; only open relations take part in resolution
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

impl RelationEdge {
    pub fn new(parent_code: ArticleCode, child_code: ArticleCode, quantity: Quantity, sequence: i64) -> Self {
        Self {
            parent_code,
            child_code,
            quantity,
            sequence,
            valid_until: None,
        }
    }

    pub fn retired_on(mut self, date: NaiveDate) -> Self {
        self.valid_until = Some(date);
        self
    }

    pub fn is_active(&self) -> bool {
        self.valid_until.is_none()
    }
}

/// Row shape of the children query
#[derive(Debug, Clone, PartialEq)]
pub struct ChildEdge {
    pub child_code: ArticleCode,
    pub quantity: Quantity,
    pub sequence: i64,
}

/// Row shape of the parents query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParentEdge {
    pub parent_code: ArticleCode,
}

/// Descriptive attributes of an article
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleAttributes {
    pub description: String,
    pub revision_letter: String,
}

impl ArticleAttributes {
    pub fn new(description: impl Into<String>, revision_letter: impl Into<String>) -> Self {
        Self {
            description: description.into().trim().to_string(),
            revision_letter: revision_letter.into().trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.revision_letter.is_empty()
    }
}
