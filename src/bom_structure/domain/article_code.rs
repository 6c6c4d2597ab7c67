use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Maximum length for article codes (legacy column width is far below this)
const MAX_ARTICLE_CODE_LENGTH: usize = 64;

/// NewType wrapper for an article code, always stored normalized
///
/// Normalization trims surrounding whitespace and upper-cases the code, so two
/// codes compare equal exactly when the legacy table would treat them as the
/// same article (`UPPER(TRIM(code))`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleCode(String);

impl ArticleCode {
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let normalized = Self::normalize(raw.as_ref());

        if normalized.is_empty() {
            anyhow::bail!("Article code cannot be empty");
        }

        if normalized.len() > MAX_ARTICLE_CODE_LENGTH {
            anyhow::bail!(
                "Article code is too long ({} bytes). Maximum allowed: {} bytes",
                normalized.len(),
                MAX_ARTICLE_CODE_LENGTH
            );
        }

        if normalized.chars().any(char::is_control) {
            anyhow::bail!("Article code contains control characters: {:?}", normalized);
        }

        Ok(Self(normalized))
    }

    /// Trims and upper-cases a raw code without validating it
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArticleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ArticleCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ArticleCode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ArticleCode> for String {
    fn from(code: ArticleCode) -> Self {
        code.0
    }
}
