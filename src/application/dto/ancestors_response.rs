use crate::bom_structure::domain::ArticleCode;
use serde::Serialize;

/// Which upward query produced an [`AncestorsResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AncestorKind {
    /// Articles that use the code directly
    DirectParents,
    /// Top-level articles the code eventually rolls up into
    TerminalAncestors,
}

/// AncestorsResponse - result of a parents or terminal-ancestors lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorsResponse {
    pub code: ArticleCode,
    pub kind: AncestorKind,
    pub ancestors: Vec<ArticleCode>,
}

impl AncestorsResponse {
    pub fn new(code: ArticleCode, kind: AncestorKind, ancestors: Vec<ArticleCode>) -> Self {
        Self {
            code,
            kind,
            ancestors,
        }
    }
}
