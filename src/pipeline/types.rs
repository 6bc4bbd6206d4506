//! Data types for the recognition pipeline.

/// A label judged temporally consistent enough to act on.
///
/// Derived from a smoothing-window snapshot; exists only as a return value
/// on its way to the committer.
#[derive(Debug, Clone, PartialEq)]
pub struct StableDecision {
    /// The winning label.
    pub label: String,
    /// Mean confidence of the window entries matching the label.
    pub confidence: f32,
}

impl StableDecision {
    /// Creates a new stable decision.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// The action a stable decision maps to against the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Append a single character.
    AppendChar(char),
    /// Insert a space.
    InsertSpace,
    /// Delete the last committed character.
    DeleteLast,
    /// Do nothing this tick.
    Ignore,
}

/// What kind of token a raw label represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// No gesture / neutral label.
    Nothing,
    /// Space control token.
    Space,
    /// Delete control token.
    Delete,
    /// A single alphabetic character.
    Letter(char),
    /// Anything outside the vocabulary.
    Unknown,
}

impl TokenKind {
    /// Classifies a raw label. Control aliases are matched
    /// case-insensitively: `space`/`_` insert a space, and any of
    /// `del`/`delete`/`backspace` delete the last character.
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_ascii_lowercase();
        match lowered.as_str() {
            "nothing" => return TokenKind::Nothing,
            "space" | "_" => return TokenKind::Space,
            "del" | "delete" | "backspace" => return TokenKind::Delete,
            _ => {}
        }

        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_ascii_alphabetic()
        {
            return TokenKind::Letter(c.to_ascii_uppercase());
        }
        TokenKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_decision_creation() {
        let decision = StableDecision::new("A", 0.8);
        assert_eq!(decision.label, "A");
        assert_eq!(decision.confidence, 0.8);
    }

    #[test]
    fn test_token_kind_nothing() {
        assert_eq!(TokenKind::from_label("nothing"), TokenKind::Nothing);
        assert_eq!(TokenKind::from_label("NOTHING"), TokenKind::Nothing);
    }

    #[test]
    fn test_token_kind_space_aliases() {
        for label in ["space", "Space", "SPACE", "_"] {
            assert_eq!(TokenKind::from_label(label), TokenKind::Space, "{label}");
        }
    }

    #[test]
    fn test_token_kind_delete_aliases() {
        for label in ["del", "delete", "Delete", "backspace", "BACKSPACE"] {
            assert_eq!(TokenKind::from_label(label), TokenKind::Delete, "{label}");
        }
    }

    #[test]
    fn test_token_kind_letters_uppercased() {
        assert_eq!(TokenKind::from_label("A"), TokenKind::Letter('A'));
        assert_eq!(TokenKind::from_label("z"), TokenKind::Letter('Z'));
    }

    #[test]
    fn test_token_kind_unknown() {
        assert_eq!(TokenKind::from_label("AB"), TokenKind::Unknown);
        assert_eq!(TokenKind::from_label("7"), TokenKind::Unknown);
        assert_eq!(TokenKind::from_label(""), TokenKind::Unknown);
    }
}
