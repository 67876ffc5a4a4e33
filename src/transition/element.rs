//! Discrete stack slot payloads

use std::fmt;

/// Discrete thing occupying one slot of a parser stack.
///
/// Each parser stack holds its own kind of entry: input tokens wait in the
/// buffer, while the control stack mixes tokens with open nonterminals and
/// completed subtrees. Action ids land on the history stack. `Element` tags
/// them all so the decode loop can inspect stack contents (for example to
/// check whether a reduce is legal) without touching any vectors.
///
/// Ids are vocabulary indices owned by the embedding layer; this crate never
/// interprets them. Equality is payload equality per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    /// Sentinel payload of the permanent base frame of every stack.
    Root,
    /// Input token, by token id.
    Token(usize),
    /// Open nonterminal, by label id.
    Nonterminal(usize),
    /// Completed subtree, by the label id it was closed under.
    Subtree(usize),
    /// Predicted action, by action id. Only the action-history stack
    /// carries these.
    Action(usize),
}

impl Element {
    /// True for the `Nonterminal` variant, i.e. a still-open constituent.
    ///
    /// The decode loop scans the control stack with this when it looks for
    /// the nonterminal a reduce should close.
    pub fn is_open_nonterminal(&self) -> bool {
        matches!(self, Element::Nonterminal(_))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Root => write!(f, "Root"),
            Element::Token(id) => write!(f, "tok:{}", id),
            Element::Nonterminal(id) => write!(f, "nt:{}", id),
            Element::Subtree(id) => write!(f, "tree:{}", id),
            Element::Action(id) => write!(f, "act:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_per_variant_payload() {
        assert_eq!(Element::Token(3), Element::Token(3));
        assert_ne!(Element::Token(3), Element::Token(4));
        // same id, different kind
        assert_ne!(Element::Token(3), Element::Nonterminal(3));
        assert_eq!(Element::Root, Element::Root);
    }

    #[test]
    fn renders_payload() {
        assert_eq!(Element::Root.to_string(), "Root");
        assert_eq!(Element::Token(7).to_string(), "tok:7");
        assert_eq!(Element::Nonterminal(2).to_string(), "nt:2");
        assert_eq!(Element::Subtree(2).to_string(), "tree:2");
        assert_eq!(Element::Action(11).to_string(), "act:11");
    }

    #[test]
    fn open_nonterminal_check() {
        assert!(Element::Nonterminal(0).is_open_nonterminal());
        assert!(!Element::Subtree(0).is_open_nonterminal());
        assert!(!Element::Root.is_open_nonterminal());
    }
}
