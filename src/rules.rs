use std::fmt;

// --- Rewrite Rules ---

/// Separator for provenance chains built during unit-production elimination
/// (`A@B` records that `A -> B` was eliminated by expanding `B`).
pub const CHAIN_SEPARATOR: char = '@';

/// Separator joining the two collapsed symbols of a binarization pivot (`C&D`).
pub const PIVOT_SEPARATOR: char = '&';

/// Marker wrapped around a promoted terminal (`$w$`).
pub const WRAPPER_MARKER: char = '$';

/// A context-free rewrite rule `LHS -> RHS`. Equality, hashing and ordering
/// are structural, so two rules built independently from the same symbols
/// compare equal. Probabilities are not part of the rule; the grammar keeps
/// them per rule entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RewriteRule {
    pub lhs: String,
    pub rhs: Vec<String>,
}

impl RewriteRule {
    pub fn new(lhs: impl Into<String>, rhs: Vec<String>) -> RewriteRule {
        let rule = RewriteRule {
            lhs: lhs.into(),
            rhs,
        };
        debug_assert!(!rule.rhs.is_empty(), "rule {} has an empty RHS", rule.lhs);
        rule
    }

    /// Convenience constructor for tests and callers with symbol literals.
    pub fn from_parts(lhs: &str, rhs: &[&str]) -> RewriteRule {
        RewriteRule::new(lhs, rhs.iter().map(|s| s.to_string()).collect())
    }

    /// A unit production has a single RHS symbol (terminal or not).
    pub fn is_unit(&self) -> bool {
        self.rhs.len() == 1
    }
}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs.join(" "))
    }
}

// --- Pseudo-symbol and provenance naming ---

/// Name of the pseudo non-terminal wrapping a promoted terminal.
pub fn wrapper_symbol(terminal: &str) -> String {
    format!("{WRAPPER_MARKER}{terminal}{WRAPPER_MARKER}")
}

/// Name of the pivot symbol collapsing two RHS symbols during binarization.
pub fn pivot_symbol(left: &str, right: &str) -> String {
    format!("{left}{PIVOT_SEPARATOR}{right}")
}

/// Extends a provenance chain with the symbol whose expansions were
/// substituted in.
pub fn chain_symbol(lhs: &str, substituted: &str) -> String {
    format!("{lhs}{CHAIN_SEPARATOR}{substituted}")
}

/// The symbols composed into a (possibly trivial) provenance chain.
pub fn chain_components(lhs: &str) -> impl Iterator<Item = &str> {
    lhs.split(CHAIN_SEPARATOR)
}

/// The original top-level symbol a composite LHS was derived from.
pub fn chain_head(lhs: &str) -> &str {
    chain_components(lhs).next().unwrap_or(lhs)
}
