use crate::grammar::Grammar;
use crate::rules::RewriteRule;
use crate::structs::Node;

// --- Grammar Extraction ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Rule set only, no probabilities.
    Plain,
    /// Count rule occurrences and finish with maximum-likelihood estimates.
    Probabilistic,
}

/// Induces a grammar from a sequence of parse trees.
///
/// Each tree is traversed depth first: the first node visited overall fixes
/// the start symbol, leaves register terminals, and every internal node emits
/// one rule (its label rewriting to the ordered labels of its children). In
/// probabilistic mode structurally equal rules accumulate occurrence counts,
/// which become relative frequencies per LHS once the whole corpus has been
/// consumed.
///
/// An empty corpus yields a grammar with no start symbol; callers that need
/// a usable grammar must treat that as an error.
pub fn extract(trees: &[Node], mode: ExtractMode) -> Grammar {
    let mut grammar = Grammar::new();
    for tree in trees {
        traverse(tree, &mut grammar, mode);
    }
    if mode == ExtractMode::Probabilistic {
        grammar.compute_probabilities();
    }
    grammar
}

fn traverse(node: &Node, grammar: &mut Grammar, mode: ExtractMode) {
    if grammar.start_symbol().is_none() {
        grammar.set_start_symbol(&node.label);
    }

    if node.is_terminal() {
        grammar.add_terminal(&node.label);
        return;
    }

    grammar.add_non_terminal(&node.label);

    let rhs: Vec<String> = node.children.iter().map(|c| c.label.clone()).collect();
    let id = grammar.add(RewriteRule::new(node.label.clone(), rhs));
    if mode == ExtractMode::Probabilistic {
        grammar.note_occurrence(id);
    }

    for child in &node.children {
        traverse(child, grammar, mode);
    }
}
