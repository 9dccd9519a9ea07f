use std::collections::{HashSet, VecDeque};

use log::{debug, info};

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::rules::{self, RewriteRule};

// --- Grammar Normalization ---

/// Target variants of [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalForm {
    /// Strict CNF: every RHS is two non-terminals or a single terminal; no
    /// unit productions survive.
    FullCnf,
    /// Terminal promotion and binarization only; unit productions are kept.
    LooseBinary,
    /// CNF whose unit elimination stops at the part-of-speech layer: unit
    /// rules rewriting to a symbol that directly yields a terminal are kept.
    PosBoundedCnf,
}

/// A normalized grammar together with the number of unit chains that were
/// abandoned by the depth and cycle guards. Abandonment is a deliberate lossy
/// bound, not an error, but callers should surface the count.
#[derive(Debug)]
pub struct Normalized {
    pub grammar: Grammar,
    pub abandoned_chains: u64,
}

/// Unit chains composing this many symbols or more are abandoned instead of
/// being substituted further.
const MAX_CHAIN_COMPONENTS: usize = 3;

/// Builds a new grammar in the requested normal form from `source`, which is
/// never mutated. The pipeline order is fixed: terminals inside mixed RHSes
/// are promoted to wrapper pseudo-symbols, RHSes longer than two are
/// binarized right to left through pivot pseudo-symbols, and finally unit
/// productions are eliminated (except for `LooseBinary`). The boundary set
/// for `PosBoundedCnf` is derived from the already-binarized grammar, since
/// promotion and binarization change which symbols directly yield terminals.
///
/// Probabilities propagate exactly: wrapper and pivot rules get 1.0, and a
/// substituted rule gets the product of the probabilities along its chain.
/// Plain grammars go through the same structural transformation without
/// probabilities.
pub fn normalize(source: &Grammar, form: NormalForm) -> Result<Normalized, GrammarError> {
    let Some(start) = source.start_symbol() else {
        return Err(GrammarError::EmptyGrammar);
    };

    let probabilistic = source
        .iter_rules()
        .any(|rule| source.probability(rule).is_some());

    let mut cnf = Grammar::new();
    cnf.set_start_symbol(start);
    for terminal in source.terminals() {
        cnf.add_terminal(terminal);
    }
    for non_terminal in source.non_terminals() {
        cnf.add_non_terminal(non_terminal);
    }

    promote_and_binarize(source, &mut cnf, probabilistic);

    let abandoned_chains = match form {
        NormalForm::LooseBinary => 0,
        NormalForm::FullCnf => eliminate_unit_rules(&mut cnf, &HashSet::new()),
        NormalForm::PosBoundedCnf => {
            let boundary = pos_symbols(&cnf);
            eliminate_unit_rules(&mut cnf, &boundary)
        }
    };
    if abandoned_chains > 0 {
        info!(
            "unit elimination abandoned {} chain(s) (depth/cycle bound)",
            abandoned_chains
        );
    }

    Ok(Normalized {
        grammar: cnf,
        abandoned_chains,
    })
}

/// Copies every source rule into `cnf`, promoting terminals inside mixed
/// RHSes and binarizing RHSes of length three or more. Unit rules pass
/// through untouched here; they are the next phase's concern.
fn promote_and_binarize(source: &Grammar, cnf: &mut Grammar, probabilistic: bool) {
    let mut source_rules: Vec<&RewriteRule> = source.iter_rules().collect();
    source_rules.sort();

    for rule in source_rules {
        let prob = source.probability(rule);
        if rule.rhs.len() == 1 {
            add_rule(cnf, rule.lhs.clone(), rule.rhs.clone(), prob);
            continue;
        }
        let rhs = promote_terminals(&rule.rhs, cnf, probabilistic);
        if rhs.len() == 2 {
            add_rule(cnf, rule.lhs.clone(), rhs, prob);
        } else {
            binarize(cnf, rule.lhs.clone(), rhs, prob, probabilistic);
        }
    }
}

/// Replaces each terminal in a mixed RHS by its wrapper pseudo-symbol and
/// inserts the wrapper's lexical rule. The wrapper name is derived from the
/// terminal, so repeated occurrences reuse the same symbol.
fn promote_terminals(rhs: &[String], cnf: &mut Grammar, probabilistic: bool) -> Vec<String> {
    if rhs.iter().all(|symbol| cnf.is_non_terminal(symbol)) {
        return rhs.to_vec();
    }
    rhs.iter()
        .map(|symbol| {
            if !cnf.is_terminal(symbol) {
                return symbol.clone();
            }
            let wrapper = rules::wrapper_symbol(symbol);
            cnf.add_non_terminal(&wrapper);
            let lexical = RewriteRule::new(wrapper.clone(), vec![symbol.clone()]);
            if probabilistic {
                cnf.add_with_prob(lexical, 1.0);
            } else {
                cnf.add(lexical);
            }
            wrapper
        })
        .collect()
}

/// Repeatedly collapses the two rightmost RHS symbols into a pivot
/// pseudo-symbol until the RHS is binary, then inserts the rule itself.
fn binarize(cnf: &mut Grammar, lhs: String, mut rhs: Vec<String>, prob: Option<f64>, probabilistic: bool) {
    while rhs.len() > 2 {
        let pair = rhs.split_off(rhs.len() - 2);
        let pivot = rules::pivot_symbol(&pair[0], &pair[1]);
        cnf.add_non_terminal(&pivot);
        let pivot_rule = RewriteRule::new(pivot.clone(), pair);
        if probabilistic {
            cnf.add_with_prob(pivot_rule, 1.0);
        } else {
            cnf.add(pivot_rule);
        }
        rhs.push(pivot);
    }
    add_rule(cnf, lhs, rhs, prob);
}

/// Part-of-speech symbols: every LHS with a rule rewriting directly to a
/// single terminal. Computed from the binarized grammar, so terminal
/// wrappers count as POS symbols too.
fn pos_symbols(grammar: &Grammar) -> HashSet<String> {
    grammar
        .iter_rules()
        .filter(|rule| rule.is_unit() && grammar.is_terminal(&rule.rhs[0]))
        .map(|rule| rule.lhs.clone())
        .collect()
}

/// Eliminates unit productions `A -> B` where `B` is a non-terminal outside
/// the boundary set, replacing each by `B`'s expansions under the composite
/// LHS `A@B` with multiplied probabilities. Pending substitutions are
/// processed from an explicit worklist; a chain is abandoned once it composes
/// [`MAX_CHAIN_COMPONENTS`] symbols or revisits a symbol already on it (a
/// production cycle). Scheduled unit rules are removed from all indices only
/// after the worklist has drained, so substitution still sees them.
///
/// Returns the number of abandoned chains.
fn eliminate_unit_rules(cnf: &mut Grammar, boundary: &HashSet<String>) -> u64 {
    let mut doomed: Vec<RewriteRule> = Vec::new();
    let mut pending: VecDeque<(RewriteRule, Option<f64>)> = VecDeque::new();

    let mut non_terminals: Vec<String> = cnf.non_terminals().iter().cloned().collect();
    non_terminals.sort();
    for lhs in non_terminals {
        let mut unit_rules: Vec<RewriteRule> = cnf
            .rules_by_lhs(&lhs)
            .into_iter()
            .filter(|rule| rule.is_unit())
            .cloned()
            .collect();
        unit_rules.sort();
        for rule in unit_rules {
            let target = &rule.rhs[0];
            if boundary.contains(target) {
                continue; // unit chain is cut at the POS layer
            }
            if !cnf.is_non_terminal(target) {
                continue; // lexical rule, already CNF shaped
            }
            let prob = cnf.probability(&rule);
            doomed.push(rule.clone());
            pending.push_back((rule, prob));
        }
    }

    let mut abandoned = 0u64;
    while let Some((rule, prob)) = pending.pop_front() {
        if rules::chain_components(&rule.lhs).count() >= MAX_CHAIN_COMPONENTS {
            debug!("abandoning unit chain {}: depth bound reached", rule.lhs);
            abandoned += 1;
            continue;
        }

        let target = rule.rhs[0].clone();
        if boundary.contains(&target) {
            // substitution bottomed out at the POS layer; the unit rule stays
            add_rule(cnf, rule.lhs, rule.rhs, prob);
            continue;
        }
        if rules::chain_components(&rule.lhs).any(|component| component == target) {
            debug!("abandoning unit chain {}: cycle through {}", rule.lhs, target);
            abandoned += 1;
            continue;
        }

        let mut expansions: Vec<(RewriteRule, Option<f64>)> = cnf
            .rules_by_lhs(&target)
            .into_iter()
            .map(|expansion| (expansion.clone(), cnf.probability(expansion)))
            .collect();
        expansions.sort_by(|a, b| a.0.cmp(&b.0));

        for (expansion, expansion_prob) in expansions {
            let composite = rules::chain_symbol(&rule.lhs, &target);
            let new_prob = match (prob, expansion_prob) {
                (Some(p), Some(q)) => Some(p * q),
                _ => None,
            };
            if expansion.rhs.len() == 2 || !cnf.is_non_terminal(&expansion.rhs[0]) {
                add_rule(cnf, composite, expansion.rhs, new_prob);
            } else {
                pending.push_back((RewriteRule::new(composite, expansion.rhs), new_prob));
            }
        }
    }

    for rule in &doomed {
        cnf.remove(rule);
    }
    abandoned
}

fn add_rule(cnf: &mut Grammar, lhs: String, rhs: Vec<String>, prob: Option<f64>) {
    cnf.add_non_terminal(&lhs);
    let rule = RewriteRule::new(lhs, rhs);
    match prob {
        Some(p) => cnf.add_with_prob(rule, p),
        None => cnf.add(rule),
    };
}
