use std::collections::{HashMap, HashSet};

use crate::rules::RewriteRule;

// --- Grammar Model ---

/// Handle to a rule owned by a [`Grammar`]. Ids are stable for the lifetime
/// of the grammar and are never reused after a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(u32);

#[derive(Debug, Clone)]
struct RuleEntry {
    rule: RewriteRule,
    probability: Option<f64>,
    occurrences: u64,
}

/// A context-free grammar: terminal and non-terminal symbol sets, an optional
/// start symbol, and a rule collection reachable through three indices (by
/// full rule, by LHS, by RHS). The grammar owns every rule entry; the indices
/// store rule ids only, and all mutation goes through [`Grammar::add`] /
/// [`Grammar::remove`] so the indices can never disagree.
///
/// Probabilities and occurrence counts are attached to the owned entries, not
/// to the rule keys, so structural rule equality is unaffected by them.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    terminals: HashSet<String>,
    non_terminals: HashSet<String>,
    start_symbol: Option<String>,
    entries: HashMap<RuleId, RuleEntry>,
    ids: HashMap<RewriteRule, RuleId>,
    by_lhs: HashMap<String, HashSet<RuleId>>,
    by_rhs: HashMap<Vec<String>, HashSet<RuleId>>,
    next_id: u32,
}

impl Grammar {
    pub fn new() -> Grammar {
        Grammar::default()
    }

    // --- Symbol sets ---

    pub fn add_terminal(&mut self, symbol: &str) {
        self.terminals.insert(symbol.to_string());
    }

    pub fn add_non_terminal(&mut self, symbol: &str) {
        self.non_terminals.insert(symbol.to_string());
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    pub fn terminals(&self) -> &HashSet<String> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &HashSet<String> {
        &self.non_terminals
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.start_symbol.as_deref()
    }

    pub fn set_start_symbol(&mut self, symbol: &str) {
        self.start_symbol = Some(symbol.to_string());
    }

    // --- Rule collection ---

    /// Inserts a rule into all three indices. Adding a structurally identical
    /// rule twice is a no-op returning the existing id.
    pub fn add(&mut self, rule: RewriteRule) -> RuleId {
        self.insert(rule, None)
    }

    /// Inserts a rule with an attached probability. If the rule is already
    /// present its original probability is kept.
    pub fn add_with_prob(&mut self, rule: RewriteRule, probability: f64) -> RuleId {
        self.insert(rule, Some(probability))
    }

    fn insert(&mut self, rule: RewriteRule, probability: Option<f64>) -> RuleId {
        if let Some(&id) = self.ids.get(&rule) {
            return id;
        }
        let id = RuleId(self.next_id);
        self.next_id += 1;
        self.ids.insert(rule.clone(), id);
        self.by_lhs.entry(rule.lhs.clone()).or_default().insert(id);
        self.by_rhs.entry(rule.rhs.clone()).or_default().insert(id);
        self.entries.insert(
            id,
            RuleEntry {
                rule,
                probability,
                occurrences: 0,
            },
        );
        id
    }

    /// Removes a rule from all three indices. Removing an absent rule is a
    /// no-op, which keeps normalization cleanup code simple.
    pub fn remove(&mut self, rule: &RewriteRule) {
        let Some(id) = self.ids.remove(rule) else {
            return;
        };
        self.entries.remove(&id);
        if let Some(bucket) = self.by_lhs.get_mut(&rule.lhs) {
            bucket.remove(&id);
            if bucket.is_empty() {
                self.by_lhs.remove(&rule.lhs);
            }
        }
        if let Some(bucket) = self.by_rhs.get_mut(rule.rhs.as_slice()) {
            bucket.remove(&id);
            if bucket.is_empty() {
                self.by_rhs.remove(rule.rhs.as_slice());
            }
        }
    }

    pub fn contains(&self, rule: &RewriteRule) -> bool {
        self.ids.contains_key(rule)
    }

    pub fn num_rules(&self) -> usize {
        self.entries.len()
    }

    pub fn iter_rules(&self) -> impl Iterator<Item = &RewriteRule> {
        self.entries.values().map(|entry| &entry.rule)
    }

    /// All rules expanding the given symbol, in unspecified order.
    pub fn rules_by_lhs(&self, symbol: &str) -> Vec<&RewriteRule> {
        self.bucket(self.by_lhs.get(symbol))
    }

    /// Reverse lookup: all rules with exactly this RHS sequence.
    pub fn rules_by_rhs(&self, rhs: &[String]) -> Vec<&RewriteRule> {
        self.bucket(self.by_rhs.get(rhs))
    }

    fn bucket(&self, ids: Option<&HashSet<RuleId>>) -> Vec<&RewriteRule> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| &entry.rule)
            .collect()
    }

    // --- Probabilities and occurrence counts ---

    pub fn probability(&self, rule: &RewriteRule) -> Option<f64> {
        let id = self.ids.get(rule)?;
        self.entries.get(id)?.probability
    }

    pub fn occurrences(&self, rule: &RewriteRule) -> u64 {
        self.ids
            .get(rule)
            .and_then(|id| self.entries.get(id))
            .map(|entry| entry.occurrences)
            .unwrap_or(0)
    }

    /// Counts one occurrence of an extracted rule.
    pub fn note_occurrence(&mut self, id: RuleId) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.occurrences += 1;
        }
    }

    /// Turns occurrence counts into relative-frequency probabilities: for
    /// every LHS, each rule gets its share of the total occurrences under
    /// that LHS. Requires all counting to be finished, so it runs once after
    /// the whole corpus has been consumed.
    pub fn compute_probabilities(&mut self) {
        let buckets: Vec<Vec<RuleId>> = self
            .by_lhs
            .values()
            .map(|ids| ids.iter().copied().collect())
            .collect();
        for bucket in buckets {
            let total: u64 = bucket
                .iter()
                .filter_map(|id| self.entries.get(id))
                .map(|entry| entry.occurrences)
                .sum();
            if total == 0 {
                continue;
            }
            for id in bucket {
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.probability = Some(entry.occurrences as f64 / total as f64);
                }
            }
        }
    }

    // --- Invariant checking ---

    /// Verifies that the three indices agree on every rule. Index drift is a
    /// programming error, so this panics; it is meant for tests.
    pub fn check_consistency(&self) {
        assert_eq!(self.ids.len(), self.entries.len());
        for (rule, id) in &self.ids {
            let entry = self
                .entries
                .get(id)
                .unwrap_or_else(|| panic!("rule {} has no entry", rule));
            assert_eq!(&entry.rule, rule, "entry for {} stores a different rule", rule);
            assert!(
                self.by_lhs.get(&rule.lhs).is_some_and(|b| b.contains(id)),
                "rule {} missing from its LHS bucket",
                rule
            );
            assert!(
                self.by_rhs.get(rule.rhs.as_slice()).is_some_and(|b| b.contains(id)),
                "rule {} missing from its RHS bucket",
                rule
            );
        }
        for (lhs, bucket) in &self.by_lhs {
            for id in bucket {
                let entry = self
                    .entries
                    .get(id)
                    .unwrap_or_else(|| panic!("LHS bucket {} holds a dangling id", lhs));
                assert_eq!(&entry.rule.lhs, lhs);
            }
        }
        for (rhs, bucket) in &self.by_rhs {
            for id in bucket {
                let entry = self
                    .entries
                    .get(id)
                    .unwrap_or_else(|| panic!("RHS bucket {:?} holds a dangling id", rhs));
                assert_eq!(&entry.rule.rhs, rhs);
            }
        }
    }
}
