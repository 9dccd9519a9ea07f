use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use log::info;

use crate::grammar::Grammar;
use crate::rules::RewriteRule;

// --- Output Writing ---

/// Writes a grammar the way the downstream tooling expects it: non-lexical
/// rules as `LHS -> RHS [p]` into `PREFIX.rules`, lexical rules as
/// `LHS word [p]` into `PREFIX.lexicon`, and the unique terminals into
/// `PREFIX.words`. A rule is lexical when its RHS is a single terminal.
/// Without a prefix, everything goes to standard output in rule form.
/// The probability column is omitted for plain grammars.
pub fn write_grammar(grammar: &Grammar, output_prefix: Option<&str>) -> io::Result<()> {
    let mut rules: Vec<&RewriteRule> = grammar.iter_rules().collect();
    rules.sort();

    let Some(prefix) = output_prefix else {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        for rule in rules {
            writeln!(writer, "{}", rule_line(grammar, rule, " -> "))?;
        }
        return writer.flush();
    };

    let rules_filename = format!("{}.rules", prefix);
    let lexicon_filename = format!("{}.lexicon", prefix);
    let words_filename = format!("{}.words", prefix);

    let mut rules_writer = BufWriter::new(File::create(&rules_filename)?);
    let mut lexicon_writer = BufWriter::new(File::create(&lexicon_filename)?);
    let mut words_writer = BufWriter::new(File::create(&words_filename)?);

    let mut written_words: HashSet<&str> = HashSet::new();
    for rule in rules {
        if rule.rhs.len() == 1 && grammar.is_terminal(&rule.rhs[0]) {
            writeln!(lexicon_writer, "{}", rule_line(grammar, rule, " "))?;
            let word = rule.rhs[0].as_str();
            if written_words.insert(word) {
                writeln!(words_writer, "{}", word)?;
            }
        } else {
            writeln!(rules_writer, "{}", rule_line(grammar, rule, " -> "))?;
        }
    }

    rules_writer.flush()?;
    lexicon_writer.flush()?;
    words_writer.flush()?;

    info!(
        "wrote {}, {}, {}",
        rules_filename, lexicon_filename, words_filename
    );
    Ok(())
}

fn rule_line(grammar: &Grammar, rule: &RewriteRule, separator: &str) -> String {
    let body = format!("{}{}{}", rule.lhs, separator, rule.rhs.join(" "));
    match grammar.probability(rule) {
        Some(p) => format!("{} {}", body, p),
        None => body,
    }
}
