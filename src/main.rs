use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::Context;
use clap::Parser;
use log::warn;

use pcfg::extract::{extract, ExtractMode};
use pcfg::output::write_grammar;
use pcfg::parser::parse_tree;
use pcfg::structs::{Cli, Commands, InduceArgs, NormalFormArg, Node};
use pcfg::transformations::{normalize, NormalForm};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Induce(args) => induce(args),
    }
}

fn induce(args: InduceArgs) -> anyhow::Result<()> {
    let file = File::open(&args.treebank)
        .with_context(|| format!("cannot open treebank {}", args.treebank.display()))?;
    let reader = BufReader::new(file);

    let mut trees: Vec<Node> = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read error at line {}", line_num + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        // A bad tree never aborts the run; it is dropped from the corpus.
        match parse_tree(&line) {
            Ok(tree) => trees.push(tree),
            Err(e) => warn!("skipping treebank line {}: {}", line_num + 1, e),
        }
    }

    let mode = if args.plain {
        ExtractMode::Plain
    } else {
        ExtractMode::Probabilistic
    };
    let mut grammar = extract(&trees, mode);

    if let Some(form) = args.normal_form {
        let form = match form {
            NormalFormArg::Cnf => NormalForm::FullCnf,
            NormalFormArg::LooseCnf => NormalForm::LooseBinary,
            NormalFormArg::PosCnf => NormalForm::PosBoundedCnf,
        };
        let normalized = normalize(&grammar, form).context("normalization failed")?;
        if normalized.abandoned_chains > 0 {
            warn!(
                "{} unit chain(s) abandoned during normalization",
                normalized.abandoned_chains
            );
        }
        grammar = normalized.grammar;
    }

    write_grammar(&grammar, args.grammar_output_prefix.as_deref())
        .context("cannot write grammar files")?;
    Ok(())
}
