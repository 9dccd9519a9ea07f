use clap::Parser;
use std::path::PathBuf;

// --- Data Structures ---

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(label: impl Into<String>) -> Node {
        Node {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

// --- CLI ---

#[derive(Parser, Debug)]
#[command(name = "pcfg_tool", about = "Induce CFG/PCFG grammars from bracketed treebanks and normalize them to CNF variants", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    Induce(InduceArgs),
}

#[derive(Parser, Debug)]
pub struct InduceArgs {
    /// Treebank file, one bracketed tree per line.
    #[arg()]
    pub treebank: PathBuf,

    /// Prefix for .rules/.lexicon/.words output files; stdout when absent.
    #[arg()]
    pub grammar_output_prefix: Option<String>,

    /// Extract a plain CFG without probabilities.
    #[arg(long)]
    pub plain: bool,

    /// Normalize the extracted grammar before writing it out.
    #[arg(long, value_enum)]
    pub normal_form: Option<NormalFormArg>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum NormalFormArg {
    /// Full CNF, all unit productions eliminated.
    Cnf,
    /// Binarization and terminal promotion only, unit productions kept.
    LooseCnf,
    /// CNF with unit elimination stopping at the part-of-speech layer.
    PosCnf,
}
