//! PCFG induction from bracketed treebanks and normalization into Chomsky
//! Normal Form variants for CYK-style parsers.

pub mod error;
pub mod extract;
pub mod grammar;
pub mod output;
pub mod parser;
pub mod rules;
pub mod structs;
pub mod transformations;
