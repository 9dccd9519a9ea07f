use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    /// The extracted grammar has no start symbol, i.e. the corpus was empty.
    #[error("grammar has no start symbol (empty treebank?)")]
    EmptyGrammar,

    #[error("malformed bracket expression: {0}")]
    TreeSyntax(String),
}
