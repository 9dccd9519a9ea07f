use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    multi::many0,
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};

use crate::error::GrammarError;
use crate::structs::Node;

// --- Tree Parsing ---

/// Decodes one bracket expression, e.g. `(S (NP (DT the) (NN dog)) (VP (V ran)))`,
/// into a tree. Labels are any run of characters other than whitespace and
/// parentheses; a bare label inside a node becomes a leaf (terminal word).
pub fn parse_tree(input: &str) -> Result<Node, GrammarError> {
    match all_consuming(delimited(multispace0, node, multispace0))(input).finish() {
        Ok((_, tree)) => Ok(tree),
        Err(e) => Err(GrammarError::TreeSyntax(format!(
            "{} (near {:?})",
            e.code.description(),
            truncate(e.input)
        ))),
    }
}

fn node(input: &str) -> IResult<&str, Node> {
    map(
        delimited(
            char('('),
            tuple((preceded(multispace0, label), many0(preceded(multispace0, child)))),
            preceded(multispace0, char(')')),
        ),
        |(label, children)| Node {
            label: label.to_string(),
            children,
        },
    )(input)
}

fn child(input: &str) -> IResult<&str, Node> {
    alt((node, map(label, Node::leaf)))(input)
}

fn label(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')')(input)
}

fn truncate(s: &str) -> &str {
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .nth(24)
        .unwrap_or(s.len());
    &s[..end]
}
