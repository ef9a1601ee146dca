//! Twig template parser.
//!
//! Covers the subset of the language found in Symfony bundle views: text,
//! print tags, block tags, comments, whitespace control and the full
//! expression grammar. Templates are turned into [`SyntaxNode`] trees
//! rooted at a `Module` node.
//!
//! [`SyntaxNode`]: crate::core::data::SyntaxNode

mod lexer;
mod parser;

pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse_template;
