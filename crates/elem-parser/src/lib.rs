//! The markup pipeline (spec §4.3/§4.3a): a coarse HTML-with-expressions
//! tokenizer, attribute-value parsing, and the recursive-descent tree
//! builder that turns a document into an [`elem_ast::Document`].

pub mod attribute;
pub mod error;
mod lexer;
pub mod parser;

pub use error::{Error, ErrorKind};

/// Parses a whole `.elem` source file's markup into a [`elem_ast::Document`].
///
/// This stage is deliberately permissive about where `<script>`/`<style>`
/// appear and how many there are; those invariants belong to the assembler.
pub fn parse(src: &str) -> Result<elem_ast::Document, Error> {
    tracing::debug!(len = src.len(), "parsing markup document");
    parser::parse(src)
}
