//! The embedded `<script>` pipeline (spec §4.2): a coarse, byte-preserving
//! tokenizer/parser, and the rewriter framework the code generator uses to
//! turn root-scope reads/writes into context-array lookups and
//! `$$invalidate` calls.

pub mod error;
mod lexer;
pub mod parser;
pub mod reactive;
pub mod rewrite;

pub use error::{Error, ErrorKind};
pub use reactive::{lift, LiftedScript, ReactiveStatement};
pub use rewrite::{rewrite_assignments, rewrite_variable_names, AssignmentHit, NameHit};

/// Parses a `<script>` body into its statement tree.
pub fn parse(src: &str) -> Result<elem_ast::ScriptTree, Error> {
    tracing::debug!(len = src.len(), "parsing script body");
    parser::parse(src)
}
