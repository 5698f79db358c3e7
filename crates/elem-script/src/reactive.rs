//! Reactive lifting (spec §4.2, GLOSSARY "Reactive statement"): partitions
//! a script's root statements into ordinary statements and `$:`-labeled
//! ones, every one of which is lifted into the update phase and re-run
//! when any variable it reads is dirty — not just the `$: name = expr;`
//! declaration shape. The actual byte rewriting (assignment-rewrite,
//! `$$invalidate` wrapping, dirty-mask gating) is the generator's job —
//! this module only does the grouping and read-set spans every caller
//! needs first.

use elem_ast::{ScriptNode, ScriptTree, Span};

/// One `$: ...;` reactive statement, pulled out of the script.
pub struct ReactiveStatement {
    /// The declared name, for the `$: name = expr;` shape only — this is
    /// what gets a plain `let name;` pre-declaration emitted ahead of the
    /// update callback (spec §4.2). Other reactive shapes (`$: if (...)`,
    /// `$: console.log(...)`) don't introduce a name and leave this `None`.
    pub name: Option<String>,
    /// The whole `$: ...;` statement's span, for reference.
    pub span: Span,
    /// The labeled body's span (sans label), ready for assignment- and
    /// context-rewriting and re-emission inside the gated update block.
    pub body: Span,
    /// The span whose variable reads determine this statement's dirty
    /// mask: the right-hand side for the assignment shape (spec §8
    /// scenario 4 excludes the assigned name itself from its own mask),
    /// the whole body for every other shape.
    pub read_set: Span,
}

pub struct LiftedScript {
    /// Reactive statements, in declaration order.
    pub reactive: Vec<ReactiveStatement>,
    /// Spans of every other root statement, in original order.
    pub non_reactive: Vec<Span>,
}

/// Partitions `tree`'s statements. Every `$:`-labeled statement is lifted
/// into `reactive` regardless of shape; only the `$: name = expr;` shape
/// populates `ReactiveStatement::name`.
pub fn lift(tree: &ScriptTree, src: &str) -> LiftedScript {
    let mut reactive = Vec::new();
    let mut non_reactive = Vec::new();

    for node in &tree.statements {
        if let ScriptNode::Label(label) = node {
            if label.is_reactive(src) {
                let (name, read_set) = match label.reactive_assignment_target(src) {
                    Some((name_span, expr_span)) => (Some(name_span.slice(src).to_string()), expr_span),
                    None => (None, label.body),
                };
                reactive.push(ReactiveStatement { name, span: label.span, body: label.body, read_set });
                continue;
            }
        }
        non_reactive.push(node.span());
    }

    LiftedScript { reactive, non_reactive }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_reactive_from_plain_statements() {
        let src = "let n = 1;\n$: doubled = n * 2;\n";
        let tree = crate::parser::parse(src).unwrap();
        let lifted = lift(&tree, src);
        assert_eq!(lifted.reactive.len(), 1);
        assert_eq!(lifted.reactive[0].name.as_deref(), Some("doubled"));
        assert_eq!(lifted.non_reactive.len(), 1);
    }

    #[test]
    fn non_assignment_reactive_label_is_still_lifted() {
        let src = "$: console.log(n);\n";
        let tree = crate::parser::parse(src).unwrap();
        let lifted = lift(&tree, src);
        assert_eq!(lifted.reactive.len(), 1);
        assert_eq!(lifted.reactive[0].name, None);
        assert!(lifted.non_reactive.is_empty());
    }

    #[test]
    fn non_reactive_label_stays_plain() {
        let src = "outer: for (;;) { break outer; }\n";
        let tree = crate::parser::parse(src).unwrap();
        let lifted = lift(&tree, src);
        assert!(lifted.reactive.is_empty());
        assert_eq!(lifted.non_reactive.len(), 1);
    }
}
