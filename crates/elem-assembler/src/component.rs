use elem_ast::{MarkupNode, NamedVar, ScriptTree};

/// A root `<script>` body, kept alongside the source it was parsed from
/// since every node in `tree` stores spans relative to it.
#[derive(Debug)]
pub struct ParsedScript {
    pub src: String,
    pub tree: ScriptTree,
}

/// The assembler's output (spec §4.4): a component name, its parsed script
/// (absent if there was no root `<script>`), verbatim style blocks, the
/// fragment's named markup variables, and the fragment roots themselves.
///
/// `markup_src` is the full document source the fragment's spans are
/// relative to (markup `{expr}` nodes and attribute values store spans, not
/// owned text, so the generator needs the original bytes to slice them).
#[derive(Debug)]
pub struct Component {
    pub name: String,
    pub markup_src: String,
    pub script: Option<ParsedScript>,
    pub styles: Vec<String>,
    pub vars: Vec<NamedVar>,
    pub fragment: Vec<MarkupNode>,
}

impl Component {
    /// The fragment's nodes in the same depth-first, pre-order sequence
    /// used to build `vars` — `vars[i]` names `fragment_nodes()[i]`.
    pub fn fragment_nodes(&self) -> Vec<&MarkupNode> {
        let mut out = Vec::new();
        flatten(&self.fragment, &mut out);
        out
    }
}

fn flatten<'a>(nodes: &'a [MarkupNode], out: &mut Vec<&'a MarkupNode>) {
    for node in nodes {
        out.push(node);
        flatten(node.children(), out);
    }
}
