use crate::span::Span;

/// Identifies a single markup node for the lifetime of the document that
/// produced it. Dense and assigned in parse order; used as a key for side
/// tables (the assembler's naming pass, the codegen's variable buckets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// The outer document: an ordered sequence of root nodes (at most one
/// `<script>`, any number of `<style>`, and any tree of markup).
#[derive(Debug, Default)]
pub struct Document {
    pub roots: Vec<MarkupNode>,
}

/// One node in the markup tree (see spec §3).
#[derive(Debug)]
pub enum MarkupNode {
    Element(ElementNode),
    LeafElement(LeafElementNode),
    Text(TextNode),
    Expression(ExpressionNode),
}

impl MarkupNode {
    pub fn id(&self) -> NodeId {
        match self {
            MarkupNode::Element(n) => n.id,
            MarkupNode::LeafElement(n) => n.id,
            MarkupNode::Text(n) => n.id,
            MarkupNode::Expression(n) => n.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            MarkupNode::Element(n) => n.span,
            MarkupNode::LeafElement(n) => n.span,
            MarkupNode::Text(n) => n.span,
            MarkupNode::Expression(n) => n.span,
        }
    }

    /// The variable-name prefix this node contributes (an element's tag
    /// name, or `t` for text/expression nodes) — see spec §4.4 Pass 1/2.
    pub fn name_prefix(&self) -> &str {
        match self {
            MarkupNode::Element(n) => &n.tag,
            MarkupNode::LeafElement(n) => &n.tag,
            MarkupNode::Text(_) | MarkupNode::Expression(_) => "t",
        }
    }

    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Element(n) => &n.children,
            _ => &[],
        }
    }
}

/// An element whose children are host markup (anything not `script`/`style`).
#[derive(Debug)]
pub struct ElementNode {
    pub id: NodeId,
    pub span: Span,
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<MarkupNode>,
}

/// An element whose body is not host markup: `script`, `style`, and
/// reserved-but-unimplemented `svg`/`math` placeholders.
#[derive(Debug)]
pub struct LeafElementNode {
    pub id: NodeId,
    pub span: Span,
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub content: String,
    pub content_span: Span,
}

/// Literal text with no embedded braces.
#[derive(Debug)]
pub struct TextNode {
    pub id: NodeId,
    pub span: Span,
    pub content: String,
}

impl TextNode {
    pub fn is_whitespace_only(&self) -> bool {
        !self.content.is_empty() && self.content.chars().all(char::is_whitespace)
    }
}

/// A single brace-delimited script expression (braces stripped).
#[derive(Debug)]
pub struct ExpressionNode {
    pub id: NodeId,
    pub span: Span,
    pub expr_span: Span,
}

/// An attribute on an element, optionally suffixed by a `name:dir` directive.
#[derive(Debug)]
pub struct Attribute {
    pub span: Span,
    pub name: String,
    pub directive: Option<String>,
    pub value: AttributeValue,
}

impl Attribute {
    /// `on:click` is the inline-event directive form.
    pub fn is_on_directive(&self) -> bool {
        self.name == "on" && self.directive.is_some()
    }
}

#[derive(Debug)]
pub enum AttributeValue {
    /// Literal string value; may be empty or absent.
    Static(String),
    /// The whole value is a single `{…}`.
    Expression(ExprSrc),
    /// Alternating literal segments and expressions, starting and ending
    /// with a literal segment (possibly empty).
    Template { literals: Vec<String>, exprs: Vec<ExprSrc> },
}

/// The source text of an embedded script expression, already stripped of
/// its surrounding braces.
#[derive(Debug, Clone)]
pub struct ExprSrc(pub String);

impl ExprSrc {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
