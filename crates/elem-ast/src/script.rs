use crate::span::Span;

/// A parsed `<script>` body: an ordered sequence of root statement nodes.
///
/// Every node stores just enough sub-spans to classify itself (declaration
/// keyword, name, reactive label text) plus one span covering its entire
/// source range — concatenating every node's full span, in order,
/// reproduces the script byte-for-byte (the "Script round-trip" property).
#[derive(Debug, Default)]
pub struct ScriptTree {
    pub statements: Vec<ScriptNode>,
}

#[derive(Debug)]
pub enum ScriptNode {
    Comment(CommentNode),
    VarDecl(VarDeclNode),
    Function(FunctionNode),
    Class(ClassNode),
    If(IfNode),
    BasicControl(BasicControlNode),
    DoWhile(DoWhileNode),
    TryCatch(TryCatchNode),
    Label(LabelNode),
    Block(BlockNode),
}

impl ScriptNode {
    pub fn span(&self) -> Span {
        match self {
            ScriptNode::Comment(n) => n.span,
            ScriptNode::VarDecl(n) => n.span,
            ScriptNode::Function(n) => n.span,
            ScriptNode::Class(n) => n.span,
            ScriptNode::If(n) => n.span,
            ScriptNode::BasicControl(n) => n.span,
            ScriptNode::DoWhile(n) => n.span,
            ScriptNode::TryCatch(n) => n.span,
            ScriptNode::Label(n) => n.span,
            ScriptNode::Block(n) => n.span,
        }
    }

    /// Names this statement introduces into root scope, in the sense of
    /// spec §3's "Variable info": a `var`/`let`/`const` declaration's name,
    /// a named function or class, or a reactive label of the form
    /// `$: name = expr;`.
    pub fn declared_names(&self, src: &str) -> Vec<String> {
        match self {
            ScriptNode::VarDecl(n) => vec![n.name.slice(src).to_string()],
            ScriptNode::Function(n) => n
                .name
                .map(|s| vec![s.slice(src).to_string()])
                .unwrap_or_default(),
            ScriptNode::Class(n) => n
                .name
                .map(|s| vec![s.slice(src).to_string()])
                .unwrap_or_default(),
            ScriptNode::Label(n) => n
                .reactive_assignment_target(src)
                .map(|(name, _)| vec![name.slice(src).to_string()])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn is_reactive_label(&self, src: &str) -> bool {
        matches!(self, ScriptNode::Label(n) if n.is_reactive(src))
    }
}

#[derive(Debug)]
pub struct CommentNode {
    pub span: Span,
}

/// `var`/`let`/`const` name [`=` value] [`;`].
#[derive(Debug)]
pub struct VarDeclNode {
    pub span: Span,
    pub keyword: Span,
    pub name: Span,
    pub init: Option<Span>,
}

impl VarDeclNode {
    pub fn keyword_text<'a>(&self, src: &'a str) -> &'a str {
        self.keyword.slice(src).trim()
    }
}

/// Named or anonymous function declaration/expression statement.
#[derive(Debug)]
pub struct FunctionNode {
    pub span: Span,
    pub name: Option<Span>,
}

#[derive(Debug)]
pub struct ClassNode {
    pub span: Span,
    pub name: Option<Span>,
}

#[derive(Debug)]
pub struct IfNode {
    pub span: Span,
}

/// `for`/`while`/`switch`/`with`.
#[derive(Debug)]
pub struct BasicControlNode {
    pub span: Span,
    pub keyword: Span,
}

#[derive(Debug)]
pub struct DoWhileNode {
    pub span: Span,
}

#[derive(Debug)]
pub struct TryCatchNode {
    pub span: Span,
}

/// A labeled statement. The reactive label is the single character `$`.
#[derive(Debug)]
pub struct LabelNode {
    pub span: Span,
    pub label: Span,
    pub body: Span,
}

impl LabelNode {
    pub fn label_text<'a>(&self, src: &'a str) -> &'a str {
        self.label.slice(src).trim().trim_end_matches(':').trim()
    }

    pub fn is_reactive(&self, src: &str) -> bool {
        self.label_text(src) == "$"
    }

    /// If the labeled body is exactly `name = expr;` (spec §4.2's lifted
    /// reactive-declaration form), returns the name and rhs-expression spans
    /// relative to `src`.
    pub fn reactive_assignment_target(&self, src: &str) -> Option<(Span, Span)> {
        if !self.is_reactive(src) {
            return None;
        }
        parse_simple_assignment(self.body, src)
    }
}

/// Recognizes `<ident> = <expr>;` (optionally without the trailing `;`)
/// inside `span`, returning (name span, expr span). Used only to detect the
/// `$: name = expr;` reactive-declaration shorthand; any other shape
/// (compound statement, `+=`, member assignment, ...) returns `None`.
fn parse_simple_assignment(span: Span, src: &str) -> Option<(Span, Span)> {
    let text = span.slice(src);
    let trimmed_start = text.len() - text.trim_start().len();
    let start = span.start + trimmed_start;
    let ident_len = identifier_len(&text[trimmed_start..]);
    if ident_len == 0 {
        return None;
    }
    let name_span = Span::new(start, start + ident_len);

    let mut rest = &text[trimmed_start + ident_len..];
    let mut offset = start + ident_len;
    let ws = rest.len() - rest.trim_start().len();
    rest = &rest[ws..];
    offset += ws;

    let mut chars = rest.char_indices();
    if chars.next()?.1 != '=' {
        return None;
    }
    // reject `==`/`===`
    if rest.as_bytes().get(1) == Some(&b'=') {
        return None;
    }
    offset += 1;
    let mut expr = &rest[1..];
    let ws2 = expr.len() - expr.trim_start().len();
    expr = &expr[ws2..];
    offset += ws2;

    let trimmed_end = expr.trim_end().trim_end_matches(';').trim_end();
    let expr_span = Span::new(offset, offset + trimmed_end.len());
    Some((name_span, expr_span))
}

fn identifier_len(s: &str) -> usize {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let ok = if i == 0 {
            c.is_ascii_alphabetic() || c == '_' || c == '$'
        } else {
            c.is_ascii_alphanumeric() || c == '_' || c == '$'
        };
        if !ok {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}

/// Catch-all for anything not a recognized structural statement:
/// expression statements, `return`, bare blocks, etc.
#[derive(Debug)]
pub struct BlockNode {
    pub span: Span,
}
