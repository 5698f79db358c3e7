//! Recursive-descent markup parser (spec §4.3): document, element,
//! leaf-element, and text/expression node variants, with one-token
//! pushback on the lexer's token stream.

use elem_ast::{
    Attribute, Document, ElementNode, ExpressionNode, LeafElementNode, MarkupNode, NodeId, Span,
    TextNode,
};

use crate::attribute::parse_attribute;
use crate::error::{Error, ErrorKind};
use crate::lexer::{Lexer, Token};

const LEAF_TAGS: &[&str] = &["script", "style"];
const RESERVED_UNIMPLEMENTED: &[&str] = &["svg", "math"];

pub fn parse(src: &str) -> Result<Document, Error> {
    tracing::debug!(len = src.len(), "parsing markup document");
    let mut parser = Parser { lexer: Lexer::new(src), next_id: 0, src };
    let mut roots = Vec::new();

    loop {
        match parser.next() {
            Token::Eof => break,
            Token::Text { span } => roots.extend(parser.parse_text_run(span)?),
            Token::StartTag { tag_start, name } => roots.push(parser.parse_element(tag_start, name)?),
            Token::EndTag { name, .. } => {
                return Err(Error::new(
                    ErrorKind::UnexpectedEndTag,
                    name.start,
                    format!("unexpected closing tag </{}>", name.slice(src)),
                ))
            }
            Token::AttrRaw { span } => {
                return Err(Error::new(ErrorKind::UnterminatedTag, span.start, "tag token outside a tag"))
            }
            Token::TagClose { pos_after } => {
                return Err(Error::new(ErrorKind::UnterminatedTag, pos_after, "tag token outside a tag"))
            }
        }
    }

    Ok(Document { roots })
}

fn span_start(t: &Token) -> usize {
    match t {
        Token::AttrRaw { span } | Token::Text { span } => span.start,
        Token::StartTag { tag_start, .. } => *tag_start,
        Token::EndTag { name, .. } => name.start,
        Token::TagClose { pos_after } => *pos_after,
        Token::Eof => 0,
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    next_id: u32,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Token {
        self.lexer.next_token()
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn parse_element(&mut self, tag_start: usize, name: Span) -> Result<MarkupNode, Error> {
        let tag = name.slice(self.src).to_string();

        if RESERVED_UNIMPLEMENTED.contains(&tag.as_str()) {
            return Err(Error::new(
                ErrorKind::NotImplemented,
                tag_start,
                format!("`<{tag}>` subtrees are not implemented"),
            ));
        }

        let attributes = self.parse_attributes()?;

        if LEAF_TAGS.contains(&tag.as_str()) {
            self.parse_leaf_element(tag_start, tag, attributes)
        } else {
            self.parse_regular_element(tag_start, tag, attributes)
        }
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>, Error> {
        let mut attrs = Vec::new();
        loop {
            match self.next() {
                Token::TagClose { .. } => break,
                Token::AttrRaw { span } => attrs.push(parse_attribute(span.slice(self.src), span.start)?),
                Token::Eof => {
                    return Err(Error::new(ErrorKind::UnterminatedTag, self.src.len(), "unterminated start tag"))
                }
                other => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedTag,
                        span_start(&other),
                        "malformed start tag",
                    ))
                }
            }
        }
        Ok(attrs)
    }

    fn parse_leaf_element(
        &mut self,
        tag_start: usize,
        tag: String,
        attributes: Vec<Attribute>,
    ) -> Result<MarkupNode, Error> {
        let id = self.alloc_id();
        let next = self.next();
        let (content_span, end_tag) = match next {
            Token::Text { span } => (span, self.next()),
            other => (Span::empty_at(span_start(&other)), other),
        };

        let pos_after = match end_tag {
            Token::EndTag { name, pos_after } if name.slice(self.src) == tag => pos_after,
            Token::EndTag { name, .. } => {
                return Err(Error::new(
                    ErrorKind::MismatchedEndTag,
                    name.start,
                    format!("expected </{}>, found </{}>", tag, name.slice(self.src)),
                ))
            }
            Token::Eof => {
                return Err(Error::new(
                    ErrorKind::UnterminatedTag,
                    self.src.len(),
                    format!("unterminated <{tag}> element"),
                ))
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::UnterminatedTag,
                    content_span.start,
                    format!("expected </{tag}> after its content"),
                ))
            }
        };

        Ok(MarkupNode::LeafElement(LeafElementNode {
            id,
            span: Span::new(tag_start, pos_after),
            tag,
            attributes,
            content: content_span.slice(self.src).to_string(),
            content_span,
        }))
    }

    fn parse_regular_element(
        &mut self,
        tag_start: usize,
        tag: String,
        attributes: Vec<Attribute>,
    ) -> Result<MarkupNode, Error> {
        let id = self.alloc_id();
        let mut children = Vec::new();
        let end = loop {
            match self.next() {
                Token::EndTag { name, pos_after } if name.slice(self.src) == tag => break pos_after,
                Token::EndTag { name, pos_after } => {
                    // Not our end tag: could close an ancestor in malformed
                    // input. Treat as ours closing early rather than loop
                    // forever — push it back is unsafe here since callers
                    // expect a definitive end; surface as a mismatch.
                    let _ = pos_after;
                    return Err(Error::new(
                        ErrorKind::MismatchedEndTag,
                        name.start,
                        format!("expected </{}>, found </{}>", tag, name.slice(self.src)),
                    ));
                }
                Token::Eof => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedTag,
                        self.src.len(),
                        format!("unterminated <{tag}> element"),
                    ))
                }
                Token::Text { span } => {
                    children.extend(self.parse_text_run(span)?);
                    continue;
                }
                Token::StartTag { tag_start: child_start, name } => {
                    children.push(self.parse_element(child_start, name)?);
                    continue;
                }
                other => {
                    return Err(Error::new(ErrorKind::UnterminatedTag, span_start(&other), "malformed element body"))
                }
            }
        };

        Ok(MarkupNode::Element(ElementNode {
            id,
            span: Span::new(tag_start, end),
            tag,
            attributes,
            children,
        }))
    }

    /// Splits a text token at every unescaped `{`, alternating Text and
    /// Expression nodes, per §4.3.
    fn parse_text_run(&mut self, span: Span) -> Result<Vec<MarkupNode>, Error> {
        let text = span.slice(self.src);
        let bytes = text.as_bytes();
        let mut nodes = Vec::new();
        let mut offset = 0usize;

        loop {
            match elem_scan::index_of_unescaped(&bytes[offset..], b'{') {
                None => {
                    if offset < bytes.len() {
                        nodes.push(self.make_text(span.start + offset, span.start + bytes.len()));
                    }
                    break;
                }
                Some(rel) => {
                    let brace = offset + rel;
                    if brace > offset {
                        nodes.push(self.make_text(span.start + offset, span.start + brace));
                    }
                    let len = elem_scan::index_after_curly_group(&bytes[brace..]).ok_or_else(|| {
                        Error::new(
                            ErrorKind::UnterminatedExpression,
                            span.start + brace,
                            "unterminated expression in markup",
                        )
                    })?;
                    nodes.push(self.make_expression(span.start + brace, span.start + brace + len));
                    offset = brace + len;
                    if offset >= bytes.len() {
                        break;
                    }
                }
            }
        }

        Ok(nodes)
    }

    fn make_text(&mut self, start: usize, end: usize) -> MarkupNode {
        let id = self.alloc_id();
        let span = Span::new(start, end);
        MarkupNode::Text(TextNode { id, span, content: span.slice(self.src).to_string() })
    }

    fn make_expression(&mut self, start: usize, end: usize) -> MarkupNode {
        let id = self.alloc_id();
        let expr_span = Span::new(start + 1, end - 1);
        MarkupNode::Expression(ExpressionNode { id, span: Span::new(start, end), expr_span })
    }
}
