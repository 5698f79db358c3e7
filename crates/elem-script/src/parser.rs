//! Recursive-descent structural statement parser (spec §4.2).
//!
//! Only root-level statement *shapes* are modeled as tree nodes (spec §3's
//! ~10 script node kinds); the bodies of compound statements (`if`'s
//! consequent, a `function`'s block, ...) are opaque byte ranges — nothing
//! in this compiler walks inside them except the rewriters, which operate
//! on raw bytes directly.

use elem_ast::{
    BasicControlNode, BlockNode, ClassNode, CommentNode, DoWhileNode, FunctionNode, IfNode,
    LabelNode, ScriptNode, ScriptTree, Span, TryCatchNode, VarDeclNode,
};

use crate::error::{Error, ErrorKind};
use crate::lexer::{
    identifier_len, keyword_at, read_ident, scan_body, scan_curly_group, scan_paren_group,
    scan_to_statement_end, skip_ws, skip_ws_and_comments, trim_trailing_ws, STRUCTURAL_KEYWORDS,
};

/// Parses an embedded `<script>` body into a flat sequence of root
/// statement nodes. Concatenating every node's [`Span`] in order
/// reproduces `src` byte-for-byte.
pub fn parse(src: &str) -> Result<ScriptTree, Error> {
    let data = src.as_bytes();
    let mut statements = Vec::new();
    let mut pos = 0usize;

    while pos < data.len() {
        let chunk_start = pos;
        let ws_end = skip_ws(data, pos);
        if ws_end >= data.len() {
            statements.push(ScriptNode::Block(BlockNode {
                span: Span::new(chunk_start, data.len()),
            }));
            break;
        }
        if is_line_comment(data, ws_end) || is_block_comment(data, ws_end) {
            let comment_end = skip_one_comment(data, ws_end);
            statements.push(ScriptNode::Comment(CommentNode {
                span: Span::new(chunk_start, comment_end),
            }));
            pos = comment_end;
            continue;
        }

        let (node, end) = parse_statement(data, ws_end, chunk_start)?;
        statements.push(node);
        pos = end;
    }

    Ok(ScriptTree { statements })
}

fn is_line_comment(data: &[u8], pos: usize) -> bool {
    data.get(pos) == Some(&b'/') && data.get(pos + 1) == Some(&b'/')
}

fn is_block_comment(data: &[u8], pos: usize) -> bool {
    data.get(pos) == Some(&b'/') && data.get(pos + 1) == Some(&b'*')
}

fn skip_one_comment(data: &[u8], pos: usize) -> usize {
    use elem_scan::{CommentSkipper, Skipper};
    let mut c = if is_line_comment(data, pos) {
        CommentSkipper::line()
    } else {
        CommentSkipper::block()
    };
    let mut i = pos + 2;
    while i < data.len() && c.is_open() {
        c.feed(data[i]);
        i += 1;
    }
    i
}

/// Dispatches on the keyword at `pos` (which must be the first non-ws,
/// non-comment byte of a statement) and parses the whole statement,
/// returning its node and the index one past its end. `span_start` is the
/// byte the node's own span should begin at (`pos` at the root level
/// absorbs no extra leading whitespace since none remains uncaptured by
/// that point; nested callers pass `pos` itself).
fn parse_statement(data: &[u8], pos: usize, span_start: usize) -> Result<(ScriptNode, usize), Error> {
    if let Some((_, ident_end)) = read_ident(data, pos) {
        let word = std::str::from_utf8(&data[pos..ident_end]).unwrap();
        if STRUCTURAL_KEYWORDS.contains(word) {
            return match word {
                "var" | "let" | "const" => parse_var_decl(data, pos, ident_end, span_start),
                "function" => parse_function(data, pos, ident_end, span_start),
                "class" => parse_class(data, pos, ident_end, span_start),
                "if" => parse_if(data, pos, ident_end, span_start),
                "for" | "while" | "switch" | "with" => {
                    parse_basic_control(data, pos, ident_end, span_start)
                }
                "do" => parse_do_while(data, pos, ident_end, span_start),
                "try" => parse_try_catch(data, pos, ident_end, span_start),
                other => unreachable!("unhandled structural keyword {other}"),
            };
        }

        // Not a structural keyword — check for a label: `ident` (past ws) `:`.
        let after_ident = skip_ws_and_comments(data, ident_end);
        if data.get(after_ident) == Some(&b':') {
            return parse_label(data, pos, ident_end, after_ident, span_start);
        }
    }

    let end = scan_to_statement_end(data, pos);
    Ok((
        ScriptNode::Block(BlockNode {
            span: Span::new(span_start, end),
        }),
        end,
    ))
}

/// Like [`parse_statement`] but only the end offset is needed (used for
/// label bodies and if/else consequents, whose internal shape isn't
/// separately modeled).
fn statement_end(data: &[u8], pos: usize) -> Result<usize, Error> {
    let pos = skip_ws_and_comments(data, pos);
    let (_, end) = parse_statement(data, pos, pos)?;
    Ok(end)
}

fn parse_var_decl(
    data: &[u8],
    span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let keyword = Span::new(span_start, kw_end);
    let name_pos = skip_ws_and_comments(data, kw_end);
    let name_len = identifier_len(&data[name_pos..]);
    if name_len == 0 {
        return Err(Error::new(
            ErrorKind::MissingDeclarationName,
            name_pos,
            "expected a variable name after declaration keyword",
        ));
    }
    let name = Span::new(name_pos, name_pos + name_len);

    let after_name = skip_ws_and_comments(data, name_pos + name_len);
    if data.get(after_name) == Some(&b',') {
        return Err(Error::new(
            ErrorKind::MultiNameDeclaration,
            after_name,
            "multi-name declarations (`let a, b;`) are not supported",
        ));
    }

    let (init, end) = if data.get(after_name) == Some(&b'=') && data.get(after_name + 1) != Some(&b'=')
    {
        let init_start = skip_ws_and_comments(data, after_name + 1);
        let stmt_end = scan_to_statement_end(data, init_start);
        let has_semi = stmt_end > init_start && data[stmt_end - 1] == b';';
        let init_end = trim_trailing_ws(data, if has_semi { stmt_end - 1 } else { stmt_end });
        (Some(Span::new(init_start, init_end)), stmt_end)
    } else if data.get(after_name) == Some(&b';') {
        (None, after_name + 1)
    } else {
        (None, after_name)
    };

    Ok((
        ScriptNode::VarDecl(VarDeclNode {
            span: Span::new(node_span_start, end),
            keyword,
            name,
            init,
        }),
        end,
    ))
}

fn parse_function(
    data: &[u8],
    span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let mut pos = skip_ws_and_comments(data, kw_end);
    let name = read_ident(data, pos).map(|(s, e)| {
        let sp = Span::new(s, e);
        pos = e;
        sp
    });
    pos = skip_ws_and_comments(data, pos);
    if data.get(pos) != Some(&b'(') {
        return Err(Error::new(
            ErrorKind::MissingFunctionParams,
            pos,
            "expected `(` to start a function's parameter list",
        ));
    }
    let after_params = scan_paren_group(data, pos).ok_or_else(|| {
        Error::new(ErrorKind::UnterminatedGroup, pos, "unterminated parameter list")
    })?;
    let body_start = skip_ws_and_comments(data, after_params);
    if data.get(body_start) != Some(&b'{') {
        return Err(Error::new(
            ErrorKind::MissingFunctionBody,
            body_start,
            "expected `{` to start a function body",
        ));
    }
    let end = scan_curly_group(data, body_start)
        .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, body_start, "unterminated function body"))?;
    let _ = span_start;
    Ok((
        ScriptNode::Function(FunctionNode {
            span: Span::new(node_span_start, end),
            name,
        }),
        end,
    ))
}

fn parse_class(
    data: &[u8],
    _span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let mut pos = skip_ws_and_comments(data, kw_end);
    let name = read_ident(data, pos).map(|(s, e)| {
        let sp = Span::new(s, e);
        pos = e;
        sp
    });
    let body_start = scan_to_open_brace(data, pos);
    let end = scan_curly_group(data, body_start)
        .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, body_start, "unterminated class body"))?;
    Ok((
        ScriptNode::Class(ClassNode {
            span: Span::new(node_span_start, end),
            name,
        }),
        end,
    ))
}

/// Scans forward to the first top-level `{`, skipping over `(…)` groups,
/// strings, and comments — used to step past an optional `extends` clause.
fn scan_to_open_brace(data: &[u8], mut pos: usize) -> usize {
    use elem_scan::{QuoteSkipper, Skipper};
    let mut depth = 0i32;
    while pos < data.len() {
        match data[pos] {
            b'{' if depth == 0 => return pos,
            b'(' | b'[' => {
                depth += 1;
                pos += 1;
            }
            b')' | b']' => {
                depth -= 1;
                pos += 1;
            }
            b'\'' | b'"' | b'`' => {
                let q_char = data[pos];
                let mut q = QuoteSkipper::new(q_char);
                pos += 1;
                while pos < data.len() && q.is_open() {
                    q.feed(data[pos]);
                    pos += 1;
                }
            }
            _ => pos += 1,
        }
    }
    pos
}

fn parse_if(
    data: &[u8],
    _span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let mut pos = skip_ws_and_comments(data, kw_end);
    pos = require_condition(data, pos)?;
    pos = scan_body(data, pos);

    loop {
        let candidate = skip_ws_and_comments(data, pos);
        match keyword_at(data, candidate, "else") {
            None => break,
            Some(after_else) => {
                let next = skip_ws_and_comments(data, after_else);
                pos = if let Some(after_if) = keyword_at(data, next, "if") {
                    let cond_pos = skip_ws_and_comments(data, after_if);
                    let cond_end = require_condition(data, cond_pos)?;
                    scan_body(data, cond_end)
                } else {
                    scan_body(data, next)
                };
            }
        }
    }

    Ok((ScriptNode::If(IfNode { span: Span::new(node_span_start, pos) }), pos))
}

fn require_condition(data: &[u8], pos: usize) -> Result<usize, Error> {
    if data.get(pos) != Some(&b'(') {
        return Err(Error::new(
            ErrorKind::MissingControlCondition,
            pos,
            "expected `(` to start a control-statement condition",
        ));
    }
    scan_paren_group(data, pos)
        .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, pos, "unterminated condition"))
}

fn parse_basic_control(
    data: &[u8],
    span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let keyword = Span::new(span_start, kw_end);
    let pos = skip_ws_and_comments(data, kw_end);
    let after_cond = require_condition(data, pos)?;
    let end = scan_body(data, after_cond);
    Ok((
        ScriptNode::BasicControl(BasicControlNode {
            span: Span::new(node_span_start, end),
            keyword,
        }),
        end,
    ))
}

fn parse_do_while(
    data: &[u8],
    _span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let body_end = scan_body(data, kw_end);
    let pos = skip_ws_and_comments(data, body_end);
    let after_while = keyword_at(data, pos, "while").ok_or_else(|| {
        Error::new(ErrorKind::MissingWhileAfterDo, pos, "expected `while` after a `do` body")
    })?;
    let cond_pos = skip_ws_and_comments(data, after_while);
    let after_cond = require_condition(data, cond_pos)?;
    let trailing = skip_ws(data, after_cond);
    let end = if data.get(trailing) == Some(&b';') { trailing + 1 } else { trailing };
    Ok((ScriptNode::DoWhile(DoWhileNode { span: Span::new(node_span_start, end) }), end))
}

fn parse_try_catch(
    data: &[u8],
    _span_start: usize,
    kw_end: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let try_body_start = skip_ws_and_comments(data, kw_end);
    if data.get(try_body_start) != Some(&b'{') {
        return Err(Error::new(
            ErrorKind::MissingBody,
            try_body_start,
            "expected `{` to start a `try` body",
        ));
    }
    let mut pos = scan_curly_group(data, try_body_start)
        .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, try_body_start, "unterminated try body"))?;

    let mut had_catch = false;
    let mut had_finally = false;

    let after_try = skip_ws_and_comments(data, pos);
    if let Some(after_catch) = keyword_at(data, after_try, "catch") {
        had_catch = true;
        let mut p = skip_ws_and_comments(data, after_catch);
        if data.get(p) == Some(&b'(') {
            p = scan_paren_group(data, p)
                .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, p, "unterminated catch binding"))?;
            p = skip_ws_and_comments(data, p);
        }
        if data.get(p) != Some(&b'{') {
            return Err(Error::new(ErrorKind::MissingBody, p, "expected `{` to start a `catch` body"));
        }
        pos = scan_curly_group(data, p)
            .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, p, "unterminated catch body"))?;
    }

    let after_catch_block = skip_ws_and_comments(data, pos);
    if let Some(after_finally) = keyword_at(data, after_catch_block, "finally") {
        had_finally = true;
        let body_start = skip_ws_and_comments(data, after_finally);
        if data.get(body_start) != Some(&b'{') {
            return Err(Error::new(ErrorKind::MissingBody, body_start, "expected `{` to start a `finally` body"));
        }
        pos = scan_curly_group(data, body_start)
            .ok_or_else(|| Error::new(ErrorKind::UnterminatedGroup, body_start, "unterminated finally body"))?;
    }

    if !had_catch && !had_finally {
        return Err(Error::new(
            ErrorKind::MissingCatchOrFinally,
            after_try,
            "`try` must be followed by `catch` and/or `finally`",
        ));
    }

    Ok((ScriptNode::TryCatch(TryCatchNode { span: Span::new(node_span_start, pos) }), pos))
}

fn parse_label(
    data: &[u8],
    ident_start: usize,
    _ident_end: usize,
    colon_pos: usize,
    node_span_start: usize,
) -> Result<(ScriptNode, usize), Error> {
    let label = Span::new(ident_start, colon_pos + 1);
    let body_start = skip_ws_and_comments(data, colon_pos + 1);
    let end = statement_end(data, body_start)?;
    Ok((
        ScriptNode::Label(LabelNode {
            span: Span::new(node_span_start, end),
            label,
            body: Span::new(body_start, end),
        }),
        end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(src: &str) -> ScriptTree {
        let tree = parse(src).expect("parse should succeed");
        let mut out = String::new();
        for node in &tree.statements {
            out.push_str(node.span().slice(src));
        }
        assert_eq!(out, src, "round-trip mismatch");
        tree
    }

    #[test]
    fn var_decl_roundtrips_and_names() {
        let tree = roundtrip("let name = \"world\";");
        assert_eq!(tree.statements.len(), 1);
        assert_eq!(tree.statements[0].declared_names("let name = \"world\";"), vec!["name"]);
    }

    #[test]
    fn multiple_statements_roundtrip() {
        roundtrip("let n = 1;\n$: doubled = n * 2;\n");
    }

    #[test]
    fn reactive_label_detected() {
        let src = "$: doubled = n * 2;";
        let tree = roundtrip(src);
        assert!(tree.statements[0].is_reactive_label(src));
        assert_eq!(tree.statements[0].declared_names(src), vec!["doubled"]);
    }

    #[test]
    fn multi_name_declaration_rejected() {
        let err = parse("let a, b;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultiNameDeclaration);
    }

    #[test]
    fn function_declaration_roundtrips() {
        roundtrip("function click_handler() {\n  count += 1;\n}\n");
    }

    #[test]
    fn if_else_chain_roundtrips() {
        roundtrip("if (a) {\n  b();\n} else if (c) {\n  d();\n} else {\n  e();\n}\n");
    }

    #[test]
    fn try_catch_finally_roundtrips() {
        roundtrip("try {\n  risky();\n} catch (e) {\n  log(e);\n} finally {\n  cleanup();\n}\n");
    }

    #[test]
    fn leading_comment_becomes_own_node() {
        let src = "// greeting\nlet name = 1;";
        let tree = roundtrip(src);
        assert_eq!(tree.statements.len(), 2);
        assert!(matches!(tree.statements[0], ScriptNode::Comment(_)));
    }

    #[test]
    fn class_declaration_roundtrips() {
        roundtrip("class Foo extends Bar {\n  method() {}\n}\n");
    }
}
