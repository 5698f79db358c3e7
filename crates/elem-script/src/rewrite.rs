//! The rewriter framework (spec §4.2): variable-name rewriting and
//! assignment rewriting, both implemented over raw bytes so that anything
//! not touched by a rewrite passes through byte-identical.

use elem_ast::{Span, VarInfo};
use elem_scan::{starts_regex, CommentSkipper, QuoteSkipper, Skipper};

use crate::lexer::identifier_len;

/// One matched bare reference to a root-scope variable.
pub struct NameHit<'a> {
    pub index: usize,
    pub name: &'a str,
    /// True when this occurrence is the variable's own declaration site
    /// (its span is listed in `declared_spans`), so callers can choose to
    /// leave it untouched.
    pub is_declaration: bool,
    pub original: &'a str,
}

/// Finds every bare reference to a name in `vars` within `src` and lets
/// `f` decide its replacement. Property accesses (`.name`, `?.name`),
/// string/comment/regex contents are left untouched; template literal
/// `${…}` holes are descended into. Returns the rewritten text and the set
/// of (index, name) pairs actually substituted.
pub fn rewrite_variable_names(
    src: &str,
    vars: &VarInfo,
    declared_spans: &[Span],
    mut f: impl FnMut(NameHit) -> String,
) -> (String, VarInfo) {
    let mut touched = VarInfo::new();
    let mut out = String::with_capacity(src.len());
    rewrite_names_chunk(src.as_bytes(), 0, vars, declared_spans, &mut f, &mut out, &mut touched);
    (out, touched)
}

fn rewrite_names_chunk(
    data: &[u8],
    base: usize,
    vars: &VarInfo,
    declared_spans: &[Span],
    f: &mut impl FnMut(NameHit) -> String,
    out: &mut String,
    touched: &mut VarInfo,
) {
    let mut i = 0usize;
    let mut prev_significant: Option<u8> = None;
    let mut trailing_word: Option<&str> = None;
    let mut skip_next_ident = false;

    while i < data.len() {
        let b = data[i];
        match b {
            b'\'' | b'"' => {
                let start = i;
                let mut q = QuoteSkipper::new(b);
                i += 1;
                while i < data.len() && q.is_open() {
                    q.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
                prev_significant = Some(b'"');
                trailing_word = None;
            }
            b'`' => {
                out.push('`');
                i += 1;
                loop {
                    if i >= data.len() {
                        break;
                    }
                    match data[i] {
                        b'`' => {
                            out.push('`');
                            i += 1;
                            break;
                        }
                        b'\\' if i + 1 < data.len() => {
                            out.push(data[i] as char);
                            out.push(data[i + 1] as char);
                            i += 2;
                        }
                        b'$' if data.get(i + 1) == Some(&b'{') => {
                            out.push_str("${");
                            i += 2;
                            let hole_start = i;
                            let depth_end = matching_brace(data, hole_start);
                            rewrite_names_chunk(
                                &data[hole_start..depth_end],
                                base + hole_start,
                                vars,
                                declared_spans,
                                f,
                                out,
                                touched,
                            );
                            out.push('}');
                            i = depth_end + 1;
                        }
                        _ => {
                            i += push_char_at(data, i, out);
                        }
                    }
                }
                prev_significant = Some(b'`');
                trailing_word = None;
            }
            b'/' if i + 1 < data.len() && data[i + 1] == b'/' => {
                let start = i;
                let mut c = CommentSkipper::line();
                i += 2;
                while i < data.len() && c.is_open() {
                    c.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
            }
            b'/' if i + 1 < data.len() && data[i + 1] == b'*' => {
                let start = i;
                let mut c = CommentSkipper::block();
                i += 2;
                while i < data.len() && c.is_open() {
                    c.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
            }
            b'/' if starts_regex(prev_significant, trailing_word) => {
                let start = i;
                let mut q = QuoteSkipper::regex();
                i += 1;
                while i < data.len() && q.is_open() {
                    q.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
                prev_significant = Some(b'/');
                trailing_word = None;
            }
            b'.' => {
                out.push('.');
                i += 1;
                skip_next_ident = true;
                prev_significant = Some(b'.');
                trailing_word = None;
            }
            b'?' if data.get(i + 1) == Some(&b'.') => {
                out.push_str("?.");
                i += 2;
                skip_next_ident = true;
                prev_significant = Some(b'.');
                trailing_word = None;
            }
            _ => {
                let len = identifier_len(&data[i..]);
                if len > 0 {
                    let text = std::str::from_utf8(&data[i..i + len]).unwrap();
                    if skip_next_ident {
                        out.push_str(text);
                        skip_next_ident = false;
                    } else if let Some(index) = vars.names().iter().position(|n| *n == text) {
                        let abs = Span::new(base + i, base + i + len);
                        let is_declaration = declared_spans.contains(&abs);
                        let replacement = f(NameHit { index, name: text, is_declaration, original: text });
                        out.push_str(&replacement);
                        touched.push(index, text);
                    } else {
                        out.push_str(text);
                    }
                    i += len;
                    prev_significant = Some(text.as_bytes()[len - 1]);
                    trailing_word = Some(text);
                } else {
                    i += push_char_at(data, i, out);
                    if !b.is_ascii_whitespace() {
                        prev_significant = Some(b);
                        trailing_word = None;
                    }
                }
            }
        }
    }
}

/// Pushes the full UTF-8 character starting at the (char-boundary) byte
/// offset `i` and returns its length in bytes.
fn push_char_at(data: &[u8], i: usize, out: &mut String) -> usize {
    match std::str::from_utf8(&data[i..]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => {
                out.push(ch);
                ch.len_utf8()
            }
            None => 1,
        },
        Err(_) => {
            out.push(data[i] as char);
            1
        }
    }
}

/// Given `pos` one past an opening `{`, returns the index of its matching
/// `}` (not one past it) — used to bound a template literal's `${…}` hole
/// for recursive rewriting.
fn matching_brace(data: &[u8], pos: usize) -> usize {
    let mut depth = 1i32;
    let mut i = pos;
    while i < data.len() {
        match data[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            b'\'' | b'"' | b'`' => {
                let q_char = data[i];
                let mut q = QuoteSkipper::new(q_char);
                i += 1;
                while i < data.len() && q.is_open() {
                    q.feed(data[i]);
                    i += 1;
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    data.len()
}

/// One matched top-level assignment (`name = …`, `name += …`, `name -= …`).
pub struct AssignmentHit<'a> {
    pub index: usize,
    pub name: &'a str,
    /// The full `name <op> rhs` text, trailing `;` excluded.
    pub original: &'a str,
}

/// Finds every bare assignment to a variable in `vars` and lets `f`
/// rewrite the whole `name <op> rhs` expression. A declaration keyword
/// (`var`/`let`/`const`) immediately preceding the name disqualifies it —
/// that is a declaration, not a reassignment. Returns the rewritten text
/// and the touched (index, name) set.
pub fn rewrite_assignments(
    src: &str,
    vars: &VarInfo,
    mut f: impl FnMut(AssignmentHit) -> String,
) -> (String, VarInfo) {
    let data = src.as_bytes();
    let mut touched = VarInfo::new();
    let mut out = String::with_capacity(src.len());
    let mut i = 0usize;
    let mut prev_significant: Option<u8> = None;
    let mut trailing_word: Option<&str> = None;
    let mut skip_next_ident = false;

    while i < data.len() {
        let b = data[i];
        match b {
            b'\'' | b'"' | b'`' => {
                let start = i;
                let mut q = QuoteSkipper::new(b);
                i += 1;
                while i < data.len() && q.is_open() {
                    q.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
                prev_significant = Some(b);
                trailing_word = None;
            }
            b'/' if i + 1 < data.len() && data[i + 1] == b'/' => {
                let start = i;
                let mut c = CommentSkipper::line();
                i += 2;
                while i < data.len() && c.is_open() {
                    c.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
            }
            b'/' if i + 1 < data.len() && data[i + 1] == b'*' => {
                let start = i;
                let mut c = CommentSkipper::block();
                i += 2;
                while i < data.len() && c.is_open() {
                    c.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
            }
            b'/' if starts_regex(prev_significant, trailing_word) => {
                let start = i;
                let mut q = QuoteSkipper::regex();
                i += 1;
                while i < data.len() && q.is_open() {
                    q.feed(data[i]);
                    i += 1;
                }
                out.push_str(std::str::from_utf8(&data[start..i]).unwrap_or(""));
                prev_significant = Some(b'/');
                trailing_word = None;
            }
            b'.' => {
                out.push('.');
                i += 1;
                skip_next_ident = true;
                prev_significant = Some(b'.');
                trailing_word = None;
            }
            _ => {
                let len = identifier_len(&data[i..]);
                if len > 0 {
                    let text = std::str::from_utf8(&data[i..i + len]).unwrap();
                    let was_decl_keyword = matches!(text, "var" | "let" | "const");
                    if skip_next_ident {
                        out.push_str(text);
                        skip_next_ident = false;
                        i += len;
                        prev_significant = Some(text.as_bytes()[len - 1]);
                        trailing_word = Some(text);
                        continue;
                    }
                    if !was_decl_keyword {
                        if let Some(index) = vars.names().iter().position(|n| *n == text) {
                            if !preceded_by_decl_keyword(&out) {
                                if let Some((op_end, is_assign)) = match_assign_op(data, i + len) {
                                    if is_assign {
                                        let rhs_start = crate::lexer::skip_ws_and_comments(data, op_end);
                                        let stmt_end = crate::lexer::scan_to_statement_end(data, rhs_start);
                                        let has_semi =
                                            stmt_end > rhs_start && data[stmt_end - 1] == b';';
                                        let body_end = crate::lexer::trim_trailing_ws(
                                            data,
                                            if has_semi { stmt_end - 1 } else { stmt_end },
                                        );
                                        let whole =
                                            std::str::from_utf8(&data[i..body_end]).unwrap_or("");
                                        let replacement = f(AssignmentHit { index, name: text, original: whole });
                                        out.push_str(&replacement);
                                        touched.push(index, text);
                                        if has_semi {
                                            out.push(';');
                                        }
                                        i = stmt_end;
                                        prev_significant = Some(b';');
                                        trailing_word = None;
                                        continue;
                                    }
                                }
                            }
                        }
                    }
                    out.push_str(text);
                    i += len;
                    prev_significant = Some(text.as_bytes()[len - 1]);
                    trailing_word = Some(text);
                } else {
                    i += push_char_at(data, i, &mut out);
                    if !b.is_ascii_whitespace() {
                        prev_significant = Some(b);
                        trailing_word = None;
                    }
                }
            }
        }
    }

    (out, touched)
}

fn preceded_by_decl_keyword(out: &str) -> bool {
    let trimmed = out.trim_end();
    trimmed.ends_with("var") || trimmed.ends_with("let") || trimmed.ends_with("const")
}

/// At `pos` (past an identifier, past ws not yet skipped), checks for
/// `=`, `+=`, or `-=` (excluding `==`/`===`/`=>`). Returns the index past
/// the operator and whether it matched.
fn match_assign_op(data: &[u8], pos: usize) -> Option<(usize, bool)> {
    let p = crate::lexer::skip_ws_and_comments(data, pos);
    match (data.get(p), data.get(p + 1)) {
        (Some(b'+'), Some(b'=')) if data.get(p + 2) != Some(&b'=') => Some((p + 2, true)),
        (Some(b'-'), Some(b'=')) if data.get(p + 2) != Some(&b'=') => Some((p + 2, true)),
        (Some(b'='), Some(b'=')) => None,
        (Some(b'='), Some(b'>')) => None,
        (Some(b'='), _) => Some((p + 1, true)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> VarInfo {
        let mut v = VarInfo::new();
        for (i, n) in names.iter().enumerate() {
            v.push(i, *n);
        }
        v
    }

    #[test]
    fn variable_name_rewrite_skips_property_access() {
        let v = vars(&["name"]);
        let (out, touched) =
            rewrite_variable_names("name + obj.name", &v, &[], |hit| format!("ctx[{}]", hit.index));
        assert_eq!(out, "ctx[0] + obj.name");
        assert_eq!(touched.names(), vec!["name"]);
    }

    #[test]
    fn variable_name_rewrite_identity_is_identity() {
        let v = vars(&["a", "b"]);
        let src = "a + b * a";
        let (out, _) = rewrite_variable_names(src, &v, &[], |hit| hit.original.to_string());
        assert_eq!(out, src);
    }

    #[test]
    fn variable_name_rewrite_descends_into_template_hole() {
        let v = vars(&["name"]);
        let (out, touched) =
            rewrite_variable_names("`hi ${name}`", &v, &[], |hit| format!("ctx[{}]", hit.index));
        assert_eq!(out, "`hi ${ctx[0]}`");
        assert_eq!(touched.names(), vec!["name"]);
    }

    #[test]
    fn assignment_rewrite_matches_plus_equals() {
        let v = vars(&["count"]);
        let (out, touched) = rewrite_assignments("count += 1", &v, |hit| {
            format!("$$invalidate({}, {})", hit.index, hit.original)
        });
        assert_eq!(out, "$$invalidate(0, count += 1)");
        assert_eq!(touched.names(), vec!["count"]);
    }

    #[test]
    fn variable_name_rewrite_treats_slash_after_return_as_regex() {
        let v = vars(&["name"]);
        let src = "function f() { return /name;/.test(name); }";
        let (out, touched) = rewrite_variable_names(src, &v, &[], |hit| format!("ctx[{}]", hit.index));
        assert_eq!(out, "function f() { return /name;/.test(ctx[0]); }");
        assert_eq!(touched.names(), vec!["name"]);
    }

    #[test]
    fn assignment_rewrite_skips_declarations() {
        let v = vars(&["count"]);
        let (out, touched) = rewrite_assignments("let count = 0;", &v, |hit| {
            format!("$$invalidate({}, {})", hit.index, hit.original)
        });
        assert_eq!(out, "let count = 0;");
        assert!(touched.is_empty());
    }
}
