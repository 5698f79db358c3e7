//! Low-level byte helpers shared by the statement parser: whitespace and
//! comment skipping, identifier reading, and the structural keyword set.

use elem_scan::{index_after_group, CommentSkipper, QuoteSkipper, Skipper};
use phf::phf_set;

pub static STRUCTURAL_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "var", "let", "const", "function", "class", "if", "else", "for", "while",
    "do", "switch", "with", "try", "catch", "finally", "extends",
};

pub fn identifier_len(s: &[u8]) -> usize {
    let mut len = 0;
    for (i, &b) in s.iter().enumerate() {
        let ok = if i == 0 {
            b.is_ascii_alphabetic() || b == b'_' || b == b'$'
        } else {
            b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
        };
        if !ok {
            break;
        }
        len = i + 1;
    }
    len
}

/// Reads one identifier starting at `pos`. Returns `None` if `pos` is not
/// an identifier-start byte.
pub fn read_ident(src: &[u8], pos: usize) -> Option<(usize, usize)> {
    let len = identifier_len(&src[pos..]);
    if len == 0 {
        None
    } else {
        Some((pos, pos + len))
    }
}

/// Returns `Some(end)` if the structural keyword `word` appears at `pos`,
/// as a whole identifier (not a prefix of a longer one).
pub fn keyword_at(src: &[u8], pos: usize, word: &str) -> Option<usize> {
    let (start, end) = read_ident(src, pos)?;
    if &src[start..end] == word.as_bytes() {
        Some(end)
    } else {
        None
    }
}

pub fn skip_ws(src: &[u8], mut pos: usize) -> usize {
    while pos < src.len() && src[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Skips whitespace and any number of line/block comments, landing on the
/// next meaningful byte (or EOF).
pub fn skip_ws_and_comments(src: &[u8], mut pos: usize) -> usize {
    loop {
        pos = skip_ws(src, pos);
        if pos + 1 < src.len() && src[pos] == b'/' && src[pos + 1] == b'/' {
            let mut c = CommentSkipper::line();
            pos += 2;
            while pos < src.len() && c.is_open() {
                c.feed(src[pos]);
                pos += 1;
            }
            continue;
        }
        if pos + 1 < src.len() && src[pos] == b'/' && src[pos + 1] == b'*' {
            let mut c = CommentSkipper::block();
            pos += 2;
            while pos < src.len() && c.is_open() {
                c.feed(src[pos]);
                pos += 1;
            }
            continue;
        }
        return pos;
    }
}

/// Scans a `(…)` group starting at `pos` (which must hold `(`), returning
/// the index one past its closing `)`.
pub fn scan_paren_group(src: &[u8], pos: usize) -> Option<usize> {
    let len = index_after_group(&src[pos..], b'(')?;
    Some(pos + len)
}

/// Scans a `{…}` group starting at `pos`, returning the index one past its
/// closing `}`.
pub fn scan_curly_group(src: &[u8], pos: usize) -> Option<usize> {
    let len = index_after_group(&src[pos..], b'{')?;
    Some(pos + len)
}

/// Scans forward from `pos` to the end of a "bare" statement: a run of
/// bytes tracking `(`/`{`/`[` nesting depth and skipping over strings,
/// template literals, regex literals, and comments, stopping at the first
/// top-level `;` (consumed) or at a top-level closing bracket (not
/// consumed, since it belongs to an enclosing construct) or end of input.
pub fn scan_to_statement_end(src: &[u8], start: usize) -> usize {
    let mut i = start;
    let mut depth: i32 = 0;
    let mut prev_significant: Option<u8> = None;
    let mut trailing = elem_scan::TrailingIdent::new();
    while i < src.len() {
        let b = src[i];
        match b {
            b'(' | b'{' | b'[' => {
                depth += 1;
                i += 1;
                prev_significant = Some(b);
                trailing.feed(b);
            }
            b')' | b'}' | b']' => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
                i += 1;
                prev_significant = Some(b);
                trailing.feed(b);
            }
            b'\'' | b'"' | b'`' => {
                let mut q = QuoteSkipper::new(b);
                i += 1;
                while i < src.len() && q.is_open() {
                    q.feed(src[i]);
                    i += 1;
                }
                prev_significant = Some(b);
                trailing.feed(b);
            }
            b'/' if i + 1 < src.len() && src[i + 1] == b'/' => {
                let mut c = CommentSkipper::line();
                i += 2;
                while i < src.len() && c.is_open() {
                    c.feed(src[i]);
                    i += 1;
                }
            }
            b'/' if i + 1 < src.len() && src[i + 1] == b'*' => {
                let mut c = CommentSkipper::block();
                i += 2;
                while i < src.len() && c.is_open() {
                    c.feed(src[i]);
                    i += 1;
                }
            }
            b'/' if elem_scan::starts_regex(prev_significant, trailing.as_str()) => {
                let mut q = QuoteSkipper::regex();
                i += 1;
                while i < src.len() && q.is_open() {
                    q.feed(src[i]);
                    i += 1;
                }
                prev_significant = Some(b'/');
                trailing.feed(b'/');
            }
            b';' if depth == 0 => {
                return i + 1;
            }
            _ => {
                i += 1;
                if !b.is_ascii_whitespace() {
                    prev_significant = Some(b);
                    trailing.feed(b);
                }
            }
        }
    }
    src.len()
}

/// Scans a statement *body*: either a `{…}` block, or (lacking one) a bare
/// statement up to its terminator — the shape every `if`/`for`/`while`/
/// `do` body takes.
pub fn scan_body(src: &[u8], pos: usize) -> usize {
    let pos = skip_ws_and_comments(src, pos);
    if src.get(pos) == Some(&b'{') {
        scan_curly_group(src, pos).unwrap_or(src.len())
    } else {
        scan_to_statement_end(src, pos)
    }
}

pub fn trim_trailing_ws(src: &[u8], end: usize) -> usize {
    let mut e = end;
    while e > 0 && src[e - 1].is_ascii_whitespace() {
        e -= 1;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_end_treats_slash_after_return_as_regex() {
        // the `;` inside the regex literal must not end the statement early.
        let src = b"return /a;b/;";
        assert_eq!(scan_to_statement_end(src, 0), src.len());
    }

    #[test]
    fn statement_end_treats_slash_after_identifier_as_division() {
        // if `/` were wrongly treated as opening a regex, its unterminated
        // scan would swallow the real statement end and the trailing `x;`.
        let src = b"a / b; x;";
        assert_eq!(scan_to_statement_end(src, 0), 6);
    }
}
