//! Coarse HTML-with-expressions tokenizer (spec §4.3): start-tag,
//! attribute, start-tag-close, end-tag, and text tokens. Comments are
//! consumed and discarded here rather than surfaced as tokens.

use elem_ast::Span;

#[derive(Debug, Clone)]
pub enum Token {
    StartTag { tag_start: usize, name: Span },
    AttrRaw { span: Span },
    TagClose { pos_after: usize },
    EndTag { name: Span, pos_after: usize },
    Text { span: Span },
    Eof,
}

const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

pub struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    in_tag: bool,
    /// Name of the start tag currently being scanned, carried from
    /// `read_start_tag` to the matching `TagClose` so raw-text mode can be
    /// armed for `script`/`style` (their content is opaque to the tag
    /// lexer the same way it is in a real HTML tokenizer).
    pending_tag_name: Option<String>,
    /// Set once a `script`/`style` start tag closes; content up to the
    /// matching end tag is read as one opaque run, `<` and all.
    raw_text_tag: Option<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer { data: src.as_bytes(), pos: 0, in_tag: false, pending_tag_name: None, raw_text_tag: None }
    }

    pub fn next_token(&mut self) -> Token {
        if self.in_tag {
            return self.next_in_tag();
        }
        if self.raw_text_tag.is_some() {
            return self.read_raw_text();
        }
        self.next_outside_tag()
    }

    fn next_in_tag(&mut self) -> Token {
        self.skip_ws();
        if self.pos >= self.data.len() {
            self.in_tag = false;
            return Token::Eof;
        }
        if self.data[self.pos] == b'>' {
            self.pos += 1;
            self.in_tag = false;
            if let Some(tag) = self.pending_tag_name.take() {
                if RAW_TEXT_TAGS.contains(&tag.as_str()) {
                    self.raw_text_tag = Some(tag);
                }
            }
            return Token::TagClose { pos_after: self.pos };
        }
        let start = self.pos;
        let name_end = scan_attr_name_end(self.data, self.pos);
        let end = if self.data.get(name_end) == Some(&b'=') {
            scan_attr_value_raw(self.data, name_end + 1)
        } else {
            name_end
        };
        self.pos = end;
        Token::AttrRaw { span: Span::new(start, end) }
    }

    fn next_outside_tag(&mut self) -> Token {
        loop {
            if self.pos >= self.data.len() {
                return Token::Eof;
            }
            if self.data[self.pos] == b'<' {
                if self.starts_with("<!--") {
                    self.skip_comment();
                    continue;
                }
                if self.data.get(self.pos + 1) == Some(&b'/') {
                    return self.read_end_tag();
                }
                return self.read_start_tag();
            }
            return self.read_text();
        }
    }

    fn read_start_tag(&mut self) -> Token {
        let tag_start = self.pos;
        self.pos += 1; // consume '<'
        let name_start = self.pos;
        let name_end = scan_tag_name(self.data, self.pos);
        self.pos = name_end;
        self.in_tag = true;
        let name_span = Span::new(name_start, name_end);
        // Tag names are ASCII (`is_tag_name_byte`), so this never panics.
        self.pending_tag_name = Some(
            std::str::from_utf8(&self.data[name_start..name_end]).unwrap_or("").to_string(),
        );
        Token::StartTag { tag_start, name: name_span }
    }

    /// Reads content up to (not including) the matching `</tag`, treating
    /// every byte in between as opaque — `<` included. Clears raw-text
    /// mode once the boundary is found or the input runs out.
    fn read_raw_text(&mut self) -> Token {
        let tag = self.raw_text_tag.take().expect("read_raw_text called without an active raw tag");
        let start = self.pos;
        let end = find_raw_text_end(self.data, self.pos, &tag).unwrap_or(self.data.len());
        self.pos = end;
        Token::Text { span: Span::new(start, end) }
    }

    fn read_end_tag(&mut self) -> Token {
        self.pos += 2; // consume '</'
        self.skip_ws();
        let name_start = self.pos;
        let name_end = scan_tag_name(self.data, self.pos);
        self.pos = name_end;
        self.skip_ws();
        if self.data.get(self.pos) == Some(&b'>') {
            self.pos += 1;
        }
        Token::EndTag { name: Span::new(name_start, name_end), pos_after: self.pos }
    }

    fn read_text(&mut self) -> Token {
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos] != b'<' {
            self.pos += 1;
        }
        Token::Text { span: Span::new(start, self.pos) }
    }

    fn skip_comment(&mut self) {
        self.pos += 4; // consume '<!--'
        while self.pos < self.data.len() && !self.starts_with("-->") {
            self.pos += 1;
        }
        if self.pos < self.data.len() {
            self.pos += 3;
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.data[self.pos..].starts_with(pat.as_bytes())
    }
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn scan_tag_name(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && is_tag_name_byte(data[pos]) {
        pos += 1;
    }
    pos
}

fn scan_attr_name_end(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() {
        match data[pos] {
            b'=' | b'>' => break,
            b if b.is_ascii_whitespace() => break,
            _ => pos += 1,
        }
    }
    pos
}

/// Finds the byte offset of the `<` that opens `</tag` (boundary-checked:
/// the byte after the name must be whitespace, `/`, `>`, or EOF), starting
/// the search at `from`. `tag` is matched case-sensitively — elem markup
/// only recognizes lowercase `script`/`style`.
fn find_raw_text_end(data: &[u8], from: usize, tag: &str) -> Option<usize> {
    let needle = tag.as_bytes();
    let mut i = from;
    while i < data.len() {
        if data[i] == b'<' && data.get(i + 1) == Some(&b'/') {
            let name_start = i + 2;
            let name_end = name_start + needle.len();
            if data.len() >= name_end
                && &data[name_start..name_end] == needle
                && data.get(name_end).map_or(true, |b| b.is_ascii_whitespace() || *b == b'>')
            {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Scans an attribute's value, raw: a quoted run (naive HTML-style, no
/// backslash escaping), a brace-balanced `{…}` expression, or a bare
/// unquoted run up to the next whitespace/`>`.
fn scan_attr_value_raw(data: &[u8], mut pos: usize) -> usize {
    loop {
        if pos >= data.len() {
            return pos;
        }
        match data[pos] {
            b'"' | b'\'' => {
                let quote = data[pos];
                pos += 1;
                while pos < data.len() && data[pos] != quote {
                    pos += 1;
                }
                if pos < data.len() {
                    pos += 1;
                }
                return pos;
            }
            b'{' => {
                return match elem_scan::index_after_group(&data[pos..], b'{') {
                    Some(len) => pos + len,
                    None => data.len(),
                };
            }
            b' ' | b'\t' | b'\n' | b'\r' | b'>' => return pos,
            _ => pos += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lex = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lex.next_token();
            let done = matches!(t, Token::Eof);
            out.push(t);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn script_content_with_angle_brackets_is_one_raw_run() {
        let src = "<script>if (a < b) { c(); }</script>";
        let toks = tokens(src);
        let text_spans: Vec<&str> = toks
            .iter()
            .filter_map(|t| match t {
                Token::Text { span } => Some(span.slice(src)),
                _ => None,
            })
            .collect();
        assert_eq!(text_spans, vec!["if (a < b) { c(); }"]);
        assert!(matches!(toks.last(), Some(Token::Eof)));
        assert!(toks.iter().any(|t| matches!(t, Token::EndTag { .. })));
    }

    #[test]
    fn empty_script_element_yields_empty_text_then_end_tag() {
        let src = "<script></script>";
        let toks = tokens(src);
        let non_eof: Vec<&Token> = toks.iter().filter(|t| !matches!(t, Token::Eof)).collect();
        assert!(matches!(non_eof[2], Token::Text { span } if span.is_empty()));
        assert!(matches!(non_eof[3], Token::EndTag { .. }));
    }

    #[test]
    fn style_raw_text_stops_only_at_matching_end_tag() {
        let src = "<style>.a > .b {}</style>";
        let toks = tokens(src);
        let text: Vec<&str> = toks
            .iter()
            .filter_map(|t| match t {
                Token::Text { span } => Some(span.slice(src)),
                _ => None,
            })
            .collect();
        assert_eq!(text, vec![".a > .b {}"]);
    }

    #[test]
    fn host_element_still_splits_text_on_angle_bracket() {
        let src = "<p>a</p><p>b</p>";
        let toks = tokens(src);
        let count = toks.iter().filter(|t| matches!(t, Token::StartTag { .. })).count();
        assert_eq!(count, 2);
    }
}
