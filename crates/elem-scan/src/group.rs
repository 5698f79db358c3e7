use crate::comment::CommentSkipper;
use crate::quote::QuoteSkipper;
use crate::{starts_regex, Skipper, TrailingIdent};

/// Tracks a balanced `{…}` or `(…)` group, delegating to an inner skipper
/// while inside a nested string, template literal, regex literal, or
/// comment so that delimiter bytes inside those constructs don't affect
/// the depth count.
pub struct GroupSkipper {
    open_byte: u8,
    close_byte: u8,
    depth: u32,
    open: bool,
    pending_slash: bool,
    prev_significant: Option<u8>,
    trailing: TrailingIdent,
    inner: Option<Box<dyn Skipper>>,
}

impl GroupSkipper {
    pub fn new(open_byte: u8) -> Self {
        let close_byte = match open_byte {
            b'{' => b'}',
            b'(' => b')',
            other => panic!("GroupSkipper::new: unsupported opening byte {other:?}"),
        };
        Self {
            open_byte,
            close_byte,
            depth: 0,
            open: true,
            pending_slash: false,
            prev_significant: None,
            trailing: TrailingIdent::new(),
            inner: None,
        }
    }

    pub fn curly() -> Self {
        Self::new(b'{')
    }

    pub fn paren() -> Self {
        Self::new(b'(')
    }
}

impl Skipper for GroupSkipper {
    fn feed(&mut self, b: u8) {
        if let Some(inner) = self.inner.as_mut() {
            inner.feed(b);
            if !inner.is_open() {
                self.inner = None;
            }
            self.prev_significant = Some(b);
            self.trailing.feed(b);
            return;
        }

        if self.pending_slash {
            self.pending_slash = false;
            match b {
                b'/' => {
                    self.inner = Some(Box::new(CommentSkipper::line()));
                    return;
                }
                b'*' => {
                    self.inner = Some(Box::new(CommentSkipper::block()));
                    return;
                }
                _ if starts_regex(self.prev_significant, self.trailing.as_str()) => {
                    let mut q = QuoteSkipper::regex();
                    q.feed(b);
                    self.inner = Some(Box::new(q));
                    return;
                }
                _ => {
                    // the deferred `/` was division; fall through and
                    // process `b` as an ordinary byte below
                }
            }
        }

        match b {
            b'\'' | b'"' | b'`' => {
                self.inner = Some(Box::new(QuoteSkipper::new(b)));
            }
            b'/' => {
                self.pending_slash = true;
                return;
            }
            _ if b == self.open_byte => {
                self.depth += 1;
            }
            _ if b == self.close_byte => {
                self.depth -= 1;
                if self.depth == 0 {
                    self.open = false;
                }
            }
            _ => {}
        }

        if !b.is_ascii_whitespace() {
            self.prev_significant = Some(b);
            self.trailing.feed(b);
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(open: u8, data: &[u8]) -> usize {
        let mut g = GroupSkipper::new(open);
        for (i, &b) in data.iter().enumerate() {
            g.feed(b);
            if !g.is_open() {
                return i + 1;
            }
        }
        data.len()
    }

    #[test]
    fn division_inside_group_does_not_open_regex() {
        // `a / b` — `/` follows an identifier byte, so it's division; the
        // following `}` must still close the group.
        assert_eq!(run(b'{', b"{ a / b }"), 9);
    }

    #[test]
    fn regex_after_keyword_is_not_mistaken_for_division() {
        // `return /.../ ` — `/` follows the keyword `return`, so it opens a
        // regex literal; the `}` inside it must not close the group early.
        let data = b"{ return /[{}]/; }";
        assert_eq!(run(b'{', data), data.len());
    }

    #[test]
    fn regex_literal_braces_are_skipped() {
        let data = b"{ x.match(/[{}]/) }";
        assert_eq!(run(b'{', data), data.len());
    }

    #[test]
    fn template_literal_hole_braces_are_skipped() {
        let data = b"{ `${ {a:1} }` }";
        assert_eq!(run(b'{', data), data.len());
    }
}
