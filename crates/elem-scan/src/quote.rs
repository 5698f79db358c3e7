use crate::group::GroupSkipper;
use crate::Skipper;

/// Tracks a single/double-quoted string, a template literal, or (when
/// constructed with `/`) a regex literal body. Template literals delegate
/// to an inner [`GroupSkipper`] while inside a `${…}` hole.
pub struct QuoteSkipper {
    quote: u8,
    open: bool,
    escaped: bool,
    pending_dollar: bool,
    inner: Option<Box<GroupSkipper>>,
}

impl QuoteSkipper {
    pub fn new(quote: u8) -> Self {
        Self {
            quote,
            open: true,
            escaped: false,
            pending_dollar: false,
            inner: None,
        }
    }

    pub fn single() -> Self {
        Self::new(b'\'')
    }

    pub fn double() -> Self {
        Self::new(b'"')
    }

    pub fn template() -> Self {
        Self::new(b'`')
    }

    pub fn regex() -> Self {
        Self::new(b'/')
    }
}

impl Skipper for QuoteSkipper {
    fn feed(&mut self, b: u8) {
        if let Some(inner) = self.inner.as_mut() {
            inner.feed(b);
            if !inner.is_open() {
                self.inner = None;
            }
            return;
        }

        if self.escaped {
            self.escaped = false;
            return;
        }
        if b == b'\\' {
            self.escaped = true;
            return;
        }
        if b == self.quote {
            self.open = false;
            return;
        }

        if self.quote == b'`' {
            if self.pending_dollar {
                self.pending_dollar = false;
                if b == b'{' {
                    let mut g = GroupSkipper::new(b'{');
                    g.feed(b);
                    self.inner = Some(Box::new(g));
                }
                return;
            }
            if b == b'$' {
                self.pending_dollar = true;
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
