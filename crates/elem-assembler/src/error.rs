use std::fmt;

/// A component-assembly violation (spec §7 *Component assembly*).
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error { kind, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// More than one root `<script>`.
    MultipleRootScripts,
    /// A `<script>`/`<style>` found below depth 1.
    NestedLeafElement,
    /// An attribute directive suffix other than `on:<dir>`.
    UnknownDirective,
    /// The root `<script>` body failed to parse.
    ScriptParse,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<elem_script::Error> for Error {
    fn from(e: elem_script::Error) -> Self {
        Error::new(ErrorKind::ScriptParse, format!("script parse error: {e}"))
    }
}
