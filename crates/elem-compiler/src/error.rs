use std::fmt;

/// The top-level error a `.elem` build can fail with (spec §7's taxonomy,
/// aggregated one-for-one): the file couldn't be read, or one of the three
/// pipeline stages rejected the source.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Markup(elem_parser::Error),
    Script(elem_script::Error),
    Assembly(elem_assembler::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{e}"),
            Error::Markup(e) => write!(f, "{e}"),
            Error::Script(e) => write!(f, "{e}"),
            Error::Assembly(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Markup(e) => Some(e),
            Error::Script(e) => Some(e),
            Error::Assembly(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<elem_parser::Error> for Error {
    fn from(e: elem_parser::Error) -> Self {
        Error::Markup(e)
    }
}

impl From<elem_script::Error> for Error {
    fn from(e: elem_script::Error) -> Self {
        Error::Script(e)
    }
}

impl From<elem_assembler::Error> for Error {
    fn from(e: elem_assembler::Error) -> Self {
        Error::Assembly(e)
    }
}
