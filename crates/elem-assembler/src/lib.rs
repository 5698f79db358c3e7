//! Component assembler (spec §4.4): validates single-script/style and
//! tag-placement invariants, and assigns stable names to every markup
//! node that becomes a DOM variable in the generated fragment.

mod assemble;
mod component;
pub mod error;

pub use assemble::assemble;
pub use component::{Component, ParsedScript};
pub use error::{Error, ErrorKind};
