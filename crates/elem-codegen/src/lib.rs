//! Code generator (spec §4.5): turns an assembled [`elem_assembler::Component`]
//! into one ES module's worth of JS source.

mod generate;
mod source;

pub use generate::generate;
