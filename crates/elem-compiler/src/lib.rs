//! `Build(path)` entry point (spec §6): reads a `.elem` file, runs it
//! through the markup parser, component assembler, and code generator, and
//! returns the generated ES module's bytes.

pub mod error;

pub use error::Error;

use std::path::Path;

/// Compiles the `.elem` file at `path` into an ES module (spec §6).
///
/// The exported class name is derived from the file's base name with its
/// extension stripped (spec §6 Configuration); pass `name_override` to use
/// a different identifier instead (the CLI's `--name` flag).
pub fn build(path: impl AsRef<Path>, name_override: Option<&str>) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "building component");

    let src = std::fs::read_to_string(path)?;
    let name = match name_override {
        Some(n) => n.to_string(),
        None => component_name(path),
    };

    let document = elem_parser::parse(&src)?;
    let component = elem_assembler::assemble(&src, document, name)?;
    let module = elem_codegen::generate(&component);

    tracing::debug!(bytes = module.len(), "build finished");
    Ok(module)
}

/// Derives the component's exported class name from a file path: the base
/// name with its extension stripped (spec §6).
pub fn component_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Component")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_name_strips_extension() {
        assert_eq!(component_name(Path::new("App.elem")), "App");
        assert_eq!(component_name(Path::new("/a/b/Counter.elem")), "Counter");
    }
}
