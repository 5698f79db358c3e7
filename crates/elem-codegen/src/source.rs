//! A small indented-statement accumulator for emitting JS (spec §4.5).
//!
//! Keeps the teacher's stack-of-buffers shape (push a fresh buffer, run a
//! closure against it, fold the result back into the outer one as a single
//! braced block) but trades the original's variadic, stringly-typed `Stmt`
//! for a few narrow methods matching the shapes §4.5 actually needs: a
//! semicolon-terminated line, a braced function/constructor body, and a
//! braced body followed by an arbitrary suffix (used for object-literal
//! methods, which need a trailing comma instead of a semicolon).

pub struct Source {
    stack: Vec<Vec<String>>,
    stmts: Vec<String>,
}

impl Source {
    pub fn new() -> Self {
        Source { stack: Vec::new(), stmts: Vec::new() }
    }

    pub fn finish(self) -> String {
        self.stmts.join("\n")
    }

    fn indent(&self) -> String {
        "  ".repeat(self.stack.len())
    }

    /// Runs `f` against a fresh buffer one level deeper, restores the outer
    /// buffer, and returns the inner lines joined by `\n`.
    fn block(&mut self, f: impl FnOnce(&mut Source)) -> String {
        self.stack.push(std::mem::take(&mut self.stmts));
        f(self);
        let inner = std::mem::replace(&mut self.stmts, self.stack.pop().unwrap());
        inner.join("\n")
    }

    /// A blank separator line.
    pub fn blank(&mut self) {
        self.stmts.push(String::new());
    }

    /// One indented, semicolon-terminated statement.
    pub fn stmt(&mut self, text: impl AsRef<str>) {
        let indent = self.indent();
        self.stmts.push(format!("{indent}{};", text.as_ref()));
    }

    /// One indented `// comment` line.
    pub fn comment(&mut self, text: &str) {
        let indent = self.indent();
        self.stmts.push(format!("{indent}// {text}"));
    }

    /// Text already shaped by the caller (may itself span several physical
    /// lines, e.g. a verbatim script statement); indents only its first
    /// line so the caller's own internal formatting survives untouched.
    pub fn verbatim(&mut self, text: &str) {
        let indent = self.indent();
        self.stmts.push(format!("{indent}{text}"));
    }

    /// `<head> { <body> }` with no trailing punctuation — functions,
    /// classes, constructors.
    pub fn block_stmt(&mut self, head: &str, f: impl FnOnce(&mut Source)) {
        let indent = self.indent();
        let inner = self.block(f);
        self.stmts.push(format!("{indent}{head} {{\n{inner}\n{indent}}}"));
    }

    /// `<head> { <body> }<suffix>` — an object-literal method (`suffix` is
    /// `,`) or a structural statement needing no semicolon (`suffix` is ``).
    pub fn block_stmt_suffixed(&mut self, head: &str, f: impl FnOnce(&mut Source), suffix: &str) {
        let indent = self.indent();
        let inner = self.block(f);
        self.stmts.push(format!("{indent}{head} {{\n{inner}\n{indent}}}{suffix}"));
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_block_is_indented_two_spaces_per_level() {
        let mut s = Source::new();
        s.block_stmt("function f()", |s| {
            s.stmt("let x = 1");
            s.block_stmt("if (x)", |s| {
                s.stmt("return x");
            });
        });
        assert_eq!(
            s.finish(),
            "function f() {\n  let x = 1;\n  if (x) {\n    return x;\n  }\n}"
        );
    }

    #[test]
    fn suffixed_block_appends_after_closing_brace() {
        let mut s = Source::new();
        s.block_stmt_suffixed("m(target, anchor)", |s| s.stmt("insert(target, p, anchor)"), ",");
        assert_eq!(s.finish(), "m(target, anchor) {\n  insert(target, p, anchor);\n},");
    }
}
