//! Two-pass assembly (spec §4.4): root-scope extraction, then naming.

use elem_ast::{Document, MarkupNode, NamedVar};
use rustc_hash::FxHashMap;

use crate::component::{Component, ParsedScript};
use crate::error::{Error, ErrorKind};

pub fn assemble(src: &str, doc: Document, name: impl Into<String>) -> Result<Component, Error> {
    let name = name.into();
    tracing::debug!(component = %name, roots = doc.roots.len(), "assembling component");

    let mut script_leaf = None;
    let mut styles = Vec::new();
    let mut fragment = Vec::new();

    for root in doc.roots {
        match root {
            MarkupNode::LeafElement(leaf) if leaf.tag == "script" => {
                if script_leaf.is_some() {
                    return Err(Error::new(
                        ErrorKind::MultipleRootScripts,
                        "More than one <script /> element found",
                    ));
                }
                script_leaf = Some(leaf);
            }
            MarkupNode::LeafElement(leaf) if leaf.tag == "style" => styles.push(leaf.content),
            other => fragment.push(other),
        }
    }

    let mut prefix_counts: FxHashMap<String, usize> = FxHashMap::default();
    count_prefixes(&fragment, 1, &mut prefix_counts)?;

    let mut per_prefix_counter: FxHashMap<String, usize> = FxHashMap::default();
    let mut vars = Vec::new();
    assign_names(&fragment, None, &prefix_counts, &mut per_prefix_counter, &mut vars);

    let script = match script_leaf {
        Some(leaf) => {
            let tree = elem_script::parse(&leaf.content)?;
            Some(ParsedScript { src: leaf.content, tree })
        }
        None => None,
    };

    Ok(Component { name, markup_src: src.to_string(), script, styles, vars, fragment })
}

/// Tallies, per name prefix, how many fragment nodes will claim it — and
/// rejects any `<script>`/`<style>` found below the document root (`depth`
/// starts at 1 for the fragment roots themselves).
fn count_prefixes(nodes: &[MarkupNode], depth: usize, counts: &mut FxHashMap<String, usize>) -> Result<(), Error> {
    for node in nodes {
        if depth > 1 {
            if let MarkupNode::LeafElement(leaf) = node {
                if leaf.tag == "script" || leaf.tag == "style" {
                    return Err(Error::new(
                        ErrorKind::NestedLeafElement,
                        format!("Cannot add <{}> element other than as a root element", leaf.tag),
                    ));
                }
            }
        }
        if let MarkupNode::Element(el) = node {
            check_directives(el)?;
        }
        *counts.entry(node.name_prefix().to_string()).or_insert(0) += 1;
        count_prefixes(node.children(), depth + 1, counts)?;
    }
    Ok(())
}

/// Only `on:<dir>` is a recognized directive form — anything else with a
/// `name:dir` suffix is a structural error, not a markup-parse failure
/// (spec §7 categorizes "unknown directive syntax" under Component
/// assembly).
fn check_directives(el: &elem_ast::ElementNode) -> Result<(), Error> {
    for attr in &el.attributes {
        if let Some(dir) = &attr.directive {
            if attr.name != "on" {
                return Err(Error::new(
                    ErrorKind::UnknownDirective,
                    format!("Invalid attribute with directive, {}:{}", attr.name, dir),
                ));
            }
        }
    }
    Ok(())
}

/// Walks the fragment in the same order as [`count_prefixes`], assigning a
/// bare prefix when it is unique or `prefix<n>` with a monotonically
/// increasing per-prefix counter otherwise.
fn assign_names(
    nodes: &[MarkupNode],
    parent_name: Option<&str>,
    counts: &FxHashMap<String, usize>,
    per_prefix_counter: &mut FxHashMap<String, usize>,
    out: &mut Vec<NamedVar>,
) {
    for node in nodes {
        let prefix = node.name_prefix();
        let total = counts.get(prefix).copied().unwrap_or(0);
        let name = if total <= 1 {
            prefix.to_string()
        } else {
            let counter = per_prefix_counter.entry(prefix.to_string()).or_insert(0);
            let n = format!("{prefix}{counter}");
            *counter += 1;
            n
        };

        out.push(NamedVar {
            node_id: node.id(),
            name: name.clone(),
            parent_name: parent_name.map(str::to_string),
        });
        assign_names(node.children(), Some(&name), counts, per_prefix_counter, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(src: &str) -> Document {
        elem_parser::parse(src).expect("markup should parse")
    }

    fn build(src: &str) -> Result<Component, Error> {
        assemble(src, doc(src), "App")
    }

    #[test]
    fn unique_prefixes_stay_bare() {
        let c = build("<h1>Hello {name}!</h1>").unwrap();
        let names: Vec<&str> = c.vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["h1", "t0", "t1", "t2"]);
    }

    #[test]
    fn repeated_prefixes_get_monotonic_disambiguators() {
        let c = build("<p>a</p><p>b</p>").unwrap();
        let names: Vec<&str> = c.vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["p0", "t0", "p1", "t1"]);
    }

    #[test]
    fn parent_name_recorded_only_within_fragment() {
        let c = build("<div><span>x</span></div>").unwrap();
        let div = &c.vars[0];
        assert_eq!(div.name, "div");
        assert!(div.parent_name.is_none());
        let span = &c.vars[1];
        assert_eq!(span.name, "span");
        assert_eq!(span.parent_name.as_deref(), Some("div"));
    }

    #[test]
    fn root_script_and_style_are_extracted_not_named() {
        let c = build("<script>let x = 1;</script><style>p{color:red}</style><p>hi</p>").unwrap();
        assert!(c.script.is_some());
        assert_eq!(c.styles, vec!["p{color:red}".to_string()]);
        assert_eq!(c.vars.len(), 1);
        assert_eq!(c.vars[0].name, "p");
    }

    #[test]
    fn second_root_script_errors() {
        let err = build("<script>let a=1;</script><script>let b=2;</script>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleRootScripts);
    }

    #[test]
    fn nested_script_below_root_errors() {
        let err = build("<div><script>let a=1;</script></div>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestedLeafElement);
    }

    #[test]
    fn on_directive_is_accepted() {
        let c = build(r#"<button on:click={handleClick}>go</button>"#).unwrap();
        assert_eq!(c.vars[0].name, "button");
    }

    #[test]
    fn unknown_directive_errors() {
        let err = build(r#"<div foo:bar="x"></div>"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownDirective);
    }

    #[test]
    fn fragment_nodes_line_up_with_vars() {
        let c = build("<p>a</p><p>b</p>").unwrap();
        let nodes = c.fragment_nodes();
        assert_eq!(nodes.len(), c.vars.len());
        for (var, node) in c.vars.iter().zip(nodes.iter()) {
            assert_eq!(var.node_id, node.id());
        }
    }
}
