//! Attribute value parsing (spec §4.3a).

use elem_ast::{Attribute, AttributeValue, ExprSrc};

use crate::error::{Error, ErrorKind};

/// Parses one attribute token's raw text (`name`, or `name=value`) into
/// an [`Attribute`]. `base` is `raw`'s absolute byte offset in the source,
/// used to position errors.
pub fn parse_attribute(raw: &str, base: usize) -> Result<Attribute, Error> {
    let (name_part, value_part) = match raw.find('=') {
        Some(idx) => (&raw[..idx], Some(&raw[idx + 1..])),
        None => (raw, None),
    };
    let (name, directive) = split_directive(name_part);

    let value = match value_part {
        None => AttributeValue::Static(String::new()),
        Some(v) => {
            let value_base = base + raw.len() - v.len();
            parse_value(strip_quotes(v), quote_offset(v) + value_base)?
        }
    };

    Ok(Attribute {
        span: elem_ast::Span::new(base, base + raw.len()),
        name: name.to_string(),
        directive,
        value,
    })
}

fn split_directive(name: &str) -> (&str, Option<String>) {
    match name.find(':') {
        Some(idx) => (&name[..idx], Some(name[idx + 1..].to_string())),
        None => (name, None),
    }
}

fn is_quoted(v: &str) -> bool {
    let b = v.as_bytes();
    b.len() >= 2 && (b[0] == b'"' || b[0] == b'\'') && b[b.len() - 1] == b[0]
}

fn quote_offset(v: &str) -> usize {
    if is_quoted(v) {
        1
    } else {
        0
    }
}

fn strip_quotes(v: &str) -> &str {
    if v.len() < 2 {
        return "";
    }
    if is_quoted(v) {
        &v[1..v.len() - 1]
    } else {
        v
    }
}

fn parse_value(v: &str, base: usize) -> Result<AttributeValue, Error> {
    if !v.as_bytes().contains(&b'{') {
        return Ok(AttributeValue::Static(v.to_string()));
    }

    let mut literals = Vec::new();
    let mut exprs = Vec::new();
    let bytes = v.as_bytes();
    let mut i = 0usize;

    loop {
        match bytes[i..].iter().position(|&b| b == b'{') {
            None => {
                literals.push(v[i..].to_string());
                break;
            }
            Some(rel) => {
                let brace = i + rel;
                literals.push(v[i..brace].to_string());
                let len = elem_scan::index_after_curly_group(&bytes[brace..]).ok_or_else(|| {
                    Error::new(
                        ErrorKind::UnclosedExpressionInAttribute,
                        base + brace,
                        "Unclosed expression in attribute value",
                    )
                })?;
                let inner = &v[brace + 1..brace + len - 1];
                exprs.push(ExprSrc(inner.to_string()));
                i = brace + len;
            }
        }
    }

    if exprs.len() == 1 && literals.len() == 2 && literals[0].is_empty() && literals[1].is_empty() {
        Ok(AttributeValue::Expression(exprs.into_iter().next().unwrap()))
    } else {
        Ok(AttributeValue::Template { literals, exprs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_value_roundtrips() {
        let attr = parse_attribute("class=\"plain\"", 0).unwrap();
        assert_eq!(attr.name, "class");
        assert!(matches!(attr.value, AttributeValue::Static(ref s) if s == "plain"));
    }

    #[test]
    fn bare_braces_value_is_expression() {
        let attr = parse_attribute("count={n + 1}", 0).unwrap();
        match attr.value {
            AttributeValue::Expression(ref e) => assert_eq!(e.as_str(), "n + 1"),
            _ => panic!("expected Expression"),
        }
    }

    #[test]
    fn mixed_literal_and_expression_is_template() {
        let attr = parse_attribute("class=\"{a} plain {b}\"", 0).unwrap();
        match attr.value {
            AttributeValue::Template { ref literals, ref exprs } => {
                assert_eq!(literals, &["".to_string(), " plain ".to_string(), "".to_string()]);
                assert_eq!(exprs.len(), 2);
                assert_eq!(exprs[0].as_str(), "a");
                assert_eq!(exprs[1].as_str(), "b");
            }
            _ => panic!("expected Template"),
        }
    }

    #[test]
    fn directive_suffix_splits_name() {
        let attr = parse_attribute("on:click={() => count += 1}", 0).unwrap();
        assert_eq!(attr.name, "on");
        assert_eq!(attr.directive.as_deref(), Some("click"));
        assert!(attr.is_on_directive());
    }

    #[test]
    fn no_value_is_empty_static() {
        let attr = parse_attribute("disabled", 0).unwrap();
        assert!(matches!(attr.value, AttributeValue::Static(ref s) if s.is_empty()));
    }

    #[test]
    fn unclosed_expression_errors() {
        let err = parse_attribute("href=\"{foo\"", 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnclosedExpressionInAttribute);
    }
}
