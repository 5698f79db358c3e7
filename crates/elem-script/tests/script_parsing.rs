use elem_ast::VarInfo;
use elem_script::{lift, parse, rewrite_assignments, rewrite_variable_names};

#[test]
fn declares_root_scope_name_in_order() {
    let src = r#"let name = "world";"#;
    let tree = parse(src).unwrap();
    let names: Vec<String> = tree
        .statements
        .iter()
        .flat_map(|n| n.declared_names(src))
        .collect();
    assert_eq!(names, vec!["name".to_string()]);
}

#[test]
fn reactive_lifting_prepends_declaration_and_assignment_rewrite_invalidates() {
    let src = "let n = 1;\n$: doubled = n * 2;\n";
    let tree = parse(src).unwrap();
    let lifted = lift(&tree, src);
    assert_eq!(lifted.reactive.len(), 1);
    assert_eq!(lifted.reactive[0].name.as_deref(), Some("doubled"));

    let mut vars = VarInfo::new();
    vars.push(0, "n");
    vars.push(1, "doubled");

    let body_src = lifted.reactive[0].body.slice(src);
    let (rewritten, touched) = rewrite_assignments(body_src, &vars, |hit| {
        format!("$$invalidate({}, {})", hit.index, hit.original)
    });
    assert_eq!(rewritten, "$$invalidate(1, doubled = n * 2)");
    assert_eq!(touched.names(), vec!["doubled"]);
}

#[test]
fn event_handler_reassignment_is_wrapped() {
    let src = "count += 1";
    let mut vars = VarInfo::new();
    vars.push(0, "count");
    let (rewritten, touched) = rewrite_assignments(src, &vars, |hit| {
        format!("$$invalidate({}, {})", hit.index, hit.original)
    });
    assert_eq!(rewritten, "$$invalidate(0, count += 1)");
    assert_eq!(touched.names(), vec!["count"]);
}

#[test]
fn context_lookup_rewrite_leaves_non_root_names_untouched() {
    let src = "Hello {name}!";
    let mut vars = VarInfo::new();
    vars.push(0, "name");
    let (rewritten, touched) =
        rewrite_variable_names(src, &vars, &[], |hit| format!("/* {} */ ctx[{}]", hit.name, hit.index));
    assert_eq!(rewritten, "Hello {/* name */ ctx[0]}!");
    assert_eq!(touched.names(), vec!["name"]);
}
