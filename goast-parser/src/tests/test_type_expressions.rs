use crate::ast::*;
use crate::parser::GoastParser;

fn parse(input: &str) -> TypeExpr {
    GoastParser::parse_type_expr(input).unwrap()
}

fn name(n: &str) -> TypeExpr {
    TypeExpr::name(n)
}

#[test]
fn test_plain_and_qualified_names() {
    assert_eq!(parse("Input"), name("Input"));
    assert_eq!(
        parse("sync.Mutex"),
        TypeExpr::Qualified("sync".to_string(), "Mutex".to_string())
    );
}

#[test]
fn test_pointer_slice_and_array() {
    assert_eq!(parse("*T"), TypeExpr::pointer(name("T")));
    assert_eq!(parse("[]T"), TypeExpr::slice(name("T")));
    assert_eq!(
        parse("[4]byte"),
        TypeExpr::Array {
            len: Some("4".to_string()),
            elem: Box::new(name("byte")),
        }
    );
}

#[test]
fn test_map_type() {
    assert_eq!(
        parse("map[string][]int"),
        TypeExpr::map(name("string"), TypeExpr::slice(name("int")))
    );
}

#[test]
fn test_channel_directions() {
    assert_eq!(parse("chan T"), TypeExpr::channel(ChanDir::Both, name("T")));
    assert_eq!(parse("chan<- T"), TypeExpr::channel(ChanDir::Send, name("T")));
    assert_eq!(parse("<-chan T"), TypeExpr::channel(ChanDir::Recv, name("T")));
}

#[test]
fn test_channel_of_receive_channel_needs_parens() {
    assert_eq!(
        parse("chan (<-chan T)"),
        TypeExpr::channel(
            ChanDir::Both,
            TypeExpr::Paren(Box::new(TypeExpr::channel(ChanDir::Recv, name("T"))))
        )
    );
}

#[test]
fn test_function_type_with_named_params_and_single_result() {
    match parse("func(in <-chan Input) <-chan Output") {
        TypeExpr::Function { params, results } => {
            assert_eq!(params.fields.len(), 1);
            assert_eq!(params.fields[0].names, vec!["in".to_string()]);
            assert_eq!(
                params.fields[0].ty,
                TypeExpr::channel(ChanDir::Recv, name("Input"))
            );
            assert_eq!(results.fields.len(), 1);
            assert!(results.fields[0].names.is_empty());
            assert_eq!(
                results.fields[0].ty,
                TypeExpr::channel(ChanDir::Recv, name("Output"))
            );
        }
        other => panic!("Expected function type, got {:?}", other),
    }
}

#[test]
fn test_function_type_grouped_and_unnamed_params() {
    match parse("func(a, b int, s string) (int, error)") {
        TypeExpr::Function { params, results } => {
            assert_eq!(params.fields.len(), 2);
            assert_eq!(params.num_fields(), 3);
            assert_eq!(params.fields[0].names, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(results.num_fields(), 2);
            assert!(results.fields.iter().all(|field| field.names.is_empty()));
        }
        other => panic!("Expected function type, got {:?}", other),
    }

    match parse("func(int, string)") {
        TypeExpr::Function { params, results } => {
            assert_eq!(params.num_fields(), 2);
            assert_eq!(params.fields[0].ty, name("int"));
            assert_eq!(params.fields[1].ty, name("string"));
            assert!(results.is_empty());
        }
        other => panic!("Expected function type, got {:?}", other),
    }
}

#[test]
fn test_variadic_parameter() {
    match parse("func(cs ...<-chan T) <-chan T") {
        TypeExpr::Function { params, .. } => {
            assert_eq!(
                params.fields[0].ty,
                TypeExpr::Variadic(Box::new(TypeExpr::channel(ChanDir::Recv, name("T"))))
            );
        }
        other => panic!("Expected function type, got {:?}", other),
    }
}

#[test]
fn test_struct_with_embedded_and_tagged_fields() {
    let input = "struct {\n\tsync.Mutex\n\t*Base\n\tName, Alias string `json:\"name\"`\n\tCount int\n}";
    match parse(input) {
        TypeExpr::Struct(fields) => {
            assert_eq!(fields.fields.len(), 4);
            assert_eq!(fields.fields[0].effective_names(), vec!["Mutex"]);
            assert_eq!(fields.fields[1].ty, TypeExpr::pointer(name("Base")));
            assert_eq!(fields.fields[1].effective_names(), vec!["Base"]);
            assert_eq!(fields.fields[2].names.len(), 2);
            assert_eq!(fields.fields[2].tag.as_deref(), Some("`json:\"name\"`"));
            assert_eq!(fields.num_fields(), 5);
            assert!(fields.field_by_name("Count").is_some());
            assert!(fields.field_by_name("Missing").is_none());
        }
        other => panic!("Expected struct type, got {:?}", other),
    }
}

#[test]
fn test_empty_struct_and_interface() {
    assert_eq!(parse("struct{}"), TypeExpr::Struct(FieldList::default()));
    assert_eq!(parse("interface{}"), TypeExpr::empty_interface());
    assert!(parse("interface{}").is_empty_interface());
    assert!(!parse("struct{}").is_empty_interface());
}

#[test]
fn test_interface_methods_and_embeds() {
    let input = "interface {\n\tio.Reader\n\tLen() int\n\tPush(v T)\n}";
    match parse(input) {
        TypeExpr::Interface(methods) => {
            assert_eq!(methods.fields.len(), 3);
            assert_eq!(
                methods.fields[0].ty,
                TypeExpr::Qualified("io".to_string(), "Reader".to_string())
            );
            assert_eq!(methods.fields[1].names, vec!["Len".to_string()]);
            assert!(matches!(methods.fields[2].ty, TypeExpr::Function { .. }));
        }
        other => panic!("Expected interface type, got {:?}", other),
    }
}

#[test]
fn test_reserved_words_are_not_type_names() {
    assert!(GoastParser::parse_type_expr("func").is_err());
    assert!(GoastParser::parse_type_expr("[]map").is_err());
}

#[test]
fn test_display_round_trips_through_parser() {
    for source in [
        "[]T",
        "map[K]V",
        "chan<- T",
        "<-chan []int",
        "chan (<-chan T)",
        "func(in <-chan T) <-chan T",
        "func(a, b int) (int, error)",
        "struct{}",
        "interface{}",
        "*pkg.Value",
    ] {
        let parsed = parse(source);
        assert_eq!(parsed.to_string(), source);
    }
}

#[test]
fn test_unparen_strips_nested_parentheses() {
    let nested = parse("((T))");
    assert_eq!(nested.unparen(), &name("T"));
}
