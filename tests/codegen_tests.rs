// tests/codegen_tests.rs

use pretty_assertions::assert_eq;
use sift_lang::ast::{
    Assignment, FieldSpec, FileSource, Identifier, JoinQuery, Literal, Script, Source, Star,
    Statement, StringLiteral, Token, TokenKind, TsExpression,
};
use sift_lang::codegen::{self, Backend, CodegenContext, CodegenError};
use sift_lang::snippet::{MemorySnippets, SnippetError};
use sift_lang::{lexer, parser};

/// Small templates that keep expected output readable.
fn compact() -> MemorySnippets {
    MemorySnippets::new()
        .with("script", "/*%conditions%*/\n---\n/*%statements%*/")
        .with("assignment", "__name__:__variableName__ = /*%source%*/")
        .with("fileSource", "extract(/*%filename%*/, /*%fieldSpec%*/)")
        .with("selectQuery", "select(/*%source%*/, /*%fields%*/, /*%where%*/)")
        .with("fieldList", "[/*%fields%*/]@/*%position%*/")
        .with("star", "*")
        .with("aliasedSource", "ns(/*%source%*/, /*%alias%*/)")
        .with("output", "__variableName__ = output(/*%source%*/, /*%fileName%*/)")
        .with("whereStatement", "where(/*%condition%*/)")
        .with(
            "joinQuery",
            "join(/*%joinType%*/, /*%left%*/, /*%right%*/, /*%condition%*/)",
        )
        .with("joinCondition", "__name__(__left__, __right__) => /*%condition%*/")
        .with("namedField", "named(/*%name%*/, /*%value%*/)")
        .with("unnamedField", "unnamed(/*%value%*/)")
        .with("renamedField", "renamed(/*%field%*/, /*%name%*/)")
        .with("param", "param __name__: __type__")
        .with("paramWithDefault", "param __name__: __type__ = /*%default%*/")
        .with("variableDefinition", "let __name__: __type__ = /*%value%*/")
        .with("variableAssignment", "__name__ = /*%value%*/")
        .with("import", "import __name__ as __variableName__ from /*%fileName%*/")
        .with("export", "export __variableName__ as __name__")
}

fn parse_clean(input: &str) -> Script {
    let tokens = lexer::tokenize(input).unwrap();
    let (script, errors) = parser::parse(tokens);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    script
}

fn render_with(input: &str, snippets: &MemorySnippets) -> Result<String, CodegenError> {
    codegen::render(&parse_clean(input), snippets)
}

fn render(input: &str) -> String {
    render_with(input, &compact()).unwrap()
}

fn token(kind: TokenKind, column: usize) -> Token {
    Token::new(kind, 1, column)
}

// ============================================================================
// Variable Naming
// ============================================================================

#[test]
fn test_reassignment_refers_to_previous_binding() {
    let output = render(r#"a = EXTRACT * FROM "f.csv"; a = SELECT * FROM a;"#);

    assert_eq!(
        output,
        "\n---\na:a_0 = extract(\"f.csv\", *)\na:a_1 = select(a_0, *, )"
    );
}

#[test]
fn test_reference_resolves_to_latest_binding() {
    let output = render(
        r#"
        a = EXTRACT * FROM "f.csv";
        a = SELECT * FROM a;
        b = SELECT * FROM a;
        "#,
    );

    assert!(output.contains("b:b_0 = select(a_1, *, )"), "{}", output);
}

#[test]
fn test_forward_reference_is_unresolved() {
    let error = render_with("b = SELECT * FROM a;", &compact()).unwrap_err();

    match error {
        CodegenError::UnresolvedIdentifier { name, line, column } => {
            assert_eq!(name, "a");
            assert_eq!((line, column), (1, 19));
        }
        other => panic!("Expected unresolved identifier, got {:?}", other),
    }
}

#[test]
fn test_first_assignment_cannot_refer_to_itself() {
    let error = render_with("a = SELECT * FROM a;", &compact()).unwrap_err();
    assert!(matches!(error, CodegenError::UnresolvedIdentifier { ref name, .. } if name == "a"));
}

#[test]
fn test_context_bind_and_resolve() {
    let mut context = CodegenContext::default();
    assert_eq!(context.resolve("a"), None);

    assert_eq!(context.bind("a"), "a_0");
    assert_eq!(context.bind("b"), "b_0");
    assert_eq!(context.bind("a"), "a_1");

    assert_eq!(context.resolve("a"), Some("a_1".to_string()));
    assert_eq!(context.resolve("b"), Some("b_0".to_string()));
}

// ============================================================================
// Joins
// ============================================================================

#[test]
fn test_join_condition_is_hoisted() {
    let output = render(
        r#"
        a = EXTRACT * FROM "a.csv";
        b = EXTRACT * FROM "b.csv";
        x = SELECT * FROM a AS l INNER JOIN b AS r ON {{ l.id == r.id }};
        "#,
    );

    assert_eq!(
        output,
        "condition_0(l, r) => l.id == r.id\n---\n\
         a:a_0 = extract(\"a.csv\", *)\n\
         b:b_0 = extract(\"b.csv\", *)\n\
         x:x_0 = select(join(Inner, ns(a_0, \"l\"), ns(b_0, \"r\"), condition_0), *, )"
    );
}

#[test]
fn test_chained_join_conditions_are_numbered_in_order() {
    let output = render(
        r#"
        a = EXTRACT * FROM "a.csv";
        b = EXTRACT * FROM "b.csv";
        c = EXTRACT * FROM "c.csv";
        x = SELECT * FROM a INNER JOIN b ON {{c1}} LEFT JOIN c ON {{c2}};
        "#,
    );

    let (conditions, statements) = output.split_once("\n---\n").unwrap();
    assert_eq!(
        conditions,
        "condition_0(a, b) => c1\n\ncondition_1({ a, b }, c) => c2"
    );
    assert!(
        statements.ends_with(
            r#"x:x_0 = select(join(Left, join(Inner, ns(a_0, "a"), ns(b_0, "b"), condition_0), ns(c_0, "c"), condition_1), *, )"#
        ),
        "{}",
        statements
    );
}

#[test]
fn test_join_types() {
    for (keyword, expected) in [
        ("INNER", "Inner"),
        ("LEFT", "Left"),
        ("RIGHT", "Right"),
        ("OUTER", "Outer"),
    ] {
        let output = render(&format!(
            r#"a = EXTRACT * FROM "a.csv"; x = SELECT * FROM a AS l {} JOIN a AS r ON {{{{ true }}}};"#,
            keyword
        ));
        assert!(
            output.contains(&format!(
                r#"join({}, ns(a_0, "l"), ns(a_0, "r"), condition_0)"#,
                expected
            )),
            "{}",
            output
        );
    }
}

#[test]
fn test_unaliased_subquery_side_uses_fallback_parameter() {
    let output = render(
        r#"
        a = EXTRACT * FROM "a.csv";
        b = EXTRACT * FROM "b.csv";
        c = EXTRACT * FROM "c.csv";
        x = SELECT * FROM (SELECT * FROM a) INNER JOIN b ON {{c1}} LEFT JOIN c ON {{c2}};
        "#,
    );

    let (conditions, _) = output.split_once("\n---\n").unwrap();
    assert_eq!(
        conditions,
        "condition_0(left, b) => c1\n\ncondition_1({ b }, c) => c2"
    );
}

#[test]
fn test_self_join_needs_aliases() {
    let error = render_with(
        "a = EXTRACT * FROM \"a.csv\";\nx = SELECT * FROM a INNER JOIN a ON {{ true }};",
        &compact(),
    )
    .unwrap_err();

    match error {
        CodegenError::DuplicateJoinName { name, line, column } => {
            assert_eq!(name, "a");
            assert_eq!((line, column), (2, 32));
        }
        other => panic!("Expected duplicate join name, got {:?}", other),
    }
}

#[test]
fn test_namespace_reused_further_down_a_chain() {
    let error = render_with(
        r#"
        a = EXTRACT * FROM "a.csv";
        x = SELECT * FROM a AS l INNER JOIN a AS r ON {{c1}} LEFT JOIN a AS l ON {{c2}};
        "#,
        &compact(),
    )
    .unwrap_err();

    assert!(matches!(error, CodegenError::DuplicateJoinName { ref name, line: 3, .. } if name == "l"));
}

#[test]
fn test_join_operator_without_join_type_is_rejected() {
    let file = |column| {
        Source::File(FileSource {
            token: token(TokenKind::Extract, column),
            field_spec: FieldSpec::Star(Star {
                token: token(TokenKind::Star, column),
            }),
            file_name: StringLiteral {
                token: token(TokenKind::String, column),
                value: "f.csv".to_string(),
            },
        })
    };
    let name_token = Token::with_value(TokenKind::Identifier, Literal::String("x".into()), 1, 1);
    let script = Script {
        token: token(TokenKind::Identifier, 1),
        statements: vec![Statement::Assignment(Assignment {
            token: name_token.clone(),
            name: Identifier {
                token: name_token,
                name: "x".to_string(),
            },
            source: Source::Join(JoinQuery {
                token: token(TokenKind::Join, 7),
                left: Box::new(file(3)),
                right: Box::new(file(9)),
                condition: TsExpression {
                    token: token(TokenKind::TsExpression, 12),
                    code: "true".to_string(),
                },
            }),
        })],
    };

    match codegen::render(&script, &compact()).unwrap_err() {
        CodegenError::UnknownJoinType { kind, line, column } => {
            assert_eq!(kind, TokenKind::Join);
            assert_eq!((line, column), (1, 7));
        }
        other => panic!("Expected unknown join type, got {:?}", other),
    }
}

// ============================================================================
// Selects, Fields and Outputs
// ============================================================================

#[test]
fn test_where_clause() {
    let output = render(
        r#"a = EXTRACT * FROM "f.csv"; b = SELECT * FROM a WHERE {{ a.x > 1 }};"#,
    );
    assert!(output.contains("b:b_0 = select(a_0, *, where(a.x > 1))"), "{}", output);
}

#[test]
fn test_field_list_rendering() {
    let output = render(
        r#"a = EXTRACT name, p.age AS years, "x", 1.5, {{ r.n }} AS n FROM "f.csv";"#,
    );

    assert!(
        output.contains(
            r#"extract("f.csv", ["name", renamed("p.age", "years"), unnamed("x"), unnamed(1.5), named("n", r.n)]@"1:13")"#
        ),
        "{}",
        output
    );
}

#[test]
fn test_outputs_are_numbered() {
    let output = render(
        r#"
        a = EXTRACT * FROM "a.csv";
        OUTPUT a TO "one.csv";
        OUTPUT SELECT * FROM a TO "two.json";
        "#,
    );

    assert!(output.contains("output_0 = output(a_0, \"one.csv\")"), "{}", output);
    assert!(
        output.contains("output_1 = output(select(a_0, *, ), \"two.json\")"),
        "{}",
        output
    );
}

#[test]
fn test_parenthesized_aliased_source_is_namespaced() {
    let output = render(
        r#"a = EXTRACT * FROM "a.csv"; b = SELECT * FROM (SELECT * FROM a) AS inner_a;"#,
    );
    assert!(
        output.contains(r#"b:b_0 = select(ns(select(a_0, *, ), "inner_a"), *, )"#),
        "{}",
        output
    );
}

#[test]
fn test_alias_reaches_select_source() {
    let output = render(r#"a = EXTRACT * FROM "a.csv"; b = SELECT p.x FROM a AS p;"#);
    assert!(
        output.contains(r#"b:b_0 = select(ns(a_0, "p"), "#),
        "{}",
        output
    );
}

// ============================================================================
// Params, Variables and Modules
// ============================================================================

#[test]
fn test_params_and_variables() {
    let output = render(
        r#"
        PARAM @country : string;
        PARAM @limit : number = 10;
        @x : string = "a";
        @x = @limit;
        "#,
    );

    assert_eq!(
        output,
        "\n---\nparam country: string\nparam limit: number = 10\nlet x: string = \"a\"\nx = limit"
    );
}

#[test]
fn test_import_binds_and_export_resolves() {
    let output = render(r#"IMPORT people FROM "./people"; EXPORT people;"#);

    assert_eq!(
        output,
        "\n---\nimport people as people_0 from \"./people\"\nexport people_0 as people"
    );
}

#[test]
fn test_export_of_unknown_name() {
    let error = render_with("EXPORT nothing;", &compact()).unwrap_err();
    assert!(matches!(error, CodegenError::UnresolvedIdentifier { ref name, column: 8, .. } if name == "nothing"));
}

// ============================================================================
// Snippet Failures
// ============================================================================

#[test]
fn test_missing_placeholder_aborts_render() {
    let snippets = compact().with("output", "__variableName__ = output(/*%source%*/)");
    let error = render_with(
        "a = EXTRACT * FROM \"f.csv\";\nOUTPUT a TO \"o.csv\";",
        &snippets,
    )
    .unwrap_err();

    assert_eq!(error.position(), (2, 1));
    match error {
        CodegenError::Snippet {
            source: SnippetError::MissingPlaceholder {
                snippet,
                placeholder,
            },
            ..
        } => {
            assert_eq!(snippet, "output");
            assert_eq!(placeholder, "fileName");
        }
        other => panic!("Expected missing placeholder, got {:?}", other),
    }
}

#[test]
fn test_unknown_snippet() {
    let error = render_with(r#"a = EXTRACT * FROM "f.csv";"#, &MemorySnippets::new()).unwrap_err();
    assert!(matches!(
        error,
        CodegenError::Snippet {
            source: SnippetError::UnknownSnippet(ref name),
            ..
        } if name == "star"
    ));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_render_is_idempotent() {
    let script = parse_clean(
        r#"
        a = EXTRACT * FROM "a.csv";
        b = SELECT * FROM a AS l LEFT JOIN a AS r ON {{ l.k == r.k }};
        b = SELECT * FROM b;
        OUTPUT b TO "b.csv";
        "#,
    );
    let snippets = MemorySnippets::builtin();

    let mut backend = Backend::new(&snippets);
    let first = backend.render(&script).unwrap();
    let second = backend.render(&script).unwrap();
    let fresh = Backend::new(&snippets).render(&script).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
    assert_eq!(first.matches("function condition_0").count(), 1);
    assert!(first.contains("const output_0 ="));
    assert!(!first.contains("output_1"));
}
