use std::{fs, io::Cursor, path::PathBuf};

use sift_lang::{
    Config, Diagnostic, MemorySnippets, SnippetProvider, Stage,
    cli::{
        self, CliError, CompileOptions, CompileResult, DiagnosticFormat, Repl, execute_check,
        execute_compile, format_tokens, run_repl,
    },
    compile, compile_with,
};

const PEOPLE: &str = r#"
// adults with their orders
people = EXTRACT name, age FROM "people.csv";
orders = EXTRACT * FROM "orders.json";
adults = SELECT p.name AS name, o.total FROM people AS p
    INNER JOIN orders AS o ON {{ p.name === o.customer }}
    WHERE {{ record.age >= 18 }};
OUTPUT adults TO "adults.csv";
"#;

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    compile(source).unwrap_err()
}

// ============================================================================
// Whole Pipeline
// ============================================================================

#[test]
fn test_compile_minimal_script() {
    let output = compile(r#"a = EXTRACT * FROM "f.csv";"#).unwrap();

    assert_eq!(
        output,
        "// Generated by sift. Changes are overwritten on the next compile.\n\
         import * as sift from \"sift-runtime\";\n\
         \n\
         \n\
         \n\
         // a\n\
         const a_0 = sift.extract(\"f.csv\", sift.allFields());\n"
    );
}

#[test]
fn test_compile_join_pipeline() {
    let output = compile(PEOPLE).unwrap();

    assert!(output.contains(
        r#"const people_0 = sift.extract("people.csv", sift.fields(["name", "age"], "3:18"));"#
    ));
    assert!(output.contains("function condition_0(p: sift.Record, o: sift.Record): boolean {"));
    assert!(output.contains("return Boolean(p.name === o.customer);"));
    assert!(output.contains(
        r#"sift.join(sift.JoinType.Inner, sift.namespace(people_0, "p"), sift.namespace(orders_0, "o"), condition_0)"#
    ));
    assert!(output.contains("const output_0 = sift.output(adults_0, \"adults.csv\");"));

    // Conditions are emitted ahead of the statements that use them.
    let condition = output.find("function condition_0").unwrap();
    let first_statement = output.find("const people_0").unwrap();
    assert!(condition < first_statement);
}

#[test]
fn test_compile_is_deterministic() {
    assert_eq!(compile(PEOPLE).unwrap(), compile(PEOPLE).unwrap());
}

#[test]
fn test_compile_with_custom_snippets() {
    let snippets = MemorySnippets::builtin()
        .with("script", "/*%conditions%*//*%statements%*/")
        .with("assignment", "var __variableName__ = /*%source%*/; // __name__");

    let output = compile_with(r#"a = EXTRACT * FROM "f.csv";"#, &snippets).unwrap();
    assert_eq!(output, "var a_0 = sift.extract(\"f.csv\", sift.allFields()); // a");
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_lex_error_stops_pipeline() {
    let errors = diagnostics("a = $;\nb = ;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Lex);
    assert_eq!(errors[0].message, "unexpected character '$'");
    assert_eq!((errors[0].line, errors[0].column), (1, 5));
}

#[test]
fn test_all_parse_errors_are_reported() {
    let errors = diagnostics(
        "a = ;\nb = EXTRACT FROM \"x.csv\";\nc = EXTRACT * FROM \"c.csv\"",
    );

    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|d| d.stage == Stage::Parse));
    assert_eq!(
        errors.iter().map(|d| d.line).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(errors[2].message, "Unexpected end of file, expected ';'");
}

#[test]
fn test_parse_errors_block_codegen() {
    // The forward reference would fail codegen; only the parse error shows.
    let errors = diagnostics("b = SELECT * FROM a;\nc = ;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Parse);
}

#[test]
fn test_codegen_error_diagnostic() {
    let errors = diagnostics("b = SELECT * FROM a;");

    assert_eq!(
        errors,
        vec![Diagnostic {
            stage: Stage::Codegen,
            message: "'a' is used before it is assigned".to_string(),
            line: 1,
            column: 19,
        }]
    );
    assert_eq!(errors[0].to_string(), "1:19: 'a' is used before it is assigned");
}

#[test]
fn test_self_join_diagnostic() {
    let errors = diagnostics(
        "a = EXTRACT * FROM \"a.csv\";\nb = SELECT * FROM a LEFT JOIN a ON {{ true }};",
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Codegen);
    assert_eq!(errors[0].message, "'a' names both sides of a join");
    assert_eq!((errors[0].line, errors[0].column), (2, 31));
}

#[test]
fn test_missing_placeholder_diagnostic() {
    let snippets = MemorySnippets::builtin().with("export", "export __variableName__;");

    let errors = compile_with("IMPORT x FROM \"./x\";\nEXPORT x;", &snippets).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Codegen);
    assert_eq!(errors[0].message, "snippet 'export' has no placeholder 'name'");
    assert_eq!((errors[0].line, errors[0].column), (2, 1));
}

#[test]
fn test_diagnostics_as_json() {
    let errors = diagnostics("a = ;");
    let json = cli::render_diagnostics(&errors, DiagnosticFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value[0]["stage"], "parse");
    assert_eq!(value[0]["line"], 1);
    assert_eq!(value[0]["column"], 5);
}

#[test]
fn test_diagnostics_as_text() {
    let errors = diagnostics("a = ;\nb = ;");
    assert_eq!(
        cli::format_diagnostics(&errors),
        "error: 1:5: Unexpected ';', expected a source (EXTRACT, SELECT or a name)\n\
         error: 2:5: Unexpected ';', expected a source (EXTRACT, SELECT or a name)"
    );
}

// ============================================================================
// CLI Operations
// ============================================================================

#[test]
fn test_execute_check() {
    let result = execute_check(PEOPLE).unwrap();
    assert_eq!(result.statements, 4);

    match execute_check("a = ;") {
        Err(CliError::Compile(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("Expected compile error, got {:?}", other),
    }
}

#[test]
fn test_check_does_not_resolve_names() {
    assert!(execute_check("b = SELECT * FROM a;").is_ok());
}

#[test]
fn test_format_tokens() {
    let dump = format_tokens("a = b;").unwrap();
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("1:1"));
    assert!(lines[0].contains("Identifier"));
    assert!(lines[0].ends_with(" a"));
    assert!(lines[3].contains("Semicolon"));
    assert!(lines[4].ends_with("EndOfFile"));
}

#[test]
fn test_execute_compile_prints_by_default() {
    let options = CompileOptions {
        script: r#"a = EXTRACT * FROM "f.csv";"#.to_string(),
        ..Default::default()
    };

    match execute_compile(&options, &Config::default()).unwrap() {
        CompileResult::Printed(text) => assert!(text.contains("const a_0")),
        other => panic!("Expected printed output, got {:?}", other),
    }
}

#[test]
fn test_execute_compile_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("out.ts");
    let options = CompileOptions {
        script: PEOPLE.to_string(),
        output: Some(target.clone()),
        ..Default::default()
    };

    match execute_compile(&options, &Config::default()).unwrap() {
        CompileResult::Written(path) => assert_eq!(path, target),
        other => panic!("Expected written output, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&target).unwrap(), compile(PEOPLE).unwrap());
}

#[test]
fn test_execute_compile_uses_configured_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let config = Config::from_toml(&format!(
        "[output]\ndir = {}\n",
        toml_string(&out)
    ))
    .unwrap();
    let options = CompileOptions {
        script: r#"a = EXTRACT * FROM "f.csv";"#.to_string(),
        script_path: Some(PathBuf::from("jobs/people.sift")),
        ..Default::default()
    };

    match execute_compile(&options, &config).unwrap() {
        CompileResult::Written(path) => assert_eq!(path, out.join("people.ts")),
        other => panic!("Expected written output, got {:?}", other),
    }
}

#[test]
fn test_execute_compile_with_snippet_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("script.ts"), "/*%conditions%*//*%statements%*/").unwrap();
    fs::write(dir.path().join("assignment.ts"), "__name__ := /*%source%*/ as __variableName__").unwrap();
    fs::write(dir.path().join("fileSource.ts"), "read(/*%filename%*/, /*%fieldSpec%*/)").unwrap();
    fs::write(dir.path().join("star.ts"), "*").unwrap();

    let options = CompileOptions {
        script: r#"a = EXTRACT * FROM "f.csv";"#.to_string(),
        snippets_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    match execute_compile(&options, &Config::default()).unwrap() {
        CompileResult::Printed(text) => assert_eq!(text, "a := read(\"f.csv\", *) as a_0"),
        other => panic!("Expected printed output, got {:?}", other),
    }
}

#[test]
fn test_execute_compile_snippet_override_keeps_configured_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("script.sql"), "/*%conditions%*//*%statements%*/").unwrap();
    fs::write(dir.path().join("assignment.sql"), "__variableName__ AS /*%source%*/ -- __name__").unwrap();
    fs::write(dir.path().join("fileSource.sql"), "READ /*%filename%*/ /*%fieldSpec%*/").unwrap();
    fs::write(dir.path().join("star.sql"), "ALL").unwrap();
    let config = Config::from_toml("[snippets]\ndir = \"does-not-exist\"\nextension = \"sql\"\n").unwrap();

    let options = CompileOptions {
        script: r#"a = EXTRACT * FROM "f.csv";"#.to_string(),
        snippets_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    match execute_compile(&options, &config).unwrap() {
        CompileResult::Printed(text) => assert_eq!(text, "a_0 AS READ \"f.csv\" ALL -- a"),
        other => panic!("Expected printed output, got {:?}", other),
    }
}

#[test]
fn test_execute_compile_reports_diagnostics() {
    let options = CompileOptions {
        script: "a = ;".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        execute_compile(&options, &Config::default()),
        Err(CliError::Compile(_))
    ));
}

#[test]
fn test_config_snippet_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("star.sql"), "ALL").unwrap();
    let config = Config::from_toml(&format!(
        "[snippets]\ndir = {}\nextension = \"sql\"\n",
        toml_string(dir.path())
    ))
    .unwrap();

    let snippets = config.snippet_provider();
    assert_eq!(snippets.get("star", &[]).unwrap(), "ALL");
}

#[test]
fn test_config_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sift.toml");
    fs::write(&path, "[snippets]\nextension = 3\n").unwrap();

    assert!(Config::load(&path).is_err());
    assert!(Config::load(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_docs() {
    assert!(cli::get_docs_overview().contains("joins"));
    assert!(cli::get_doc_category("joins").is_ok());
    assert!(matches!(
        cli::get_doc_category("nope"),
        Err(CliError::UnknownCategory(name)) if name == "nope"
    ));
}

fn toml_string(path: &std::path::Path) -> String {
    format!("'{}'", path.display())
}

// ============================================================================
// REPL
// ============================================================================

#[test]
fn test_repl_accumulates_statements() {
    let snippets = MemorySnippets::builtin();
    let mut repl = Repl::new(&snippets);

    assert!(repl.feed(r#"a = EXTRACT * FROM "f.csv""#).is_none());
    assert!(repl.is_pending());

    let first = repl.feed(";").unwrap().unwrap();
    assert!(first.contains("const a_0"));
    assert!(!repl.is_pending());

    let second = repl.feed("b = SELECT * FROM a;").unwrap().unwrap();
    assert!(second.contains("const b_0 = sift.select(a_0"));
}

#[test]
fn test_repl_drops_failed_entries() {
    let snippets = MemorySnippets::builtin();
    let mut repl = Repl::new(&snippets);

    let errors = repl.feed("b = SELECT * FROM a;").unwrap().unwrap_err();
    assert_eq!(errors[0].stage, Stage::Codegen);

    repl.feed(r#"a = EXTRACT * FROM "f.csv";"#).unwrap().unwrap();
    let output = repl.feed("b = SELECT * FROM a;").unwrap().unwrap();
    assert!(output.contains("const b_0"));
    assert!(!output.contains("b_1"));
}

#[test]
fn test_repl_reset() {
    let snippets = MemorySnippets::builtin();
    let mut repl = Repl::new(&snippets);

    repl.feed(r#"a = EXTRACT * FROM "f.csv";"#).unwrap().unwrap();
    repl.reset();
    assert!(repl.feed("b = SELECT * FROM a;").unwrap().is_err());
}

#[test]
fn test_run_repl_session() {
    let snippets = MemorySnippets::builtin();
    let input = Cursor::new("a = EXTRACT * FROM \"f.csv\"\n;\nx = $;\n:q\nb = a;\n");
    let mut output = Vec::new();

    run_repl(input, &mut output, &snippets).unwrap();
    let transcript = String::from_utf8(output).unwrap();

    assert!(transcript.starts_with("sift> "));
    assert!(transcript.contains("...> "));
    assert!(transcript.contains("const a_0"));
    assert!(transcript.contains("error: 3:5: unexpected character '$'"));
    assert!(!transcript.contains("b_0"));
}
