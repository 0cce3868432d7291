//! Bundled TypeScript snippets targeting the `sift-runtime` streaming package.

/// Snippet names the code generator asks for.
pub const REQUIRED_SNIPPETS: &[&str] = &[
    "script",
    "assignment",
    "fileSource",
    "selectQuery",
    "fieldList",
    "star",
    "output",
    "whereStatement",
    "joinQuery",
    "joinCondition",
    "aliasedSource",
    "namedField",
    "unnamedField",
    "renamedField",
    "param",
    "paramWithDefault",
    "variableDefinition",
    "variableAssignment",
    "import",
    "export",
];

pub(super) const SNIPPETS: &[(&str, &str)] = &[
    (
        "script",
        r#"// Generated by sift. Changes are overwritten on the next compile.
import * as sift from "sift-runtime";

/*%conditions%*/

/*%statements%*/
"#,
    ),
    (
        "assignment",
        "// __name__\nconst __variableName__ = /*%source%*/;",
    ),
    ("fileSource", "sift.extract(/*%filename%*/, /*%fieldSpec%*/)"),
    (
        "selectQuery",
        "sift.select(/*%source%*/, /*%fields%*/, /*%where%*/)",
    ),
    ("fieldList", "sift.fields([/*%fields%*/], /*%position%*/)"),
    ("star", "sift.allFields()"),
    (
        "aliasedSource",
        "sift.namespace(/*%source%*/, /*%alias%*/)",
    ),
    (
        "output",
        "const __variableName__ = sift.output(/*%source%*/, /*%fileName%*/);",
    ),
    (
        "whereStatement",
        "(record: sift.Record): boolean => Boolean(/*%condition%*/)",
    ),
    (
        "joinQuery",
        "sift.join(sift.JoinType./*%joinType%*/, /*%left%*/, /*%right%*/, /*%condition%*/)",
    ),
    (
        "joinCondition",
        "function __name__(__left__: sift.Record, __right__: sift.Record): boolean {\n    return Boolean(/*%condition%*/);\n}",
    ),
    (
        "namedField",
        "sift.computed(/*%name%*/, (record: sift.Record) => (/*%value%*/))",
    ),
    (
        "unnamedField",
        "sift.computed(null, (record: sift.Record) => (/*%value%*/))",
    ),
    ("renamedField", "sift.rename(/*%field%*/, /*%name%*/)"),
    (
        "param",
        "const __name__ = sift.param<__type__>(\"__name__\");",
    ),
    (
        "paramWithDefault",
        "const __name__ = sift.param<__type__>(\"__name__\", /*%default%*/);",
    ),
    (
        "variableDefinition",
        "let __name__: __type__ = /*%value%*/;",
    ),
    ("variableAssignment", "__name__ = /*%value%*/;"),
    (
        "import",
        "import { __name__ as __variableName__ } from /*%fileName%*/;",
    ),
    ("export", "export { __variableName__ as __name__ };"),
];
