//! Language reference for the sift CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Sources,
    Fields,
    Joins,
    Variables,
    Snippets,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "sources" | "source" => Some(Self::Sources),
            "fields" | "field" => Some(Self::Fields),
            "joins" | "join" => Some(Self::Joins),
            "variables" | "variable" | "params" => Some(Self::Variables),
            "snippets" | "snippet" | "templates" => Some(Self::Snippets),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"SIFT DOCUMENTATION

Sift compiles extract/select/join/output scripts into streaming pipeline code.
A script is a list of statements ending in ';'. Sources are bound to names,
refined with SELECT and JOIN, and written to files with OUTPUT.

DOCUMENTATION CATEGORIES

  syntax            Statements, comments, literals and embedded expressions
  sources           EXTRACT, SELECT, names and aliases
  fields            Field lists, namespaces, aliases and computed fields
  joins             INNER, LEFT, RIGHT and OUTER joins
  variables         PARAM declarations and @variables
  snippets          Template placeholders used by the code generator

QUICK REFERENCE

  a = EXTRACT * FROM "a.csv";          Read a file
  b = SELECT x, y FROM a;              Project fields
  SELECT * FROM a WHERE {{ x > 1 }}    Filter rows
  a AS l INNER JOIN b AS r ON {{..}}   Join two sources
  OUTPUT b TO "b.csv";                 Write a file

Run 'sift doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Sources) => Ok(SOURCES_DOC),
        Some(DocCategory::Fields) => Ok(FIELDS_DOC),
        Some(DocCategory::Joins) => Ok(JOINS_DOC),
        Some(DocCategory::Variables) => Ok(VARIABLES_DOC),
        Some(DocCategory::Snippets) => Ok(SNIPPETS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Statements and Literals

STATEMENTS
  Every statement ends with ';'. Statements run in order, and a name must be
  assigned before it is used.

    name = <source>;
    OUTPUT <source> TO "file.csv";
    PARAM @name : type [= value];
    @name : type = value;
    @name = value;
    IMPORT name FROM "./module";
    EXPORT name;

KEYWORDS
  Keywords are upper case and case-sensitive: 'select' is a plain name.

COMMENTS
  // to the end of the line
  /* across
     lines */

LITERALS
  "text"            Strings keep their escapes as written
  42  3.50          Numbers are exact decimals
  true  false       Booleans

EMBEDDED EXPRESSIONS
  {{ ... }}
    Host-language code, copied to the output unchanged. Use a backslash to
    escape a closing brace pair: {{ "\}}" }}.

DIRECTIVES
  #DECLARE #SET #IF #ELSE #END #WARN #ERROR are reserved. The parser reports
  them as unsupported.
"#;

const SOURCES_DOC: &str = r#"SOURCES - Where Records Come From

EXTRACT
  EXTRACT <fields> FROM "file"
    Reads a CSV, TSV or JSON file.

    Example:
      people = EXTRACT name, age FROM "people.csv";

SELECT
  SELECT <fields> FROM <source> [WHERE {{ condition }}]
    Projects fields of another source and optionally filters rows.

    Example:
      adults = SELECT name FROM people WHERE {{ age >= 18 }};

NAMES
  A bare name refers to the latest assignment of that name. Assigning the
  same name again shadows the earlier binding:

      a = EXTRACT * FROM "a.csv";
      a = SELECT * FROM a;        // reads the first 'a'

ALIASES
  <source> AS name
    Names a source for join conditions and qualified fields.

NESTING
  ( <source> )
    Parentheses group a nested select or join.
"#;

const FIELDS_DOC: &str = r#"FIELDS - Choosing Columns

ALL FIELDS
  *

FIELD LIST
  field, other, ...
    At least one field is required.

QUALIFIED FIELDS
  ns.field
    Picks 'field' from the source aliased 'ns'.

ALIASES
  field AS new_name
  {{ price * 2 }} AS double_price

COMPUTED AND CONSTANT FIELDS
  {{ expression }}, "text", 42, true
    Literals and expressions are accepted anywhere a field is expected.
"#;

const JOINS_DOC: &str = r#"JOINS - Combining Sources

  <left> INNER JOIN <right> ON {{ condition }}
  <left> LEFT JOIN <right> ON {{ condition }}
  <left> RIGHT JOIN <right> ON {{ condition }}
  <left> OUTER JOIN <right> ON {{ condition }}

  Both sides are read completely, then every pair of records is tested with
  the condition. Each side is namespaced by its alias, or by its name when it
  is a bare name, and the condition sees it under that namespace:

    SELECT * FROM people AS p INNER JOIN orders AS o ON {{ p.id == o.person }}

  The two sides of one join must not share a namespace. Join a source with
  itself through aliases:

    SELECT * FROM a AS x INNER JOIN a AS y ON {{ x.parent == y.id }}

  A side that is itself a join exposes all of its namespaces.

CHAINING
  Joins group from the left:

    SELECT * FROM a INNER JOIN b ON {{..}} LEFT JOIN c ON {{..}}

  joins a with b first, then joins that result with c. The second condition
  can use a, b and c.
"#;

const VARIABLES_DOC: &str = r#"VARIABLES - Parameters and Values

PARAMETERS
  PARAM @limit : number;
  PARAM @country : string = "NL";
    Values supplied by the caller of the generated pipeline.

DEFINITIONS
  @threshold : number = 10;

ASSIGNMENTS
  @threshold = @limit;

VALUES
  Strings, numbers, booleans, {{ expressions }} and other @variables.
"#;

const SNIPPETS_DOC: &str = r#"SNIPPETS - Code Generation Templates

  Output is assembled from named templates. A template marks insertion points
  with /*%key%*/ or __key__. Keys are letters and digits, optionally split by
  single underscores. Supplying a key a template does not contain is an error.

  Use a directory of templates with:

    sift compile script.sift --snippets ./snippets

  Files are named <snippet>.<extension>, for example joinQuery.ts.

REQUIRED SNIPPETS
  script, assignment, fileSource, selectQuery, fieldList, star, output,
  whereStatement, joinQuery, joinCondition, aliasedSource, namedField,
  unnamedField,
  renamedField, param, paramWithDefault, variableDefinition,
  variableAssignment, import, export
"#;
