//! Python source facts via tree-sitter
//!
//! Parses a module once and extracts the facts the structural checks need:
//! class definitions with their bases, methods and annotated fields,
//! function shapes, instance assignments, aggregate calls and `>>` edges.

use crate::error::ValidateError;
use crate::issue::Location;
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser, Tree};

/// Statement kinds counted as branching constructs
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "for_statement",
    "while_statement",
    "except_clause",
    "conditional_expression",
    "case_clause",
];

/// Create a parser for Python
///
/// # Errors
/// [`ValidateError::ParserInit`] if the grammar cannot be loaded
pub fn python_parser() -> Result<Parser, ValidateError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ValidateError::ParserInit(e.to_string()))?;
    Ok(parser)
}

/// A function or method definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Declared with `async def`
    pub is_async: bool,
    /// Parameter count, `self` included
    pub arity: usize,
    /// Position of the definition
    pub location: Location,
    /// Statements in the body, nested ones included
    pub statements: usize,
    /// Branching constructs in the body
    pub branches: usize,
    /// Identifiers the body reads (attribute names and keyword names excluded)
    pub references: BTreeSet<String>,
    /// Body contains a `global` statement
    pub uses_global: bool,
    /// Full source text of the definition
    pub text: String,
}

/// A class definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Class name
    pub name: String,
    /// Base class expressions, as written
    pub bases: Vec<String>,
    /// Position of the definition
    pub location: Location,
    /// Methods, in source order
    pub methods: Vec<FunctionDef>,
    /// Names of annotated class-level fields
    pub fields: Vec<String>,
}

impl ClassDef {
    /// Method by name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&FunctionDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// `name = Something(...)` style binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Bound name
    pub target: String,
    /// Class called on the right-hand side, if it is a plain call
    pub class: Option<String>,
    /// Position
    pub location: Location,
}

/// A call to a named callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Callable name
    pub callee: String,
    /// `start=` keyword value (or first positional argument)
    pub start: Option<Endpoint>,
    /// Position
    pub location: Location,
}

/// One side of a `>>` transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A bound name
    Instance(String),
    /// A direct `Class()` call
    Class(String),
    /// Anything else, as written
    Other(String),
}

impl Endpoint {
    /// Source text of the endpoint
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Endpoint::Instance(s) | Endpoint::Class(s) | Endpoint::Other(s) => s,
        }
    }
}

/// A `from >> to` or `from - "label" >> to` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Source
    pub from: Endpoint,
    /// Target
    pub to: Endpoint,
    /// Action label, if any
    pub label: Option<String>,
    /// Position
    pub location: Location,
}

/// A parsed Python module
#[derive(Debug)]
pub struct PythonModule<'s> {
    source: &'s str,
    tree: Tree,
}

impl<'s> PythonModule<'s> {
    /// Parse a module
    ///
    /// Returns `None` only if the parser gives up entirely; syntax errors
    /// still yield a module, see [`Self::syntax_error`].
    pub fn parse(parser: &mut Parser, source: &'s str) -> Option<Self> {
        let tree = parser.parse(source, None)?;
        Some(Self { source, tree })
    }

    fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        let source: &'s str = self.source;
        source.get(node.byte_range()).unwrap_or("")
    }

    /// Position of the first syntax error, if any
    #[must_use]
    pub fn syntax_error(&self) -> Option<Location> {
        let root = self.root();
        if !root.has_error() {
            return None;
        }
        first_error(root)
            .map(|n| Location::from_point(n.start_position()))
            .or(Some(Location { line: 1, column: 1 }))
    }

    /// Deepest nesting of the syntax tree, the root being 0
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        traverse(self.root(), |_, depth| {
            deepest = deepest.max(depth);
            true
        });
        deepest
    }

    /// Top-level class definitions
    #[must_use]
    pub fn classes(&self) -> Vec<ClassDef> {
        top_level(self.root())
            .filter(|n| n.kind() == "class_definition")
            .filter_map(|n| self.class_def(n))
            .collect()
    }

    /// Every function definition, nested ones included
    #[must_use]
    pub fn functions(&self) -> Vec<FunctionDef> {
        let mut out = Vec::new();
        walk(self.root(), &mut |node| {
            if node.kind() == "function_definition" {
                if let Some(def) = self.function_def(node) {
                    out.push(def);
                }
            }
        });
        out
    }

    /// Top-level function definitions
    #[must_use]
    pub fn top_level_functions(&self) -> Vec<FunctionDef> {
        top_level(self.root())
            .filter(|n| n.kind() == "function_definition")
            .filter_map(|n| self.function_def(n))
            .collect()
    }

    /// Every single-name assignment, nested ones included
    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = Vec::new();
        walk(self.root(), &mut |node| {
            if node.kind() != "assignment" {
                return;
            }
            let Some(left) = node.child_by_field_name("left") else {
                return;
            };
            if left.kind() != "identifier" {
                return;
            }
            let class = node
                .child_by_field_name("right")
                .and_then(|right| self.called_name(right));
            out.push(Assignment {
                target: self.text(left).to_string(),
                class,
                location: Location::from_point(node.start_position()),
            });
        });
        out
    }

    /// Calls to any of the given names
    #[must_use]
    pub fn calls_to(&self, names: &[&str]) -> Vec<CallSite> {
        let mut out = Vec::new();
        walk(self.root(), &mut |node| {
            let Some(callee) = self.called_name(node) else {
                return;
            };
            if !names.contains(&callee.as_str()) {
                return;
            }
            let start = node
                .child_by_field_name("arguments")
                .and_then(|args| self.start_argument(args));
            out.push(CallSite {
                callee,
                start,
                location: Location::from_point(node.start_position()),
            });
        });
        out
    }

    /// Every `>>` transition
    #[must_use]
    pub fn transitions(&self) -> Vec<Transition> {
        let mut out = Vec::new();
        walk(self.root(), &mut |node| {
            if !self.is_operator(node, ">>") {
                return;
            }
            let (Some(left), Some(right)) = (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) else {
                return;
            };
            let (from, label) = self.source_side(left);
            out.push(Transition {
                from,
                to: self.endpoint(right),
                label,
                location: Location::from_point(node.start_position()),
            });
        });
        out
    }

    fn class_def(&self, node: Node<'_>) -> Option<ClassDef> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| {
                named(args)
                    .filter(|a| a.kind() != "keyword_argument" && a.kind() != "comment")
                    .map(|a| self.text(a).to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut methods = Vec::new();
        let mut fields = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for statement in named(body) {
                match statement.kind() {
                    "function_definition" => methods.extend(self.function_def(statement)),
                    "decorated_definition" => {
                        if let Some(def) = statement.child_by_field_name("definition") {
                            if def.kind() == "function_definition" {
                                methods.extend(self.function_def(def));
                            }
                        }
                    }
                    "expression_statement" => {
                        fields.extend(named(statement).filter_map(|expr| self.annotated_name(expr)));
                    }
                    _ => {}
                }
            }
        }

        Some(ClassDef {
            name,
            bases,
            location: Location::from_point(node.start_position()),
            methods,
            fields,
        })
    }

    fn function_def(&self, node: Node<'_>) -> Option<FunctionDef> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let is_async = (0..node.child_count())
            .filter_map(|i| node.child(i))
            .take_while(|c| c.kind() != "def")
            .any(|c| c.kind() == "async");
        let arity = node
            .child_by_field_name("parameters")
            .map_or(0, |params| {
                named(params)
                    .filter(|p| {
                        !matches!(
                            p.kind(),
                            "comment" | "keyword_separator" | "positional_separator"
                        )
                    })
                    .count()
            });

        let mut statements = 0;
        let mut branches = 0;
        let mut uses_global = false;
        let mut references = BTreeSet::new();
        if let Some(body) = node.child_by_field_name("body") {
            walk(body, &mut |n| {
                let kind = n.kind();
                if kind.ends_with("_statement") {
                    statements += 1;
                }
                if BRANCH_KINDS.contains(&kind) {
                    branches += 1;
                }
                if kind == "global_statement" {
                    uses_global = true;
                }
            });
            self.collect_references(body, &mut references);
        }

        Some(FunctionDef {
            name,
            is_async,
            arity,
            location: Location::from_point(node.start_position()),
            statements,
            branches,
            references,
            uses_global,
            text: self.text(node).to_string(),
        })
    }

    /// Identifiers read by an expression tree, skipping attribute and keyword names
    fn collect_references(&self, node: Node<'_>, out: &mut BTreeSet<String>) {
        let mut pending = vec![node];
        while let Some(node) = pending.pop() {
            match node.kind() {
                "identifier" => {
                    out.insert(self.text(node).to_string());
                }
                "attribute" => pending.extend(node.child_by_field_name("object")),
                "keyword_argument" => pending.extend(node.child_by_field_name("value")),
                _ => pending.extend(named(node)),
            }
        }
    }

    fn annotated_name(&self, expr: Node<'_>) -> Option<String> {
        if expr.kind() != "assignment" || expr.child_by_field_name("type").is_none() {
            return None;
        }
        let left = expr.child_by_field_name("left")?;
        (left.kind() == "identifier").then(|| self.text(left).to_string())
    }

    /// Name of the callable if `node` is a call to a plain identifier
    fn called_name(&self, node: Node<'_>) -> Option<String> {
        if node.kind() != "call" {
            return None;
        }
        let function = node.child_by_field_name("function")?;
        (function.kind() == "identifier").then(|| self.text(function).to_string())
    }

    fn start_argument(&self, args: Node<'_>) -> Option<Endpoint> {
        let mut positional = None;
        for arg in named(args) {
            match arg.kind() {
                "keyword_argument" => {
                    let is_start = arg
                        .child_by_field_name("name")
                        .is_some_and(|n| self.text(n) == "start");
                    if is_start {
                        return arg.child_by_field_name("value").map(|v| self.endpoint(v));
                    }
                }
                "comment" => {}
                _ => {
                    if positional.is_none() {
                        positional = Some(self.endpoint(arg));
                    }
                }
            }
        }
        positional
    }

    fn is_operator(&self, node: Node<'_>, operator: &str) -> bool {
        node.kind() == "binary_operator"
            && node
                .child_by_field_name("operator")
                .is_some_and(|op| op.kind() == operator)
    }

    /// Source endpoint and label of the left side of a `>>`
    fn source_side(&self, node: Node<'_>) -> (Endpoint, Option<String>) {
        if self.is_operator(node, "-") {
            let label = node
                .child_by_field_name("right")
                .filter(|r| r.kind() == "string")
                .map(|r| self.string_value(r));
            if let Some(left) = node.child_by_field_name("left") {
                return (self.endpoint(left), label);
            }
        }
        (self.endpoint(node), None)
    }

    fn endpoint(&self, node: Node<'_>) -> Endpoint {
        match node.kind() {
            "identifier" => Endpoint::Instance(self.text(node).to_string()),
            "parenthesized_expression" => named(node)
                .find(|c| c.kind() != "comment")
                .map_or_else(|| Endpoint::Other(self.text(node).to_string()), |c| self.endpoint(c)),
            "binary_operator" if self.is_operator(node, ">>") => node
                .child_by_field_name("right")
                .map_or_else(|| Endpoint::Other(self.text(node).to_string()), |r| self.endpoint(r)),
            "binary_operator" if self.is_operator(node, "-") => self.source_side(node).0,
            _ => match self.called_name(node) {
                Some(class) => Endpoint::Class(class),
                None => Endpoint::Other(self.text(node).to_string()),
            },
        }
    }

    fn string_value(&self, node: Node<'_>) -> String {
        let content: String = named(node)
            .filter(|c| c.kind() == "string_content")
            .map(|c| self.text(c))
            .collect();
        if content.is_empty() {
            self.text(node)
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        } else {
            content
        }
    }
}

fn named<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    (0..node.named_child_count()).filter_map(move |i| node.named_child(i))
}

/// Module-level definitions, looking through decorators
fn top_level<'t>(root: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    named(root).filter_map(|n| {
        if n.kind() == "decorated_definition" {
            n.child_by_field_name("definition")
        } else {
            Some(n)
        }
    })
}

/// Pre-order traversal on a cursor
///
/// `visit` receives each node with its depth below `node` and returns
/// whether to descend into it.
fn traverse<'t, F>(node: Node<'t>, mut visit: F)
where
    F: FnMut(Node<'t>, usize) -> bool,
{
    let mut cursor = node.walk();
    let mut depth = 0;
    loop {
        if visit(cursor.node(), depth) && cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if depth == 0 {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

fn walk<'t, F>(node: Node<'t>, visit: &mut F)
where
    F: FnMut(Node<'t>),
{
    traverse(node, |n, _| {
        visit(n);
        true
    });
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut found = None;
    traverse(root, |node, _| {
        if found.is_some() {
            return false;
        }
        if node.is_error() || node.is_missing() {
            found = Some(node);
            return false;
        }
        node.has_error()
    });
    found
}
