//! Identifier rules for generated Python

use crate::error::ComposeError;
use tree_sitter::Parser;

/// Python keywords (3.12)
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Class names the generated modules already use
const RESERVED_CLASSES: &[&str] = &[
    "Node",
    "BatchNode",
    "AsyncNode",
    "AsyncBatchNode",
    "AsyncParallelBatchNode",
    "Flow",
    "AsyncFlow",
    "BaseModel",
    "Field",
    "SharedState",
];

/// Local names a node variable must not shadow
const RESERVED_LOCALS: &[&str] = &["create_flow", "flow", "shared"];

/// Why a node name is rejected, if it is
#[must_use]
pub fn node_name_problem(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name is empty"),
        Some(c) if !c.is_ascii_uppercase() => return Some("must start with an uppercase letter"),
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Some("must be CamelCase letters and digits");
    }
    if PYTHON_KEYWORDS.contains(&name) {
        return Some("is a Python keyword");
    }
    if RESERVED_CLASSES.contains(&name) {
        return Some("collides with a runtime class");
    }
    None
}

/// Whether a name is a snake_case Python identifier
#[must_use]
pub fn is_snake_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !PYTHON_KEYWORDS.contains(&name)
}

/// Whether an action label can be emitted verbatim
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Create a parser for Python
///
/// # Errors
/// [`ComposeError::ParserInit`] if the grammar cannot be loaded
pub fn python_parser() -> Result<Parser, ComposeError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ComposeError::ParserInit(e.to_string()))?;
    Ok(parser)
}

/// Why a utility signature is rejected, if it is
///
/// The header `def <name>(<input>) -> <output>:` is parsed on its own and
/// must be exactly one well-formed function definition.
pub fn signature_problem(
    parser: &mut Parser,
    name: &str,
    input: &str,
    output: &str,
) -> Option<&'static str> {
    if input.contains(['\n', '\r']) || output.contains(['\n', '\r']) {
        return Some("must fit on one line");
    }
    if output.trim().is_empty() {
        return Some("return annotation is empty");
    }
    let header = format!("def {name}({input}) -> {output}:\n    ...\n");
    let Some(tree) = parser.parse(&header, None) else {
        return Some("does not parse as Python");
    };
    let root = tree.root_node();
    let single_def = root.named_child_count() == 1
        && root
            .named_child(0)
            .is_some_and(|n| n.kind() == "function_definition");
    if root.has_error() || !single_def {
        return Some("is not a single Python function header");
    }
    None
}

/// Split a CamelCase name into lowercase words
///
/// Acronym runs stay together: `APIClient` gives `api`, `client`.
#[must_use]
pub fn camel_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() || next_lower {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// snake_case form of a CamelCase name
#[must_use]
pub fn snake_case(name: &str) -> String {
    camel_words(name).join("_")
}

/// Variable name for a node instance
#[must_use]
pub fn instance_name(node: &str) -> String {
    let snake = snake_case(node);
    if PYTHON_KEYWORDS.contains(&snake.as_str()) || RESERVED_LOCALS.contains(&snake.as_str()) {
        format!("{snake}_node")
    } else {
        snake
    }
}

/// Shared-store key holding a node's result
#[must_use]
pub fn result_key(node: &str) -> String {
    format!("{}_result", snake_case(node))
}

/// Text safe inside a triple-quoted docstring or a string literal
#[must_use]
pub fn python_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\\', "\\\\")
        .replace('"', "'")
}

/// Text safe inside a markdown table cell
#[must_use]
pub fn table_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_handles_acronyms() {
        assert_eq!(snake_case("ValidateInput"), "validate_input");
        assert_eq!(snake_case("APIClient"), "api_client");
        assert_eq!(snake_case("Step2Output"), "step2_output");
        assert_eq!(snake_case("Coordinator"), "coordinator");
    }

    #[test]
    fn instance_names_avoid_keywords() {
        assert_eq!(instance_name("Class"), "class_node");
        assert_eq!(instance_name("Flow2"), "flow2");
        assert_eq!(instance_name("CreateFlow"), "create_flow_node");
        assert_eq!(result_key("EmbedQuery"), "embed_query_result");
    }

    #[test]
    fn node_name_rules() {
        assert!(node_name_problem("Summarizer").is_none());
        assert!(node_name_problem("summarizer").is_some());
        assert!(node_name_problem("Load Data").is_some());
        assert!(node_name_problem("").is_some());
        assert!(node_name_problem("Flow").is_some());
        assert!(node_name_problem("None").is_some());
    }

    #[test]
    fn identifiers_and_labels() {
        assert!(is_snake_identifier("call_llm"));
        assert!(!is_snake_identifier("CallLlm"));
        assert!(!is_snake_identifier("lambda"));
        assert!(is_valid_label("needs-review"));
        assert!(!is_valid_label("a|b"));
    }

    #[test]
    fn utility_signatures() {
        let mut parser = python_parser().unwrap();
        let mut problem = |input: &str, output: &str| signature_problem(&mut parser, "fetch_page", input, output);
        assert_eq!(problem("url: str", "str"), None);
        assert_eq!(problem("", "Dict[str, Any]"), None);
        assert_eq!(problem("url: str", ""), Some("return annotation is empty"));
        assert!(problem("url: str", "str:\n    pass").is_some());
        assert!(problem("url: str) -> str: ...\ndef other(", "str").is_some());
        assert!(problem("url: str  # note", "str").is_some());
        assert!(problem("url: str = (", "str").is_some());
    }

    #[test]
    fn escapes() {
        assert_eq!(python_text("say \"hi\"\n now"), "say 'hi' now");
        assert_eq!(table_cell("a | b"), "a \\| b");
    }
}
