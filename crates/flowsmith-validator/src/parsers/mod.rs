//! Source parsers
//!
//! - Python artifacts via tree-sitter-python
//! - Markdown artifacts via pulldown-cmark

mod markdown;
mod python;

pub use markdown::{CodeBlock, Heading, MarkdownOutline};
pub use python::{
    python_parser, Assignment, CallSite, ClassDef, Endpoint, FunctionDef, PythonModule,
    Transition,
};

/// A parsed artifact
#[derive(Debug)]
pub enum Parsed<'s> {
    /// Python module that parsed without syntax errors
    Python(PythonModule<'s>),
    /// Markdown outline
    Markdown(MarkdownOutline),
}

impl<'s> Parsed<'s> {
    /// Python module, if this is one
    #[must_use]
    pub fn python(&self) -> Option<&PythonModule<'s>> {
        match self {
            Parsed::Python(module) => Some(module),
            Parsed::Markdown(_) => None,
        }
    }

    /// Markdown outline, if this is one
    #[must_use]
    pub fn markdown(&self) -> Option<&MarkdownOutline> {
        match self {
            Parsed::Markdown(outline) => Some(outline),
            Parsed::Python(_) => None,
        }
    }
}
