//! Markdown outline via pulldown-cmark

use pulldown_cmark::{CodeBlockKind, Event, Parser as MdParser, Tag, TagEnd};

/// A heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Level (1-6)
    pub level: u8,
    /// Plain text
    pub title: String,
    /// 1-based line
    pub line: usize,
}

/// A fenced or indented code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Info-string language, if any
    pub language: Option<String>,
    /// Block content
    pub code: String,
    /// 1-based line of the opening fence
    pub line: usize,
}

/// Headings and code blocks of a markdown document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownOutline {
    /// Headings in document order
    pub headings: Vec<Heading>,
    /// Code blocks in document order
    pub code_blocks: Vec<CodeBlock>,
}

impl MarkdownOutline {
    /// Parse a document
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let line_of = |offset: usize| content[..offset.min(content.len())].matches('\n').count() + 1;

        let mut outline = Self::default();
        let mut heading: Option<Heading> = None;
        let mut block: Option<CodeBlock> = None;

        for (event, range) in MdParser::new(content).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some(Heading {
                        level: level as u8,
                        title: String::new(),
                        line: line_of(range.start),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(mut h) = heading.take() {
                        h.title = h.title.trim().to_string();
                        outline.headings.push(h);
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    block = Some(CodeBlock {
                        language,
                        code: String::new(),
                        line: line_of(range.start),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(b) = block.take() {
                        outline.code_blocks.push(b);
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(h) = heading.as_mut() {
                        h.title.push_str(&text);
                    } else if let Some(b) = block.as_mut() {
                        b.code.push_str(&text);
                    }
                }
                _ => {}
            }
        }
        outline
    }

    /// Whether a heading with this title exists (case-insensitive)
    #[must_use]
    pub fn has_heading(&self, title: &str) -> bool {
        self.headings
            .iter()
            .any(|h| h.title.eq_ignore_ascii_case(title))
    }

    /// Code blocks in a given language
    pub fn blocks_in<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a CodeBlock> + 'a {
        self.code_blocks
            .iter()
            .filter(move |b| b.language.as_deref() == Some(language))
    }
}
