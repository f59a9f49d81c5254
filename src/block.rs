use serde::Serialize;

/// Inline text spans. Spans are flat: a bold run never contains an italic one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineSpan {
    PlainText(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { label: String, href: String },
}

/// Which marker family a list was opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Block-level display nodes, in source line order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayNode {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
    },
    UnorderedList {
        items: Vec<Vec<InlineSpan>>,
    },
    OrderedList {
        items: Vec<Vec<InlineSpan>>,
    },
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Blockquote {
        spans: Vec<InlineSpan>,
    },
    Rule,
    Spacer,
}

impl DisplayNode {
    pub(crate) fn list(kind: ListKind, items: Vec<Vec<InlineSpan>>) -> Self {
        match kind {
            ListKind::Unordered => DisplayNode::UnorderedList { items },
            ListKind::Ordered => DisplayNode::OrderedList { items },
        }
    }
}
