use serde::{Deserialize, Serialize};

use crate::block::{DisplayNode, InlineSpan};

/// Colour scheme of the chat window. Only changes CSS classes, never the
/// parsed structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

const HEADING_SIZES: [&str; 6] = [
    "text-2xl", "text-xl", "text-lg", "text-base", "text-sm", "text-sm",
];

/// Theme-dependent classes for markup elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassTable {
    pub inline_code: &'static str,
    pub code_block: &'static str,
    pub code_language: &'static str,
    pub code_body: &'static str,
    pub rule: &'static str,
    pub blockquote: &'static str,
}

impl ClassTable {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                inline_code: "bg-gray-700",
                code_block: "bg-gray-950",
                code_language: "bg-gray-800 text-gray-400",
                code_body: "text-gray-300",
                rule: "border-gray-700",
                blockquote: "border-gray-600 text-gray-400",
            },
            Theme::Light => Self {
                inline_code: "bg-gray-200",
                code_block: "bg-gray-100",
                code_language: "bg-gray-200 text-gray-600",
                code_body: "text-gray-800",
                rule: "border-gray-300",
                blockquote: "border-gray-300 text-gray-600",
            },
        }
    }
}

/// Convert display nodes to an HTML fragment
pub fn nodes_to_html(nodes: &[DisplayNode], theme: Theme) -> String {
    let classes = ClassTable::for_theme(theme);
    let mut out = String::new();

    out.push_str("<div class=\"markdown-content\">\n");
    for node in nodes {
        emit_node(node, &classes, &mut out);
    }
    out.push_str("</div>\n");

    out
}

fn emit_node(node: &DisplayNode, classes: &ClassTable, out: &mut String) {
    match node {
        DisplayNode::Heading { level, spans } => {
            let size = HEADING_SIZES[usize::from((*level).clamp(1, 6)) - 1];
            out.push_str(&format!("<div class=\"{size} font-bold my-2\">"));
            spans_to_html(spans, classes, out);
            out.push_str("</div>\n");
        }
        DisplayNode::Paragraph { spans } => {
            out.push_str("<p class=\"my-1\">");
            spans_to_html(spans, classes, out);
            out.push_str("</p>\n");
        }
        DisplayNode::UnorderedList { items } => {
            out.push_str("<ul class=\"list-disc list-inside my-2 space-y-1\">\n");
            list_items_to_html(items, classes, out);
            out.push_str("</ul>\n");
        }
        DisplayNode::OrderedList { items } => {
            out.push_str("<ol class=\"list-decimal list-inside my-2 space-y-1\">\n");
            list_items_to_html(items, classes, out);
            out.push_str("</ol>\n");
        }
        DisplayNode::CodeBlock { language, lines } => {
            out.push_str(&format!(
                "<div class=\"my-3 rounded-lg overflow-hidden {}\">\n",
                classes.code_block
            ));
            if let Some(lang) = language {
                out.push_str(&format!(
                    "<div class=\"px-3 py-1 text-xs font-semibold {}\">",
                    classes.code_language
                ));
                escape_into(lang, out);
                out.push_str("</div>\n");
            }
            out.push_str(&format!(
                "<pre class=\"p-3 overflow-x-auto text-sm {}\"><code class=\"font-mono\">",
                classes.code_body
            ));
            escape_into(&lines.join("\n"), out);
            out.push_str("</code></pre>\n</div>\n");
        }
        DisplayNode::Blockquote { spans } => {
            out.push_str(&format!(
                "<blockquote class=\"border-l-4 pl-3 my-2 italic {}\">",
                classes.blockquote
            ));
            spans_to_html(spans, classes, out);
            out.push_str("</blockquote>\n");
        }
        DisplayNode::Rule => {
            out.push_str(&format!("<hr class=\"my-3 {}\" />\n", classes.rule));
        }
        DisplayNode::Spacer => {
            out.push_str("<div class=\"h-2\"></div>\n");
        }
    }
}

fn list_items_to_html(items: &[Vec<InlineSpan>], classes: &ClassTable, out: &mut String) {
    for item in items {
        out.push_str("<li>");
        spans_to_html(item, classes, out);
        out.push_str("</li>\n");
    }
}

fn spans_to_html(spans: &[InlineSpan], classes: &ClassTable, out: &mut String) {
    for span in spans {
        span_to_html(span, classes, out);
    }
}

fn span_to_html(span: &InlineSpan, classes: &ClassTable, out: &mut String) {
    match span {
        InlineSpan::PlainText(text) => escape_into(text, out),
        InlineSpan::Bold(text) => {
            out.push_str("<strong>");
            escape_into(text, out);
            out.push_str("</strong>");
        }
        InlineSpan::Italic(text) => {
            out.push_str("<em>");
            escape_into(text, out);
            out.push_str("</em>");
        }
        InlineSpan::Code(text) => {
            out.push_str(&format!(
                "<code class=\"px-1.5 py-0.5 rounded text-sm font-mono {}\">",
                classes.inline_code
            ));
            escape_into(text, out);
            out.push_str("</code>");
        }
        InlineSpan::Link { label, href } => {
            out.push_str("<a href=\"");
            escape_into(href, out);
            out.push_str(
                "\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"text-blue-500 hover:underline\">",
            );
            escape_into(label, out);
            out.push_str("</a>");
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
