use tracing::{debug, instrument};

use crate::block::{DisplayNode, InlineSpan, ListKind};
use crate::inline::inline_spans;

/// Parse message text into display nodes, one pass over its lines
#[instrument(level = "trace", skip_all, fields(bytes = text.len()))]
pub fn render(text: &str) -> Vec<DisplayNode> {
    let mut blocks = Vec::new();
    if text.is_empty() {
        return blocks;
    }
    let mut state = State::Normal;

    for line in text.split('\n') {
        state = process_line(line, state, &mut blocks);
    }
    finish(state, &mut blocks);

    blocks
}

/// What is open across line boundaries
#[derive(Debug)]
enum State {
    Normal,
    InFence {
        language: Option<String>,
        lines: Vec<String>,
    },
    InList {
        kind: ListKind,
        items: Vec<Vec<InlineSpan>>,
    },
}

/// A line classified outside of a fence
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Fence { language: Option<&'a str> },
    Heading { level: u8, text: &'a str },
    Item { kind: ListKind, text: &'a str },
    Rule,
    Blockquote(&'a str),
    Blank,
    Paragraph(&'a str),
}

type LineMatcher = for<'a> fn(&'a str) -> Option<Line<'a>>;

/// Priority order matters: `---` is not a list item because the marker
/// needs whitespace after it, so it reaches the rule check.
const LINE_MATCHERS: [LineMatcher; 7] = [
    fence_open,
    heading,
    unordered_item,
    ordered_item,
    rule,
    blockquote,
    blank,
];

fn classify(line: &str) -> Line<'_> {
    LINE_MATCHERS
        .iter()
        .find_map(|matcher| matcher(line))
        .unwrap_or(Line::Paragraph(line))
}

fn process_line(line: &str, state: State, blocks: &mut Vec<DisplayNode>) -> State {
    if let State::InFence {
        language,
        mut lines,
    } = state
    {
        if is_closing_fence(line) {
            blocks.push(DisplayNode::CodeBlock { language, lines });
            return State::Normal;
        }
        lines.push(line.to_string());
        return State::InFence { language, lines };
    }

    match classify(line) {
        Line::Item { kind, text } => match state {
            State::InList {
                kind: open,
                mut items,
            } if open == kind => {
                items.push(inline_spans(text));
                State::InList { kind, items }
            }
            other => {
                finish(other, blocks);
                State::InList {
                    kind,
                    items: vec![inline_spans(text)],
                }
            }
        },
        Line::Fence { language } => {
            finish(state, blocks);
            State::InFence {
                language: language.map(str::to_string),
                lines: Vec::new(),
            }
        }
        Line::Heading { level, text } => emit(
            state,
            blocks,
            DisplayNode::Heading {
                level,
                spans: inline_spans(text),
            },
        ),
        Line::Rule => emit(state, blocks, DisplayNode::Rule),
        Line::Blockquote(text) => emit(
            state,
            blocks,
            DisplayNode::Blockquote {
                spans: inline_spans(text),
            },
        ),
        Line::Blank => emit(state, blocks, DisplayNode::Spacer),
        Line::Paragraph(text) => emit(
            state,
            blocks,
            DisplayNode::Paragraph {
                spans: inline_spans(text),
            },
        ),
    }
}

/// Close anything open, then append a single-line node
fn emit(state: State, blocks: &mut Vec<DisplayNode>, node: DisplayNode) -> State {
    finish(state, blocks);
    blocks.push(node);
    State::Normal
}

/// Flush whatever is open into `blocks`
fn finish(state: State, blocks: &mut Vec<DisplayNode>) {
    match state {
        State::Normal => {}
        State::InList { kind, items } => blocks.push(DisplayNode::list(kind, items)),
        State::InFence { language, lines } => {
            debug!(
                lines = lines.len(),
                "code fence left open at end of input, keeping it as a code block"
            );
            blocks.push(DisplayNode::CodeBlock { language, lines });
        }
    }
}

/// Exactly three backticks. A CRLF line break leaves a `\r` behind, which
/// still closes the fence.
fn is_closing_fence(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == "```"
}

/// Text after a marker: at least one whitespace character, then something
/// that is not whitespace.
fn marker_text(rest: &str) -> Option<&str> {
    let text = rest.trim_start();
    if text.len() == rest.len() || text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn fence_open(line: &str) -> Option<Line<'_>> {
    let rest = line.strip_prefix("```")?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let language = &rest[..end];
    Some(Line::Fence {
        language: (!language.is_empty()).then_some(language),
    })
}

fn heading(line: &str) -> Option<Line<'_>> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    marker_text(&line[level..]).map(|text| Line::Heading {
        level: level as u8,
        text,
    })
}

fn unordered_item(line: &str) -> Option<Line<'_>> {
    let rest = line.strip_prefix(['*', '-'])?;
    marker_text(rest).map(|text| Line::Item {
        kind: ListKind::Unordered,
        text,
    })
}

fn ordered_item(line: &str) -> Option<Line<'_>> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    marker_text(rest).map(|text| Line::Item {
        kind: ListKind::Ordered,
        text,
    })
}

fn rule(line: &str) -> Option<Line<'_>> {
    (line.len() >= 3 && line.bytes().all(|b| b == b'-')).then_some(Line::Rule)
}

fn blockquote(line: &str) -> Option<Line<'_>> {
    let rest = line.strip_prefix('>')?;
    marker_text(rest).map(Line::Blockquote)
}

fn blank(line: &str) -> Option<Line<'_>> {
    line.trim().is_empty().then_some(Line::Blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use DisplayNode::*;
    use InlineSpan::{Bold, Code, Italic, Link, PlainText};

    fn text(s: &str) -> Vec<InlineSpan> {
        vec![PlainText(s.to_string())]
    }

    fn para(s: &str) -> DisplayNode {
        Paragraph { spans: text(s) }
    }

    fn code(language: Option<&str>, lines: &[&str]) -> DisplayNode {
        CodeBlock {
            language: language.map(str::to_string),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn empty_input() {
        assert!(render("").is_empty());
    }

    #[test]
    fn heading() {
        assert_eq!(
            render("# Title"),
            vec![Heading {
                level: 1,
                spans: text("Title")
            }]
        );
        assert_eq!(
            render("###### Six"),
            vec![Heading {
                level: 6,
                spans: text("Six")
            }]
        );
    }

    #[test]
    fn heading_needs_whitespace_and_at_most_six_hashes() {
        assert_eq!(render("#Title"), vec![para("#Title")]);
        assert_eq!(render("####### Seven"), vec![para("####### Seven")]);
        assert_eq!(render("#   "), vec![para("#   ")]);
    }

    #[test]
    fn heading_text_is_inline_parsed() {
        assert_eq!(
            render("## Use `cargo`"),
            vec![Heading {
                level: 2,
                spans: vec![PlainText("Use ".into()), Code("cargo".into())]
            }]
        );
    }

    #[test]
    fn paragraph_with_styles() {
        assert_eq!(
            render("**bold** and *italic* and `code`"),
            vec![Paragraph {
                spans: vec![
                    Bold("bold".into()),
                    PlainText(" and ".into()),
                    Italic("italic".into()),
                    PlainText(" and ".into()),
                    Code("code".into()),
                ]
            }]
        );
    }

    #[test]
    fn blank_line_closes_list() {
        assert_eq!(
            render("- a\n- b\n\ntext"),
            vec![
                UnorderedList {
                    items: vec![text("a"), text("b")]
                },
                Spacer,
                para("text"),
            ]
        );
    }

    #[test]
    fn star_and_dash_share_a_list() {
        assert_eq!(
            render("* a\n- b"),
            vec![UnorderedList {
                items: vec![text("a"), text("b")]
            }]
        );
    }

    #[test]
    fn ordered_list() {
        assert_eq!(
            render("1. one\n2. two\n10. ten"),
            vec![OrderedList {
                items: vec![text("one"), text("two"), text("ten")]
            }]
        );
    }

    #[test]
    fn mixed_list_kinds_split() {
        assert_eq!(
            render("- a\n1. b"),
            vec![
                UnorderedList {
                    items: vec![text("a")]
                },
                OrderedList {
                    items: vec![text("b")]
                },
            ]
        );
    }

    #[test]
    fn list_closed_by_heading_and_paragraph() {
        assert_eq!(
            render("- a\n# H\n- b\nplain"),
            vec![
                UnorderedList {
                    items: vec![text("a")]
                },
                Heading {
                    level: 1,
                    spans: text("H")
                },
                UnorderedList {
                    items: vec![text("b")]
                },
                para("plain"),
            ]
        );
    }

    #[test]
    fn list_flushed_at_end_of_input() {
        assert_eq!(
            render("1. only"),
            vec![OrderedList {
                items: vec![text("only")]
            }]
        );
    }

    #[test]
    fn list_markers_need_whitespace() {
        assert_eq!(render("-a"), vec![para("-a")]);
        assert_eq!(render("1.a"), vec![para("1.a")]);
        assert_eq!(render("1 a"), vec![para("1 a")]);
    }

    #[test]
    fn code_block() {
        assert_eq!(
            render("```js\nconst x=1;\n```"),
            vec![code(Some("js"), &["const x=1;"])]
        );
    }

    #[test]
    fn code_block_without_language() {
        assert_eq!(render("```\n```"), vec![code(None, &[])]);
        assert_eq!(render("``` js\nx\n```"), vec![code(None, &["x"])]);
    }

    #[test]
    fn language_tag_is_word_characters_only() {
        assert_eq!(render("```c++\nint x;\n```"), vec![code(Some("c"), &["int x;"])]);
    }

    #[test]
    fn code_block_lines_are_verbatim() {
        assert_eq!(
            render("```md\n# not a heading\n- not a list\n\n```py\n```"),
            vec![code(
                Some("md"),
                &["# not a heading", "- not a list", "", "```py"]
            )]
        );
    }

    #[test]
    fn fence_closes_open_list() {
        assert_eq!(
            render("- a\n```\nx\n```\n- b"),
            vec![
                UnorderedList {
                    items: vec![text("a")]
                },
                code(None, &["x"]),
                UnorderedList {
                    items: vec![text("b")]
                },
            ]
        );
    }

    #[test]
    fn unterminated_fence_keeps_rest_as_code() {
        assert_eq!(render("```py\nline1"), vec![code(Some("py"), &["line1"])]);
        assert_eq!(
            render("intro\n```\na\n\n# b"),
            vec![para("intro"), code(None, &["a", "", "# b"])]
        );
    }

    #[test]
    fn rule_versus_list_item() {
        assert_eq!(render("---"), vec![Rule]);
        assert_eq!(render("-----"), vec![Rule]);
        assert_eq!(render("--"), vec![para("--")]);
        assert_eq!(
            render("- - -"),
            vec![UnorderedList {
                items: vec![text("- -")]
            }]
        );
    }

    #[test]
    fn rule_closes_list() {
        assert_eq!(
            render("- a\n---"),
            vec![
                UnorderedList {
                    items: vec![text("a")]
                },
                Rule
            ]
        );
    }

    #[test]
    fn blockquote() {
        assert_eq!(
            render("> *quoted*"),
            vec![Blockquote {
                spans: vec![Italic("quoted".into())]
            }]
        );
        assert_eq!(render(">tight"), vec![para(">tight")]);
    }

    #[test]
    fn heading_wins_over_blockquote_text() {
        assert_eq!(
            render("# > not quote"),
            vec![Heading {
                level: 1,
                spans: text("> not quote")
            }]
        );
    }

    #[test]
    fn whitespace_line_is_spacer() {
        assert_eq!(render("a\n   \nb"), vec![para("a"), Spacer, para("b")]);
    }

    #[test]
    fn trailing_newline_is_a_blank_line() {
        assert_eq!(render("a\n"), vec![para("a"), Spacer]);
        assert_eq!(render("\n"), vec![Spacer, Spacer]);
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            render("```rs\r\nfn main() {}\r\n```\r\nok"),
            vec![code(Some("rs"), &["fn main() {}\r"]), para("ok")]
        );
        assert_eq!(render("```\nx\r\n```"), vec![code(None, &["x\r"])]);
    }

    #[test]
    fn link_paragraph() {
        assert_eq!(
            render("[go](http://x)"),
            vec![Paragraph {
                spans: vec![Link {
                    label: "go".into(),
                    href: "http://x".into()
                }]
            }]
        );
    }

    #[test]
    fn render_is_deterministic() {
        let input = "# T\n- a\n1. b\n```\nc\n```\n> d\n---\n\ne **f**";
        assert_eq!(render(input), render(input));
    }

    #[test]
    fn classify_priority() {
        assert_eq!(classify("```rust"), Line::Fence { language: Some("rust") });
        assert_eq!(classify("* item"), Line::Item { kind: ListKind::Unordered, text: "item" });
        assert_eq!(classify("***"), Line::Paragraph("***"));
        assert_eq!(classify("---"), Line::Rule);
        assert_eq!(classify(" "), Line::Blank);
    }
}
