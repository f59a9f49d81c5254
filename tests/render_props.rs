use cockpit::{DisplayNode, Theme, render, render_html};
use proptest::prelude::*;

/// Lines built from the markers the renderer reacts to
fn markdown_line() -> impl Strategy<Value = String> {
    let prefix = prop::sample::select(vec![
        "", "# ", "### ", "####### ", "- ", "* ", "1. ", "12. ", "> ", "---", "```", "```rust",
        "   ",
    ]);
    let body = "[a-z*`\\[\\]() _.#>-]{0,24}";
    (prefix, body).prop_map(|(prefix, body)| format!("{prefix}{body}"))
}

fn markdown() -> impl Strategy<Value = String> {
    prop::collection::vec(markdown_line(), 0..16).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn render_is_total(text in any::<String>()) {
        let _ = render(&text);
    }

    #[test]
    fn render_is_deterministic(text in markdown()) {
        prop_assert_eq!(render(&text), render(&text));
    }

    #[test]
    fn headings_stay_in_range(text in markdown()) {
        for node in render(&text) {
            if let DisplayNode::Heading { level, .. } = node {
                prop_assert!((1..=6).contains(&level));
            }
        }
    }

    #[test]
    fn lists_are_never_empty(text in markdown()) {
        for node in render(&text) {
            if let DisplayNode::UnorderedList { items } | DisplayNode::OrderedList { items } = node {
                prop_assert!(!items.is_empty());
            }
        }
    }

    #[test]
    fn themes_share_markup_shape(text in markdown()) {
        let dark = render_html(&text, Theme::Dark);
        let light = render_html(&text, Theme::Light);
        prop_assert_eq!(dark.matches('<').count(), light.matches('<').count());
    }
}

#[test]
fn empty_message_renders_nothing() {
    assert!(render("").is_empty());
}
