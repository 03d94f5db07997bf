//! Inline markdown parsing for the terminal renderer.
//!
//! Content strings (summary, bullet lines, blurbs) may carry inline markdown.
//! This flattens them into a list of styled runs; block structure is ignored
//! and paragraphs are joined with a single space.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Inline emphasis applied to a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emphasis {
    pub strong: bool,
    pub italic: bool,
    pub code: bool,
    pub strike: bool,
}

/// A contiguous piece of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub emphasis: Emphasis,
    /// Destination when the run is (part of) a link.
    pub link: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse inline markdown into runs. Adjacent runs with identical styling are
/// merged.
pub fn parse_inline(input: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut emphasis = Emphasis::default();
    let mut link: Option<String> = None;
    let mut paragraphs = 0usize;

    let parser = Parser::new_ext(input, Options::ENABLE_STRIKETHROUGH);
    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) => {
                if paragraphs > 0 {
                    push_run(&mut runs, " ", emphasis, &link);
                }
                paragraphs += 1;
            }
            Event::Start(Tag::Strong) => emphasis.strong = true,
            Event::End(TagEnd::Strong) => emphasis.strong = false,
            Event::Start(Tag::Emphasis) => emphasis.italic = true,
            Event::End(TagEnd::Emphasis) => emphasis.italic = false,
            Event::Start(Tag::Strikethrough) => emphasis.strike = true,
            Event::End(TagEnd::Strikethrough) => emphasis.strike = false,
            Event::Start(Tag::Link { dest_url, .. }) => link = Some(dest_url.into_string()),
            Event::End(TagEnd::Link) => link = None,
            Event::Text(text) => push_run(&mut runs, &text, emphasis, &link),
            Event::Code(code) => {
                let code_emphasis = Emphasis {
                    code: true,
                    ..emphasis
                };
                push_run(&mut runs, &code, code_emphasis, &link);
            }
            Event::SoftBreak | Event::HardBreak => push_run(&mut runs, " ", emphasis, &link),
            // Raw HTML is shown verbatim rather than interpreted.
            Event::InlineHtml(html) | Event::Html(html) => {
                push_run(&mut runs, &html, emphasis, &link)
            }
            _ => {}
        }
    }

    runs
}

fn push_run(runs: &mut Vec<Run>, text: &str, emphasis: Emphasis, link: &Option<String>) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.emphasis == emphasis && last.link == *link {
            last.text.push_str(text);
            return;
        }
    }
    runs.push(Run {
        text: text.to_owned(),
        emphasis,
        link: link.clone(),
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
