//! Documentation extraction.
//!
//! Fetches a candidate's documentation from its backend and bounds it to a
//! popup-sized snippet: at most `max_lines` lines, with trailing blank lines
//! and footer markers removed. Text is kept as the backend wrote it unless
//! markdown rendering is switched on, in which case markup is converted
//! before the line bound is applied.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ropey::Rope;

use crate::config::PopupConfig;
use crate::engine::{Candidate, Capability, CompletionEngine, DocResponse, FirstSource};

/// Normalized documentation for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocResult {
    pub text: String,
    /// The documentation continued past `max_lines`.
    pub truncated: bool,
}

impl DocResult {
    /// The text to put in the popup, with `marker` appended when truncated.
    #[must_use]
    pub fn display_text(&self, marker: &str) -> String {
        if self.truncated {
            format!("{}\n\n{marker}", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Fetches and normalizes documentation.
#[derive(Debug, Clone)]
pub struct DocExtractor {
    max_lines: Option<usize>,
    footer_markers: Vec<String>,
    render_markdown: bool,
}

impl DocExtractor {
    pub fn new(max_lines: Option<usize>, footer_markers: Vec<String>) -> Self {
        Self {
            max_lines,
            footer_markers,
            render_markdown: false,
        }
    }

    pub fn from_config(config: &PopupConfig) -> Self {
        Self::new(config.max_lines, config.footer_markers.clone())
            .with_markdown_rendering(config.render_markdown)
    }

    /// Convert markdown markup to plain text before bounding the docs.
    #[must_use]
    pub fn with_markdown_rendering(mut self, enabled: bool) -> Self {
        self.render_markdown = enabled;
        self
    }

    /// Fetch the documentation of `candidate`.
    ///
    /// The quickhelp string is preferred; the doc buffer is the fallback.
    /// Returns `None` when the backend has nothing worth showing.
    pub fn fetch(
        &self,
        engine: &mut dyn CompletionEngine,
        candidate: &Candidate,
    ) -> Option<DocResult> {
        let response = engine
            .invoke_capability(candidate, Capability::QuickhelpString, &FirstSource)
            .or_else(|| engine.invoke_capability(candidate, Capability::DocBuffer, &FirstSource))?;

        // The buffer, and whatever temporary resource backs it, is dropped
        // at the end of this match.
        match response {
            DocResponse::Text(text) if self.render_markdown => {
                self.extract(&Rope::from_str(&render_plain(&text)), 0)
            }
            DocResponse::Text(text) => self.extract(&Rope::from_str(&text), 0),
            DocResponse::Buffer(buffer) if self.render_markdown => {
                let start = buffer.start().unwrap_or(0).min(buffer.text().len_chars());
                let markdown = buffer.text().slice(start..).to_string();
                self.extract(&Rope::from_str(&render_plain(&markdown)), 0)
            }
            DocResponse::Buffer(buffer) => {
                self.extract(buffer.text(), buffer.start().unwrap_or(0))
            }
        }
    }

    /// Extract a snippet from `text`, starting at char index `start`.
    #[must_use]
    pub fn extract(&self, text: &Rope, start: usize) -> Option<DocResult> {
        let start = start.min(text.len_chars());
        let first_line = text.char_to_line(start);
        let available = content_lines(text).saturating_sub(first_line);

        let (taken, truncated) = match self.max_lines {
            Some(max) if max < available => (max, true),
            _ => (available, false),
        };

        let mut end_line = first_line + taken;
        while end_line > first_line && self.is_trailing_noise(&line_text(text, end_line - 1)) {
            end_line -= 1;
        }
        if end_line == first_line {
            return None;
        }

        let last = end_line - 1;
        let end = text.line_to_char(last) + line_text(text, last).chars().count();
        let snippet = text.slice(start..end.max(start)).to_string();
        if snippet.trim().is_empty() {
            return None;
        }

        Some(DocResult {
            text: snippet,
            truncated,
        })
    }

    fn is_trailing_noise(&self, line: &str) -> bool {
        let line = line.trim();
        line.is_empty()
            || self
                .footer_markers
                .iter()
                .any(|marker| !marker.is_empty() && line.starts_with(marker.as_str()))
    }
}

/// Number of lines with content. A final line terminator does not start
/// another line.
fn content_lines(text: &Rope) -> usize {
    let lines = text.len_lines();
    match text.get_line(lines - 1) {
        Some(last) if last.len_chars() == 0 => lines - 1,
        _ => lines,
    }
}

/// Line `idx` without its line terminator.
fn line_text(text: &Rope, idx: usize) -> String {
    let line = text.line(idx).to_string();
    line.trim_end_matches(['\n', '\r']).to_string()
}

/// Strip markdown markup, keeping the line structure of the documentation.
///
/// Raw HTML is kept as written: in signatures like `Vec<String>` it is
/// almost always a generic parameter, not a tag.
#[must_use]
pub fn render_plain(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    // Next item number of each open list, `None` for bullet lists.
    let mut lists: Vec<Option<u64>> = Vec::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) | Event::InlineHtml(text) => {
                out.push_str(&text);
            }
            Event::Html(html) => out.push_str(&html),
            Event::End(TagEnd::HtmlBlock) => push_blank_line(&mut out),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Start(Tag::List(first)) => lists.push(first),
            Event::Start(Tag::Item) => match lists.last_mut() {
                Some(Some(number)) => {
                    out.push_str(&format!("{number}. "));
                    *number += 1;
                }
                _ => out.push_str("- "),
            },
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock | TagEnd::BlockQuote(_),
            ) => push_blank_line(&mut out),
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                push_blank_line(&mut out);
            }
            Event::Rule => {
                out.push_str("---");
                push_blank_line(&mut out);
            }
            _ => {}
        }
    }
    out.trim_end().to_string()
}

fn push_blank_line(out: &mut String) {
    while !out.ends_with("\n\n") && !out.is_empty() {
        out.push('\n');
    }
}
