//! Markup stripping for streamed deltas.
//!
//! The chat client renders plain text, so heading markers and emphasis
//! markers are removed from each delta before it is forwarded. Headings are
//! only recognised at a real line start, which for a stream means the state
//! has to survive from one delta to the next.

use regex::Regex;
use std::sync::LazyLock;

/// `#`..`######` at the head of a line segment, plus the spacing after it.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*#{1,6}[ \t]*").expect("heading pattern"));

/// The rest of a heading marker split across deltas.
static MARKER_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#*[ \t]*").expect("marker tail pattern"));

/// Bold / italic / underline markers: `*`, `**`, `***`, `__`, `___`.
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|_{2,3}").expect("emphasis pattern"));

/// Where the stripper is within the current output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Only spaces or tabs since the last newline (or stream start).
    Start,
    /// A heading marker was just removed; its trailing spacing goes too.
    AfterMarker,
    /// Past the head of the line; `#` is literal text here.
    Inline,
}

/// Incremental Markdown stripper for one response stream.
///
/// Feed every delta through [`MarkdownStripper::strip`] in order.
#[derive(Debug, Clone)]
pub struct MarkdownStripper {
    state: LineState,
}

impl Default for MarkdownStripper {
    fn default() -> Self {
        Self {
            state: LineState::Start,
        }
    }
}

impl MarkdownStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip one delta, continuing from wherever the previous one ended.
    pub fn strip(&mut self, delta: &str) -> String {
        let mut out = String::with_capacity(delta.len());
        for (i, segment) in delta.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
                self.state = LineState::Start;
            }
            out.push_str(self.line_head(segment));
        }
        EMPHASIS.replace_all(&out, "").into_owned()
    }

    /// Drop a heading marker from the front of `segment` if the line allows it.
    fn line_head<'t>(&mut self, segment: &'t str) -> &'t str {
        let rest = match self.state {
            LineState::Inline => return segment,
            LineState::Start => match HEADING.find(segment) {
                Some(m) => {
                    self.state = LineState::AfterMarker;
                    &segment[m.end()..]
                }
                None => segment,
            },
            LineState::AfterMarker => {
                let cut = MARKER_TAIL.find(segment).map_or(0, |m| m.end());
                &segment[cut..]
            }
        };
        if !rest.trim_matches([' ', '\t']).is_empty() {
            self.state = LineState::Inline;
        }
        rest
    }
}

/// Remove heading and emphasis markup from a complete `text`.
///
/// Single underscores are kept so identifiers like `snake_case` survive.
pub fn strip_markdown(text: &str) -> String {
    MarkdownStripper::new().strip(text)
}
