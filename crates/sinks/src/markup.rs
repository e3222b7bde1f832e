//! Color markup tags
//!
//! Format templates carry loguru-style markup (`<green>...</green>`,
//! `<level>...</level>`). File sinks strip the tags; the console sink
//! renders them as ANSI escapes. `<level>` resolves to a color chosen by
//! the record's severity. Unrecognized tags pass through untouched so
//! angle brackets in messages survive.

use fanlog_config::Level;
use owo_colors::OwoColorize;

/// Colors expressible in markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Green,
    Cyan,
    Red,
    Yellow,
    Blue,
    Magenta,
    /// Resolved from the record level at render time
    ByLevel,
}

impl Color {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "green" => Some(Self::Green),
            "cyan" => Some(Self::Cyan),
            "red" => Some(Self::Red),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "level" => Some(Self::ByLevel),
            _ => None,
        }
    }

    fn resolve(self, level: Level) -> Self {
        match self {
            Self::ByLevel => match level {
                Level::Debug => Self::Blue,
                Level::Info => Self::Green,
                Level::Warning => Self::Yellow,
                Level::Error => Self::Red,
            },
            other => other,
        }
    }
}

fn paint(text: &str, color: Color, level: Level) -> String {
    match color.resolve(level) {
        Color::Green => text.green().to_string(),
        Color::Cyan => text.cyan().to_string(),
        Color::Red => text.red().to_string(),
        Color::Yellow => text.yellow().to_string(),
        Color::Blue => text.blue().to_string(),
        Color::Magenta => text.magenta().to_string(),
        Color::ByLevel => text.to_string(),
    }
}

/// One scanner pass shared by strip and render
fn walk(input: &str, mut on_text: impl FnMut(&str, Option<Color>)) {
    let mut stack: Vec<Color> = Vec::new();
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        let (before, tail) = rest.split_at(open);
        if !before.is_empty() {
            on_text(before, stack.last().copied());
        }
        let Some(close) = tail.find('>') else {
            // No closing bracket; the remainder is plain text.
            on_text(tail, stack.last().copied());
            return;
        };
        let tag = &tail[1..close];
        if let Some(name) = tag.strip_prefix('/') {
            if name.is_empty() || Color::parse(name).is_some() {
                stack.pop();
            } else {
                on_text(&tail[..=close], stack.last().copied());
            }
        } else if let Some(color) = Color::parse(tag) {
            stack.push(color);
        } else {
            on_text(&tail[..=close], stack.last().copied());
        }
        rest = &tail[close + 1..];
    }
    if !rest.is_empty() {
        on_text(rest, stack.last().copied());
    }
}

/// Remove recognized markup tags, keeping the text
pub fn strip(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    walk(input, |text, _| out.push_str(text));
    out
}

/// Render recognized markup tags as ANSI escapes
///
/// `level` selects the color substituted for `<level>` tags.
pub fn render(input: &str, level: Level) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    walk(input, |text, color| match color {
        Some(color) => out.push_str(&paint(text, color, level)),
        None => out.push_str(text),
    });
    out
}
