//! Line format templates
//!
//! A template is parsed once at sink registration and rendered per record.
//! Placeholders are `{time}`, `{client_addr}`, `{level}`, and `{message}`,
//! with an optional Python-style padding spec (`{client_addr:^18}` centers
//! in 18 columns, `{level: <8}` left-pads to 8). Markup tags are ordinary
//! literal text to the template; stripping or rendering them is the sink's
//! concern.

use thiserror::Error;

/// Template parse failure
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid format template: {0}")]
pub struct TemplateError(pub String);

/// Field values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct LineValues<'a> {
    /// Record timestamp, already formatted
    pub time: &'a str,
    /// Bound client identifier, or "-"
    pub client_addr: &'a str,
    /// Level display name, or raw numeric level
    pub level: &'a str,
    /// Message text (possibly trimmed by the context binder)
    pub message: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKey {
    Time,
    ClientAddr,
    Level,
    Message,
}

impl FieldKey {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "time" => Some(Self::Time),
            "client_addr" => Some(Self::ClientAddr),
            "level" => Some(Self::Level),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pad {
    fill: char,
    align: Align,
    width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { key: FieldKey, pad: Option<Pad> },
}

/// A parsed line format template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    segments: Vec<Segment>,
}

impl LineTemplate {
    /// Parse a template string
    ///
    /// # Errors
    ///
    /// Fails on unterminated placeholders, unknown field names, and
    /// malformed padding specs. `{{` and `}}` escape literal braces.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(TemplateError(format!(
                            "unterminated placeholder '{{{}'",
                            body
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_field(&body)?);
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// The bare `{message}` template
    pub fn plain_message() -> Self {
        Self {
            segments: vec![Segment::Field {
                key: FieldKey::Message,
                pad: None,
            }],
        }
    }

    /// Render the template with the given values
    pub fn render(&self, values: &LineValues<'_>) -> String {
        let mut out = String::with_capacity(80);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { key, pad } => {
                    let value = match key {
                        FieldKey::Time => values.time,
                        FieldKey::ClientAddr => values.client_addr,
                        FieldKey::Level => values.level,
                        FieldKey::Message => values.message,
                    };
                    match pad {
                        Some(pad) => push_padded(&mut out, value, *pad),
                        None => out.push_str(value),
                    }
                }
            }
        }
        out
    }
}

fn parse_field(body: &str) -> Result<Segment, TemplateError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };
    let key = FieldKey::parse(name)
        .ok_or_else(|| TemplateError(format!("unknown field '{}'", name)))?;
    let pad = spec.map(parse_pad).transpose()?;
    Ok(Segment::Field { key, pad })
}

fn parse_pad(spec: &str) -> Result<Pad, TemplateError> {
    let chars: Vec<char> = spec.chars().collect();
    let align_of = |c: char| match c {
        '<' => Some(Align::Left),
        '^' => Some(Align::Center),
        '>' => Some(Align::Right),
        _ => None,
    };

    let (fill, align, rest) = if chars.len() >= 2 && align_of(chars[1]).is_some() {
        (chars[0], align_of(chars[1]).unwrap_or(Align::Left), &chars[2..])
    } else if let Some(align) = chars.first().copied().and_then(align_of) {
        (' ', align, &chars[1..])
    } else {
        (' ', Align::Left, &chars[..])
    };

    let width: usize = rest
        .iter()
        .collect::<String>()
        .parse()
        .map_err(|_| TemplateError(format!("bad padding spec '{}'", spec)))?;
    Ok(Pad { fill, align, width })
}

fn push_padded(out: &mut String, value: &str, pad: Pad) {
    let len = value.chars().count();
    if len >= pad.width {
        out.push_str(value);
        return;
    }
    let missing = pad.width - len;
    let (before, after) = match pad.align {
        Align::Left => (0, missing),
        Align::Right => (missing, 0),
        // Extra fill goes on the right, matching Python's str.format.
        Align::Center => (missing / 2, missing - missing / 2),
    };
    for _ in 0..before {
        out.push(pad.fill);
    }
    out.push_str(value);
    for _ in 0..after {
        out.push(pad.fill);
    }
}
