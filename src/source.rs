use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The text being compiled, with an optional name used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub name: Option<String>,
    pub input: String,
}

impl Source {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            name: None,
            input: input.into(),
        }
    }

    pub fn named(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            input: input.into(),
        }
    }

    /// The text of a 1-based line, split on the same breaks [`locate`] counts.
    pub fn line(&self, line: usize) -> Option<&str> {
        let mut rest = self.input.as_str();
        for _ in 0..line.checked_sub(1)? {
            let end = rest.find(['\r', '\n'])?;
            let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
            rest = &rest[end + skip..];
        }
        Some(rest.find(['\r', '\n']).map_or(rest, |end| &rest[..end]))
    }
}

impl From<&str> for Source {
    fn from(input: &str) -> Self {
        Source::new(input)
    }
}

impl From<String> for Source {
    fn from(input: String) -> Self {
        Source::new(input)
    }
}

/// A resolved position in a source. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps a byte offset to its line and column.
///
/// Line breaks are `\r\n`, `\n` or `\r`. A break counts once its first byte lies
/// strictly before `position`; offsets past the end of the input are allowed and
/// resolve against the last line.
pub fn locate(source: &Source, position: usize) -> Location {
    let bytes = source.input.as_bytes();
    let mut line = 1;
    let mut line_start = 0;
    let mut i = 0;

    while i < bytes.len() && i < position {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                i += 2;
                line += 1;
                line_start = i;
            }
            b'\r' | b'\n' => {
                i += 1;
                line += 1;
                line_start = i;
            }
            _ => i += 1,
        }
    }

    Location {
        position,
        line,
        column: (position + 1).saturating_sub(line_start),
    }
}

/// The span of an AST node or diagnostic inside its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loc {
    pub start: Location,
    pub end: Location,
    #[serde(skip)]
    pub source: Arc<Source>,
}

impl Loc {
    pub fn new(source: &Arc<Source>, start: usize, end: usize) -> Self {
        Self {
            start: locate(source, start),
            end: locate(source, end),
            source: Arc::clone(source),
        }
    }

    /// A span from the start of `self` to the end of `other`.
    pub fn join(&self, other: &Loc) -> Loc {
        Loc {
            start: self.start,
            end: other.end,
            source: Arc::clone(&self.source),
        }
    }

    /// The raw text covered by this span.
    pub fn text(&self) -> &str {
        let input = &self.source.input;
        let end = self.end.position.min(input.len());
        input.get(self.start.position.min(end)..end).unwrap_or("")
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source.name {
            Some(name) => write!(f, "{}:{}", name, self.start),
            None => write!(f, "{}", self.start),
        }
    }
}
