/// One raw header line, always terminated by CRLF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    text: String,
}

impl HeaderLine {
    /// Renders `name: value\r\n`.
    pub fn new(name: &str, value: impl std::fmt::Display) -> Self {
        Self {
            text: format!("{}: {}\r\n", name, value),
        }
    }

    /// Wraps a verbatim line, appending CRLF if the line lacks it.
    pub fn raw(line: impl Into<String>) -> Self {
        let mut text = line.into();
        if !text.ends_with("\r\n") {
            text.push_str("\r\n");
        }
        Self { text }
    }

    /// The full line including the trailing CRLF.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Splits the line into name and trimmed value.
    ///
    /// Returns `None` for lines without a colon; such lines are still kept
    /// in a [`Headers`] list, they just can't be looked up by name.
    pub fn name_value(&self) -> Option<(&str, &str)> {
        let line = self.text.trim_end_matches("\r\n");
        line.split_once(':')
            .map(|(name, value)| (name.trim(), value.trim()))
    }
}

/// Ordered, append-only list of header lines.
///
/// Insertion order is preserved and duplicate names are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    lines: Vec<HeaderLine>,
}

impl Headers {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn push(&mut self, line: HeaderLine) {
        self.lines.push(line);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First value whose name matches `name` case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lines
            .iter()
            .filter_map(HeaderLine::name_value)
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a HeaderLine;
    type IntoIter = std::slice::Iter<'a, HeaderLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
