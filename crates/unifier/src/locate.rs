//! Secondary line-matching pass for parsers that discard positions.
//!
//! The locator walks the original text forward only, so line numbers it hands
//! out are non-decreasing in document order and always within
//! `[1, max(line_count, 1)]`.

pub struct LineLocator<'a> {
    lines: Vec<&'a str>,
    line: usize,
    column: usize,
}

impl<'a> LineLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            line: 0,
            column: 0,
        }
    }

    /// Current line (1-indexed)
    #[must_use]
    pub fn current(&self) -> usize {
        self.line + 1
    }

    /// Find the next match at or after the cursor and move past it.
    ///
    /// `matcher` returns the byte offset just past its match within the given
    /// slice. When nothing matches, the cursor stays put and its line is returned.
    pub fn find(&mut self, matcher: impl Fn(&str) -> Option<usize>) -> usize {
        for idx in self.line..self.lines.len() {
            let start = if idx == self.line { self.column } else { 0 };
            let Some(slice) = self.lines[idx].get(start..) else {
                continue;
            };
            if let Some(end) = matcher(slice) {
                self.line = idx;
                self.column = start + end;
                break;
            }
        }
        self.current()
    }
}

/// Match `key` as a JSON object key: `"key"` followed by `:`
pub fn json_key(slice: &str, key: &str) -> Option<usize> {
    let quoted = format!("\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""));
    slice.match_indices(&quoted).find_map(|(idx, _)| {
        let after = idx + quoted.len();
        slice[after..]
            .trim_start()
            .starts_with(':')
            .then_some(after)
    })
}

/// Match `key` as a YAML block mapping key, optionally inside list items
pub fn yaml_key(slice: &str, key: &str) -> Option<usize> {
    let mut body = slice.trim_start();
    while let Some(rest) = body.strip_prefix("- ") {
        body = rest.trim_start();
    }
    let body = body.strip_prefix("? ").unwrap_or(body);
    let offset = slice.len() - body.len();
    [key.to_string(), format!("\"{key}\""), format!("'{key}'")]
        .iter()
        .find_map(|candidate| {
            let rest = body.strip_prefix(candidate.as_str())?;
            let after_key = rest.trim_start_matches([' ', '\t']);
            let after_colon = after_key.strip_prefix(':')?;
            (after_colon.is_empty() || after_colon.starts_with([' ', '\t']))
                .then_some(offset + candidate.len())
        })
}

/// Match the textual form of a scalar list item
pub fn value_text(slice: &str, rendered: &str) -> Option<usize> {
    if rendered.is_empty() {
        return None;
    }
    slice.find(rendered).map(|idx| idx + rendered.len())
}
