use crate::extract::{CallingCode, ExtractError, ExtractResult, REQUIRED_GROUPS};
use regex::{CaptureMatches, Regex, RegexBuilder};

/// Pattern used when the configuration does not provide one
///
/// Matches `<code2>..</code2>`, `<code3>..</code3>` and `<code>..</code>` elements in
/// that order, allowing anything (including newlines) between them.
pub const DEFAULT_PATTERN: &str =
    r"<code2>(?P<code2>[^<]*)</code2>.*?<code3>(?P<code3>[^<]*)</code3>.*?<code>(?P<code>[^<]*)</code>";

/// A compiled record pattern with the required named groups
#[derive(Debug, Clone)]
pub struct RecordPattern {
    regex: Regex,
}

impl RecordPattern {
    /// Compiles a pattern with dot-matches-newline and multi-line anchors
    ///
    /// # Returns
    ///
    /// * `Ok(RecordPattern)` - Compiled and defines `code2`, `code3` and `code`
    /// * `Err(ExtractError)` - Invalid regex or a required group is missing
    ///
    /// # Examples
    ///
    /// ```
    /// use calling_codes::extract::{CallingCode, RecordPattern, DEFAULT_PATTERN};
    ///
    /// let pattern = RecordPattern::compile(DEFAULT_PATTERN).unwrap();
    /// let records: Vec<_> = pattern
    ///     .records("<code2>US</code2><code3>USA</code3><code>1</code>")
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    /// assert_eq!(records, vec![CallingCode::new("US", "USA", "1")]);
    /// ```
    pub fn compile(pattern: &str) -> ExtractResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .multi_line(true)
            .build()?;

        for group in REQUIRED_GROUPS {
            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(ExtractError::MissingGroup(group));
            }
        }

        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Lazily yields one record per non-overlapping match in `text`
    pub fn records<'r, 'h>(&'r self, text: &'h str) -> Records<'r, 'h> {
        Records {
            matches: self.regex.captures_iter(text),
        }
    }
}

/// Iterator over the records found in a document
pub struct Records<'r, 'h> {
    matches: CaptureMatches<'r, 'h>,
}

impl Iterator for Records<'_, '_> {
    type Item = ExtractResult<CallingCode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.matches
            .next()
            .map(|captures| CallingCode::from_captures(&captures))
    }
}
