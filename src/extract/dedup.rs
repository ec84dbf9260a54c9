use crate::extract::CallingCode;
use std::collections::HashSet;

/// Remembers which (code2, code3) pairs have been emitted
///
/// The pair is kept as a tuple rather than a concatenated string so that e.g.
/// ("AB", "C") and ("A", "BC") stay distinct.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<(String, String)>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a record's key is seen
    pub fn admit(&mut self, record: &CallingCode) -> bool {
        let (code2, code3) = record.key();
        self.seen.insert((code2.to_string(), code3.to_string()))
    }

    /// Number of distinct keys admitted so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
