//! Content entries and per-hour buckets

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::time::{HourKey, MinuteKey};

/// One minute's worth of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Citation the short label is taken from, e.g. `"John 3:16 (John)"`
    pub reference: String,
    /// Body text shown verbatim
    pub text: String,
}

impl ContentEntry {
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
        }
    }

    /// Bracketed short label derived from the reference
    pub fn label(&self) -> Option<String> {
        extract_label(&self.reference)
    }
}

/// Take the text between the first `(` and the first `)` and wrap it in
/// square brackets
///
/// Returns `None` when either parenthesis is missing or the `)` comes
/// before the `(`.
pub fn extract_label(reference: &str) -> Option<String> {
    let open = reference.find('(')?;
    let close = reference.find(')')?;
    if close <= open {
        return None;
    }

    let inner = &reference[open + 1..close];
    let mut label = String::with_capacity(inner.len() + 2);
    label.push('[');
    label.push_str(inner);
    label.push(']');
    Some(label)
}

/// All entries for one hour, keyed by minute
///
/// Buckets are replaced wholesale by the cache; they are never patched
/// after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBucket {
    hour: HourKey,
    entries: BTreeMap<MinuteKey, ContentEntry>,
}

impl ContentBucket {
    pub fn new(hour: HourKey) -> Self {
        Self {
            hour,
            entries: BTreeMap::new(),
        }
    }

    pub fn hour(&self) -> HourKey {
        self.hour
    }

    /// Insert an entry, returning any entry it replaced
    pub fn insert(&mut self, minute: MinuteKey, entry: ContentEntry) -> Option<ContentEntry> {
        self.entries.insert(minute, entry)
    }

    pub fn get(&self, minute: MinuteKey) -> Option<&ContentEntry> {
        self.entries.get(&minute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in minute order
    pub fn iter(&self) -> impl Iterator<Item = (MinuteKey, &ContentEntry)> {
        self.entries.iter().map(|(minute, entry)| (*minute, entry))
    }
}
