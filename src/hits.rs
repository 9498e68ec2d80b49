//! Collected hits: identity, deduplication and ordering.

use crate::types::EncodingTag;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Offset annotation attached to a hit when offsets were requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTag {
    /// Absolute byte offset of the first reported character
    pub offset: u64,
    /// Which decoding produced the hit
    pub encoding: EncodingTag,
    /// True when exact byte re-location failed and the offset is a guess
    pub approximate: bool,
}

/// A reported candidate string.
///
/// Identity (equality and hashing) is the trimmed text, the boundary flag
/// and the offset/encoding pair when present. A boundary rediscovery of an
/// otherwise-identical string is therefore retained as a distinct
/// observation, while re-inserting the same observation is a no-op. The
/// `approximate` flag is display metadata and takes no part in identity.
#[derive(Debug, Clone)]
pub struct Hit {
    pub text: String,
    pub tag: Option<OffsetTag>,
    pub from_boundary: bool,
}

impl Hit {
    fn identity(&self) -> (&str, bool, Option<(u64, EncodingTag)>) {
        (
            &self.text,
            self.from_boundary,
            self.tag.map(|t| (t.offset, t.encoding)),
        )
    }
}

impl PartialEq for Hit {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Hit {}

impl Hash for Hit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl std::fmt::Display for Hit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Two leading spaces mark hits found only by the boundary pass
        if self.from_boundary {
            write!(f, "  ")?;
        }
        write!(f, "{}", self.text)?;
        if let Some(tag) = self.tag {
            let approx = if tag.approximate { "~" } else { "" };
            write!(f, "\t{}0x{:X} ({})", approx, tag.offset, tag.encoding.as_char())?;
        }
        Ok(())
    }
}

/// Requested ordering of the final hit list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Codepoint-ordinal ordering of the text
    Lexical,
    /// Ascending text length; ties in unspecified order
    ByLength,
}

/// Deduplicating, insertion-order-agnostic collection of hits
#[derive(Debug, Default)]
pub struct HitSet {
    set: HashSet<Hit, ahash::RandomState>,
}

impl HitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a hit; returns false when an identical hit was already present
    pub fn insert(&mut self, hit: Hit) -> bool {
        self.set.insert(hit)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.set.iter()
    }

    pub fn contains(&self, hit: &Hit) -> bool {
        self.set.contains(hit)
    }

    /// Consume the set into a vector, totally ordered when requested
    pub fn into_sorted(self, order: Option<SortOrder>) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self.set.into_iter().collect();
        match order {
            Some(SortOrder::Lexical) => hits.sort_unstable_by(|a, b| a.text.cmp(&b.text)),
            Some(SortOrder::ByLength) => {
                hits.sort_unstable_by_key(|h| h.text.chars().count())
            }
            None => {}
        }
        hits
    }
}
