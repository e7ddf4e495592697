use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// A 1-based presentation identifier, the key of a presentation in the
/// collection.
///
/// Ids are dense: after any delete the collection is compacted so the ids
/// are exactly `1..=len`. An id captured before a delete may therefore name
/// a different presentation afterwards.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PresentationId(NonZeroU32);

impl PresentationId {
    /// The first id of any non-empty collection.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Build an id from its 1-based number. Returns `None` for zero.
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Id for the presentation at 0-based `position` in id order.
    pub fn from_position(position: usize) -> Self {
        let n = u32::try_from(position + 1).unwrap_or(u32::MAX);
        Self(NonZeroU32::new(n).unwrap_or(NonZeroU32::MAX))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// 0-based position this id occupies in a contiguous collection.
    pub fn position(self) -> usize {
        self.0.get() as usize - 1
    }

    /// The id immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PresentationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("invalid presentation id `{s}`"))
    }
}

// Ids are stored as JSON object keys, so they travel as strings.
impl Serialize for PresentationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PresentationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
