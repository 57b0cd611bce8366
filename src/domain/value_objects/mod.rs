//! Value Objects for the category hierarchy

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category identifier value object. Opaque; upstream sends either strings or integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_blank(&self) -> bool { self.0.trim().is_empty() }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for CategoryId { fn from(value: &str) -> Self { Self::new(value) } }
impl From<String> for CategoryId { fn from(value: String) -> Self { Self(value) } }
impl From<u64> for CategoryId { fn from(value: u64) -> Self { Self(value.to_string()) } }

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId { Text(String), Signed(i64), Unsigned(u64) }

impl From<RawId> for CategoryId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer).map(Into::into)
    }
}

/// Reads an optional id where `null`, a missing field and `""` all mean "absent".
pub fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CategoryId>, D::Error> {
    let raw: Option<RawId> = Option::deserialize(deserializer)?;
    Ok(raw.map(CategoryId::from).filter(|id| !id.is_blank()))
}

/// Depth in the four-level category hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level { One, Two, Three, Four }

impl Level {
    pub const ALL: [Level; 4] = [Level::One, Level::Two, Level::Three, Level::Four];

    pub fn from_depth(depth: u8) -> Option<Self> {
        match depth { 1 => Some(Self::One), 2 => Some(Self::Two), 3 => Some(Self::Three), 4 => Some(Self::Four), _ => None }
    }
    pub fn depth(self) -> u8 { self.index() as u8 + 1 }
    pub fn index(self) -> usize {
        match self { Self::One => 0, Self::Two => 1, Self::Three => 2, Self::Four => 3 }
    }
    pub fn parent(self) -> Option<Self> { self.depth().checked_sub(1).and_then(Self::from_depth) }
    /// Levels strictly below this one, shallowest first.
    pub fn deeper(self) -> &'static [Level] {
        let all: &'static [Level; 4] = &Self::ALL;
        &all[self.index() + 1..]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "L{}", self.depth()) }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;
    fn try_from(depth: u8) -> Result<Self, Self::Error> { Self::from_depth(depth).ok_or(LevelError::OutOfRange(depth)) }
}

impl From<Level> for u8 { fn from(level: Level) -> Self { level.depth() } }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    OutOfRange(u8),
}

impl std::error::Error for LevelError {}
impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::OutOfRange(d) => write!(f, "category level {d} is outside 1..=4") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder { #[serde(default, deserialize_with = "optional_id")] parent: Option<CategoryId> }

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let ids: Vec<CategoryId> = serde_json::from_str(r#"[1, "1", "abc"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].as_str(), "abc");
    }
    #[test]
    fn test_blank_parent_is_absent() {
        for body in [r#"{}"#, r#"{"parent": null}"#, r#"{"parent": ""}"#, r#"{"parent": "  "}"#] {
            let holder: Holder = serde_json::from_str(body).unwrap();
            assert!(holder.parent.is_none(), "{body}");
        }
        let holder: Holder = serde_json::from_str(r#"{"parent": 7}"#).unwrap();
        assert_eq!(holder.parent, Some(CategoryId::from(7u64)));
    }
    #[test]
    fn test_level_navigation() {
        assert_eq!(Level::One.parent(), None);
        assert_eq!(Level::Three.parent(), Some(Level::Two));
        assert_eq!(Level::from_depth(0), None);
        assert_eq!(Level::Two.deeper(), &[Level::Three, Level::Four]);
        assert!(Level::Four.deeper().is_empty());
        assert_eq!(Level::try_from(5u8), Err(LevelError::OutOfRange(5)));
        assert_eq!(serde_json::to_string(&Level::Three).unwrap(), "3");
    }
}
