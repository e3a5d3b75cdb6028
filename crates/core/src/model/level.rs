use serde::{Deserialize, Serialize};
use std::fmt;

/// The three review levels, in progression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelId {
    #[serde(rename = "level_1")]
    Level1,
    #[serde(rename = "level_2")]
    Level2,
    #[serde(rename = "level_3")]
    Level3,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::Level1, LevelId::Level2, LevelId::Level3];

    /// Zero-based position, usable as an index into per-level tables.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            LevelId::Level1 => 0,
            LevelId::Level2 => 1,
            LevelId::Level3 => 2,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            LevelId::Level1 => "Level 1",
            LevelId::Level2 => "Level 2",
            LevelId::Level3 => "Level 3",
        }
    }

    #[must_use]
    pub fn subtitle(self) -> &'static str {
        match self {
            LevelId::Level1 => "Multiple Choice",
            LevelId::Level2 => "Flash Cards",
            LevelId::Level3 => "Swallowing Roles",
        }
    }

    /// The level offered by "Next Level" from this level's summary.
    #[must_use]
    pub fn next(self) -> Option<LevelId> {
        match self {
            LevelId::Level1 => Some(LevelId::Level2),
            LevelId::Level2 => Some(LevelId::Level3),
            LevelId::Level3 => None,
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_stops_after_level_three() {
        assert_eq!(LevelId::Level1.next(), Some(LevelId::Level2));
        assert_eq!(LevelId::Level2.next(), Some(LevelId::Level3));
        assert_eq!(LevelId::Level3.next(), None);
    }

    #[test]
    fn indices_are_dense() {
        let indices: Vec<_> = LevelId::ALL.iter().map(|level| level.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
