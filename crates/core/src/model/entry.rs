use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("missing name value")]
    EmptyName,

    #[error("missing function value")]
    EmptyFunction,

    #[error("missing type value")]
    MissingType,

    #[error("invalid type '{value}'. Expected sensory, motor, or both")]
    InvalidType { value: String },
}

//
// ─── NERVE TYPE ────────────────────────────────────────────────────────────────
//

/// Categorical type of a study entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NerveType {
    Sensory,
    Motor,
    Both,
}

impl NerveType {
    /// Every type, in the order the level 1 choices are offered.
    pub const ALL: [NerveType; 3] = [NerveType::Sensory, NerveType::Motor, NerveType::Both];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            NerveType::Sensory => "Sensory",
            NerveType::Motor => "Motor",
            NerveType::Both => "Both",
        }
    }
}

impl fmt::Display for NerveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NerveType {
    type Err = EntryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "sensory" => Ok(NerveType::Sensory),
            "motor" => Ok(NerveType::Motor),
            "both" => Ok(NerveType::Both),
            "" => Err(EntryError::MissingType),
            _ => Err(EntryError::InvalidType {
                value: trimmed.to_owned(),
            }),
        }
    }
}

//
// ─── STUDY ENTRY ───────────────────────────────────────────────────────────────
//

/// One study item: a named nerve with its type, function and swallowing role.
///
/// Entries are read-only once constructed. An empty `role_in_swallowing`
/// means the entry has no role (and is not eligible for level 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyEntry {
    name: String,
    #[serde(rename = "type")]
    nerve_type: NerveType,
    function: String,
    role_in_swallowing: String,
    order: usize,
}

impl StudyEntry {
    /// Build a validated entry.
    ///
    /// Name and function are trimmed and must be non-empty. The role is
    /// normalized with [`normalize_role`].
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptyName` or `EntryError::EmptyFunction`.
    pub fn new(
        name: impl Into<String>,
        nerve_type: NerveType,
        function: impl Into<String>,
        role_in_swallowing: impl AsRef<str>,
        order: usize,
    ) -> Result<Self, EntryError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(EntryError::EmptyName);
        }

        let function = function.into().trim().to_owned();
        if function.is_empty() {
            return Err(EntryError::EmptyFunction);
        }

        Ok(Self {
            name,
            nerve_type,
            function,
            role_in_swallowing: normalize_role(role_in_swallowing.as_ref()),
            order,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn nerve_type(&self) -> NerveType {
        self.nerve_type
    }

    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    #[must_use]
    pub fn role_in_swallowing(&self) -> &str {
        &self.role_in_swallowing
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    #[must_use]
    pub fn has_swallowing_role(&self) -> bool {
        !self.role_in_swallowing.trim().is_empty()
    }
}

/// Trim a raw role value; blank and `none` (any case) mean "not applicable".
#[must_use]
pub fn normalize_role(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return String::new();
    }
    trimmed.to_owned()
}
