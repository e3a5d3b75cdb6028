mod shuffled;

use async_trait::async_trait;
use study_core::model::{Level1Round, Level2Round, Level3Round, StudyEntry};

use crate::error::RoundBuildError;

pub use shuffled::{DISTRACTOR_COUNT, LEVEL3_UNAVAILABLE_REASON, ShuffledRoundBuilder};

/// Produces level-specific round data from a list of entries.
///
/// The session state machine only consumes this contract; question order,
/// distractor choice and level 3 eligibility are decided here.
#[async_trait]
pub trait RoundBuilder: Send + Sync {
    /// One question per input entry, each offering the correct name exactly once.
    ///
    /// # Errors
    ///
    /// Returns `RoundBuildError` if no round can be produced.
    async fn build_level1_round(&self, entries: &[StudyEntry])
    -> Result<Level1Round, RoundBuildError>;

    /// # Errors
    ///
    /// Returns `RoundBuildError` if no round can be produced.
    async fn build_level2_round(&self, entries: &[StudyEntry])
    -> Result<Level2Round, RoundBuildError>;

    /// # Errors
    ///
    /// Returns `RoundBuildError::Unavailable` with a learner-facing reason when
    /// no entry has a swallowing role.
    async fn build_level3_round(&self, entries: &[StudyEntry])
    -> Result<Level3Round, RoundBuildError>;
}
