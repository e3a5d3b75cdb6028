use std::sync::Mutex;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use study_core::model::{
    DeckRound, Level1Question, Level1Round, Level2Round, Level3Round, LevelId, StudyEntry,
};

use super::RoundBuilder;
use crate::error::RoundBuildError;

/// Wrong names offered next to the correct one in a level 1 question.
pub const DISTRACTOR_COUNT: usize = 3;

pub const LEVEL3_UNAVAILABLE_REASON: &str = "Level 3 Unavailable: no swallowing role entries found";

/// Round builder that shuffles question order and name options.
///
/// Distractors are drawn from the entries passed in, so a retry round over a
/// few failed entries offers correspondingly few names.
pub struct ShuffledRoundBuilder {
    rng: Mutex<StdRng>,
}

impl ShuffledRoundBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible shuffles, for tests and `--seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(
        &self,
        build: impl FnOnce(&mut StdRng) -> Result<T, RoundBuildError>,
    ) -> Result<T, RoundBuildError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| RoundBuildError::Failed(e.to_string()))?;
        build(&mut *rng)
    }
}

impl Default for ShuffledRoundBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShuffledRoundBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShuffledRoundBuilder").finish_non_exhaustive()
    }
}

#[async_trait]
impl RoundBuilder for ShuffledRoundBuilder {
    async fn build_level1_round(
        &self,
        entries: &[StudyEntry],
    ) -> Result<Level1Round, RoundBuildError> {
        self.with_rng(|rng| level1_round(entries, rng))
    }

    async fn build_level2_round(
        &self,
        entries: &[StudyEntry],
    ) -> Result<Level2Round, RoundBuildError> {
        if entries.is_empty() {
            return Err(RoundBuildError::Empty {
                level: LevelId::Level2,
            });
        }
        self.with_rng(|rng| {
            let mut deck = entries.to_vec();
            deck.shuffle(rng);
            Ok(DeckRound::new(deck)?)
        })
    }

    async fn build_level3_round(
        &self,
        entries: &[StudyEntry],
    ) -> Result<Level3Round, RoundBuildError> {
        let mut eligible: Vec<StudyEntry> = entries
            .iter()
            .filter(|entry| entry.has_swallowing_role())
            .cloned()
            .collect();
        if eligible.is_empty() {
            return Err(RoundBuildError::Unavailable {
                reason: LEVEL3_UNAVAILABLE_REASON.to_owned(),
            });
        }
        self.with_rng(|rng| {
            eligible.shuffle(rng);
            Ok(DeckRound::new(eligible)?)
        })
    }
}

fn level1_round(entries: &[StudyEntry], rng: &mut StdRng) -> Result<Level1Round, RoundBuildError> {
    if entries.is_empty() {
        return Err(RoundBuildError::Empty {
            level: LevelId::Level1,
        });
    }

    let mut names: Vec<&str> = entries.iter().map(StudyEntry::name).collect();
    names.sort_unstable();
    names.dedup();

    let mut order = entries.to_vec();
    order.shuffle(rng);

    let mut questions = Vec::with_capacity(order.len());
    for entry in order {
        let mut distractors: Vec<String> = names
            .iter()
            .filter(|name| **name != entry.name())
            .map(|name| (*name).to_owned())
            .collect();
        distractors.shuffle(rng);

        let mut options = vec![entry.name().to_owned()];
        options.extend(distractors.into_iter().take(DISTRACTOR_COUNT));
        options.shuffle(rng);

        questions.push(Level1Question::new(entry, options)?);
    }

    Ok(Level1Round::new(questions)?)
}
