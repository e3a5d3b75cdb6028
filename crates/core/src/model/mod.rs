mod entry;
mod level;
mod round;
mod summary;

pub use entry::{EntryError, NerveType, StudyEntry, normalize_role};
pub use level::LevelId;
pub use round::{DeckRound, Level1Question, Level1Round, Level2Round, Level3Round, RoundError};
pub use summary::{LevelSummary, SummaryError};
