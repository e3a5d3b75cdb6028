use std::sync::Arc;

use services::RoundBuilder;
use storage::repository::EntryRepository;

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn entries(&self) -> Arc<dyn EntryRepository>;
    fn round_builder(&self) -> Arc<dyn RoundBuilder>;
}

#[derive(Clone)]
pub struct AppContext {
    entries: Arc<dyn EntryRepository>,
    round_builder: Arc<dyn RoundBuilder>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            entries: app.entries(),
            round_builder: app.round_builder(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Arc<dyn EntryRepository> {
        Arc::clone(&self.entries)
    }

    #[must_use]
    pub fn round_builder(&self) -> Arc<dyn RoundBuilder> {
        Arc::clone(&self.round_builder)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
