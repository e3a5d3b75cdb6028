mod state;
pub(crate) mod study;

pub use state::ViewError;
pub use study::StudyView;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
