pub mod backend;
pub mod initial_release;

pub use backend::{GhCliBackend, NewRelease, ReleaseBackend, ReleaseSummary};
pub use initial_release::{InitialRelease, ReleaseOutcome};
