//! Scenario files for the merit-order game: plant catalog, scoring
//! tunables, round history and building consumptions, in RON, TOML or JSON.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, Scenario, load_scenario};
