//! Library files: schema, validation and the loading store
//!
//! A library declares scenarios and aliases for other libraries. Loading
//! rewrites every file reference to an absolute path next to the declaring
//! file and follows library references transitively.

mod store;
mod types;
mod validation;


pub use store::{parse_library, LibraryStore};
pub use types::{Library, LibraryRef, Scenario, ScenarioRef, Snippet};
pub use validation::validate;
