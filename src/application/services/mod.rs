//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod population;
mod session;

pub use population::{PopulationService, WORLD_LABEL};
pub use session::{parse_script, SessionEvent, TreemapSession};
