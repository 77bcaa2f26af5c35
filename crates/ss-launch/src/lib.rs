//! Starting Rocket League (and its companion) once credentials are in hand, plus the
//! release-feed check that tells users about newer launcher builds.

pub mod errors;
pub mod game;
pub mod update;

pub use errors::{LaunchError, Result};
pub use game::{GameLauncher, LaunchOutcome};
pub use update::UpdateChecker;
