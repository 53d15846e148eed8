// Team formation engine
// Wraps the optimizer with roster validation, locked-team handling and a
// single-run gate

pub mod engine;
pub mod gate;
pub mod roster;

pub use engine::{FormationEngine, FormationResult, FormedTeam, RunId};
pub use gate::{RunGate, RunPermit};
pub use roster::FormationRequest;
