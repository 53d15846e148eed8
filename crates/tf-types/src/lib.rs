pub mod participant;
pub mod team;
pub mod config;
pub mod errors;

pub use participant::*;
pub use team::*;
pub use config::*;
pub use errors::*;
