pub mod loader;
pub mod types;

pub use loader::load_regatta;
pub use types::{Entrant, RaceClass, RegattaFile, ScoreSheet};
