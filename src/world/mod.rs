pub mod encounter;
pub mod grid;
pub mod inventory;

pub use encounter::{Biome, EncounterController, EncounterOutcome, PendingEncounter};
pub use grid::{Direction, EncounterThresholds, ExplorationGrid, Position, StepOutcome, Terrain, Viewport};
pub use inventory::Inventory;
