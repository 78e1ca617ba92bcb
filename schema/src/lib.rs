// Pokemon Explorer Schema - Shared type definitions
// This crate holds the closed type universe and the raw row shapes of the four
// startup tables, so the loader and the game crate agree on one definition.

pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
