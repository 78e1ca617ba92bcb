// In: src/lib.rs

//! Pokemon Explorer
//!
//! A terminal monster-battling game: walk a grid, stumble into wild encounters in
//! tall grass and water, and fight them turn by turn to grow a roster. Game data is
//! loaded once from RON tables; the world state is explicit and all randomness is
//! injected, so every run can be replayed from a seed.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod game;
pub mod loader;
pub mod type_chart;
pub mod world;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// The closed type universe and the raw table rows.
pub use schema::{MoveCategory, MoveRow, PokemonType, SpeciesRow, TypeChartTable, TypeRow};

// --- From this crate's modules (`src/`) ---

// Battle engine and the drivers that feed it.
pub use battle::ai::{Behavior, RandomBehavior, ScriptedBehavior};
pub use battle::engine::{AttackResolution, BattleEngine, MoveChoice, TurnOrder};
pub use battle::runner::{run_session, BattleSnapshot, CombatantInfo, MoveSlotInfo};
pub use battle::state::{BattleEvent, BattlePhase, Side};

// Immutable data and its loading.
pub use catalog::{BaseStats, Catalog, MoveData, SpeciesTemplate, DEFAULT_FALLBACK_MOVE};
pub use config::GameConfig;
pub use loader::GameData;
pub use type_chart::TypeChart;

// Runtime state.
pub use combatant::{Combatant, MoveInstance, MAX_MOVES};
pub use game::{choose_starter, run_exploration, starter_options, Command, Game, GameEvent, LoopTiming, Mode, Presenter, World};
pub use world::{
    Biome, Direction, EncounterController, EncounterOutcome, EncounterThresholds, ExplorationGrid, Inventory,
    PendingEncounter, Position, StepOutcome, Terrain, Viewport,
};

// Crate-specific error and result types.
pub use errors::{ConfigError, ConfigResult, GameError, GameResult, InvariantViolation, ValidationError};
