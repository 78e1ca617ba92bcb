use crate::world::grid::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Pokemon Explorer game core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Malformed or missing external data; fatal at startup
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A rejected command or selection; state is unchanged and the caller re-prompts
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// A logic or data defect; never expected in correct operation
    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Errors raised while loading and validating the startup tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown type name: {0:?}")]
    UnknownType(String),
    #[error("unknown move category {category:?} on move {move_name:?}")]
    UnknownCategory { move_name: String, category: String },
    #[error("species #{0} has no type row")]
    MissingTypeRow(u16),
    #[error("duplicate {table} entry: {key}")]
    DuplicateEntry { table: &'static str, key: String },
    #[error("species {species:?} lists unknown learnable move {move_name:?}")]
    UnknownLearnableMove { species: String, move_name: String },
    #[error("fallback move {0:?} is not in the move catalog")]
    MissingFallbackMove(String),
    #[error("type chart must be {expected}x{expected}, found {rows}x{columns}")]
    ChartDimensions {
        expected: usize,
        rows: usize,
        columns: usize,
    },
    #[error("type chart entry [{attacking}][{defending}] is not a valid multiplier: {value}")]
    ChartEntry {
        attacking: usize,
        defending: usize,
        value: f64,
    },
    #[error("type chart column {position} is {found}, expected {expected}")]
    ChartHeader {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("species catalog is empty")]
    EmptySpeciesCatalog,
    #[error("move catalog has no usable (non-status) moves")]
    EmptyMoveCatalog,
    #[error("invalid grid layout: {0}")]
    GridLayout(String),
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
    #[error("could not read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("could not parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Errors for invalid selections and commands. All are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("move slot {0} is out of range (1-4)")]
    SlotOutOfRange(usize),
    #[error("move slot {0} is empty")]
    EmptySlot(usize),
    #[error("move slot {0} has no PP left")]
    NoPpRemaining(usize),
    #[error("{0} has fainted and cannot act")]
    Fainted(String),
    #[error("{0} still has usable moves; Struggle is not allowed")]
    FallbackNotAllowed(String),
    #[error("it is not {0}'s turn")]
    NotYourTurn(String),
    #[error("the battle is not waiting for a move")]
    NotAcceptingMoves,
    #[error("at most 4 moves may be assigned, got {0}")]
    TooManyMoves(usize),
    #[error("unknown move: {0}")]
    UnknownMove(String),
    #[error("unknown species: {0}")]
    UnknownSpecies(String),
    #[error("{0} is not one of the starters")]
    NotAStarter(String),
    #[error("{species} cannot learn {move_name}")]
    NotLearnable { species: String, move_name: String },
    #[error("inventory slot {0} does not exist")]
    InvalidInventorySlot(usize),
    #[error("no combatant available to send into battle")]
    NoActiveCombatant,
    #[error("command {command} is not valid while {mode}")]
    InvalidCommand { command: String, mode: String },
}

/// Defensive checks on state that correct code never produces
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{name} has {hp} HP outside 0..={max_hp}")]
    HpOutOfRange { name: String, hp: u32, max_hp: u32 },
    #[error("move slot {slot} of {name} has {pp} PP above its max {max_pp}")]
    PpOutOfRange {
        name: String,
        slot: usize,
        pp: u16,
        max_pp: u16,
    },
    #[error("grid must hold exactly one player marker, found {0}")]
    MarkerCount(usize),
    #[error("player marker at {0:?} is outside the grid or on a wall")]
    MarkerPlacement(Position),
    #[error("battle session stalled in phase {0}")]
    SessionStalled(String),
    #[error("no species available for a wild encounter")]
    EmptySpeciesPool,
}

/// Type alias for Results using GameError
pub type GameResult<T> = Result<T, GameError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
