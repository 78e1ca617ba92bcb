use serde::{Deserialize, Serialize};

/// One row of the species stats table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRow {
    pub index: u16,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub special: u32,
    // Moves this species may be taught; empty means any catalog move.
    #[serde(default)]
    pub learnset: Vec<String>,
}

/// One row of the species types table, joined to `SpeciesRow` by `index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRow {
    pub index: u16,
    pub name: String,
    pub type1: String,
    #[serde(default)]
    pub type2: Option<String>,
}
