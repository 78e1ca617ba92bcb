use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

/// The closed type universe. Declaration order is the row/column order of the
/// type-effectiveness matrix.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    FromRepr,
)]
#[strum(ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl PokemonType {
    /// Position of this type in the effectiveness matrix.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::from_repr(index)
    }
}

/// Raw type-effectiveness table as stored on disk.
///
/// `types` names the columns (and rows) in order; `rows[attacker][defender]`
/// holds the multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeChartTable {
    pub types: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}
