use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// One row of the move table.
///
/// `move_type` and `category` stay raw strings here; the catalog parses them so an
/// unknown name surfaces as a configuration error with the row attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRow {
    pub index: u16,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: String,
    pub pp: u16,
    pub power: u32,
    pub accuracy: u8,
}
