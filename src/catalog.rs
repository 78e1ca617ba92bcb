//! Immutable species and move templates, plus the indexed lookup service
//! used to resolve names and catalog numbers into those templates.

use crate::errors::{ConfigError, ConfigResult, ValidationError};
use crate::type_chart::parse_type;
use log::{debug, info};
use schema::{MoveCategory, MoveRow, PokemonType, SpeciesRow, TypeRow};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Name of the universal last-resort move.
pub const DEFAULT_FALLBACK_MOVE: &str = "Struggle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub special: u32,
}

/// Read-only record for one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesTemplate {
    pub index: u16,
    pub name: String,
    pub base_stats: BaseStats,
    pub primary_type: PokemonType,
    pub secondary_type: Option<PokemonType>,
    // Canonical move names; empty means every catalog move can be taught.
    pub learnset: Vec<String>,
}

impl SpeciesTemplate {
    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.primary_type == pokemon_type || self.secondary_type == Some(pokemon_type)
    }

    pub fn can_learn(&self, move_name: &str) -> bool {
        self.learnset.is_empty()
            || self
                .learnset
                .iter()
                .any(|learnable| learnable.eq_ignore_ascii_case(move_name))
    }
}

impl fmt::Display for SpeciesTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.base_stats;
        write!(
            f,
            "#{:03} {}  HP:{} ATK:{} DEF:{} SPD:{} SPC:{}  Type: {}",
            self.index,
            self.name,
            stats.hp,
            stats.attack,
            stats.defense,
            stats.speed,
            stats.special,
            self.primary_type
        )?;
        if let Some(secondary) = self.secondary_type {
            write!(f, "/{}", secondary)?;
        }
        Ok(())
    }
}

/// Read-only record for one damaging move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveData {
    pub index: u16,
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u32,
    pub accuracy: u8,
    pub max_pp: u16,
}

impl fmt::Display for MoveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} / {})  Power: {}  Accuracy: {}%  PP: {}",
            self.name, self.move_type, self.category, self.power, self.accuracy, self.max_pp
        )
    }
}

/// Species and move tables, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    species: Vec<Arc<SpeciesTemplate>>,
    moves: Vec<Arc<MoveData>>,
    water_species: Vec<usize>,
    species_by_name: HashMap<String, usize>,
    species_by_index: HashMap<u16, usize>,
    moves_by_name: HashMap<String, usize>,
    moves_by_index: HashMap<u16, usize>,
    fallback: Arc<MoveData>,
}

impl Catalog {
    /// Join and validate the raw tables.
    ///
    /// Species rows are joined to type rows by index. Status moves are dropped here so
    /// nothing downstream ever sees them. The fallback move must survive that filter.
    pub fn from_tables(
        species_rows: &[SpeciesRow],
        type_rows: &[TypeRow],
        move_rows: &[MoveRow],
        fallback_move: &str,
    ) -> ConfigResult<Self> {
        let mut moves = Vec::new();
        let mut moves_by_name = HashMap::new();
        let mut moves_by_index = HashMap::new();
        let mut filtered = 0usize;

        for row in move_rows {
            let category = MoveCategory::from_str(row.category.trim()).map_err(|_| {
                ConfigError::UnknownCategory {
                    move_name: row.name.clone(),
                    category: row.category.clone(),
                }
            })?;
            let move_type = parse_type(&row.move_type)?;
            if category == MoveCategory::Status {
                filtered += 1;
                continue;
            }

            let position = moves.len();
            if moves_by_index.insert(row.index, position).is_some() {
                return Err(ConfigError::DuplicateEntry {
                    table: "move",
                    key: row.index.to_string(),
                });
            }
            if moves_by_name.insert(name_key(&row.name), position).is_some() {
                return Err(ConfigError::DuplicateEntry {
                    table: "move",
                    key: row.name.clone(),
                });
            }
            moves.push(Arc::new(MoveData {
                index: row.index,
                name: row.name.trim().to_string(),
                move_type,
                category,
                power: row.power,
                accuracy: row.accuracy.min(100),
                max_pp: row.pp,
            }));
        }
        debug!("Filtered {} status moves from the move table", filtered);

        let fallback = moves_by_name
            .get(&name_key(fallback_move))
            .map(|&i| Arc::clone(&moves[i]))
            .ok_or_else(|| ConfigError::MissingFallbackMove(fallback_move.to_string()))?;
        if moves.iter().all(|m| m.name == fallback.name) {
            return Err(ConfigError::EmptyMoveCatalog);
        }

        let mut types_by_index = HashMap::new();
        for row in type_rows {
            let primary = parse_type(&row.type1)?;
            let secondary = match row.type2.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => Some(parse_type(name)?),
                _ => None,
            };
            if types_by_index.insert(row.index, (primary, secondary)).is_some() {
                return Err(ConfigError::DuplicateEntry {
                    table: "type",
                    key: row.index.to_string(),
                });
            }
        }

        let mut species = Vec::new();
        let mut species_by_name = HashMap::new();
        let mut species_by_index = HashMap::new();
        for row in species_rows {
            let &(primary_type, secondary_type) = types_by_index
                .get(&row.index)
                .ok_or(ConfigError::MissingTypeRow(row.index))?;

            let mut learnset = Vec::with_capacity(row.learnset.len());
            for move_name in &row.learnset {
                let position = moves_by_name.get(&name_key(move_name)).ok_or_else(|| {
                    ConfigError::UnknownLearnableMove {
                        species: row.name.clone(),
                        move_name: move_name.clone(),
                    }
                })?;
                learnset.push(moves[*position].name.clone());
            }

            let position = species.len();
            if species_by_index.insert(row.index, position).is_some() {
                return Err(ConfigError::DuplicateEntry {
                    table: "species",
                    key: row.index.to_string(),
                });
            }
            if species_by_name.insert(name_key(&row.name), position).is_some() {
                return Err(ConfigError::DuplicateEntry {
                    table: "species",
                    key: row.name.clone(),
                });
            }
            species.push(Arc::new(SpeciesTemplate {
                index: row.index,
                name: row.name.trim().to_string(),
                base_stats: BaseStats {
                    hp: row.hp,
                    attack: row.attack,
                    defense: row.defense,
                    speed: row.speed,
                    special: row.special,
                },
                primary_type,
                secondary_type,
                learnset,
            }));
        }
        if species.is_empty() {
            return Err(ConfigError::EmptySpeciesCatalog);
        }

        let water_species = species
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_type(PokemonType::Water))
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        info!(
            "Catalog loaded: {} species ({} water), {} moves",
            species.len(),
            water_species.len(),
            moves.len()
        );

        Ok(Self {
            species,
            moves,
            water_species,
            species_by_name,
            species_by_index,
            moves_by_name,
            moves_by_index,
            fallback,
        })
    }

    pub fn species(&self) -> &[Arc<SpeciesTemplate>] {
        &self.species
    }

    pub fn moves(&self) -> &[Arc<MoveData>] {
        &self.moves
    }

    /// Species carrying the Water type, in catalog order.
    pub fn water_species(&self) -> impl Iterator<Item = &Arc<SpeciesTemplate>> {
        self.water_species.iter().map(|&i| &self.species[i])
    }

    pub fn water_species_count(&self) -> usize {
        self.water_species.len()
    }

    pub fn fallback_move(&self) -> &Arc<MoveData> {
        &self.fallback
    }

    pub fn species_by_index(&self, index: u16) -> Result<&Arc<SpeciesTemplate>, ValidationError> {
        self.species_by_index
            .get(&index)
            .map(|&i| &self.species[i])
            .ok_or_else(|| ValidationError::UnknownSpecies(index.to_string()))
    }

    pub fn species_by_name(&self, name: &str) -> Result<&Arc<SpeciesTemplate>, ValidationError> {
        self.species_by_name
            .get(&name_key(name))
            .map(|&i| &self.species[i])
            .ok_or_else(|| ValidationError::UnknownSpecies(name.trim().to_string()))
    }

    /// Resolve a species from either its name or its catalog number.
    pub fn find_species(&self, query: &str) -> Result<&Arc<SpeciesTemplate>, ValidationError> {
        match query.trim().parse::<u16>() {
            Ok(index) => self.species_by_index(index),
            Err(_) => self.species_by_name(query),
        }
    }

    pub fn move_by_index(&self, index: u16) -> Result<&Arc<MoveData>, ValidationError> {
        self.moves_by_index
            .get(&index)
            .map(|&i| &self.moves[i])
            .ok_or_else(|| ValidationError::UnknownMove(index.to_string()))
    }

    pub fn move_by_name(&self, name: &str) -> Result<&Arc<MoveData>, ValidationError> {
        self.moves_by_name
            .get(&name_key(name))
            .map(|&i| &self.moves[i])
            .ok_or_else(|| ValidationError::UnknownMove(name.trim().to_string()))
    }

    /// Resolve a move from either its name or its catalog number.
    pub fn find_move(&self, query: &str) -> Result<&Arc<MoveData>, ValidationError> {
        match query.trim().parse::<u16>() {
            Ok(index) => self.move_by_index(index),
            Err(_) => self.move_by_name(query),
        }
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn species_row(index: u16, name: &str, stats: [u32; 5]) -> SpeciesRow {
        SpeciesRow {
            index,
            name: name.to_string(),
            hp: stats[0],
            attack: stats[1],
            defense: stats[2],
            speed: stats[3],
            special: stats[4],
            learnset: Vec::new(),
        }
    }

    pub fn type_row(index: u16, name: &str, type1: &str, type2: Option<&str>) -> TypeRow {
        TypeRow {
            index,
            name: name.to_string(),
            type1: type1.to_string(),
            type2: type2.map(str::to_string),
        }
    }

    pub fn move_row(index: u16, name: &str, move_type: &str, category: &str, pp: u16, power: u32) -> MoveRow {
        MoveRow {
            index,
            name: name.to_string(),
            move_type: move_type.to_string(),
            category: category.to_string(),
            pp,
            power,
            accuracy: 100,
        }
    }

    /// A small catalog: three land species, two water species, and a handful of moves.
    pub fn small_catalog() -> Catalog {
        let species = vec![
            species_row(1, "Bulbasaur", [45, 49, 49, 45, 65]),
            species_row(4, "Charmander", [39, 52, 43, 65, 50]),
            species_row(7, "Squirtle", [44, 48, 65, 43, 50]),
            species_row(16, "Pidgey", [40, 45, 40, 56, 35]),
            species_row(54, "Psyduck", [50, 52, 48, 55, 50]),
        ];
        let types = vec![
            type_row(1, "Bulbasaur", "Grass", Some("Poison")),
            type_row(4, "Charmander", "Fire", None),
            type_row(7, "Squirtle", "Water", None),
            type_row(16, "Pidgey", "Normal", Some("Flying")),
            type_row(54, "Psyduck", "Water", None),
        ];
        let moves = vec![
            move_row(1, "Pound", "Normal", "Physical", 35, 40),
            move_row(10, "Scratch", "Normal", "Physical", 35, 40),
            move_row(33, "Tackle", "Normal", "Physical", 35, 40),
            move_row(45, "Growl", "Normal", "Status", 40, 0),
            move_row(52, "Ember", "Fire", "Special", 25, 40),
            move_row(55, "Water Gun", "Water", "Special", 25, 40),
            move_row(22, "Vine Whip", "Grass", "Physical", 25, 45),
            move_row(165, "Struggle", "Normal", "Physical", 1, 50),
        ];
        Catalog::from_tables(&species, &types, &moves, DEFAULT_FALLBACK_MOVE)
            .expect("fixture catalog should be valid")
    }
}
