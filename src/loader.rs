//! Startup loading of the four RON tables into validated, immutable game data.

use crate::catalog::Catalog;
use crate::errors::{ConfigError, ConfigResult};
use crate::type_chart::TypeChart;
use log::{debug, info};
use schema::{MoveRow, SpeciesRow, TypeChartTable, TypeRow};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const SPECIES_FILE: &str = "species.ron";
pub const TYPES_FILE: &str = "types.ron";
pub const MOVES_FILE: &str = "moves.ron";
pub const TYPE_CHART_FILE: &str = "type_chart.ron";

/// Everything the core reads but never writes.
#[derive(Debug, Clone)]
pub struct GameData {
    pub catalog: Catalog,
    pub chart: Arc<TypeChart>,
}

impl GameData {
    pub fn new(catalog: Catalog, chart: TypeChart) -> Self {
        Self {
            catalog,
            chart: Arc::new(chart),
        }
    }

    /// Load and validate `species.ron`, `types.ron`, `moves.ron` and `type_chart.ron`
    /// from a data directory.
    pub fn load(data_dir: &Path, fallback_move: &str) -> ConfigResult<Self> {
        info!("Loading game data from {}", data_dir.display());

        let species: Vec<SpeciesRow> = read_ron(&data_dir.join(SPECIES_FILE))?;
        let types: Vec<TypeRow> = read_ron(&data_dir.join(TYPES_FILE))?;
        let moves: Vec<MoveRow> = read_ron(&data_dir.join(MOVES_FILE))?;
        let chart: TypeChartTable = read_ron(&data_dir.join(TYPE_CHART_FILE))?;
        debug!(
            "Read {} species rows, {} type rows, {} move rows",
            species.len(),
            types.len(),
            moves.len()
        );

        let chart = TypeChart::from_table(&chart)?;
        let catalog = Catalog::from_tables(&species, &types, &moves, fallback_move)?;
        Ok(Self::new(catalog, chart))
    }
}

/// Read a whole file and deserialize it as RON.
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    ron::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
