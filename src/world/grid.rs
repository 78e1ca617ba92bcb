//! The exploration map: a square terrain grid with a single player marker.

use crate::errors::{ConfigError, GameResult, InvariantViolation};
use crate::world::encounter::Biome;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Percent chance of an encounter on grass and water unless configured otherwise.
pub const DEFAULT_ENCOUNTER_THRESHOLD: u8 = 30;

const MARKER_GLYPH: char = '@';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Terrain {
    Open,
    Wall,
    Grass,
    Water,
}

impl Terrain {
    pub fn glyph(self) -> char {
        match self {
            Terrain::Open => '.',
            Terrain::Wall => '#',
            Terrain::Grass => '"',
            Terrain::Water => '~',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Terrain::Open),
            '#' => Some(Terrain::Wall),
            '"' => Some(Terrain::Grass),
            '~' => Some(Terrain::Water),
            _ => None,
        }
    }

    pub fn is_passable(self) -> bool {
        self != Terrain::Wall
    }

    /// The wild habitat this terrain rolls encounters for, if any.
    pub fn biome(self) -> Option<Biome> {
        match self {
            Terrain::Grass => Some(Biome::Grass),
            Terrain::Water => Some(Biome::Water),
            Terrain::Open | Terrain::Wall => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    #[strum(to_string = "up", serialize = "w", serialize = "north")]
    Up,
    #[strum(to_string = "down", serialize = "s", serialize = "south")]
    Down,
    #[strum(to_string = "left", serialize = "a", serialize = "west")]
    Left,
    #[strum(to_string = "right", serialize = "d", serialize = "east")]
    Right,
}

impl Direction {
    /// Unit step as `(row, column)` offsets.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Percent chance (1-100 roll, inclusive) that entering a terrain starts an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterThresholds {
    pub grass: u8,
    pub water: u8,
}

impl Default for EncounterThresholds {
    fn default() -> Self {
        Self {
            grass: DEFAULT_ENCOUNTER_THRESHOLD,
            water: DEFAULT_ENCOUNTER_THRESHOLD,
        }
    }
}

impl EncounterThresholds {
    pub fn for_terrain(&self, terrain: Terrain) -> Option<u8> {
        match terrain {
            Terrain::Grass => Some(self.grass),
            Terrain::Water => Some(self.water),
            Terrain::Open | Terrain::Wall => None,
        }
    }
}

/// Result of a single `try_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    Moved {
        from: Position,
        to: Position,
        terrain: Terrain,
        encounter: Option<Biome>,
    },
    /// The destination was a wall; nothing changed.
    Blocked { at: Position, direction: Direction },
    /// The step was clamped at the edge and the marker did not move.
    Stayed { at: Position, direction: Direction },
}

impl StepOutcome {
    pub fn encounter(&self) -> Option<Biome> {
        match self {
            StepOutcome::Moved { encounter, .. } => *encounter,
            _ => None,
        }
    }
}

/// Read-only window around the marker, clipped to the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub top_left: Position,
    pub marker: Position,
    pub rows: Vec<String>,
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// N x N terrain plus the player marker.
///
/// The marker is stored apart from the terrain, so the cell under it keeps its
/// terrain and is restored as soon as the marker leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationGrid {
    size: usize,
    cells: Vec<Terrain>,
    marker: Position,
    thresholds: EncounterThresholds,
}

impl ExplorationGrid {
    /// Parse an ASCII layout, one row per line.
    pub fn from_layout(layout: &str, thresholds: EncounterThresholds) -> GameResult<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let size = lines.len();
        if size == 0 {
            return Err(ConfigError::GridLayout("layout is empty".to_string()).into());
        }

        let mut cells = Vec::with_capacity(size * size);
        let mut markers = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != size {
                return Err(ConfigError::GridLayout(format!(
                    "row {} has {} cells, expected {}",
                    row, width, size
                ))
                .into());
            }
            for (col, glyph) in line.chars().enumerate() {
                if glyph == MARKER_GLYPH {
                    markers.push(Position::new(row, col));
                    cells.push(Terrain::Open);
                    continue;
                }
                let terrain = Terrain::from_glyph(glyph).ok_or_else(|| {
                    ConfigError::GridLayout(format!("unknown glyph {:?} at row {}, column {}", glyph, row, col))
                })?;
                cells.push(terrain);
            }
        }

        let marker = match markers.as_slice() {
            [marker] => *marker,
            _ => return Err(InvariantViolation::MarkerCount(markers.len()).into()),
        };
        Self::with_cells(size, cells, marker, thresholds)
    }

    /// Build a world from a seed: a wall border, scattered rock, grass and water
    /// patches, and an open start cell in the centre.
    pub fn generate<R: Rng + ?Sized>(
        size: usize,
        thresholds: EncounterThresholds,
        rng: &mut R,
    ) -> GameResult<Self> {
        if size < 5 {
            return Err(ConfigError::InvalidSetting {
                field: "grid_size",
                reason: format!("must be at least 5, got {}", size),
            }
            .into());
        }

        let mut cells = vec![Terrain::Open; size * size];
        for row in 0..size {
            for col in 0..size {
                let edge = row == 0 || col == 0 || row == size - 1 || col == size - 1;
                cells[row * size + col] = if edge {
                    Terrain::Wall
                } else {
                    match rng.random_range(0..100) {
                        0..=7 => Terrain::Wall,
                        8..=39 => Terrain::Grass,
                        40..=51 => Terrain::Water,
                        _ => Terrain::Open,
                    }
                };
            }
        }

        // Grow a couple of grass and water patches so the biomes cluster.
        for terrain in [Terrain::Grass, Terrain::Water, Terrain::Grass] {
            let centre = Position::new(rng.random_range(1..size - 1), rng.random_range(1..size - 1));
            let radius = (size / 6).max(1);
            for row in centre.row.saturating_sub(radius).max(1)..=(centre.row + radius).min(size - 2) {
                for col in centre.col.saturating_sub(radius).max(1)..=(centre.col + radius).min(size - 2) {
                    cells[row * size + col] = terrain;
                }
            }
        }

        let start = Position::new(size / 2, size / 2);
        cells[start.row * size + start.col] = Terrain::Open;
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let (dr, dc) = direction.delta();
            let row = start.row.saturating_add_signed(dr);
            let col = start.col.saturating_add_signed(dc);
            if cells[row * size + col] == Terrain::Wall {
                cells[row * size + col] = Terrain::Open;
            }
        }

        debug!("Generated {}x{} grid, marker at {}", size, size, start);
        Self::with_cells(size, cells, start, thresholds)
    }

    fn with_cells(
        size: usize,
        cells: Vec<Terrain>,
        marker: Position,
        thresholds: EncounterThresholds,
    ) -> GameResult<Self> {
        let grid = Self {
            size,
            cells,
            marker,
            thresholds,
        };
        grid.check_invariants()?;
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn marker(&self) -> Position {
        self.marker
    }

    pub fn thresholds(&self) -> EncounterThresholds {
        self.thresholds
    }

    /// Terrain at a cell, ignoring the marker. None outside the grid.
    pub fn terrain_at(&self, position: Position) -> Option<Terrain> {
        if position.row < self.size && position.col < self.size {
            Some(self.cells[position.row * self.size + position.col])
        } else {
            None
        }
    }

    /// Terrain currently hidden beneath the marker.
    pub fn terrain_under_marker(&self) -> Terrain {
        self.cells[self.marker.row * self.size + self.marker.col]
    }

    /// Destination of a unit step, clamped into the grid.
    pub fn destination(&self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        let last = self.size - 1;
        Position::new(
            self.marker.row.saturating_add_signed(dr).min(last),
            self.marker.col.saturating_add_signed(dc).min(last),
        )
    }

    /// Attempt one step and roll for an encounter on grass or water.
    pub fn try_step<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> StepOutcome {
        let from = self.marker;
        let to = self.destination(direction);
        if to == from {
            return StepOutcome::Stayed { at: from, direction };
        }

        let terrain = self.cells[to.row * self.size + to.col];
        if !terrain.is_passable() {
            debug!("Step {} from {} blocked by wall at {}", direction, from, to);
            return StepOutcome::Blocked { at: from, direction };
        }

        self.marker = to;
        let encounter = match (terrain.biome(), self.thresholds.for_terrain(terrain)) {
            (Some(biome), Some(threshold)) => {
                let roll: u8 = rng.random_range(1..=100);
                debug!("Encounter roll on {} at {}: {} (needs <= {})", terrain, to, roll, threshold);
                (roll <= threshold).then_some(biome)
            }
            _ => None,
        };

        StepOutcome::Moved {
            from,
            to,
            terrain,
            encounter,
        }
    }

    /// The window of cells within `radius` of the marker.
    pub fn viewport(&self, radius: usize) -> Viewport {
        let top = self.marker.row.saturating_sub(radius);
        let left = self.marker.col.saturating_sub(radius);
        let bottom = (self.marker.row + radius).min(self.size - 1);
        let right = (self.marker.col + radius).min(self.size - 1);

        let rows = (top..=bottom)
            .map(|row| (left..=right).map(|col| self.glyph_at(Position::new(row, col))).collect())
            .collect();

        Viewport {
            top_left: Position::new(top, left),
            marker: self.marker,
            rows,
        }
    }

    /// Exactly one marker, inside the grid and not on a wall.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        match self.terrain_at(self.marker) {
            Some(terrain) if terrain.is_passable() => Ok(()),
            _ => Err(InvariantViolation::MarkerPlacement(self.marker)),
        }
    }

    fn glyph_at(&self, position: Position) -> char {
        if position == self.marker {
            MARKER_GLYPH
        } else {
            self.cells[position.row * self.size + position.col].glyph()
        }
    }
}

impl fmt::Display for ExplorationGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.viewport(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GameError;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;
    use std::str::FromStr;

    const ROOM: &str = "\
#####
#.\"~#
#.@.#
#\"#.#
#####
";

    fn room() -> ExplorationGrid {
        ExplorationGrid::from_layout(ROOM, EncounterThresholds::default()).unwrap()
    }

    #[test]
    fn test_layout_round_trips_through_display() {
        let grid = room();
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.marker(), Position::new(2, 2));
        assert_eq!(grid.terrain_under_marker(), Terrain::Open);
        assert_eq!(grid.to_string(), ROOM);
    }

    #[rstest]
    #[case("")]
    #[case("...\n..\n...")]
    #[case("..@\n.x.\n...")]
    fn test_bad_layouts_are_config_errors(#[case] layout: &str) {
        assert!(matches!(
            ExplorationGrid::from_layout(layout, EncounterThresholds::default()),
            Err(GameError::Config(ConfigError::GridLayout(_)))
        ));
    }

    #[rstest]
    #[case("...\n...\n...", 0)]
    #[case("@..\n...\n..@", 2)]
    fn test_marker_count_must_be_one(#[case] layout: &str, #[case] found: usize) {
        assert_eq!(
            ExplorationGrid::from_layout(layout, EncounterThresholds::default()).unwrap_err(),
            GameError::from(InvariantViolation::MarkerCount(found))
        );
    }

    #[test]
    fn test_wall_step_changes_nothing() {
        let mut grid = room();
        let before = grid.clone();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = grid.try_step(Direction::Down, &mut rng);

        assert_eq!(
            outcome,
            StepOutcome::Blocked {
                at: Position::new(2, 2),
                direction: Direction::Down
            }
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_departed_cell_terrain_is_restored() {
        let mut grid = room();
        let never = EncounterThresholds { grass: 0, water: 0 };
        grid.thresholds = never;
        let mut rng = StdRng::seed_from_u64(1);

        // Up onto grass, then right onto water, then back down to the start.
        assert!(matches!(
            grid.try_step(Direction::Up, &mut rng),
            StepOutcome::Moved { terrain: Terrain::Grass, encounter: None, .. }
        ));
        assert_eq!(grid.terrain_under_marker(), Terrain::Grass);
        assert!(matches!(
            grid.try_step(Direction::Right, &mut rng),
            StepOutcome::Moved { terrain: Terrain::Water, .. }
        ));
        assert_eq!(grid.terrain_at(Position::new(1, 2)), Some(Terrain::Grass));
        grid.try_step(Direction::Left, &mut rng);
        grid.try_step(Direction::Down, &mut rng);

        assert_eq!(grid.marker(), Position::new(2, 2));
        assert_eq!(grid.to_string(), ROOM);
    }

    #[test]
    fn test_edge_steps_are_clamped() {
        let mut grid = ExplorationGrid::from_layout("@..\n...\n...", EncounterThresholds::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        for direction in [Direction::Up, Direction::Left] {
            assert_eq!(
                grid.try_step(direction, &mut rng),
                StepOutcome::Stayed {
                    at: Position::new(0, 0),
                    direction
                }
            );
        }
        assert_eq!(grid.destination(Direction::Right), Position::new(0, 1));
    }

    #[test]
    fn test_open_ground_never_rolls() {
        let mut grid = ExplorationGrid::from_layout(
            "...\n.@.\n...",
            EncounterThresholds { grass: 100, water: 100 },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(grid.try_step(Direction::Right, &mut rng).encounter(), None);
            assert_eq!(grid.try_step(Direction::Left, &mut rng).encounter(), None);
        }
    }

    #[test]
    fn test_grass_encounter_rate_near_threshold() {
        let mut grid =
            ExplorationGrid::from_layout("\"\"\"\n\"@\"\n\"\"\"", EncounterThresholds::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let mut encounters = 0;
        for _ in 0..10_000 {
            let outcome = grid.try_step(Direction::Right, &mut rng);
            assert!(matches!(outcome, StepOutcome::Moved { terrain: Terrain::Grass, .. }));
            if outcome.encounter() == Some(Biome::Grass) {
                encounters += 1;
            }
            grid.try_step(Direction::Left, &mut rng);
        }

        let rate = encounters as f64 / 10_000.0;
        assert!((0.28..=0.32).contains(&rate), "encounter rate was {}", rate);
    }

    #[test]
    fn test_water_step_reports_water_biome() {
        let mut grid = ExplorationGrid::from_layout(
            "...\n.@~\n...",
            EncounterThresholds { grass: 0, water: 100 },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(grid.try_step(Direction::Right, &mut rng).encounter(), Some(Biome::Water));
    }

    #[test]
    fn test_viewport_is_clipped_to_grid() {
        let grid = room();
        let view = grid.viewport(1);
        assert_eq!(view.top_left, Position::new(1, 1));
        assert_eq!(view.rows, vec![".\"~", ".@.", "\"#.",]);

        let full = grid.viewport(10);
        assert_eq!(full.rows.len(), 5);
        assert_eq!(full.top_left, Position::new(0, 0));
    }

    #[test]
    fn test_generated_grid_is_reproducible_and_valid() {
        let a = ExplorationGrid::generate(15, EncounterThresholds::default(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = ExplorationGrid::generate(15, EncounterThresholds::default(), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.marker(), Position::new(7, 7));
        assert_eq!(a.terrain_under_marker(), Terrain::Open);
        assert_eq!(a.terrain_at(Position::new(0, 3)), Some(Terrain::Wall));
        assert!(a.check_invariants().is_ok());

        assert!(ExplorationGrid::generate(3, EncounterThresholds::default(), &mut StdRng::seed_from_u64(5)).is_err());
    }

    #[test]
    fn test_direction_parsing_accepts_aliases() {
        assert_eq!(Direction::from_str("W").unwrap(), Direction::Up);
        assert_eq!(Direction::from_str("left").unwrap(), Direction::Left);
        assert_eq!(Direction::from_str("east").unwrap(), Direction::Right);
        assert!(Direction::from_str("sideways").is_err());
    }
}
