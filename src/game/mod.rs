//! The explicit world state and the typed command/event surface that drives it.

pub mod driver;

use crate::battle::ai::{Behavior, RandomBehavior};
use crate::battle::engine::{BattleEngine, MoveChoice};
use crate::battle::runner::BattleSnapshot;
use crate::battle::state::{BattleEvent, Side};
use crate::catalog::{Catalog, SpeciesTemplate};
use crate::combatant::Combatant;
use crate::config::GameConfig;
use crate::errors::{ConfigError, GameError, GameResult, ValidationError};
use crate::loader::GameData;
use crate::world::{
    Biome, Direction, EncounterController, EncounterOutcome, ExplorationGrid, Inventory, PendingEncounter,
    Position, StepOutcome, Terrain, Viewport,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::Display;

pub use driver::{run_exploration, LoopTiming, Presenter};

/// Everything a front end can ask the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Step(Direction),
    Quit,
    /// A 1-based move slot.
    SelectMove(usize),
    /// Accept a pending encounter and start the battle.
    Confirm,
    /// Decline a pending encounter.
    Flee,
    /// Pick the 1-based inventory slot that fights the next battle.
    Choose(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Mode {
    #[strum(to_string = "exploring")]
    Exploring,
    #[strum(to_string = "an encounter is pending")]
    EncounterPending,
    #[strum(to_string = "battling")]
    Battling,
    #[strum(to_string = "finished")]
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Moved { to: Position, terrain: Terrain },
    Blocked { at: Position, direction: Direction },
    Stayed { at: Position, direction: Direction },
    EncounterStarted { biome: Biome, wild: String, species_index: u16 },
    Fled { wild: String },
    FighterChosen { slot: usize, name: String },
    Battle(BattleEvent),
    SessionEnded { winner: Side },
    Captured { name: String, slot: usize },
    PlayerFainted { name: String },
    Quit,
}

impl GameEvent {
    /// Human-readable narration; None for events with nothing to say.
    pub fn format(&self) -> Option<String> {
        match self {
            GameEvent::Moved { .. } => None,
            GameEvent::Blocked { .. } => Some("A wall blocks the way.".to_string()),
            GameEvent::Stayed { .. } => Some("You can't go any further that way.".to_string()),
            GameEvent::EncounterStarted { biome, wild, .. } => Some(format!(
                "A wild {} appeared in the {}! Fight (enter), run (r), or send someone else (c <slot>)?",
                wild,
                biome.to_string().to_lowercase()
            )),
            GameEvent::Fled { wild } => Some(format!("Got away safely from {}.", wild)),
            GameEvent::FighterChosen { name, .. } => Some(format!("{} will fight next.", name)),
            GameEvent::Battle(event) => event.format(),
            GameEvent::SessionEnded { .. } => None,
            GameEvent::Captured { name, .. } => Some(format!("{} has been added to your inventory.", name)),
            GameEvent::PlayerFainted { name } => Some(format!("{} fainted and was carried home.", name)),
            GameEvent::Quit => Some("Goodbye!".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
enum Encounter {
    #[default]
    Idle,
    Pending(PendingEncounter),
    Battling(Box<BattleEngine>),
}

/// All mutable game state.
#[derive(Debug, Clone)]
pub struct World {
    pub grid: ExplorationGrid,
    pub inventory: Inventory,
    encounter: Encounter,
}

impl World {
    pub fn new(grid: ExplorationGrid, inventory: Inventory) -> Self {
        Self {
            grid,
            inventory,
            encounter: Encounter::Idle,
        }
    }
}

/// One running game: immutable data, the world, and the injected randomness.
#[derive(Debug, Clone)]
pub struct Game {
    controller: EncounterController,
    world: World,
    rng: StdRng,
    finished: bool,
}

impl Game {
    pub fn new(data: Arc<GameData>, world: World, rng: StdRng) -> GameResult<Self> {
        world.grid.check_invariants()?;
        world.inventory.active()?;
        Ok(Self {
            controller: EncounterController::new(data),
            world,
            rng,
            finished: false,
        })
    }

    /// Build a game from configuration: the layout file if one is set, a seeded
    /// generated grid otherwise.
    pub fn from_config(config: &GameConfig, data: Arc<GameData>, starter: Combatant) -> GameResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let grid = match &config.grid_layout {
            Some(path) => {
                let layout = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                ExplorationGrid::from_layout(&layout, config.encounter_thresholds)?
            }
            None => ExplorationGrid::generate(config.grid_size, config.encounter_thresholds, &mut rng)?,
        };
        Self::new(data, World::new(grid, Inventory::with_starter(starter)), rng)
    }

    pub fn mode(&self) -> Mode {
        if self.finished {
            return Mode::Finished;
        }
        match self.world.encounter {
            Encounter::Idle => Mode::Exploring,
            Encounter::Pending(_) => Mode::EncounterPending,
            Encounter::Battling(_) => Mode::Battling,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn inventory(&self) -> &Inventory {
        &self.world.inventory
    }

    pub fn viewport(&self, radius: usize) -> Viewport {
        self.world.grid.viewport(radius)
    }

    pub fn pending(&self) -> Option<&PendingEncounter> {
        match &self.world.encounter {
            Encounter::Pending(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn battle(&self) -> Option<&BattleEngine> {
        match &self.world.encounter {
            Encounter::Battling(engine) => Some(engine.as_ref()),
            _ => None,
        }
    }

    pub fn battle_snapshot(&self) -> Option<BattleSnapshot> {
        self.battle().map(BattleEngine::snapshot)
    }

    /// Apply one command. Commands that make no sense in the current mode are
    /// rejected and change nothing.
    pub fn handle(&mut self, command: Command) -> GameResult<Vec<GameEvent>> {
        debug!("Handling {:?} while {}", command, self.mode());
        match (self.mode(), command) {
            (Mode::Exploring, Command::Step(direction)) => self.step(direction),
            (Mode::Exploring, Command::Quit) => {
                info!("Player quit");
                self.finished = true;
                Ok(vec![GameEvent::Quit])
            }
            (Mode::EncounterPending, Command::Confirm) => self.confirm(),
            (Mode::EncounterPending, Command::Flee) => self.flee(),
            (Mode::Exploring | Mode::EncounterPending, Command::Choose(slot)) => self.choose(slot),
            (Mode::Battling, Command::SelectMove(slot)) => self.select_move(slot),
            (mode, command) => Err(invalid_command(command, mode)),
        }
    }

    fn step(&mut self, direction: Direction) -> GameResult<Vec<GameEvent>> {
        let mut events = Vec::new();
        match self.world.grid.try_step(direction, &mut self.rng) {
            StepOutcome::Moved {
                to,
                terrain,
                encounter,
                ..
            } => {
                events.push(GameEvent::Moved { to, terrain });
                if let Some(biome) = encounter {
                    let pending = self.controller.trigger(biome, &mut self.rng)?;
                    events.push(GameEvent::EncounterStarted {
                        biome,
                        wild: pending.wild.name().to_string(),
                        species_index: pending.wild.species().index,
                    });
                    self.world.encounter = Encounter::Pending(pending);
                }
            }
            StepOutcome::Blocked { at, direction } => events.push(GameEvent::Blocked { at, direction }),
            StepOutcome::Stayed { at, direction } => events.push(GameEvent::Stayed { at, direction }),
        }
        Ok(events)
    }

    fn confirm(&mut self) -> GameResult<Vec<GameEvent>> {
        let player = self.world.inventory.active()?;
        let Encounter::Pending(pending) = &self.world.encounter else {
            return Err(invalid_command(Command::Confirm, self.mode()));
        };
        // The pending encounter stays in place until the battle has actually started.
        let engine = self.controller.begin_battle(pending, player, &mut self.rng)?;
        self.world.encounter = Encounter::Idle;
        let mut events = Vec::new();
        self.drive_battle(engine, &mut events)?;
        Ok(events)
    }

    fn choose(&mut self, slot: usize) -> GameResult<Vec<GameEvent>> {
        let index = slot.checked_sub(1).ok_or(ValidationError::InvalidInventorySlot(slot))?;
        self.world
            .inventory
            .set_active(index)
            .map_err(|_| ValidationError::InvalidInventorySlot(slot))?;
        let name = self.world.inventory.active()?.name().to_string();
        info!("{} is now the active combatant", name);
        Ok(vec![GameEvent::FighterChosen { slot, name }])
    }

    fn flee(&mut self) -> GameResult<Vec<GameEvent>> {
        match std::mem::take(&mut self.world.encounter) {
            Encounter::Pending(pending) => match self.controller.flee(pending) {
                EncounterOutcome::Fled { wild } => Ok(vec![GameEvent::Fled { wild }]),
                other => Ok(outcome_events(other)),
            },
            other => {
                self.world.encounter = other;
                Err(invalid_command(Command::Flee, self.mode()))
            }
        }
    }

    fn select_move(&mut self, slot: usize) -> GameResult<Vec<GameEvent>> {
        let mut engine = match std::mem::take(&mut self.world.encounter) {
            Encounter::Battling(engine) => engine,
            other => {
                self.world.encounter = other;
                return Err(invalid_command(Command::SelectMove(slot), self.mode()));
            }
        };

        let choice = if engine.needs_fallback(Side::Player) {
            MoveChoice::Struggle
        } else {
            MoveChoice::Slot(slot)
        };
        if let Err(error) = engine.submit(Side::Player, choice) {
            self.world.encounter = Encounter::Battling(engine);
            return Err(error);
        }

        let mut events = Vec::new();
        self.drive_battle(*engine, &mut events)?;
        Ok(events)
    }

    /// Play the wild side until it is the player's turn again or the session is over.
    fn drive_battle(&mut self, mut engine: BattleEngine, events: &mut Vec<GameEvent>) -> GameResult<()> {
        let mut wild_driver = RandomBehavior::new();
        while engine.acting_side() == Some(Side::Opponent) {
            let snapshot = engine.snapshot();
            let choice = wild_driver.choose_move(Side::Opponent, &snapshot, &mut self.rng);
            if let Err(error) = engine.submit(Side::Opponent, choice) {
                events.extend(engine.take_events().into_iter().map(GameEvent::Battle));
                self.world.encounter = Encounter::Battling(Box::new(engine));
                return Err(error);
            }
        }
        events.extend(engine.take_events().into_iter().map(GameEvent::Battle));

        match engine.winner() {
            Some(winner) => {
                events.push(GameEvent::SessionEnded { winner });
                let outcome = self.controller.conclude(engine, &mut self.world.inventory)?;
                events.extend(outcome_events(outcome));
                self.world.encounter = Encounter::Idle;
            }
            None => self.world.encounter = Encounter::Battling(Box::new(engine)),
        }
        Ok(())
    }
}

fn outcome_events(outcome: EncounterOutcome) -> Vec<GameEvent> {
    match outcome {
        EncounterOutcome::Captured { name, slot } => vec![GameEvent::Captured { name, slot }],
        EncounterOutcome::PlayerFainted { name, .. } => vec![GameEvent::PlayerFainted { name }],
        EncounterOutcome::Fled { wild } => vec![GameEvent::Fled { wild }],
    }
}

fn invalid_command(command: Command, mode: Mode) -> GameError {
    ValidationError::InvalidCommand {
        command: format!("{:?}", command),
        mode: mode.to_string(),
    }
    .into()
}

/// Pick a starter by name or catalog number from the configured starter list and
/// assemble its moves.
pub fn choose_starter<S: AsRef<str>>(
    catalog: &Catalog,
    starter_indices: &[u16],
    query: &str,
    move_queries: &[S],
) -> Result<Combatant, ValidationError> {
    let species = catalog.find_species(query)?;
    if !starter_indices.contains(&species.index) {
        return Err(ValidationError::NotAStarter(species.name.clone()));
    }
    info!("Starter chosen: {}", species.name);
    Combatant::assemble(catalog, species, move_queries)
}

/// The starter species on offer, in configured order. Unknown indices are skipped.
pub fn starter_options<'a>(catalog: &'a Catalog, starter_indices: &[u16]) -> Vec<&'a Arc<SpeciesTemplate>> {
    starter_indices
        .iter()
        .filter_map(|&index| catalog.species_by_index(index).ok())
        .collect()
}
