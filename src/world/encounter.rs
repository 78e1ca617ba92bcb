//! Wild encounters: spawning a wild combatant, running the battle, and
//! committing a capture to the roster.

use crate::battle::ai::{Behavior, RandomBehavior};
use crate::battle::engine::BattleEngine;
use crate::battle::runner::run_session;
use crate::battle::state::Side;
use crate::catalog::SpeciesTemplate;
use crate::combatant::{Combatant, MAX_MOVES};
use crate::errors::{GameResult, InvariantViolation};
use crate::loader::GameData;
use crate::world::inventory::Inventory;
use log::{debug, info, warn};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::Display;

/// Habitat an encounter was triggered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Biome {
    Grass,
    Water,
}

/// A wild combatant that has appeared but not yet been fought.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEncounter {
    pub biome: Biome,
    pub wild: Combatant,
}

/// How an encounter ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EncounterOutcome {
    /// The wild combatant fainted and joined the roster at `slot`.
    Captured { name: String, slot: usize },
    /// The player's combatant fainted. The roster is unchanged.
    PlayerFainted { name: String, wild: String },
    /// The player declined the battle.
    Fled { wild: String },
}

/// Spawns wild combatants and settles finished battles.
#[derive(Debug, Clone)]
pub struct EncounterController {
    data: Arc<GameData>,
}

impl EncounterController {
    pub fn new(data: Arc<GameData>) -> Self {
        Self { data }
    }

    /// Draw a wild species for the biome and give it four random moves.
    ///
    /// Water draws only from water-typed species; everything else draws from
    /// the whole catalog. Species with 0 base HP never appear. Moves are drawn
    /// independently, so repeats are possible.
    pub fn trigger<R: Rng + ?Sized>(&self, biome: Biome, rng: &mut R) -> GameResult<PendingEncounter> {
        let catalog = &self.data.catalog;
        let can_battle = |species: &&Arc<SpeciesTemplate>| species.base_stats.hp > 0;
        let mut pool: Vec<&Arc<SpeciesTemplate>> = match biome {
            Biome::Water => catalog.water_species().filter(can_battle).collect(),
            Biome::Grass => catalog.species().iter().filter(can_battle).collect(),
        };
        if pool.is_empty() {
            warn!("No species available for {} encounters; drawing from the full catalog", biome);
            pool = catalog.species().iter().filter(can_battle).collect();
        }
        if pool.is_empty() || catalog.moves().is_empty() {
            return Err(InvariantViolation::EmptySpeciesPool.into());
        }

        let species = Arc::clone(pool[rng.random_range(0..pool.len())]);
        let moves = (0..MAX_MOVES)
            .map(|_| Arc::clone(&catalog.moves()[rng.random_range(0..catalog.moves().len())]))
            .collect::<Vec<_>>();
        debug!(
            "Wild {} drawn with moves [{}]",
            species.name,
            moves.iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let wild = Combatant::new(species, moves)?;
        info!("A wild {} appeared in the {}!", wild.name(), biome);
        Ok(PendingEncounter { biome, wild })
    }

    /// Pair battle-scoped copies of the player's combatant and the wild one.
    /// The pending encounter itself is left untouched.
    pub fn begin_battle<R: Rng + ?Sized>(
        &self,
        pending: &PendingEncounter,
        player: &Combatant,
        rng: &mut R,
    ) -> GameResult<BattleEngine> {
        BattleEngine::start(
            player.clone(),
            pending.wild.clone(),
            Arc::clone(&self.data.chart),
            Arc::clone(self.data.catalog.fallback_move()),
            rng,
        )
    }

    /// Settle a finished battle. A fainted wild combatant is healed and appended
    /// to the inventory; a fainted player combatant changes nothing.
    pub fn conclude(&self, engine: BattleEngine, inventory: &mut Inventory) -> GameResult<EncounterOutcome> {
        let winner = engine
            .winner()
            .ok_or_else(|| InvariantViolation::SessionStalled(format!("{:?}", engine.phase())))?;
        let [player, mut wild] = engine.into_combatants();

        match winner {
            Side::Player => {
                wild.restore();
                let name = wild.name().to_string();
                let slot = inventory.push(wild);
                info!("Captured {} into slot {}", name, slot + 1);
                Ok(EncounterOutcome::Captured { name, slot })
            }
            Side::Opponent => {
                info!("{} fainted; the wild {} got away", player.name(), wild.name());
                Ok(EncounterOutcome::PlayerFainted {
                    name: player.name().to_string(),
                    wild: wild.name().to_string(),
                })
            }
        }
    }

    /// Decline a pending encounter.
    pub fn flee(&self, pending: PendingEncounter) -> EncounterOutcome {
        info!("Got away from the wild {}", pending.wild.name());
        EncounterOutcome::Fled {
            wild: pending.wild.name().to_string(),
        }
    }

    /// Trigger, fight, and settle an encounter in one go with the inventory's
    /// active combatant, the given player driver, and a random wild side.
    pub fn run_encounter(
        &self,
        biome: Biome,
        inventory: &mut Inventory,
        player_driver: &mut dyn Behavior,
        rng: &mut dyn RngCore,
    ) -> GameResult<EncounterOutcome> {
        let pending = self.trigger(biome, rng)?;
        let player = inventory.active()?.clone();
        let mut engine = self.begin_battle(&pending, &player, rng)?;

        let mut wild_driver = RandomBehavior::new();
        let mut drivers: [&mut dyn Behavior; 2] = [player_driver, &mut wild_driver];
        run_session(&mut engine, &mut drivers, rng)?;
        self.conclude(engine, inventory)
    }
}
