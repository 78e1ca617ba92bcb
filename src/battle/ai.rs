//! Move-selection drivers for battle sessions.

use crate::battle::engine::{AttackResolution, MoveChoice};
use crate::battle::runner::BattleSnapshot;
use crate::battle::state::Side;
use crate::errors::ValidationError;
use log::debug;
use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// A trait for anything that can supply a move choice for one side of a battle.
/// Player input, random opponents, and scripted test drivers all sit behind it.
pub trait Behavior {
    /// Pick a move for `side` given the current state of the battle.
    fn choose_move(&mut self, side: Side, snapshot: &BattleSnapshot, rng: &mut dyn RngCore) -> MoveChoice;

    /// The last choice was rejected; the driver will be asked again.
    fn rejected(&mut self, _error: &ValidationError) {}

    /// The last choice was applied.
    fn resolved(&mut self, _resolution: &AttackResolution) {}
}

/// Picks uniformly among the slots that are usable right now.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBehavior;

impl RandomBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for RandomBehavior {
    fn choose_move(&mut self, side: Side, snapshot: &BattleSnapshot, rng: &mut dyn RngCore) -> MoveChoice {
        let usable = snapshot.combatant(side).usable_slots();
        if usable.is_empty() {
            return MoveChoice::Struggle;
        }
        let slot = usable[rng.random_range(0..usable.len())];
        debug!("{:?} randomly picked slot {}", side, slot);
        MoveChoice::Slot(slot)
    }
}

/// Plays back a fixed list of choices, then falls back to random picks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBehavior {
    choices: VecDeque<MoveChoice>,
    rejections: Vec<ValidationError>,
}

impl ScriptedBehavior {
    pub fn new(choices: impl IntoIterator<Item = MoveChoice>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            rejections: Vec::new(),
        }
    }

    /// Every rejection reported back to this driver, in order.
    pub fn rejections(&self) -> &[ValidationError] {
        &self.rejections
    }
}

impl Behavior for ScriptedBehavior {
    fn choose_move(&mut self, side: Side, snapshot: &BattleSnapshot, rng: &mut dyn RngCore) -> MoveChoice {
        match self.choices.pop_front() {
            Some(choice) => choice,
            None => RandomBehavior.choose_move(side, snapshot, rng),
        }
    }

    fn rejected(&mut self, error: &ValidationError) {
        self.rejections.push(error.clone());
    }
}
