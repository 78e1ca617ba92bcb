use crate::battle::ai::Behavior;
use crate::battle::engine::{AttackResolution, BattleEngine, TurnOrder};
use crate::battle::state::{BattlePhase, Side};
use crate::combatant::Combatant;
use crate::errors::{GameError, GameResult, InvariantViolation};
use rand::RngCore;
use schema::PokemonType;
use serde::Serialize;

/// Read-only view of a battle for presentation layers and drivers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub acting: Option<Side>,
    pub winner: Option<Side>,
    pub turn_order: Option<TurnOrder>,
    pub exchanges: u32,
    /// Indexed by `Side::index()`.
    pub combatants: [CombatantInfo; 2],
    pub last_resolution: Option<AttackResolution>,
}

/// Information about a combatant for API queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantInfo {
    pub side: Side,
    pub name: String,
    pub species_index: u16,
    pub types: Vec<PokemonType>,
    pub current_hp: u32,
    pub max_hp: u32,
    pub is_fainted: bool,
    pub moves: Vec<MoveSlotInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSlotInfo {
    /// 1-based slot number, as accepted by `MoveChoice::Slot`.
    pub slot: usize,
    pub name: String,
    pub move_type: PokemonType,
    pub power: u32,
    pub pp: u16,
    pub max_pp: u16,
    pub usable: bool,
}

impl BattleSnapshot {
    pub fn from_engine(engine: &BattleEngine) -> Self {
        Self {
            phase: engine.phase(),
            acting: engine.acting_side(),
            winner: engine.winner(),
            turn_order: engine.turn_order(),
            exchanges: engine.exchanges(),
            combatants: [
                CombatantInfo::new(Side::Player, engine.combatant(Side::Player)),
                CombatantInfo::new(Side::Opponent, engine.combatant(Side::Opponent)),
            ],
            last_resolution: engine.last_resolution().cloned(),
        }
    }

    pub fn combatant(&self, side: Side) -> &CombatantInfo {
        &self.combatants[side.index()]
    }
}

impl CombatantInfo {
    pub fn new(side: Side, combatant: &Combatant) -> Self {
        let moves = combatant
            .moves()
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|instance| MoveSlotInfo {
                    slot: i + 1,
                    name: instance.move_.name.clone(),
                    move_type: instance.move_.move_type,
                    power: instance.move_.power,
                    pp: instance.pp,
                    max_pp: instance.max_pp(),
                    usable: instance.is_usable() && !combatant.is_fainted(),
                })
            })
            .collect();

        let mut types = vec![combatant.primary_type()];
        types.extend(combatant.secondary_type());

        Self {
            side,
            name: combatant.name().to_string(),
            species_index: combatant.species().index,
            types,
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp(),
            is_fainted: combatant.is_fainted(),
            moves,
        }
    }

    /// Slots a driver may pick right now.
    pub fn usable_slots(&self) -> Vec<usize> {
        self.moves.iter().filter(|m| m.usable).map(|m| m.slot).collect()
    }
}

/// Drive a session to `Done`, asking each side's driver for moves in turn.
///
/// Rejected choices are reported back to the same driver, which is asked again.
/// Returns the winning side.
pub fn run_session(
    engine: &mut BattleEngine,
    drivers: &mut [&mut dyn Behavior; 2],
    rng: &mut dyn RngCore,
) -> GameResult<Side> {
    if engine.phase() == BattlePhase::Init {
        engine.decide_turn_order(rng)?;
    }

    loop {
        if let Some(winner) = engine.winner() {
            return Ok(winner);
        }
        let side = engine.acting_side().ok_or_else(|| {
            GameError::from(InvariantViolation::SessionStalled(format!("{:?}", engine.phase())))
        })?;

        let snapshot = engine.snapshot();
        let driver = &mut drivers[side.index()];
        let choice = driver.choose_move(side, &snapshot, rng);
        match engine.submit(side, choice) {
            Ok(resolution) => driver.resolved(&resolution),
            Err(GameError::Validation(error)) => driver.rejected(&error),
            Err(other) => return Err(other),
        }
    }
}
