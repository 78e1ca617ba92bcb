use crate::battle::calculators::{calculate_damage, DamageOutcome};
use crate::battle::runner::BattleSnapshot;
use crate::battle::state::{BattleEvent, BattlePhase, EventBus, Side};
use crate::catalog::MoveData;
use crate::combatant::Combatant;
use crate::errors::{GameResult, ValidationError};
use crate::type_chart::TypeChart;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a driver asks the acting side to do.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveChoice {
    /// A 1-based move slot.
    Slot(usize),
    /// The last-resort move; only legal once every slot is out of PP.
    Struggle,
}

/// Who moves first for the whole session, and whether a coin decided it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOrder {
    pub first: Side,
    pub second: Side,
    pub coin_flip: bool,
}

/// Everything that happened during one move application.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttackResolution {
    pub attacker: Side,
    pub defender: Side,
    pub move_name: String,
    pub used_fallback: bool,
    pub outcome: DamageOutcome,
    /// HP actually removed (never more than the defender had).
    pub applied_damage: u32,
    pub defender_hp: u32,
    pub defender_fainted: bool,
    /// PP left in the used slot; None for the fallback move or a finishing blow.
    pub pp_remaining: Option<u16>,
}

/// Resolves one attack at a time between a player-side and an opponent-side combatant.
#[derive(Debug, Clone)]
pub struct BattleEngine {
    combatants: [Combatant; 2],
    chart: Arc<TypeChart>,
    fallback: Arc<MoveData>,
    phase: BattlePhase,
    turn_order: Option<TurnOrder>,
    acting: Side,
    exchanges: u32,
    winner: Option<Side>,
    last_resolution: Option<AttackResolution>,
    event_bus: EventBus,
}

impl BattleEngine {
    /// Set up a session in `Init`. Both combatants must be standing.
    pub fn new(
        player: Combatant,
        opponent: Combatant,
        chart: Arc<TypeChart>,
        fallback: Arc<MoveData>,
    ) -> GameResult<Self> {
        for combatant in [&player, &opponent] {
            combatant.check_invariants()?;
            if combatant.is_fainted() {
                return Err(ValidationError::Fainted(combatant.name().to_string()).into());
            }
        }

        let mut event_bus = EventBus::new();
        event_bus.push(BattleEvent::BattleStarted {
            player: player.name().to_string(),
            opponent: opponent.name().to_string(),
        });

        Ok(Self {
            combatants: [player, opponent],
            chart,
            fallback,
            phase: BattlePhase::Init,
            turn_order: None,
            acting: Side::Player,
            exchanges: 0,
            winner: None,
            last_resolution: None,
            event_bus,
        })
    }

    /// `new` followed by `decide_turn_order`.
    pub fn start<R: Rng + ?Sized>(
        player: Combatant,
        opponent: Combatant,
        chart: Arc<TypeChart>,
        fallback: Arc<MoveData>,
        rng: &mut R,
    ) -> GameResult<Self> {
        let mut engine = Self::new(player, opponent, chart, fallback)?;
        engine.decide_turn_order(rng)?;
        Ok(engine)
    }

    /// Fix the turn order for the whole session.
    ///
    /// The strictly faster combatant goes first; a speed tie draws one coin flip.
    /// Only valid once, from `Init`.
    pub fn decide_turn_order<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<TurnOrder> {
        if self.phase != BattlePhase::Init {
            return Err(ValidationError::NotAcceptingMoves.into());
        }
        self.phase = BattlePhase::TurnOrder;

        let player_speed = self.combatants[Side::Player.index()].speed();
        let opponent_speed = self.combatants[Side::Opponent.index()].speed();
        let (first, coin_flip) = if player_speed > opponent_speed {
            (Side::Player, false)
        } else if opponent_speed > player_speed {
            (Side::Opponent, false)
        } else if rng.random_bool(0.5) {
            (Side::Player, true)
        } else {
            (Side::Opponent, true)
        };

        let order = TurnOrder {
            first,
            second: first.opponent(),
            coin_flip,
        };
        debug!(
            "Turn order: speeds {} vs {}, {:?} first (coin flip: {})",
            player_speed, opponent_speed, first, coin_flip
        );
        let pokemon = self.combatant(first).name().to_string();
        self.event_bus.push(BattleEvent::TurnOrderDecided {
            first,
            pokemon,
            coin_flip,
        });

        self.turn_order = Some(order);
        self.acting = first;
        self.phase = BattlePhase::ActionSelect;
        Ok(order)
    }

    /// Apply the acting side's move choice.
    ///
    /// A rejected choice returns a `ValidationError` and leaves HP, PP, and the
    /// acting side untouched so the same driver can be asked again.
    pub fn submit(&mut self, side: Side, choice: MoveChoice) -> GameResult<AttackResolution> {
        if self.phase != BattlePhase::ActionSelect {
            return Err(ValidationError::NotAcceptingMoves.into());
        }
        if side != self.acting {
            return Err(ValidationError::NotYourTurn(self.combatant(side).name().to_string()).into());
        }

        let attacker = self.combatant(side);
        let (move_, slot) = match choice {
            MoveChoice::Slot(slot) => (Arc::clone(attacker.select_move(slot)?), Some(slot)),
            MoveChoice::Struggle => {
                if attacker.has_usable_move() {
                    return Err(ValidationError::FallbackNotAllowed(attacker.name().to_string()).into());
                }
                (Arc::clone(&self.fallback), None)
            }
        };
        let used_fallback = slot.is_none();
        let defender_side = side.opponent();

        // RESOLVE
        self.phase = BattlePhase::Resolve;
        let attacker_name = self.combatant(side).name().to_string();
        let defender_name = self.combatant(defender_side).name().to_string();
        if used_fallback {
            self.event_bus.push(BattleEvent::OutOfMoves {
                side,
                pokemon: attacker_name.clone(),
            });
        }
        self.event_bus.push(BattleEvent::MoveUsed {
            side,
            pokemon: attacker_name.clone(),
            move_used: move_.name.clone(),
        });

        let outcome = calculate_damage(
            self.combatant(side),
            &move_,
            self.combatant(defender_side),
            &self.chart,
        );
        let defender = &mut self.combatants[defender_side.index()];
        let applied_damage = defender.take_damage(outcome.damage);
        defender.check_invariants()?;
        let defender_hp = defender.current_hp();

        self.event_bus.push(BattleEvent::DamageDealt {
            target: defender_side,
            pokemon: defender_name.clone(),
            damage: applied_damage,
            remaining_hp: defender_hp,
        });
        self.event_bus.push(BattleEvent::AttackTypeEffectiveness {
            multiplier: outcome.multiplier,
        });
        if outcome.stab {
            self.event_bus.push(BattleEvent::SameTypeAttackBonus {
                pokemon: attacker_name.clone(),
            });
        }

        // CHECK_FAINT
        self.phase = BattlePhase::CheckFaint;
        let defender_fainted = defender_hp == 0;
        let pp_remaining = if defender_fainted {
            self.event_bus.push(BattleEvent::PokemonFainted {
                side: defender_side,
                pokemon: defender_name,
            });
            self.event_bus.push(BattleEvent::BattleEnded {
                winner: side,
                pokemon: attacker_name.clone(),
            });
            info!(
                "{} defeated {} after {} exchanges",
                attacker_name,
                self.combatant(defender_side).name(),
                self.exchanges + 1
            );
            self.winner = Some(side);
            self.phase = BattlePhase::Done;
            None
        } else {
            let remaining = match slot {
                Some(slot) => Some(self.combatants[side.index()].apply_use(slot)?),
                None => None,
            };
            if remaining == Some(0) {
                self.event_bus.push(BattleEvent::PpDepleted {
                    side,
                    pokemon: attacker_name,
                    move_used: move_.name.clone(),
                });
            }
            self.acting = defender_side;
            self.phase = BattlePhase::ActionSelect;
            remaining
        };
        self.exchanges += 1;

        let resolution = AttackResolution {
            attacker: side,
            defender: defender_side,
            move_name: move_.name.clone(),
            used_fallback,
            outcome,
            applied_damage,
            defender_hp,
            defender_fainted,
            pp_remaining,
        };
        self.last_resolution = Some(resolution.clone());
        Ok(resolution)
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == BattlePhase::Done
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn turn_order(&self) -> Option<TurnOrder> {
        self.turn_order
    }

    /// The side whose move is being requested, if the session is waiting for one.
    pub fn acting_side(&self) -> Option<Side> {
        (self.phase == BattlePhase::ActionSelect).then_some(self.acting)
    }

    /// Number of move applications resolved so far.
    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    /// True when the side has no selectable slot left and must use the fallback move.
    pub fn needs_fallback(&self, side: Side) -> bool {
        !self.combatant(side).has_usable_move()
    }

    pub fn last_resolution(&self) -> Option<&AttackResolution> {
        self.last_resolution.as_ref()
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.event_bus.events()
    }

    /// Hand the collected events to the caller, leaving the bus empty.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.event_bus.drain()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::from_engine(self)
    }

    /// End the session and hand back both combatants as `[player, opponent]`.
    pub fn into_combatants(self) -> [Combatant; 2] {
        self.combatants
    }
}
