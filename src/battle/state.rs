use serde::{Deserialize, Serialize};

/// Lifecycle of a single battle session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Init,
    TurnOrder,
    ActionSelect,
    Resolve,
    CheckFaint,
    Done,
}

/// Which side of the battle a combatant fights on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    BattleStarted {
        player: String,
        opponent: String,
    },
    TurnOrderDecided {
        first: Side,
        pokemon: String,
        coin_flip: bool,
    },
    MoveUsed {
        side: Side,
        pokemon: String,
        move_used: String,
    },
    OutOfMoves {
        side: Side,
        pokemon: String,
    },
    DamageDealt {
        target: Side,
        pokemon: String,
        damage: u32,
        remaining_hp: u32,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    SameTypeAttackBonus {
        pokemon: String,
    },
    PpDepleted {
        side: Side,
        pokemon: String,
        move_used: String,
    },
    PokemonFainted {
        side: Side,
        pokemon: String,
    },
    BattleEnded {
        winner: Side,
        pokemon: String,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { player, opponent } => {
                Some(format!("{} faces off against {}!", player, opponent))
            }
            BattleEvent::TurnOrderDecided { pokemon, coin_flip, .. } => {
                if *coin_flip {
                    Some(format!("Speeds are tied! A coin flip lets {} go first.", pokemon))
                } else {
                    Some(format!("{} is faster and goes first.", pokemon))
                }
            }
            BattleEvent::MoveUsed { pokemon, move_used, .. } => {
                Some(format!("{} used {}!", pokemon, move_used))
            }
            BattleEvent::OutOfMoves { pokemon, .. } => {
                Some(format!("{} has no moves left!", pokemon))
            }
            BattleEvent::DamageDealt { pokemon, damage, remaining_hp, .. } => Some(format!(
                "{} took {} damage! ({} HP left)",
                pokemon, damage, remaining_hp
            )),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::SameTypeAttackBonus { .. } => {
                Some("Same Type Attack Bonus applied. 50% extra damage!".to_string())
            }
            BattleEvent::PpDepleted { pokemon, move_used, .. } => {
                Some(format!("{}'s {} is out of PP!", pokemon, move_used))
            }
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),
            BattleEvent::BattleEnded { pokemon, .. } => Some(format!("{} has won!", pokemon)),
        }
    }
}

/// Event bus for collecting battle events in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Remove and return everything collected so far.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }
}
