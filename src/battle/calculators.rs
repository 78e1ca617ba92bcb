use crate::catalog::MoveData;
use crate::combatant::Combatant;
use crate::type_chart::TypeChart;
use log::debug;
use serde::{Deserialize, Serialize};

/// Same-Type Attack Bonus multiplier.
pub const STAB_MULTIPLIER: f64 = 1.5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effectiveness {
    NotVeryEffective,
    Neutral,
    SuperEffective,
}

impl Effectiveness {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier < 1.0 {
            Effectiveness::NotVeryEffective
        } else if multiplier > 1.0 {
            Effectiveness::SuperEffective
        } else {
            Effectiveness::Neutral
        }
    }
}

/// Result of the damage formula for one move application.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// Damage after truncation; this is what gets subtracted from HP.
    pub damage: u32,
    pub raw_damage: f64,
    pub multiplier: f64,
    pub stab: bool,
}

impl DamageOutcome {
    pub fn effectiveness(&self) -> Effectiveness {
        Effectiveness::from_multiplier(self.multiplier)
    }
}

/// `(power * attack * multiplier) / defense`, then ×1.5 for STAB.
///
/// The result is truncated toward zero once per application. A defense of 0 is
/// treated as 1.
pub fn calculate_damage(
    attacker: &Combatant,
    move_: &MoveData,
    defender: &Combatant,
    chart: &TypeChart,
) -> DamageOutcome {
    let multiplier = chart.effective_multiplier(
        move_.move_type,
        defender.primary_type(),
        defender.secondary_type(),
    );
    let defense = f64::from(defender.defense().max(1));

    let mut raw_damage = f64::from(move_.power) * f64::from(attacker.attack()) * multiplier / defense;
    let stab = attacker.has_type(move_.move_type);
    if stab {
        raw_damage *= STAB_MULTIPLIER;
    }

    let damage = raw_damage.max(0.0).trunc() as u32;
    debug!(
        "damage({:.2}) = power({}) * attack({}) * multiplier({}) / defense({}){}",
        raw_damage,
        move_.power,
        attacker.attack(),
        multiplier,
        defense,
        if stab { " * STAB(150%)" } else { "" }
    );

    DamageOutcome {
        damage,
        raw_damage,
        multiplier,
        stab,
    }
}
