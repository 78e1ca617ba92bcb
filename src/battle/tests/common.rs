use crate::battle::engine::BattleEngine;
use crate::catalog::{BaseStats, MoveData, SpeciesTemplate};
use crate::combatant::Combatant;
use crate::errors::GameResult;
use crate::type_chart::TypeChart;
use rand::rngs::StdRng;
use rand::SeedableRng;
use schema::{MoveCategory, PokemonType};
use std::sync::Arc;

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```
/// let combatant = TestCombatantBuilder::new("Charmander", PokemonType::Fire)
///     .with_stats(39, 52, 43, 65)
///     .with_moves(vec![test_move("Ember", PokemonType::Fire, 40, 25)])
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    primary_type: PokemonType,
    secondary_type: Option<PokemonType>,
    stats: BaseStats,
    moves: Vec<Arc<MoveData>>,
    current_hp: Option<u32>,
}

impl TestCombatantBuilder {
    pub fn new(name: &str, primary_type: PokemonType) -> Self {
        Self {
            name: name.to_string(),
            primary_type,
            secondary_type: None,
            stats: BaseStats {
                hp: 100,
                attack: 50,
                defense: 50,
                speed: 50,
                special: 50,
            },
            moves: vec![test_move("Tackle", PokemonType::Normal, 40, 35)],
            current_hp: None,
        }
    }

    pub fn with_secondary(mut self, secondary: PokemonType) -> Self {
        self.secondary_type = Some(secondary);
        self
    }

    /// HP, attack, defense, speed.
    pub fn with_stats(mut self, hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        self.stats = BaseStats {
            hp,
            attack,
            defense,
            speed,
            special: 50,
        };
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.stats.speed = speed;
        self
    }

    pub fn with_moves(mut self, moves: Vec<Arc<MoveData>>) -> Self {
        self.moves = moves;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Combatant {
        let species = Arc::new(SpeciesTemplate {
            index: 0,
            name: self.name,
            base_stats: self.stats,
            primary_type: self.primary_type,
            secondary_type: self.secondary_type,
            learnset: Vec::new(),
        });
        let mut combatant = match Combatant::new(species, self.moves) {
            Ok(combatant) => combatant,
            Err(err) => panic!("Failed to build test combatant: {}", err),
        };
        if let Some(hp) = self.current_hp {
            combatant.set_current_hp(hp);
        }
        combatant
    }
}

pub fn test_move(name: &str, move_type: PokemonType, power: u32, pp: u16) -> Arc<MoveData> {
    Arc::new(MoveData {
        index: 0,
        name: name.to_string(),
        move_type,
        category: MoveCategory::Physical,
        power,
        accuracy: 100,
        max_pp: pp,
    })
}

pub fn struggle() -> Arc<MoveData> {
    test_move("Struggle", PokemonType::Normal, 50, 1)
}

/// Neutral chart with a few classic matchups filled in.
pub fn test_chart() -> Arc<TypeChart> {
    Arc::new(
        TypeChart::neutral()
            .with_entry(PokemonType::Fire, PokemonType::Grass, 2.0)
            .with_entry(PokemonType::Fire, PokemonType::Water, 0.5)
            .with_entry(PokemonType::Water, PokemonType::Fire, 2.0)
            .with_entry(PokemonType::Grass, PokemonType::Fire, 0.5)
            .with_entry(PokemonType::Normal, PokemonType::Ghost, 0.0),
    )
}

/// A 1v1 session still in `Init`.
pub fn create_test_battle(player: Combatant, opponent: Combatant) -> BattleEngine {
    assert_ok(BattleEngine::new(player, opponent, test_chart(), struggle()))
}

/// A 1v1 session with the turn order already decided.
pub fn started_battle(player: Combatant, opponent: Combatant) -> BattleEngine {
    let mut engine = create_test_battle(player, opponent);
    assert_ok(engine.decide_turn_order(&mut seeded_rng(0)));
    engine
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: GameResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
