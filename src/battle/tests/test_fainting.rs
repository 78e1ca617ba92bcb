#[cfg(test)]
mod tests {
    use crate::battle::engine::{BattleEngine, MoveChoice};
    use crate::battle::state::{BattleEvent, BattlePhase, Side};
    use crate::battle::tests::common::{
        assert_ok, started_battle, struggle, test_chart, test_move, TestCombatantBuilder,
    };
    use crate::errors::{GameError, ValidationError};
    use pretty_assertions::assert_eq;
    use schema::PokemonType;

    #[test]
    fn test_knockout_ends_the_session() {
        let player = TestCombatantBuilder::new("Charmander", PokemonType::Fire)
            .with_stats(39, 52, 43, 65)
            .with_moves(vec![test_move("Ember", PokemonType::Fire, 40, 25)])
            .build();
        let opponent = TestCombatantBuilder::new("Oddish", PokemonType::Grass)
            .with_stats(45, 50, 55, 30)
            .with_hp(20)
            .build();
        let mut engine = started_battle(player, opponent);
        engine.take_events();

        let resolution = assert_ok(engine.submit(Side::Player, MoveChoice::Slot(1)));

        assert!(resolution.defender_fainted);
        assert_eq!(resolution.applied_damage, 20);
        assert_eq!(engine.phase(), BattlePhase::Done);
        assert!(engine.is_done());
        assert_eq!(engine.winner(), Some(Side::Player));
        assert_eq!(engine.acting_side(), None);
        assert!(engine.combatant(Side::Opponent).is_fainted());

        let texts: Vec<String> = engine.events().iter().filter_map(BattleEvent::format).collect();
        assert_eq!(
            texts,
            vec![
                "Charmander used Ember!".to_string(),
                "Oddish took 20 damage! (0 HP left)".to_string(),
                "It's super effective!".to_string(),
                "Same Type Attack Bonus applied. 50% extra damage!".to_string(),
                "Oddish fainted!".to_string(),
                "Charmander has won!".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_moves_accepted_after_done() {
        let player = TestCombatantBuilder::new("Charmander", PokemonType::Fire)
            .with_speed(65)
            .build();
        let opponent = TestCombatantBuilder::new("Oddish", PokemonType::Grass)
            .with_speed(30)
            .with_hp(1)
            .build();
        let mut engine = started_battle(player, opponent);
        assert_ok(engine.submit(Side::Player, MoveChoice::Slot(1)));

        for side in [Side::Player, Side::Opponent] {
            assert_eq!(
                engine.submit(side, MoveChoice::Slot(1)).unwrap_err(),
                GameError::Validation(ValidationError::NotAcceptingMoves)
            );
        }
        assert_eq!(engine.exchanges(), 1);
    }

    #[test]
    fn test_second_mover_can_win() {
        let player = TestCombatantBuilder::new("Jolteon", PokemonType::Electric)
            .with_stats(65, 10, 200, 130)
            .build();
        let opponent = TestCombatantBuilder::new("Snorlax", PokemonType::Normal)
            .with_stats(160, 110, 65, 30)
            .with_moves(vec![test_move("Body Slam", PokemonType::Normal, 85, 15)])
            .build();
        let mut engine = started_battle(player, opponent);

        assert_ok(engine.submit(Side::Player, MoveChoice::Slot(1)));
        let resolution = assert_ok(engine.submit(Side::Opponent, MoveChoice::Slot(1)));

        assert!(resolution.defender_fainted);
        assert_eq!(engine.winner(), Some(Side::Opponent));
        assert_eq!(engine.combatant(Side::Player).current_hp(), 0);
    }

    #[test]
    fn test_fainted_combatant_cannot_enter_battle() {
        let player = TestCombatantBuilder::new("Charmander", PokemonType::Fire).build();
        let opponent = TestCombatantBuilder::new("Oddish", PokemonType::Grass)
            .with_hp(0)
            .build();

        let result = BattleEngine::new(player, opponent, test_chart(), struggle());

        assert_eq!(
            result.unwrap_err(),
            GameError::Validation(ValidationError::Fainted("Oddish".to_string()))
        );
    }

    #[test]
    fn test_into_combatants_returns_final_state() {
        let player = TestCombatantBuilder::new("Charmander", PokemonType::Fire)
            .with_stats(39, 52, 43, 65)
            .build();
        let opponent = TestCombatantBuilder::new("Oddish", PokemonType::Grass)
            .with_stats(45, 50, 55, 30)
            .with_hp(1)
            .build();
        let mut engine = started_battle(player, opponent);
        assert_ok(engine.submit(Side::Player, MoveChoice::Slot(1)));

        let [player, opponent] = engine.into_combatants();

        assert_eq!(player.current_hp(), 39);
        assert!(opponent.is_fainted());
    }
}
