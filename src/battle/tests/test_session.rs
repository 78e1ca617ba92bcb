#[cfg(test)]
mod tests {
    use crate::battle::ai::{Behavior, RandomBehavior, ScriptedBehavior};
    use crate::battle::engine::MoveChoice;
    use crate::battle::runner::run_session;
    use crate::battle::state::{BattleEvent, BattlePhase, Side};
    use crate::battle::tests::common::{
        assert_ok, create_test_battle, seeded_rng, test_move, TestCombatantBuilder,
    };
    use crate::combatant::Combatant;
    use crate::errors::ValidationError;
    use pretty_assertions::assert_eq;
    use schema::PokemonType;

    fn charmander() -> Combatant {
        TestCombatantBuilder::new("Charmander", PokemonType::Fire)
            .with_stats(39, 52, 43, 65)
            .with_moves(vec![
                test_move("Scratch", PokemonType::Normal, 40, 35),
                test_move("Ember", PokemonType::Fire, 40, 25),
            ])
            .build()
    }

    fn squirtle() -> Combatant {
        TestCombatantBuilder::new("Squirtle", PokemonType::Water)
            .with_stats(44, 48, 65, 43)
            .with_moves(vec![
                test_move("Tackle", PokemonType::Normal, 40, 35),
                test_move("Water Gun", PokemonType::Water, 40, 25),
            ])
            .build()
    }

    #[test]
    fn test_random_session_runs_to_a_winner() {
        let mut engine = create_test_battle(charmander(), squirtle());
        let mut player = RandomBehavior::new();
        let mut opponent = RandomBehavior::new();
        let mut drivers: [&mut dyn Behavior; 2] = [&mut player, &mut opponent];

        let winner = assert_ok(run_session(&mut engine, &mut drivers, &mut seeded_rng(3)));

        assert_eq!(engine.phase(), BattlePhase::Done);
        assert_eq!(engine.winner(), Some(winner));
        assert!(engine.combatant(winner.opponent()).is_fainted());
        assert!(!engine.combatant(winner).is_fainted());
        assert!(engine.exchanges() > 0);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let replay = |seed: u64| {
            let mut engine = create_test_battle(charmander(), squirtle());
            let mut player = RandomBehavior::new();
            let mut opponent = RandomBehavior::new();
            let mut drivers: [&mut dyn Behavior; 2] = [&mut player, &mut opponent];
            assert_ok(run_session(&mut engine, &mut drivers, &mut seeded_rng(seed)));
            engine.take_events()
        };
        assert_eq!(replay(11), replay(11));
    }

    #[test]
    fn test_rejected_choice_is_reported_and_reasked() {
        let mut engine = create_test_battle(
            charmander(),
            TestCombatantBuilder::new("Caterpie", PokemonType::Bug)
                .with_stats(45, 30, 35, 45)
                .build(),
        );
        let mut player = ScriptedBehavior::new([MoveChoice::Slot(4), MoveChoice::Struggle, MoveChoice::Slot(2)]);
        let mut opponent = RandomBehavior::new();
        let mut drivers: [&mut dyn Behavior; 2] = [&mut player, &mut opponent];

        assert_ok(run_session(&mut engine, &mut drivers, &mut seeded_rng(5)));

        assert_eq!(
            player.rejections(),
            &[
                ValidationError::EmptySlot(4),
                ValidationError::FallbackNotAllowed("Charmander".to_string()),
            ]
        );
        let first_move = engine.events().iter().find_map(|e| match e {
            BattleEvent::MoveUsed { side: Side::Player, move_used, .. } => Some(move_used.clone()),
            _ => None,
        });
        assert_eq!(first_move, Some("Ember".to_string()));
    }

    #[test]
    fn test_random_driver_falls_back_to_struggle() {
        let mut exhausted = charmander();
        exhausted.set_pp(1, 0);
        exhausted.set_pp(2, 0);
        let mut engine = create_test_battle(exhausted, squirtle());
        let mut player = RandomBehavior::new();
        let mut opponent = RandomBehavior::new();
        let mut drivers: [&mut dyn Behavior; 2] = [&mut player, &mut opponent];

        assert_ok(run_session(&mut engine, &mut drivers, &mut seeded_rng(8)));

        let player_moves: Vec<&str> = engine
            .events()
            .iter()
            .filter_map(|e| match e {
                BattleEvent::MoveUsed { side: Side::Player, move_used, .. } => Some(move_used.as_str()),
                _ => None,
            })
            .collect();
        assert!(!player_moves.is_empty());
        assert!(player_moves.iter().all(|name| *name == "Struggle"));
    }

    #[test]
    fn test_snapshot_reports_usable_slots() {
        let mut exhausted = charmander();
        exhausted.set_pp(2, 0);
        let mut engine = create_test_battle(exhausted, squirtle());
        assert_ok(engine.decide_turn_order(&mut seeded_rng(1)));

        let snapshot = engine.snapshot();
        let player = snapshot.combatant(Side::Player);

        assert_eq!(snapshot.acting, Some(Side::Player));
        assert_eq!(player.usable_slots(), vec![1]);
        assert_eq!(player.moves.len(), 2);
        assert_eq!(player.types, vec![PokemonType::Fire]);
        assert_eq!(snapshot.combatant(Side::Opponent).name, "Squirtle");
    }
}
