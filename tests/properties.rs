//! Property-based tests for the board rules and the command parser

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warboard::battle::{col_to_letter, fight, letter_to_col, FightOutcome, Placement, TroopKind};
use warboard::command::parse;
use warboard::core::{BattleConfig, BattleId, Position, Side};
use warboard::simulation::advance_battle;
use warboard::world::World;

fn kind() -> impl Strategy<Value = TroopKind> {
    prop::sample::select(TroopKind::RANKED.to_vec())
}

fn running_world(rules: &BattleConfig) -> (World, BattleId) {
    let mut world = World::new();
    world.register_actor("alice", Side::West, 0);
    world.register_actor("bob", Side::East, 0);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let battle = world.create_battle(rules, 0, &mut rng);
    world.battle_mut(battle).unwrap().active = true;
    (world, battle)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Swapping the fighters swaps the winner; only equal kinds tie.
    #[test]
    fn prop_fight_is_antisymmetric(a in kind(), b in kind()) {
        let expected = match fight(a, b) {
            FightOutcome::Attacker => FightOutcome::Defender,
            FightOutcome::Defender => FightOutcome::Attacker,
            FightOutcome::Tie => FightOutcome::Tie,
        };
        prop_assert_eq!(fight(b, a), expected);
        prop_assert_eq!(fight(a, b) == FightOutcome::Tie, a == b);
    }

    #[test]
    fn prop_column_letters_invert(col in 0usize..26) {
        let letter = col_to_letter(col).unwrap();
        prop_assert_eq!(letter_to_col(letter), Some(col));
        prop_assert_eq!(letter_to_col(letter.to_ascii_lowercase()), Some(col));
    }

    /// The parser answers every input with a command or an error.
    #[test]
    fn prop_parser_never_panics(text in "\\PC{0,40}") {
        let _ = parse(&text);
    }

    #[test]
    fn prop_parser_reports_column_inside_line(text in "(attack|oppose|support|status)[ #a-z0-9,]{0,24}") {
        if let Err(e) = parse(&text) {
            prop_assert!(e.column >= 1);
            prop_assert!(e.column <= text.chars().count() + 1);
        }
    }

    /// Deployment succeeds exactly on empty cells of one's own territory,
    /// and a refused deployment leaves the board untouched.
    #[test]
    fn prop_deploy_respects_bounds(col in -3i64..15, row in -3i64..8, east in any::<bool>()) {
        let rules = BattleConfig::default();
        let (mut world, battle) = running_world(&rules);
        let (name, side) = if east { ("bob", Side::East) } else { ("alice", Side::West) };
        let owner = world.find_actor(name).unwrap();
        let troop = world.troops_of(owner).next().unwrap().id;

        let result = world
            .session(battle, &rules, 10)
            .unwrap()
            .place_troop(troop, col, row, Placement::Deploy);

        let on_board = (0..rules.columns as i64).contains(&col) && (0..rules.rows as i64).contains(&row);
        let grid = &world.battle(battle).unwrap().grid;
        let allowed = on_board && grid.territory(col as usize) == Some(side);

        prop_assert_eq!(result.is_ok(), allowed);
        if allowed {
            let cell = Position::new(row as usize, col as usize);
            prop_assert_eq!(grid.occupant(cell), Some(troop));
        } else {
            prop_assert_eq!(grid.occupied().count(), 0);
            prop_assert!(world.troop(troop).unwrap().battle.is_none());
        }
    }

    /// However troops are thrown at the board, the records stay consistent.
    #[test]
    fn prop_ticking_keeps_integrity(
        orders in prop::collection::vec((any::<bool>(), 0usize..3, 0i64..11, 0i64..5), 1..12),
        ticks in 1usize..15,
    ) {
        let rules = BattleConfig { troop_delay: 0, ..BattleConfig::default() };
        let (mut world, battle) = running_world(&rules);
        let mut now = 10;

        for (east, pick, col, row) in orders {
            let owner = world.find_actor(if east { "bob" } else { "alice" }).unwrap();
            let Some(troop) = world.troops_of(owner).filter(|t| t.is_deployable()).nth(pick).map(|t| t.id) else {
                continue;
            };
            // Refusals are fine here; only consistency matters
            let _ = world
                .session(battle, &rules, now)
                .unwrap()
                .place_troop(troop, col, row, Placement::Deploy);
            advance_battle(&mut world, battle, &rules, now).unwrap();
            prop_assert!(world.check_integrity().is_ok(), "{:?}", world.check_integrity());
            now += 1;
        }

        for _ in 0..ticks {
            advance_battle(&mut world, battle, &rules, now).unwrap();
            prop_assert!(world.check_integrity().is_ok(), "{:?}", world.check_integrity());
            now += 1;
        }
    }
}
