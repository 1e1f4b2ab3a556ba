//! Skirmish commands through the parse, resolve, execute pipeline

mod common;

use common::Harness;
use warboard::battle::TroopKind;
use warboard::command::{FailureKind, OutcomeCode, OutcomeExtra};
use warboard::store::StoreError;

#[test]
fn test_basic_attack() {
    let mut h = Harness::new();
    assert!(h.occupant(3, 2).is_none());

    let results = h.execute("attack #1 at C4 with infantry", h.alice);
    assert_eq!(results[0].code, OutcomeCode::Ok);
    assert_eq!(results[0].text, "Attacking #1 with infantry at C4");
    assert!(matches!(
        results[0].extra,
        Some(OutcomeExtra::Deployed { battle, .. }) if battle == h.battle
    ));
    assert!(h.occupant(3, 2).is_some());
}

#[test]
fn test_verbs_share_one_meaning() {
    let mut h = Harness::new();
    let results = h.execute("Support at c1 with cavalry", h.alice);
    assert_eq!(results[0].text, "Supporting #1 with cavalry at C1");
    let results = h.execute("oppose at c2 with ranged", h.alice);
    assert_eq!(results[0].text, "Opposing #1 with ranged at C2");
}

#[test]
fn test_refer_nonexistent_battle() {
    let mut h = Harness::new();
    let results = h.fail_to_execute(
        "attack #9999 at C4 with infantry",
        h.alice,
        "Battle 9999 does not exist!",
    );
    assert_eq!(results[0].failure_kind(), Some(FailureKind::BattleExtraction));
}

#[test]
fn test_infer_battle() {
    let mut h = Harness::new();
    h.execute("attack at C4 with infantry", h.alice);
    assert!(h.occupant(3, 2).is_some());
}

#[test]
fn test_could_not_infer_battle() {
    let mut h = Harness::new();
    let second = h.driver.create_battle().unwrap();
    h.driver.start_battle(second).unwrap();

    h.fail_to_execute(
        "attack at C4 with infantry",
        h.alice,
        "There is more than one battle underway; you must specify which one to participate in.",
    );
}

#[test]
fn test_no_infer_battle_when_no_battle() {
    let mut h = Harness::new();
    let battle = h.battle;
    h.driver
        .store_mut()
        .transaction(|world| {
            world.battle_mut(battle).unwrap().active = false;
            Ok::<_, StoreError>(())
        })
        .unwrap();

    h.fail_to_execute(
        "attack at C4 with infantry",
        h.alice,
        "There are no battles underway!",
    );
}

#[test]
fn test_channel_infers_battle() {
    let mut h = Harness::new();
    let second = h.driver.create_battle().unwrap();
    h.driver.start_battle(second).unwrap();

    // Two battles are running, but the channel knows which one this is
    h.driver.channel_mut().inferred = Some(h.battle);
    h.execute("attack at C4 with infantry", h.alice);
    assert!(h.occupant(3, 2).is_some());
    assert!(h.occupant_in(second, 3, 2).is_none());
}

#[test]
fn test_refer_to_other_battle() {
    let mut h = Harness::new();
    let second = h.driver.create_battle().unwrap();
    h.driver.start_battle(second).unwrap();

    h.execute(&format!("attack #{} at C4 with infantry", second), h.alice);
    assert!(h.occupant_in(second, 3, 2).is_some());
    assert!(h.occupant(3, 2).is_none());
}

#[test]
fn test_refer_nonexistent_type() {
    let mut h = Harness::new();
    let results = h.fail_to_execute(
        "attack at C4 with fobble",
        h.alice,
        "Could not find any free 'fobble' troops",
    );
    assert_eq!(results[0].failure_kind(), Some(FailureKind::UnitAvailability));
    assert!(h.occupant(3, 2).is_none());
}

#[test]
fn test_out_of_troops() {
    let mut h = Harness::new();
    h.execute("attack #1 at C4 with infantry", h.alice);
    assert!(h.occupant(3, 2).is_some());

    h.fail_to_execute(
        "attack #1 at C1 with infantry",
        h.alice,
        "Could not find any free 'infantry' troops",
    );
    assert!(h.occupant(0, 2).is_none());
}

#[test]
fn test_second_troop() {
    let mut h = Harness::new();
    let alice = h.alice;
    h.driver
        .store_mut()
        .transaction(|world| {
            world.grant_troop(alice, TroopKind::Infantry);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    h.execute("attack #1 at C4 with infantry", h.alice);
    let first = h.occupant(3, 2).unwrap();
    h.execute("attack #1 at C1 with infantry", h.alice);
    let second = h.occupant(0, 2).unwrap();

    assert_ne!(first, second);
    assert_eq!(h.troop(first).kind, h.troop(second).kind);
}

#[test]
fn test_skip_dead_troop() {
    let mut h = Harness::new();
    let alice = h.alice;
    h.driver
        .store_mut()
        .transaction(|world| {
            world.grant_troop(alice, TroopKind::Infantry);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    h.execute("attack #1 at C4 with infantry", h.alice);
    let first = h.occupant(3, 2).unwrap();

    h.kill(first, "is lost in time and space");
    assert!(h.occupant(3, 2).is_none());

    h.execute("attack #1 at C4 with infantry", h.alice);
    let second = h.occupant(3, 2).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_placement_refusals() {
    let mut h = Harness::new();
    h.fail_to_execute(
        "attack at J4 with infantry",
        h.alice,
        "You cannot place a troop in enemy territory",
    );
    h.fail_to_execute(
        "attack at F4 with infantry",
        h.bob,
        "You cannot place a troop in enemy territory",
    );

    h.execute("attack at C4 with infantry", h.alice);
    let results = h.fail_to_execute(
        "attack at C4 with cavalry",
        h.alice,
        "There is already a troop at that location",
    );
    assert_eq!(results[0].failure_kind(), Some(FailureKind::Placement));
}

#[test]
fn test_parse_failure_is_reported() {
    let mut h = Harness::new();
    h.driver.channel_mut().push("attack at A,X with infantry", h.alice);
    let results = h.bot_loop();
    assert!(!results[0].success);
    assert_eq!(results[0].failure_kind(), Some(FailureKind::Parse));
    assert!(results[0].text.ends_with("Message: Expected a row number"));
}

#[test]
fn test_status_after_deploying() {
    let mut h = Harness::new();
    h.execute("attack at C4 with infantry", h.alice);
    let results = h.execute("status", h.alice);
    assert!(results[0].text.starts_with("alice (side 0)"));
    assert!(results[0].text.contains("(infantry): in battle #1 at C4"));
    assert!(results[0].text.contains("(cavalry): ready"));
}

#[test]
fn test_oversized_row_is_off_the_board() {
    let mut h = Harness::new();
    let results = h.fail_to_execute(
        "attack at a99999999999999999999 with infantry",
        h.alice,
        "That row is not on the board!",
    );
    assert_eq!(results[0].failure_kind(), Some(FailureKind::Placement));
}

#[test]
fn test_unstarted_battle_past_its_start_refuses() {
    let mut h = Harness::new();
    let second = h.driver.create_battle().unwrap();

    h.fail_to_execute(
        &format!("attack #{} at C4 with infantry", second),
        h.alice,
        "That battle has not yet begun!",
    );

    // The command is handled before the tick that would start the battle
    let begins = h.driver.store().world().battle(second).unwrap().begins;
    h.driver.clock().set(begins);
    h.fail_to_execute(
        &format!("attack #{} at C4 with infantry", second),
        h.alice,
        "That battle has ended early!",
    );
    assert!(h.driver.store().world().battle(second).unwrap().active);
}
