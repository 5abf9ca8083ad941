use slot_core::{
    GameState, Notice, Participant, Registry, Role, SlotConfig, SlotError, SlotMachine,
};
use std::collections::HashSet;

fn host_judge(names: &[&str], seed: u64) -> SlotMachine {
    let participants = names.iter().map(|n| Participant::new(n.to_lowercase(), *n)).collect();
    let roles = vec![Role::new("host", "Host"), Role::new("judge", "Judge")];
    SlotMachine::new(Registry::from_parts(participants, roles).unwrap(), SlotConfig::default(), Some(seed))
}

#[test]
fn full_spin_never_repeats_a_winner() {
    for seed in 0..25 {
        let mut machine = host_judge(&["A", "B", "C"], seed);
        machine.spin_all().unwrap();
        machine.run_until_settled();

        assert_eq!(machine.state(), GameState::Result);
        let host = machine.result().get("host").unwrap();
        let judge = machine.result().get("judge").unwrap();
        assert_ne!(host.id, judge.id);
    }
}

#[test]
fn respin_with_one_candidate_keeps_current_winner() {
    let mut machine = host_judge(&["A", "B"], 9);
    machine.spin_all().unwrap();
    machine.run_until_settled();
    let host_before = machine.result().get("host").unwrap().clone();
    let judge_before = machine.result().get("judge").unwrap().clone();

    machine.respin("host").unwrap();
    machine.run_until_settled();

    assert_eq!(machine.result().get("host"), Some(&host_before));
    assert_eq!(machine.result().get("judge"), Some(&judge_before));
}

#[test]
fn respin_without_candidates_is_rejected() {
    let participants = vec![Participant::new("a", "A"), Participant::new("b", "B")];
    let roles = vec![
        Role::new("host", "Host"),
        Role::new("judge", "Judge"),
    ];
    let mut machine =
        SlotMachine::new(Registry::from_parts(participants, roles).unwrap(), SlotConfig::default(), Some(3));
    machine.spin_all().unwrap();
    machine.run_until_settled();

    let host_winner = machine.result().get("host").unwrap().id.clone();
    machine.remove_participant(&host_winner).unwrap();
    let before = machine.result().clone();

    // Only the judge's winner is left on the roster
    let err = machine.respin("host").unwrap_err();
    assert!(matches!(err, SlotError::NoEligibleCandidate { .. }));
    assert_eq!(machine.result(), &before);
    assert_eq!(machine.state(), GameState::Result);
}

#[test]
fn no_roles_keeps_machine_idle() {
    let registry = Registry::from_parts(vec![Participant::new("a", "A")], vec![]).unwrap();
    let mut machine = SlotMachine::new(registry, SlotConfig::default(), Some(1));

    assert!(matches!(machine.spin_all(), Err(SlotError::NoRolesConfigured)));
    assert_eq!(machine.state(), GameState::Idle);
    assert_eq!(machine.round(), 0);
}

#[test]
fn result_requires_every_active_reel_to_land() {
    let mut machine = SlotMachine::with_defaults(Some(77));
    let role_count = machine.registry().roles().len();
    machine.spin_all().unwrap();

    let notices = machine.run_until_settled();
    let landed = notices.iter().filter(|n| matches!(n, Notice::ReelLanded { .. })).count();
    let complete_at = notices
        .iter()
        .position(|n| matches!(n, Notice::RoundComplete { .. }))
        .unwrap();

    assert_eq!(landed, role_count);
    // Completion is announced right after the last landing, never earlier
    assert_eq!(
        notices[..complete_at].iter().filter(|n| matches!(n, Notice::ReelLanded { .. })).count(),
        role_count
    );
    assert!(matches!(notices.last(), Some(Notice::Announcement(_))));
}

#[test]
fn staggered_landings_follow_role_order() {
    let mut machine = SlotMachine::with_defaults(Some(5));
    machine.add_role("Jester").unwrap();
    machine.spin_all().unwrap();

    let notices = machine.run_until_settled();
    let order: Vec<String> = notices
        .iter()
        .filter_map(|n| match n {
            Notice::ReelLanded { role_id, .. } => Some(role_id.clone()),
            _ => None,
        })
        .collect();
    let expected: Vec<String> = machine.registry().roles().iter().map(|r| r.id.clone()).collect();
    assert_eq!(order, expected);
}

#[test]
fn announcement_lists_every_role() {
    let mut machine = host_judge(&["Ann", "Bob", "Cid", "Dee"], 21);
    machine.spin_all().unwrap();
    machine.run_until_settled();

    let text = machine.announcement().unwrap().to_string();
    for winner in machine.role_winners() {
        assert!(text.contains(&format!("{}: {}", winner.role, winner.winner)));
    }
    let winners: HashSet<_> = machine.role_winners().into_iter().map(|w| w.winner).collect();
    assert_eq!(winners.len(), 2);
}

#[test]
fn new_round_clears_previous_announcement() {
    let mut machine = host_judge(&["A", "B", "C"], 2);
    machine.spin_all().unwrap();
    machine.run_until_settled();
    assert!(machine.announcement().is_some());

    machine.respin("judge").unwrap();
    assert_eq!(machine.state(), GameState::Spinning);
    assert!(machine.announcement().is_none());
    assert_eq!(machine.round(), 2);
}
