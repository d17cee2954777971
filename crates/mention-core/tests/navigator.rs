use mention_core::{Candidate, NavigationKey, Navigator, NavigatorCommand, NavigatorState};

fn list(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate::new(format!("{i}"), format!("Person {i}")))
        .collect()
}

#[test]
fn test_opens_at_zero_when_list_non_empty() {
    let mut nav = Navigator::new();
    assert_eq!(nav.state(), NavigatorState::Closed);
    nav.set_candidates(list(3), true);
    assert_eq!(nav.state(), NavigatorState::Open { highlighted: 0 });
}

#[test]
fn test_empty_list_closes() {
    let mut nav = Navigator::new();
    nav.set_candidates(list(3), true);
    nav.set_candidates(Vec::new(), true);
    assert!(!nav.is_open());
}

#[test]
fn test_next_wraps_around() {
    let mut nav = Navigator::new();
    nav.set_candidates(list(3), true);
    nav.next();
    nav.next();
    assert_eq!(nav.highlighted_index(), Some(2));
    nav.next();
    assert_eq!(nav.highlighted_index(), Some(0));
}

#[test]
fn test_list_change_resets_highlight() {
    let mut nav = Navigator::new();
    nav.set_candidates(list(3), true);
    nav.next();
    nav.set_candidates(list(2), true);
    assert_eq!(nav.highlighted_index(), Some(0));
}

#[test]
fn test_confirm_emits_highlighted_and_closes() {
    let mut nav = Navigator::new();
    nav.set_candidates(list(3), true);
    nav.apply(NavigatorCommand::Previous);
    let picked = nav.apply(NavigatorCommand::Confirm).unwrap();
    assert_eq!(picked.id, "2");
    assert!(!nav.is_open());
}

#[test]
fn test_cancel_closes_without_emitting() {
    let mut nav = Navigator::new();
    nav.set_candidates(list(3), true);
    assert_eq!(nav.apply(NavigatorCommand::Cancel), None);
    assert!(!nav.is_open());
    assert_eq!(nav.confirm(), None);
}

#[test]
fn test_pick_bypasses_highlight() {
    let mut nav = Navigator::new();
    nav.set_candidates(list(4), true);
    let picked = nav.apply(NavigatorCommand::Pick(3)).unwrap();
    assert_eq!(picked.id, "3");
    assert!(!nav.is_open());

    nav.set_candidates(list(2), true);
    assert_eq!(nav.pick(9), None);
    assert!(nav.is_open());
}

#[test]
fn test_commands_are_noops_while_closed() {
    let mut nav = Navigator::new();
    nav.next();
    nav.previous();
    assert_eq!(nav.highlighted_index(), None);
}

#[test]
fn test_key_mapping() {
    assert_eq!(NavigatorCommand::from_key(NavigationKey::Up), NavigatorCommand::Previous);
    assert_eq!(NavigatorCommand::from_key(NavigationKey::Down), NavigatorCommand::Next);
    assert_eq!(NavigatorCommand::from_key(NavigationKey::Enter), NavigatorCommand::Confirm);
    assert_eq!(NavigatorCommand::from_key(NavigationKey::Tab), NavigatorCommand::Confirm);
    assert_eq!(NavigatorCommand::from_key(NavigationKey::Escape), NavigatorCommand::Cancel);
}
