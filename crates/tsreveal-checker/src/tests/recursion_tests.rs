use super::*;

#[test]
fn test_profiles_use_shared_limits() {
    assert_eq!(RecursionProfile::TypeExpansion.max_depth(), MAX_EXPANSION_DEPTH);
    assert_eq!(RecursionProfile::Assignability.max_depth(), MAX_ASSIGNABILITY_DEPTH);
}

#[test]
fn test_enter_and_leave_track_the_path() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.enter(2u32), RecursionResult::Entered);
    assert_eq!(guard.depth(), 2);
    assert!(guard.is_visiting(&1));

    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_visiting(&1));
    assert!(guard.enter(1u32).is_entered());
    guard.leave(1);
}

#[test]
fn test_reentering_a_key_on_the_path_is_a_cycle() {
    let mut guard = RecursionGuard::new(10, 100);
    assert!(guard.enter("List").is_entered());
    assert_eq!(guard.enter("List"), RecursionResult::Cycle);
    // A cycle is not a limit.
    assert!(!guard.is_exceeded());
    guard.leave("List");
}

#[test]
fn test_depth_limit() {
    let mut guard = RecursionGuard::new(2, 100);
    assert!(guard.enter(1u32).is_entered());
    assert!(guard.enter(2u32).is_entered());
    assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
    guard.leave(2);
    guard.leave(1);
}

#[test]
fn test_budget_and_reset() {
    let mut guard = RecursionGuard::new(10, 3);
    for key in 0u32..3 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(99), RecursionResult::BudgetExceeded);
    assert!(guard.is_exceeded());

    guard.reset();
    assert!(!guard.is_exceeded());
    assert!(guard.enter(99).is_entered());
    guard.leave(99);
}

#[test]
fn test_any_visiting_searches_the_path() {
    let mut guard = RecursionGuard::new(10, 100);
    assert!(guard.enter((1u32, 'a')).is_entered());
    assert!(guard.enter((2u32, 'b')).is_entered());
    assert!(guard.any_visiting(|&(id, _)| id == 1));
    assert!(!guard.any_visiting(|&(_, tag)| tag == 'c'));
    guard.leave((2, 'b'));
    guard.leave((1, 'a'));
    assert!(!guard.any_visiting(|_| true));
}
