/*!
 * Resource Tests
 * Acquire/release under FCFS, priority ceiling and priority inheritance
 */

use pretty_assertions::assert_eq;
use sched_sim::{
    Pid, Policy, ProcessStatus, Scheduler, SchedulerOps, SimConfig, SimError, SimulationState,
};

fn setup(policy: Policy) -> (Scheduler, SimulationState) {
    (
        Scheduler::new(policy),
        SimulationState::new(&SimConfig::default().with_policy(policy)),
    )
}

fn priority_of(state: &SimulationState, pid: Pid) -> u32 {
    state.process(pid).unwrap().priority
}

#[test]
fn test_fcfs_grants_free_resource() {
    let (scheduler, mut state) = setup(Policy::Fifo);
    let a = state.spawn(3, 0).unwrap();

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(a));
    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(state.resource(0).unwrap().owner, Some(a));
    assert_eq!(state.owned_by(a), vec![0]);
}

#[test]
fn test_fcfs_release_wakes_oldest_waiter_only() {
    let (scheduler, mut state) = setup(Policy::RoundRobin);
    let a = state.spawn(5, 0).unwrap();
    let b = state.spawn(5, 0).unwrap();
    let c = state.spawn(5, 0).unwrap();

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(a));
    assert!(scheduler.acquire(&mut state, 0).unwrap());

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(b));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(state.process(b).unwrap().status, ProcessStatus::Waiting);

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(c));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(state.waitqueue_pids(0).unwrap(), vec![b, c]);

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(a));
    scheduler.release(&mut state, 0).unwrap();

    assert_eq!(state.resource(0).unwrap().owner, None);
    assert_eq!(state.ready_queue_pids(), vec![b]);
    assert_eq!(state.process(b).unwrap().status, ProcessStatus::Ready);
    assert_eq!(state.waitqueue_pids(0).unwrap(), vec![c]);
    assert!(state.check_invariants().is_ok());
}

#[test]
fn test_acquire_twice_is_an_error() {
    let (scheduler, mut state) = setup(Policy::Fifo);
    let a = state.spawn(3, 0).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());

    assert_eq!(
        scheduler.acquire(&mut state, 0),
        Err(SimError::AlreadyOwned { resource: 0, pid: a })
    );
}

#[test]
fn test_release_by_non_owner_is_an_error() {
    for policy in [Policy::RoundRobin, Policy::PriorityPip] {
        let (scheduler, mut state) = setup(policy);
        let a = state.spawn(5, 0).unwrap();
        scheduler.schedule(&mut state).unwrap();
        assert!(scheduler.acquire(&mut state, 0).unwrap());

        // Higher priority so the priority policies switch too
        let b = state.spawn(5, 50).unwrap();
        assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(b));
        assert_eq!(
            scheduler.release(&mut state, 0),
            Err(SimError::NotOwner {
                resource: 0,
                owner: a,
                caller: b
            })
        );
        assert_eq!(state.resource(0).unwrap().owner, Some(a));
    }
}

#[test]
fn test_release_of_free_resource_is_an_error() {
    for policy in Policy::ALL {
        let (scheduler, mut state) = setup(policy);
        let a = state.spawn(3, 0).unwrap();
        scheduler.schedule(&mut state).unwrap();

        assert_eq!(
            scheduler.release(&mut state, 1),
            Err(SimError::ResourceNotHeld {
                resource: 1,
                caller: a
            }),
            "{}",
            policy
        );
    }
}

#[test]
fn test_invalid_resource_id() {
    let (scheduler, mut state) = setup(Policy::Fifo);
    state.spawn(3, 0).unwrap();
    scheduler.schedule(&mut state).unwrap();

    let limit = state.resources().len();
    assert_eq!(
        scheduler.acquire(&mut state, limit),
        Err(SimError::InvalidResource {
            resource: limit,
            limit
        })
    );
}

#[test]
fn test_resource_calls_need_a_running_process() {
    let (scheduler, mut state) = setup(Policy::PriorityPcp);
    assert!(matches!(
        scheduler.acquire(&mut state, 0),
        Err(SimError::NoCurrentProcess(_))
    ));
    assert!(matches!(
        scheduler.release(&mut state, 0),
        Err(SimError::NoCurrentProcess(_))
    ));
}

#[test]
fn test_pcp_boosts_on_acquire_and_restores_on_release() {
    let (scheduler, mut state) = setup(Policy::PriorityPcp);
    let a = state.spawn(4, 5).unwrap();
    scheduler.schedule(&mut state).unwrap();

    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(priority_of(&state, a), state.priority_ceiling());
    assert!(state.resource(0).unwrap().is_boosted());
    assert_eq!(state.process(a).unwrap().base_priority(), 5);

    scheduler.release(&mut state, 0).unwrap();
    assert_eq!(priority_of(&state, a), 5);
    assert!(!state.process(a).unwrap().is_boosted());
}

#[test]
fn test_pcp_nested_holds_keep_boost_until_last_release() {
    let (scheduler, mut state) = setup(Policy::PriorityPcp);
    let a = state.spawn(4, 5).unwrap();
    scheduler.schedule(&mut state).unwrap();

    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert!(scheduler.acquire(&mut state, 1).unwrap());

    scheduler.release(&mut state, 0).unwrap();
    assert_eq!(priority_of(&state, a), state.priority_ceiling());

    scheduler.release(&mut state, 1).unwrap();
    assert_eq!(priority_of(&state, a), 5);
}

#[test]
fn test_pcp_holder_is_not_preempted() {
    let (scheduler, mut state) = setup(Policy::PriorityPcp);
    let low = state.spawn(5, 1).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());

    let _high = state.spawn(5, 90).unwrap();
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(low));
}

/// Ceiling at the top process priority, so contenders can tie with the
/// boosted owner and still get the CPU
fn pcp_at_max_priority() -> (Scheduler, SimulationState) {
    let config = SimConfig::default()
        .with_policy(Policy::PriorityPcp)
        .with_ceiling(100);
    (Scheduler::new(Policy::PriorityPcp), SimulationState::new(&config))
}

#[test]
fn test_pcp_contention_leaves_owner_at_ceiling() {
    let (scheduler, mut state) = pcp_at_max_priority();
    let owner = state.spawn(5, 1).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(priority_of(&state, owner), 100);

    let contender = state.spawn(5, 100).unwrap();
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(contender));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());

    assert_eq!(priority_of(&state, owner), 100);
    assert_eq!(priority_of(&state, contender), 100);
    assert_eq!(state.waitqueue_pids(0).unwrap(), vec![contender]);
    assert_eq!(state.stats().priority_boosts, 1);

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(owner));
    scheduler.release(&mut state, 0).unwrap();
    assert_eq!(priority_of(&state, owner), 1);
    assert_eq!(state.stats().priority_restores, 1);
    assert_eq!(state.ready_queue_pids(), vec![contender]);
}

#[test]
fn test_pcp_release_wakes_all_waiters_newest_first() {
    let (scheduler, mut state) = pcp_at_max_priority();
    let owner = state.spawn(9, 1).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());

    let w1 = state.spawn(5, 100).unwrap();
    let w2 = state.spawn(5, 100).unwrap();

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(w1));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(w2));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(state.waitqueue_pids(0).unwrap(), vec![w1, w2]);
    assert_eq!(priority_of(&state, owner), 100);

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(owner));
    scheduler.release(&mut state, 0).unwrap();

    assert_eq!(priority_of(&state, owner), 1);
    assert_eq!(state.ready_queue_pids(), vec![w2, w1]);
    assert_eq!(state.process(w1).unwrap().status, ProcessStatus::Ready);
    assert_eq!(state.process(w2).unwrap().status, ProcessStatus::Ready);
    assert_eq!(state.waiting_count(), 0);
    assert_eq!(state.stats().wakeups, 2);
    assert!(state.check_invariants().is_ok());
}

#[test]
fn test_pcp_nested_acquire_counts_one_boost() {
    let (scheduler, mut state) = setup(Policy::PriorityPcp);
    state.spawn(4, 5).unwrap();
    scheduler.schedule(&mut state).unwrap();

    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert!(scheduler.acquire(&mut state, 1).unwrap());
    scheduler.release(&mut state, 1).unwrap();
    scheduler.release(&mut state, 0).unwrap();

    assert_eq!(state.stats().priority_boosts, 1);
    assert_eq!(state.stats().priority_restores, 1);
}

#[test]
fn test_pip_boosts_owner_only_on_contention() {
    let (scheduler, mut state) = setup(Policy::PriorityPip);
    let low = state.spawn(5, 2).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(priority_of(&state, low), 2);

    let high = state.spawn(5, 9).unwrap();
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(high));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(priority_of(&state, low), 9);

    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(low));
    scheduler.release(&mut state, 0).unwrap();
    assert_eq!(priority_of(&state, low), 2);
    assert_eq!(state.ready_queue_pids(), vec![high]);
    assert_eq!(state.process(high).unwrap().status, ProcessStatus::Ready);
}

#[test]
fn test_pip_equal_priority_does_not_boost() {
    let (scheduler, mut state) = setup(Policy::PriorityPip);
    let owner = state.spawn(5, 5).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());

    let requester = state.spawn(5, 5).unwrap();
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(requester));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());

    assert_eq!(priority_of(&state, owner), 5);
    assert!(!state.resource(0).unwrap().is_boosted());
}

#[test]
fn test_prioritized_release_wakes_all_waiters_newest_first() {
    for policy in [Policy::Priority, Policy::PriorityPip] {
        let (scheduler, mut state) = setup(policy);
        let owner = state.spawn(9, 1).unwrap();
        scheduler.schedule(&mut state).unwrap();
        assert!(scheduler.acquire(&mut state, 0).unwrap());

        let w1 = state.spawn(5, 5).unwrap();
        let w2 = state.spawn(5, 5).unwrap();

        assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(w1));
        assert!(!scheduler.acquire(&mut state, 0).unwrap());
        assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(w2));
        assert!(!scheduler.acquire(&mut state, 0).unwrap());

        assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(owner));
        scheduler.release(&mut state, 0).unwrap();

        assert_eq!(state.ready_queue_pids(), vec![w2, w1], "{}", policy);
        assert_eq!(state.waiting_count(), 0);
        assert_eq!(state.stats().wakeups, 2);
        assert_eq!(priority_of(&state, owner), 1);
        assert!(state.check_invariants().is_ok());
    }
}

#[test]
fn test_woken_waiters_retry_and_one_blocks_again() {
    let (scheduler, mut state) = setup(Policy::Priority);
    let owner = state.spawn(9, 1).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(scheduler.acquire(&mut state, 0).unwrap());

    let w1 = state.spawn(5, 5).unwrap();
    let w2 = state.spawn(5, 5).unwrap();
    scheduler.schedule(&mut state).unwrap();
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    scheduler.schedule(&mut state).unwrap();
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(owner));
    scheduler.release(&mut state, 0).unwrap();

    // Newest waiter sits at the head and wins the tie
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(w2));
    assert!(scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(scheduler.schedule(&mut state).unwrap(), Some(w1));
    assert!(!scheduler.acquire(&mut state, 0).unwrap());
    assert_eq!(state.waitqueue_pids(0).unwrap(), vec![w1]);
}
