use super::*;

fn scheduler() -> (ManualTickSource, FrameScheduler) {
    let ticks = ManualTickSource::new();
    let s = FrameScheduler::new(Box::new(ticks.clone()));
    (ticks, s)
}

#[test]
fn requests_coalesce_into_one_tick() {
    let (ticks, mut s) = scheduler();
    for _ in 0..5 {
        s.request_render(["a"]);
        s.request_render(["b", "a"]);
    }
    assert_eq!(ticks.armed_count(), 1);
    assert_eq!(ticks.pending_ticks(), 1);
    assert_eq!(s.pending().len(), 2);
}

#[test]
fn empty_request_does_not_arm() {
    let (ticks, mut s) = scheduler();
    s.request_render(Vec::<String>::new());
    assert_eq!(ticks.armed_count(), 0);
    assert_eq!(s.state(), SchedulerState::Idle);
}

#[test]
fn begin_cycle_takes_pending_and_goes_idle() {
    let (ticks, mut s) = scheduler();
    s.request_render(["a", "b"]);
    let handle = ticks.pop().unwrap();
    let cycle = s.begin_cycle(handle).unwrap();
    assert_eq!(cycle.len(), 2);
    assert_eq!(s.state(), SchedulerState::Idle);
    assert!(s.pending().is_empty());

    // A request during dispatch arms a new pump instead of joining the running cycle.
    s.request_render(["a"]);
    assert_eq!(ticks.armed_count(), 2);
    assert!(s.is_armed());
}

#[test]
fn stale_handle_is_ignored() {
    let (ticks, mut s) = scheduler();
    s.request_render(["a"]);
    let handle = ticks.pop().unwrap();
    assert!(s.begin_cycle(TickHandle(handle.0 + 100)).is_none());
    assert!(s.is_armed());
    assert!(s.begin_cycle(handle).is_some());
    assert!(s.begin_cycle(handle).is_none());
}

#[test]
fn cancel_unarms_and_revokes_tick() {
    let (ticks, mut s) = scheduler();
    s.request_render(["a"]);
    s.cancel();
    assert_eq!(s.state(), SchedulerState::Idle);
    assert!(s.pending().is_empty());
    assert_eq!(ticks.pending_ticks(), 0);
}

#[test]
fn closed_scheduler_ignores_requests() {
    let (ticks, mut s) = scheduler();
    assert!(s.request_render(["b"]));
    s.close();
    assert!(!s.request_render(["a"]));
    assert_eq!(ticks.armed_count(), 1);
    assert_eq!(ticks.pending_ticks(), 0);
    assert!(s.pending().is_empty());
}

#[test]
fn requester_reports_closed_scheduler() {
    let (ticks, s) = scheduler();
    let shared = Rc::new(RefCell::new(s));
    let requester = RenderRequester::new(&shared);
    shared.borrow_mut().close();
    assert!(!requester.request_render(["a"]));
    assert_eq!(ticks.armed_count(), 0);
}

#[test]
fn requester_reports_dropped_scheduler() {
    let (_ticks, s) = scheduler();
    let shared = Rc::new(RefCell::new(s));
    let requester = RenderRequester::new(&shared);
    assert!(requester.request_render(["a"]));
    assert!(shared.borrow().is_armed());
    drop(shared);
    assert!(!requester.request_render(["a"]));
}
