use super::*;

fn clock(fps: f64) -> AnimationClock {
    AnimationClock::new(FrameRate::new(fps).unwrap())
}

#[test]
fn first_delta_is_one_interval() {
    let mut c = clock(25.0);
    c.start(1_000.0);
    assert!(c.is_running());
    assert_eq!(c.tick(1_000.0), 40.0);
    assert_eq!(c.achieved_rate(), 25.0);
}

#[test]
fn achieved_rate_rounds_to_one_decimal() {
    let mut c = clock(24.0);
    c.start(0.0);
    c.tick(30.0);
    c.tick(60.0);
    c.tick(90.0);
    // Deltas: 30 + 1000/24, 30, 30 -> 3 / 101.67 ms = 29.508 fps.
    assert_eq!(c.achieved_rate(), 29.5);
}

#[test]
fn window_keeps_only_recent_deltas() {
    let mut c = clock(2.0);
    c.start(0.0);
    c.tick(1_000.0);
    c.tick(1_100.0);
    c.tick(1_200.0);
    // Only the last two (100 ms each) count.
    assert_eq!(c.achieved_rate(), 10.0);
}

#[test]
fn empty_counter_reports_zero() {
    let c = clock(30.0);
    assert_eq!(c.achieved_rate(), 0.0);
}

#[test]
fn stop_keeps_history() {
    let mut c = clock(10.0);
    c.start(0.0);
    c.tick(0.0);
    c.stop();
    assert!(!c.is_running());
    assert_eq!(c.achieved_rate(), 10.0);
}

#[test]
fn run_ticks_requested_times_and_stops() {
    let mut c = clock(200.0);
    let mut n = 0;
    c.run(3, |dt| {
        assert!(dt > 0.0);
        n += 1;
        Ok(true)
    })
    .unwrap();
    assert_eq!(n, 3);
    assert!(!c.is_running());
    assert!(c.achieved_rate() > 0.0);
}

#[test]
fn run_stops_when_asked() {
    let mut c = clock(200.0);
    let mut n = 0;
    c.run(10, |_| {
        n += 1;
        Ok(n < 2)
    })
    .unwrap();
    assert_eq!(n, 2);
}

#[test]
fn run_propagates_tick_errors() {
    let mut c = clock(200.0);
    let err = c
        .run(5, |_| Err(crate::ReelError::render("boom")))
        .unwrap_err();
    assert!(err.to_string().contains("boom"));
    assert!(!c.is_running());
}
