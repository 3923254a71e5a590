use super::*;

#[test]
fn first_call_never_waits() {
    let mut limiter = RateLimiter::new(Duration::from_secs(3600));
    let t0 = Instant::now();
    assert_eq!(limiter.wait(), Duration::ZERO);
    assert!(t0.elapsed() < Duration::from_secs(1));
}

#[test]
fn consecutive_calls_are_spaced() {
    let interval = Duration::from_millis(40);
    let mut limiter = RateLimiter::new(interval);
    limiter.wait();
    let t0 = Instant::now();
    limiter.wait();
    limiter.wait();
    assert!(t0.elapsed() >= interval * 2);
}

#[test]
fn zero_interval_disables_pacing() {
    let mut limiter = RateLimiter::new(Duration::ZERO);
    for _ in 0..5 {
        assert_eq!(limiter.wait(), Duration::ZERO);
    }
}

#[test]
fn default_is_one_second() {
    assert_eq!(RateLimiter::default().min_interval(), Duration::from_secs(1));
}
