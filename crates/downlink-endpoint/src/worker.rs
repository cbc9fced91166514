//! Worker-thread loop shared by both endpoints.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

/// Pause between worker loop iterations.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Runs `tick` repeatedly until `running` is cleared, sleeping
/// [`TICK_INTERVAL`] between iterations.
///
/// The flag is polled once per iteration, so shutdown latency is bounded by
/// one tick plus whatever blocking call the tick itself is in.
pub fn run_loop(running: &AtomicBool, mut tick: impl FnMut()) {
    while running.load(Ordering::Relaxed) {
        tick();
        thread::sleep(TICK_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::AtomicU32, Arc};

    use super::*;

    #[test]
    fn test_run_loop_stops_when_flag_clears() {
        let running = Arc::new(AtomicBool::new(true));
        let ticks = Arc::new(AtomicU32::new(0));

        let worker = {
            let running = running.clone();
            let ticks = ticks.clone();
            thread::spawn(move || {
                run_loop(&running, || {
                    ticks.fetch_add(1, Ordering::Relaxed);
                })
            })
        };

        thread::sleep(Duration::from_millis(50));
        running.store(false, Ordering::Relaxed);
        worker.join().unwrap();

        assert!(ticks.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_run_loop_exits_immediately_when_not_running() {
        let running = AtomicBool::new(false);
        let mut ticks = 0;
        run_loop(&running, || ticks += 1);
        assert_eq!(ticks, 0);
    }
}
