use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use trax_hal::Session;
use trax_hal::sim::SharedWorld;

/// A wall-clock session that keeps the simulated world in step with real
/// time.
///
/// Each poll or sleep advances the world by however much real time passed
/// since the previous one, so the control loops see the same physics the
/// virtual-clock tests do, just paced for a human watching the log.
pub struct RealtimeSession {
    world: SharedWorld,
    start: Instant,
    last_step: Instant,
    active: Arc<AtomicBool>,
}

impl RealtimeSession {
    pub fn new(world: &SharedWorld) -> Self {
        let now = Instant::now();
        RealtimeSession {
            world: SharedWorld::clone(world),
            start: now,
            last_step: now,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared stop flag; clearing it cancels every control loop at its next
    /// poll.
    #[allow(dead_code)]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    fn sync(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_step);
        self.last_step = now;
        self.world.borrow_mut().step(dt);
    }
}

impl Session for RealtimeSession {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    fn elapsed(&mut self) -> Duration {
        self.sync();
        self.start.elapsed()
    }

    fn sleep(&mut self, dur: Duration) {
        spin_sleep::sleep(dur);
        self.sync();
    }
}
