use std::time::{Duration, Instant};

/// Fixed-cadence frame pacing for the animation loop.
///
/// Stands in for a display-driven frame callback: `wait_for_next_frame`
/// sleeps until the next slot and reports the time the frame starts at.
pub struct FramePacer {
    target_fps: f64,
    frame_duration: Duration,
    next_frame_time: Instant,
    frames: u64,
    resyncs: u64,
}

impl FramePacer {
    pub fn new(fps: f64) -> Self {
        let frame_duration = Duration::from_secs_f64(1.0 / fps.max(1.0));
        Self {
            target_fps: fps,
            frame_duration,
            next_frame_time: Instant::now() + frame_duration,
            frames: 0,
            resyncs: 0,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// How long the caller may block (e.g. polling input) before the next frame is due.
    pub fn time_until_next_frame(&self, now: Instant) -> Duration {
        self.next_frame_time.saturating_duration_since(now)
    }

    /// Sleep until the next frame slot and return the frame's timestamp.
    pub fn wait_for_next_frame(&mut self) -> Instant {
        let now = Instant::now();
        if now < self.next_frame_time {
            std::thread::sleep(self.next_frame_time - now);
        }
        self.advance(Instant::now())
    }

    /// Move to the following slot. More than three frames behind, resync to
    /// `now` instead of bursting to catch up.
    pub fn advance(&mut self, now: Instant) -> Instant {
        if now > self.next_frame_time + self.frame_duration * 3 {
            self.next_frame_time = now + self.frame_duration;
            self.resyncs += 1;
        } else {
            self.next_frame_time += self.frame_duration;
        }
        self.frames += 1;
        now
    }

    pub fn stats(&self) -> PacerStats {
        PacerStats {
            frames: self.frames,
            resyncs: self.resyncs,
            target_fps: self.target_fps,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PacerStats {
    pub frames: u64,
    pub resyncs: u64,
    pub target_fps: f64,
}

impl PacerStats {
    pub fn effective_fps(&self, elapsed: Duration) -> f64 {
        if elapsed.as_secs_f64() > 0.0 {
            self.frames as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}
