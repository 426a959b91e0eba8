use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of polling the clock.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tick {
    /// A frame should run now.
    pub due: bool,
    /// Whole intervals that elapsed beyond the one being run. Dropped, never
    /// replayed: sketches see at most one frame per poll.
    pub dropped: u32,
}

/// Paces ticks at a fixed rate for the host loop.
#[derive(Debug)]
pub struct FrameClock {
    fps: f32,
    paused: bool,
    step_requested: bool,
    next_due: Instant,
    last_frame: Option<Instant>,
    intervals: VecDeque<Duration>,
    max_intervals: usize,
}

impl FrameClock {
    pub fn new(fps: f32) -> Self {
        Self::with_start(fps, Instant::now())
    }

    pub fn with_start(fps: f32, now: Instant) -> Self {
        Self {
            fps: sanitize_fps(fps),
            paused: false,
            step_requested: false,
            next_due: now,
            last_frame: None,
            intervals: VecDeque::new(),
            max_intervals: 90,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = sanitize_fps(fps);
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps)
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Makes the next poll due even while paused.
    pub fn advance_single_frame(&mut self) {
        self.step_requested = true;
    }

    /// Restarts pacing from `now`, e.g. after a sketch switch.
    pub fn reset(&mut self, now: Instant) {
        self.next_due = now;
        self.last_frame = None;
        self.intervals.clear();
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_due
    }

    pub fn average_fps(&self) -> f32 {
        if self.intervals.is_empty() {
            return 0.0;
        }

        let sum: Duration = self.intervals.iter().copied().sum();
        let avg = sum / self.intervals.len() as u32;

        if avg.is_zero() {
            return 0.0;
        }

        1.0 / avg.as_secs_f32()
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.step_requested {
            self.step_requested = false;
            self.next_due = now + self.frame_duration();
            self.record_frame(now);
            return Tick {
                due: true,
                dropped: 0,
            };
        }

        if self.paused {
            // No debt accumulates while paused.
            self.next_due = now;
            return Tick::default();
        }

        if now < self.next_due {
            return Tick::default();
        }

        let frame = self.frame_duration();
        let behind = now.saturating_duration_since(self.next_due);
        let dropped = (behind.as_secs_f64() / frame.as_secs_f64()) as u32;

        self.next_due += frame * (dropped + 1);
        self.record_frame(now);

        Tick { due: true, dropped }
    }

    fn record_frame(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            self.intervals.push_back(now.saturating_duration_since(last));
            if self.intervals.len() > self.max_intervals {
                self.intervals.pop_front();
            }
        }
        self.last_frame = Some(now);
    }
}

fn sanitize_fps(fps: f32) -> f32 {
    if fps.is_finite() { fps.max(1.0) } else { 1.0 }
}
