use tokio_util::sync::CancellationToken;

/// Upper bound of the normalized progress value.
pub const FULL_PROGRESS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    Stopped,
    Running,
    Paused,
    /// Progress reached 100; waits for the next `reset`.
    Completed,
}

/// Result of feeding one tick into the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    /// The clock was not running; nothing changed.
    Idle,
    Progressed(f64),
    /// Fired exactly once per run, on the tick that reaches 100.
    Completed,
}

/// Timer-driven progress for the story currently on screen.
///
/// The clock itself is a deterministic counter: each [`tick`](Self::tick)
/// adds `100 * tick_ms / duration_ms`. The recurring callback that produces
/// ticks is owned by whoever holds the token returned from
/// [`arm`](Self::arm); [`disarm`](Self::disarm) cancels it.
#[derive(Debug)]
pub struct SessionClock {
    duration_ms: u64,
    tick_ms: u64,
    progress: f64,
    phase: ClockPhase,
    schedule: Option<CancellationToken>,
}

impl SessionClock {
    pub fn new(duration_ms: u64, tick_ms: u64) -> Self {
        Self {
            duration_ms: duration_ms.max(1),
            tick_ms: tick_ms.max(1),
            progress: 0.0,
            phase: ClockPhase::Stopped,
            schedule: None,
        }
    }

    /// Begins a run of `duration_ms` from zero.
    pub fn start(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms.max(1);
        self.progress = 0.0;
        self.phase = ClockPhase::Running;
    }

    /// Restarts the current duration window from zero.
    pub fn reset(&mut self) {
        self.start(self.duration_ms);
    }

    pub fn pause(&mut self) {
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == ClockPhase::Paused {
            self.phase = ClockPhase::Running;
        }
    }

    /// Stops ticking and clears progress.
    pub fn stop(&mut self) {
        self.phase = ClockPhase::Stopped;
        self.progress = 0.0;
    }

    pub fn tick(&mut self) -> ClockEvent {
        if self.phase != ClockPhase::Running {
            return ClockEvent::Idle;
        }

        self.progress = (self.progress + self.step()).min(FULL_PROGRESS);
        if self.progress >= FULL_PROGRESS {
            self.phase = ClockPhase::Completed;
            ClockEvent::Completed
        } else {
            ClockEvent::Progressed(self.progress)
        }
    }

    /// Progress added per tick.
    pub fn step(&self) -> f64 {
        FULL_PROGRESS * self.tick_ms as f64 / self.duration_ms as f64
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress rounded to whole percentage points for rendering.
    pub fn percent(&self) -> u8 {
        self.progress.round().clamp(0.0, FULL_PROGRESS) as u8
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Creates a fresh schedule token, cancelling any previous one.
    pub fn arm(&mut self) -> CancellationToken {
        self.disarm();
        let token = CancellationToken::new();
        self.schedule = Some(token.clone());
        token
    }

    /// Cancels the recurring tick callback and stops the clock.
    pub fn disarm(&mut self) {
        if let Some(token) = self.schedule.take() {
            token.cancel();
        }
        self.stop();
    }

    /// Token for the currently armed schedule, if any.
    pub fn schedule(&self) -> Option<CancellationToken> {
        self.schedule.clone()
    }
}
