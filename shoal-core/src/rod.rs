use crate::vector::Vector2D;

/// Seconds after a cast (or after the last hooked tick) before a new fish
/// may take the hook
pub const DEFAULT_HOOK_DELAY: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RodState {
    Idle,
    Cast,
    Hooked,
    Pulling,
    Finished,
}

/// The fishing rod: cast to a point, wait for a bite, then reel the line
/// back to `origin` over `pull_duration` seconds.
///
/// Runs on the real-time clock; the flock reports back each fixed step
/// whether something is on the line.
#[derive(Debug, Clone)]
pub struct Rod {
    pub origin: Vector2D,
    pub position: Vector2D,
    pub cast_position: Vector2D,
    pub radius: f32,

    pub cast: bool,
    pub hooked: bool,
    pub pulling: bool,
    pub pull_elapsed: f32,
    pub pull_duration: f32,

    pub time_since_hooked: f32,
    pub hook_delay: f32,
}

impl Rod {
    pub fn new(origin: Vector2D, radius: f32, pull_duration: f32) -> Self {
        Self {
            origin,
            position: origin,
            cast_position: origin,
            radius,
            cast: false,
            hooked: false,
            pulling: false,
            pull_elapsed: 0.0,
            pull_duration,
            time_since_hooked: 0.0,
            hook_delay: DEFAULT_HOOK_DELAY,
        }
    }

    pub fn with_hook_delay(mut self, seconds: f32) -> Self {
        self.hook_delay = seconds;
        self
    }

    pub fn set_cast_position(&mut self, position: Vector2D) {
        self.position = position;
        self.cast_position = position;
        self.cast = true;
        self.hooked = false;
        self.time_since_hooked = 0.0;
    }

    pub fn start_pulling(&mut self) {
        self.pulling = true;
    }

    /// Called by the flock after each fixed step while cast
    pub fn set_hooked(&mut self, hooked: bool) {
        if hooked {
            self.time_since_hooked = 0.0;
        }
        self.hooked = hooked;
    }

    pub fn update(&mut self, dt: f32) {
        self.time_since_hooked += dt;

        if self.pulling {
            self.pull_elapsed += dt;
            let t = (self.pull_elapsed / self.pull_duration).min(1.0);
            self.position = self.cast_position + (self.origin - self.cast_position) * t;
        }
    }

    pub fn ready_to_hook(&self) -> bool {
        self.cast && !self.pulling && !self.hooked && self.time_since_hooked >= self.hook_delay
    }

    pub fn finished_pulling(&self) -> bool {
        self.pull_elapsed > self.pull_duration
    }

    pub fn reset(&mut self) {
        self.pulling = false;
        self.pull_elapsed = 0.0;
        self.cast = false;
        self.hooked = false;
        self.position = self.origin;
    }

    pub fn state(&self) -> RodState {
        if self.pulling {
            if self.finished_pulling() {
                RodState::Finished
            } else {
                RodState::Pulling
            }
        } else if !self.cast {
            RodState::Idle
        } else if self.hooked {
            RodState::Hooked
        } else {
            RodState::Cast
        }
    }
}
