use shoal_core::{FishRng, RodState, Vector2D};
use shoal_shared::{InputEvent, Position};

use crate::session::Session;

/// Computer player for unattended runs.
///
/// Waits a little, casts next to a random fish, pulls as soon as something
/// bites and recasts when nothing does within `patience` seconds.
pub struct AutoAngler {
    rng: FishRng,
    wait: f32,
    waited: f32,
    pub patience: f32,
}

impl AutoAngler {
    pub fn new(seed: u32) -> Self {
        let mut rng = FishRng::new(seed);
        let wait = rng.range_f32(0.2, 1.0);
        Self {
            rng,
            wait,
            waited: 0.0,
            patience: 2.5,
        }
    }

    /// Decide what to do before the next frame of `dt` seconds
    pub fn next_event(&mut self, session: &Session, dt: f32) -> Option<InputEvent> {
        match session.rod().state() {
            RodState::Hooked => {
                self.waited = 0.0;
                Some(InputEvent::Pull)
            }
            RodState::Idle => {
                self.waited += dt;
                if self.waited < self.wait {
                    return None;
                }
                self.cast(session)
            }
            RodState::Cast => {
                self.waited += dt;
                if self.waited < self.patience {
                    return None;
                }
                log::debug!("Nothing biting, casting again");
                self.cast(session)
            }
            RodState::Pulling | RodState::Finished => None,
        }
    }

    fn cast(&mut self, session: &Session) -> Option<InputEvent> {
        let fish = &session.flock().fish;
        if fish.is_empty() {
            return None;
        }
        let target = &fish[self.rng.range_u32(0, fish.len() as u32) as usize];

        // Land just ahead of the fish so it swims into the hook
        let reach = session.flock().config.hook_distance * 0.5;
        let lead = target.forward.normalize() * reach;
        let jitter = Vector2D::new(
            self.rng.range_f32(-0.1, 0.1),
            self.rng.range_f32(-0.1, 0.1),
        ) * reach;
        let spot = target.head_position() + lead + jitter;

        self.waited = 0.0;
        self.wait = self.rng.range_f32(0.2, 1.0);
        Some(InputEvent::Cast {
            position: Position::new(spot.x, spot.y),
        })
    }
}
