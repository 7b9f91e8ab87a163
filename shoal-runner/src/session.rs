use anyhow::{ensure, Result};
use shoal_core::{
    Affector, AffectorKind, Catalog, Fish, FishColors, FishRng, FishType, Flock, FlockConfig, Rgb,
    Rod, Vector2D,
};
use shoal_shared::{
    CatchCount, FlockSettings, InputEvent, Position, ScriptedEvent, SessionReport,
    SessionSettings, SpeciesSettings,
};

/// How long the repellor left by a plain click lasts
pub const CLICK_REPEL_LIFETIME: f32 = 1.0;

/// What happened during one frame
#[derive(Debug, Default)]
pub struct FrameOutcome {
    pub steps: u32,
    pub landed: Vec<Fish>,
    pub coins: u32,
}

/// A running game without a window: owns the flock, the rod and the
/// catalog, and plays the part of the event loop.
pub struct Session {
    flock: Flock,
    rod: Rod,
    catalog: Catalog,
    seed: u32,
    coins: u32,
    frames: u64,
    elapsed: f32,
    script: Vec<ScriptedEvent>,
    next_event: usize,
}

pub fn to_vector(position: Position) -> Vector2D {
    Vector2D::new(position.x, position.y)
}

fn to_rgb(color: [u8; 3]) -> Rgb {
    Rgb::new(color[0], color[1], color[2])
}

pub fn fish_type(species: &SpeciesSettings) -> FishType {
    FishType::new(
        species.name.clone(),
        species.head_size,
        species.link_distance_multiplier,
        species.move_speed,
        FishColors {
            body: to_rgb(species.body_color),
            fin: to_rgb(species.fin_color),
            tail: to_rgb(species.tail_color),
            eye: to_rgb(species.eye_color),
        },
    )
}

pub fn flock_config(settings: &FlockSettings) -> FlockConfig {
    FlockConfig {
        separation_radius: settings.separation_radius,
        alignment_radius: settings.alignment_radius,
        cohesion_radius: settings.cohesion_radius,
        repellor_radius: settings.repellor_radius,
        attractor_radius: settings.attractor_radius,
        separation_weight: settings.separation_weight,
        alignment_weight: settings.alignment_weight,
        cohesion_weight: settings.cohesion_weight,
        repellor_weight: settings.repellor_weight,
        attractor_weight: settings.attractor_weight,
        velocity_retention: settings.velocity_retention,
        hook_distance: settings.hook_distance,
    }
}

fn validate(settings: &SessionSettings) -> Result<()> {
    ensure!(settings.fixed_update_rate > 0, "fixed_update_rate must be positive");
    ensure!(
        settings.camera_height > 0.0 && settings.aspect_ratio > 0.0,
        "world must have a positive size (camera_height {}, aspect_ratio {})",
        settings.camera_height,
        settings.aspect_ratio
    );
    ensure!(
        settings.rod.pull_duration > 0.0,
        "rod pull_duration must be positive"
    );
    ensure!(
        (0.0..=1.0).contains(&settings.flock.velocity_retention),
        "velocity_retention must be within [0, 1]"
    );
    ensure!(!settings.species.is_empty(), "at least one species is required");
    for species in &settings.species {
        ensure!(!species.name.is_empty(), "species name must not be empty");
        ensure!(
            species.head_size > 0.0,
            "species {} needs a positive head_size",
            species.name
        );
    }
    Ok(())
}

impl Session {
    pub fn new(settings: &SessionSettings, seed: u32) -> Result<Self> {
        validate(settings)?;

        let fixed_dt = 1.0 / settings.fixed_update_rate as f32;
        let (width, height) = settings.world_size();

        let mut flock = Flock::new_with_config(fixed_dt, flock_config(&settings.flock));
        flock.set_world_bounds(width, height);

        let rod = Rod::new(
            Vector2D::new(0.0, -height / 2.0),
            settings.rod.radius,
            settings.rod.pull_duration,
        )
        .with_hook_delay(settings.rod.hook_delay);

        let mut rng = FishRng::new(seed);
        let mut catalog = Catalog::new();
        for species in &settings.species {
            let fish_type = fish_type(species);
            for _ in 0..species.count {
                flock.add_random_fish(&fish_type, &mut rng);
            }
            catalog.add_entry(fish_type, species.coin_value);
        }

        log::info!(
            "Session ready: {} fish, world {:.2}x{:.2}, {} Hz, seed {}",
            flock.fish.len(),
            width,
            height,
            settings.fixed_update_rate,
            seed
        );

        Ok(Self {
            flock,
            rod,
            catalog,
            seed,
            coins: 0,
            frames: 0,
            elapsed: 0.0,
            script: Vec::new(),
            next_event: 0,
        })
    }

    /// Queue scripted input, fired in time order as frames advance
    pub fn with_script(mut self, mut script: Vec<ScriptedEvent>) -> Self {
        script.sort_by(|a, b| a.at.total_cmp(&b.at));
        self.script = script;
        self.next_event = 0;
        self
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn rod(&self) -> &Rod {
        &self.rod
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Cast { position } => {
                if self.rod.pulling {
                    log::debug!("Ignoring cast while reeling in");
                    return;
                }
                log::debug!("Cast to ({:.2}, {:.2})", position.x, position.y);
                self.rod.set_cast_position(to_vector(*position));
            }
            InputEvent::Pull => {
                if !self.rod.cast || self.rod.pulling {
                    log::debug!("Nothing to pull");
                    return;
                }
                self.flock.pull();
                self.rod.start_pulling();
            }
            InputEvent::Attract { position, lifetime } => {
                self.add_affector(AffectorKind::Attractor, *position, *lifetime);
            }
            InputEvent::Repel { position, lifetime } => {
                self.add_affector(AffectorKind::Repellor, *position, *lifetime);
            }
            InputEvent::Click { position } => {
                self.add_affector(
                    AffectorKind::Repellor,
                    *position,
                    Some(CLICK_REPEL_LIFETIME),
                );
            }
        }
    }

    fn add_affector(&mut self, kind: AffectorKind, position: Position, lifetime: Option<f32>) {
        let lifetime = lifetime.filter(|seconds| *seconds >= 0.0);
        self.flock
            .add_affector(Affector::new(kind, to_vector(position), lifetime));
    }

    /// Advance the session by `dt` seconds of real time
    pub fn frame(&mut self, dt: f32) -> FrameOutcome {
        while let Some(scripted) = self.script.get(self.next_event) {
            if scripted.at > self.elapsed {
                break;
            }
            let event = scripted.event.clone();
            self.next_event += 1;
            self.handle(&event);
        }

        self.rod.update(dt);
        let steps = self.flock.update(dt, &mut self.rod);

        let mut outcome = FrameOutcome {
            steps,
            ..FrameOutcome::default()
        };

        if self.rod.pulling && self.rod.finished_pulling() {
            outcome.landed = self.flock.finish_pull();
            outcome.coins = self.catalog.record_catch(&outcome.landed);
            self.coins += outcome.coins;
            self.rod.reset();

            for fish in &outcome.landed {
                log::info!("Landed a {} worth {}", fish.name, self.catalog.value_of(fish));
            }
            if outcome.landed.is_empty() {
                log::debug!("Reeled in an empty line");
            }
        }

        self.frames += 1;
        self.elapsed += dt;
        outcome
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            seed: self.seed,
            frames: self.frames,
            steps: self.flock.steps(),
            elapsed: self.elapsed,
            fish_remaining: self.flock.fish.len(),
            coins: self.coins,
            catches: self
                .catalog
                .entries
                .iter()
                .map(|entry| CatchCount {
                    name: entry.species.name.clone(),
                    caught: entry.caught,
                })
                .collect(),
        }
    }
}
