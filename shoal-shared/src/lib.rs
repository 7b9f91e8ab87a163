#![cfg_attr(not(feature = "std"), no_std)]

//! Serializable settings, scripted input and reports for shoal sessions.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Flock steering settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub repellor_radius: f32,
    pub attractor_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub repellor_weight: f32,
    pub attractor_weight: f32,
    pub velocity_retention: f32,
    pub hook_distance: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            separation_radius: 1.0,
            alignment_radius: 2.0,
            cohesion_radius: 3.0,
            repellor_radius: 5.0,
            attractor_radius: 1.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 0.8,
            repellor_weight: 3.0,
            attractor_weight: 1.0,
            velocity_retention: 0.999,
            hook_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RodSettings {
    pub radius: f32,
    /// Seconds to reel the line back in
    pub pull_duration: f32,
    /// Seconds after casting before a fish can bite
    pub hook_delay: f32,
}

impl Default for RodSettings {
    fn default() -> Self {
        Self {
            radius: 0.1,
            pull_duration: 1.0,
            hook_delay: 0.25,
        }
    }
}

/// A species and how many of it to spawn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeciesSettings {
    pub name: String,
    pub head_size: f32,
    pub link_distance_multiplier: f32,
    pub move_speed: f32,
    pub body_color: [u8; 3],
    pub fin_color: [u8; 3],
    pub tail_color: [u8; 3],
    pub eye_color: [u8; 3],
    pub coin_value: u32,
    pub count: usize,
}

impl Default for SpeciesSettings {
    fn default() -> Self {
        Self {
            name: String::from("minnow"),
            head_size: 0.1,
            link_distance_multiplier: 1.0,
            move_speed: 1.0,
            body_color: [200, 200, 210],
            fin_color: [150, 150, 170],
            tail_color: [150, 150, 170],
            eye_color: [10, 10, 10],
            coin_value: 1,
            count: 20,
        }
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    pub seed: Option<u32>,
    /// Fixed simulation steps per second
    pub fixed_update_rate: u32,
    /// World height; width follows from the aspect ratio
    pub camera_height: f32,
    pub aspect_ratio: f32,
    pub flock: FlockSettings,
    pub rod: RodSettings,
    pub species: Vec<SpeciesSettings>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed: Some(42),
            fixed_update_rate: 500,
            camera_height: 10.0,
            aspect_ratio: 16.0 / 9.0,
            flock: FlockSettings::default(),
            rod: RodSettings::default(),
            species: alloc::vec![SpeciesSettings::default()],
        }
    }
}

impl SessionSettings {
    pub fn world_size(&self) -> (f32, f32) {
        (self.camera_height * self.aspect_ratio, self.camera_height)
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Player input delivered to a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Cast {
        position: Position,
    },
    Pull,
    Attract {
        position: Position,
        #[serde(default)]
        lifetime: Option<f32>,
    },
    Repel {
        position: Position,
        #[serde(default)]
        lifetime: Option<f32>,
    },
    /// A plain click scares fish away for a moment
    Click {
        position: Position,
    },
}

/// An input event fired once session time reaches `at` seconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptedEvent {
    pub at: f32,
    pub event: InputEvent,
}

#[cfg(feature = "std")]
pub fn script_from_json(json: &str) -> Result<Vec<ScriptedEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatchCount {
    pub name: String,
    pub caught: u32,
}

/// Summary written at the end of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionReport {
    pub seed: u32,
    pub frames: u64,
    pub steps: u64,
    pub elapsed: f32,
    pub fish_remaining: usize,
    pub coins: u32,
    pub catches: Vec<CatchCount>,
}
