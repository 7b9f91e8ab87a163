#![cfg_attr(not(feature = "std"), no_std)]

//! Simulation core for a school of articulated fish.
//!
//! Fish are joint chains steered by boids rules and point affectors, stepped
//! at a fixed rate, and can be hooked and reeled in by a single rod.

extern crate alloc;

pub mod affector;
pub mod catalog;
pub mod fish;
pub mod flock;
mod math;
pub mod rng;
pub mod rod;
pub mod vector;

pub use affector::{Affector, AffectorKind};
pub use catalog::{Catalog, CatalogEntry};
pub use fish::{Fish, FishColors, FishType, Joint, Rgb, SideFin, MAX_JOINTS};
pub use flock::{behavior, Flock, FlockConfig};
pub use rng::FishRng;
pub use rod::{Rod, RodState};
pub use vector::Vector2D;
