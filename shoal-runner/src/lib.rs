//! Headless driver for shoal sessions: feeds frame times, scripted or
//! automatic input, and collects the catch.

pub mod angler;
pub mod session;

pub use angler::AutoAngler;
pub use session::{FrameOutcome, Session};

use shoal_shared::SessionReport;

/// Run `session` for `duration` seconds at `frame_rate` frames per second,
/// letting `angler` play when given.
pub fn simulate(
    session: &mut Session,
    mut angler: Option<&mut AutoAngler>,
    duration: f32,
    frame_rate: u32,
) -> SessionReport {
    let dt = 1.0 / frame_rate.max(1) as f32;
    let frames = (duration.max(0.0) * frame_rate as f32).round() as u64;

    for frame in 0..frames {
        if let Some(angler) = angler.as_deref_mut() {
            if let Some(event) = angler.next_event(session, dt) {
                session.handle(&event);
            }
        }

        let outcome = session.frame(dt);
        if !outcome.landed.is_empty() {
            log::debug!(
                "Frame {}: landed {} fish for {} coins",
                frame,
                outcome.landed.len(),
                outcome.coins
            );
        }
    }

    session.report()
}
