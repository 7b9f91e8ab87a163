use crate::vector::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectorKind {
    Attractor,
    Repellor,
}

/// A fixed point that pulls fish towards it or pushes them away.
///
/// `lifetime` of `None` means the affector never expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affector {
    pub kind: AffectorKind,
    pub position: Vector2D,
    pub lifetime: Option<f32>,
}

impl Affector {
    pub fn new(kind: AffectorKind, position: Vector2D, lifetime: Option<f32>) -> Self {
        Self {
            kind,
            position,
            lifetime,
        }
    }

    pub fn attractor(position: Vector2D) -> Self {
        Self::new(AffectorKind::Attractor, position, None)
    }

    pub fn repellor(position: Vector2D) -> Self {
        Self::new(AffectorKind::Repellor, position, None)
    }

    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn is_attractor(&self) -> bool {
        self.kind == AffectorKind::Attractor
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(remaining) = self.lifetime.as_mut() {
            *remaining -= dt;
        }
    }

    pub fn finished(&self) -> bool {
        matches!(self.lifetime, Some(remaining) if remaining <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_affector_never_finishes() {
        let mut a = Affector::attractor(Vector2D::zero());
        for _ in 0..1000 {
            a.update(1.0);
        }
        assert!(!a.finished());
        assert_eq!(a.lifetime, None);
    }

    #[test]
    fn test_timed_affector_finishes_at_lifetime() {
        let mut a = Affector::repellor(Vector2D::new(1.0, 1.0)).with_lifetime(0.5);
        a.update(0.25);
        assert!(!a.finished());
        a.update(0.25);
        assert!(a.finished());
        assert!(!a.is_attractor());
    }
}
