use crate::math;

/// A 2D vector used for joint positions, headings and steering directions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.x * self.x + self.y * self.y)
    }

    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product
    pub fn cross(&self, other: &Vector2D) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate counter-clockwise by `degrees`
    pub fn rotate(&self, degrees: f32) -> Self {
        let (sn, cs) = math::sin_cos(degrees * math::DEG_TO_RAD);
        Self {
            x: self.x * cs - self.y * sn,
            y: self.x * sn + self.y * cs,
        }
    }

    /// Signed angle in degrees, in [-180, 180], that rotates `self` onto `other`
    pub fn angle_to(&self, other: &Vector2D) -> f32 {
        math::atan2(self.cross(other), self.dot(other)) * math::RAD_TO_DEG
    }

    /// Heading measured from the positive x axis, in [0, 360) degrees
    pub fn heading(&self) -> f32 {
        let radians = math::atan2(self.y, self.x);
        let radians = if radians >= 0.0 {
            radians
        } else {
            radians + 2.0 * core::f32::consts::PI
        };
        radians * math::RAD_TO_DEG
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}
