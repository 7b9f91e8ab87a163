use alloc::string::String;
use alloc::vec::Vec;

use crate::vector::Vector2D;

/// Maximum number of joints a fish body can hold
pub const MAX_JOINTS: usize = 16;

/// Seconds a hooked fish waits for the player to pull before escaping
pub const DEFAULT_PULL_TIME: f32 = 3.0;

/// Default bend limit between consecutive links, in degrees
pub const DEFAULT_MAX_TURN_ANGLE: f32 = 30.0;

/// RGB color value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FishColors {
    pub body: Rgb,
    pub fin: Rgb,
    pub tail: Rgb,
    pub eye: Rgb,
}

/// Species description used to spawn fish. Plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct FishType {
    pub name: String,
    pub head_size: f32,
    pub link_distance_multiplier: f32,
    pub move_speed: f32,
    pub colors: FishColors,
}

impl FishType {
    pub fn new(
        name: impl Into<String>,
        head_size: f32,
        link_distance_multiplier: f32,
        move_speed: f32,
        colors: FishColors,
    ) -> Self {
        Self {
            name: name.into(),
            head_size,
            link_distance_multiplier,
            move_speed,
            colors,
        }
    }
}

/// A point in the body chain and its radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub position: Vector2D,
    pub radius: f32,
}

/// Placement of one side fin for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideFin {
    pub anchor: Vector2D,
    /// Ellipse radii (along, across)
    pub size: (f32, f32),
    /// Degrees from the positive x axis
    pub rotation: f32,
}

/// An articulated fish: a chain of joints dragged along by its head.
///
/// Joint 0 is the head. After every call that moves the head, each following
/// joint sits exactly `link_distance` from its predecessor and bends at most
/// `max_turn_angle` degrees relative to it.
#[derive(Debug, Clone)]
pub struct Fish {
    pub name: String,
    joints: heapless::Vec<Joint, MAX_JOINTS>,
    pub link_distance: f32,

    pub forward: Vector2D,
    pub move_speed: f32,
    pub max_turn_angle: f32,

    pub hooked: bool,
    pub pulled: bool,
    pub pull_timer: f32,
    pub pull_time: f32,

    pub colors: FishColors,
    pub eye_radius: f32,
    pub normal_fin_rotation: f32,
    pub turn_fin_rotation: f32,
    pub fin_index: usize,
    fin_radius: f32,

    pub seed: u32,
}

impl Fish {
    pub fn new(name: impl Into<String>, link_distance: f32, move_speed: f32, colors: FishColors) -> Self {
        Self {
            name: name.into(),
            joints: heapless::Vec::new(),
            link_distance,
            forward: Vector2D::new(-1.0, 0.0),
            move_speed,
            max_turn_angle: DEFAULT_MAX_TURN_ANGLE,
            hooked: false,
            pulled: false,
            pull_timer: DEFAULT_PULL_TIME,
            pull_time: DEFAULT_PULL_TIME,
            colors,
            eye_radius: 0.025,
            normal_fin_rotation: 30.0,
            turn_fin_rotation: 20.0,
            fin_index: 0,
            fin_radius: f32::MIN_POSITIVE,
            seed: 0,
        }
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn head_position(&self) -> Vector2D {
        self.joints.first().map(|j| j.position).unwrap_or_default()
    }

    pub fn fin_radius(&self) -> f32 {
        self.fin_radius
    }

    /// Append a joint to the tail and re-run the constraint pass.
    ///
    /// Returns the joint back if the body is already at capacity.
    pub fn append_joint(&mut self, position: Vector2D, radius: f32) -> Result<(), Joint> {
        self.joints.push(Joint { position, radius })?;
        self.constrain();

        if radius > self.fin_radius {
            self.fin_index = self.joints.len() - 1;
            self.fin_radius = radius;
        }
        Ok(())
    }

    /// Move the head to `position` and drag the rest of the body after it
    pub fn set_head(&mut self, position: Vector2D) {
        assert!(!self.joints.is_empty(), "set_head on a fish without joints");
        self.joints[0].position = position;
        self.constrain();
    }

    pub fn set_hooked(&mut self, value: bool) {
        if value && !self.hooked {
            self.pull_timer = self.pull_time;
        }
        self.hooked = value;
    }

    pub fn set_pulled(&mut self, value: bool) {
        self.pulled = value;
    }

    pub fn is_free(&self) -> bool {
        !self.hooked && !self.pulled
    }

    /// Swim forward for `dt` seconds and count down the hook timer.
    pub fn update(&mut self, dt: f32) {
        debug_assert!(self.joints.len() >= 2, "fish needs at least two joints to swim");

        self.forward = self.forward.normalize();
        let step = self.forward * self.move_speed * dt;
        if let Some(head) = self.joints.first_mut() {
            head.position += step;
        }
        self.constrain();

        if self.hooked {
            self.pull_timer -= dt;
            if !self.pulled && self.pull_timer <= 0.0 {
                log::debug!("{} escaped the hook", self.name);
                self.set_hooked(false);
            }
        }
    }

    /// Enforce the distance and angle constraints from head to tail.
    pub fn constrain(&mut self) {
        for i in 1..self.joints.len() {
            let anchor = self.joints[i - 1].position;

            let dir = (self.joints[i].position - anchor).normalize();
            self.joints[i].position = anchor + dir * self.link_distance;

            let angle = self
                .joint_angle(i)
                .clamp(-self.max_turn_angle, self.max_turn_angle);
            let dir = (-self.joint_forward(i - 1)).rotate(angle);
            self.joints[i].position = anchor + dir * self.link_distance;
        }
    }

    /// Unit direction the joint at `index` faces
    pub fn joint_forward(&self, index: usize) -> Vector2D {
        if index == 0 {
            return self.forward.normalize();
        }
        (self.joints[index - 1].position - self.joints[index].position).normalize()
    }

    /// Signed bend at joint `index` in degrees (index >= 1)
    pub fn joint_angle(&self, index: usize) -> f32 {
        self.joint_forward(index - 1)
            .angle_to(&self.joint_forward(index))
    }

    pub fn joint_left(&self, index: usize) -> Vector2D {
        let joint = &self.joints[index];
        (self.joint_forward(index) * joint.radius).rotate(-90.0) + joint.position
    }

    pub fn joint_right(&self, index: usize) -> Vector2D {
        let joint = &self.joints[index];
        (self.joint_forward(index) * joint.radius).rotate(90.0) + joint.position
    }

    /// Total bend of the body normalized to [-1, 1]
    pub fn curvature(&self) -> f32 {
        let links = self.joints.len().saturating_sub(1);
        if links == 0 {
            return 0.0;
        }
        let angle: f32 = (1..self.joints.len()).map(|i| self.joint_angle(i)).sum();
        angle / (links as f32 * self.max_turn_angle)
    }

    /// Closed body outline, going round the right side and back up the left
    pub fn outline(&self) -> Vec<Vector2D> {
        let mut points = Vec::with_capacity(self.joints.len() * 2 + 2);
        if self.joints.len() < 2 {
            return points;
        }
        let head = self.joints[0];
        let nose = self.forward * head.radius;

        points.push(nose.rotate(30.0) + head.position);
        points.push(nose.rotate(90.0) + head.position);
        points.extend((1..self.joints.len()).map(|i| self.joint_right(i)));
        points.extend((1..self.joints.len()).rev().map(|i| self.joint_left(i)));
        points.push(nose.rotate(-90.0) + head.position);
        points.push(nose.rotate(-30.0) + head.position);
        points
    }

    /// Right and left side fins at the widest joint
    pub fn side_fins(&self) -> Option<[SideFin; 2]> {
        if self.joints.len() < 2 || self.fin_index == 0 {
            return None;
        }
        let bend = self.curvature() * self.turn_fin_rotation;
        let size = (self.fin_radius * 0.75, self.fin_radius * 0.75 * 0.5);

        let right = self.joint_right(self.fin_index);
        let right_rotation = (self.joint_right(self.fin_index - 1) - right).heading();
        let left = self.joint_left(self.fin_index);
        let left_rotation = (self.joint_left(self.fin_index - 1) - left).heading();

        Some([
            SideFin {
                anchor: right,
                size,
                rotation: right_rotation - self.normal_fin_rotation - bend,
            },
            SideFin {
                anchor: left,
                size,
                rotation: left_rotation + self.normal_fin_rotation - bend,
            },
        ])
    }

    /// Triangle for the tail fin; the free corner sways with curvature
    pub fn tail_fin(&self) -> Option<[Vector2D; 3]> {
        if self.joints.len() < 2 {
            return None;
        }
        let last = self.joints.len() - 1;
        let last_point = self.joints[last].position;
        let tail_point = last_point - self.joint_forward(last) * self.link_distance;
        let sway = (self.joint_right(last) - last_point) * 3.0 * self.curvature();
        Some([last_point, tail_point, tail_point + sway])
    }

    /// Right and left eye centers
    pub fn eyes(&self) -> [Vector2D; 2] {
        let head = self.joints.first().copied().unwrap_or(Joint {
            position: Vector2D::zero(),
            radius: 0.0,
        });
        let offset = self.forward * head.radius * 0.5;
        [
            offset.rotate(90.0) + head.position,
            offset.rotate(-90.0) + head.position,
        ]
    }
}
