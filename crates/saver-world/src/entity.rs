//! A single bouncing sprite.

use saver_core::{Axis, BoundingBox, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Which walls an entity hit during one move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Bounce {
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }

    pub fn hit(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Horizontally mirrored sprite
    pub flipped: bool,
}

impl Entity {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            flipped: false,
        }
    }

    /// Move by one velocity step and reflect off the boundary walls.
    ///
    /// A horizontal bounce also toggles the mirrored orientation.
    pub fn advance(&mut self, boundary: Size, footprint: Size) -> Bounce {
        self.position = self.position.add(self.velocity);

        let mut bounce = Bounce::default();

        if self.position.x <= 0.0
            || self.position.x + footprint.width as f32 >= boundary.width as f32
        {
            self.velocity.x = -self.velocity.x;
            self.flipped = !self.flipped;
            bounce.horizontal = true;
        }

        if self.position.y <= 0.0
            || self.position.y + footprint.height as f32 >= boundary.height as f32
        {
            self.velocity.y = -self.velocity.y;
            bounce.vertical = true;
        }

        bounce
    }

    pub fn bounding_box(&self, footprint: Size) -> BoundingBox {
        BoundingBox {
            x: self.position.x,
            y: self.position.y,
            width: footprint.width as f32,
            height: footprint.height as f32,
        }
    }
}
