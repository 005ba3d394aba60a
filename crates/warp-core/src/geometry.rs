//! Facing, axis-aligned rectangles and the per-attack hitbox geometry table.
//!
//! All rectangles are authored in the owner's local frame for a fighter
//! facing right. Mirroring for a left-facing fighter negates the x offset
//! and nothing else.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::attack::AttackId;

// =============================================================================
// Facing
// =============================================================================

/// Horizontal orientation of a fighter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing negative x.
    Left,
    /// Facing positive x.
    #[default]
    Right,
}

impl Facing {
    /// `1.0` for right, `-1.0` for left.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite facing.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Facing implied by a horizontal delta, or `None` when it is zero.
    #[must_use]
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx < 0.0 {
            Some(Self::Left)
        } else if dx > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    /// Mirrors a vector authored for a right-facing owner.
    #[must_use]
    pub fn mirror(self, v: Vec2) -> Vec2 {
        Vec2::new(v.x * self.sign(), v.y)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
        }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Axis-aligned rectangle described by its centre offset and full size.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Centre, relative to the owner's position (local) or the world origin.
    pub offset: Vec2,
    /// Full width and height.
    pub size: Vec2,
}

impl Rect {
    /// The zero rectangle. It never overlaps anything.
    pub const ZERO: Self = Self {
        offset: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    /// Creates a rectangle from `(offset_x, offset_y, width, height)`.
    #[must_use]
    pub const fn new(offset_x: f32, offset_y: f32, width: f32, height: f32) -> Self {
        Self {
            offset: Vec2::new(offset_x, offset_y),
            size: Vec2::new(width, height),
        }
    }

    /// Returns true if either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// The rectangle with its x offset negated.
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self {
            offset: Vec2::new(-self.offset.x, self.offset.y),
            size: self.size,
        }
    }

    /// The rectangle as seen by an owner with the given facing.
    #[must_use]
    pub fn faced(self, facing: Facing) -> Self {
        match facing {
            Facing::Right => self,
            Facing::Left => self.mirrored(),
        }
    }

    /// The rectangle moved by `delta`.
    #[must_use]
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            offset: self.offset + delta,
            size: self.size,
        }
    }

    /// World-space rectangle for an owner standing at `origin`.
    #[must_use]
    pub fn at(self, origin: Vec2) -> Self {
        self.translated(origin)
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.offset - self.size * 0.5
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.offset + self.size * 0.5
    }

    /// Strict overlap test. Touching edges and empty rectangles do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

// =============================================================================
// HitGeometry
// =============================================================================

/// Maps attack ids to hitbox rectangles.
///
/// Ids without an entry map to [`Rect::ZERO`], which never collides.
///
/// # Example
///
/// ```
/// use warp_core::attack::AttackId;
/// use warp_core::geometry::{Facing, HitGeometry, Rect};
///
/// let geometry = HitGeometry::standard();
/// let right = geometry.hitbox(AttackId::STAND_NN, Facing::Right);
/// let left = geometry.hitbox(AttackId::STAND_NN, Facing::Left);
/// assert_eq!(right, Rect::new(1.0, -0.5, 1.0, 0.5));
/// assert_eq!(left, Rect::new(-1.0, -0.5, 1.0, 0.5));
///
/// assert_eq!(geometry.hitbox(AttackId::new(99), Facing::Left), Rect::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitGeometry {
    rects: Vec<Rect>,
}

impl HitGeometry {
    /// Builds a geometry table indexed by attack id.
    #[must_use]
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    /// The game's built-in hitbox shapes.
    #[must_use]
    pub fn standard() -> Self {
        let r = Rect::new;
        Self::new(vec![
            Rect::ZERO,                // 0 none
            r(1.0, 0.0, 1.0, 0.5),     // 1 5N
            r(1.0, -0.5, 1.0, 0.5),    // 2 5NN
            r(1.0, 0.5, 1.0, 0.5),     // 3 5NNN
            r(1.0, 0.0, 1.0, 0.5),     // 4 2N
            r(1.0, -0.5, 1.2, 0.5),    // 5 2NN
            r(0.6, 0.8, 0.8, 1.0),     // 6 2NNN
            r(1.1, 0.0, 1.2, 0.5),     // 7 6N
            r(1.0, 0.0, 1.0, 0.5),     // 8 6NN
            r(1.0, 0.3, 1.2, 0.7),     // 9 6NNN
            r(0.8, -0.2, 0.9, 0.6),    // 10 j.N
            r(0.8, -0.2, 0.9, 0.6),    // 11 j.NN
            r(0.6, -0.8, 0.9, 0.8),    // 12 j.NNN
            Rect::ZERO,                // 13 5S
            Rect::ZERO,                // 14 2S
            Rect::ZERO,                // 15 6S
            r(0.6, 0.0, 0.6, 0.4),     // 16 bite
            r(0.7, 0.0, 0.8, 0.5),     // 17 pounce
            r(0.0, 0.0, 0.4, 0.2),     // 18 player shot
            r(0.0, 0.0, 1.5, 1.5),     // 19 spore cloud
            r(0.8, -0.2, 0.8, 0.4),    // 20 shroom kick
            Rect::ZERO,                // 21 shroom spore
            r(0.9, -0.3, 1.0, 0.5),    // 22 BB kick
            Rect::ZERO,                // 23 BB fire
            r(0.0, -0.5, 1.5, 0.5),    // 24 BB slam
            r(0.0, 0.0, 0.4, 0.4),     // 25 BB shot
        ])
    }

    /// Local-frame hitbox for `id`, mirrored for `facing`.
    #[must_use]
    pub fn hitbox(&self, id: AttackId, facing: Facing) -> Rect {
        self.rects
            .get(usize::from(id.as_u16()))
            .copied()
            .unwrap_or(Rect::ZERO)
            .faced(facing)
    }

    /// Returns true if `id` produces a collidable hitbox.
    #[must_use]
    pub fn has_hitbox(&self, id: AttackId) -> bool {
        !self.hitbox(id, Facing::Right).is_empty()
    }
}

impl Default for HitGeometry {
    fn default() -> Self {
        Self::standard()
    }
}
