//! Collision layers and filters.
//!
//! Every collidable entity carries exactly one [`Layer`](crate::components::Layer);
//! queries take a [`LayerMask`] and only see entities whose layer bit is set.

use serde::{Deserialize, Serialize};

/// Bit set of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const PLAYER: LayerMask = LayerMask(1 << 0);
    pub const ENEMY: LayerMask = LayerMask(1 << 1);
    pub const OBSTACLE: LayerMask = LayerMask(1 << 2);
    pub const HAZARD: LayerMask = LayerMask(1 << 3);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// True if any bit of `other` is also set here
    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let mask = LayerMask::PLAYER | LayerMask::ENEMY;
        assert!(mask.intersects(LayerMask::PLAYER));
        assert!(mask.intersects(LayerMask::ENEMY));
        assert!(!mask.intersects(LayerMask::OBSTACLE));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn test_deserializes_from_bits() {
        let mask: LayerMask = serde_json::from_str("5").unwrap();
        assert_eq!(mask, LayerMask::PLAYER | LayerMask::OBSTACLE);
    }
}
