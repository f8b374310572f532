//! The symmetric coordinate envelope.
//!
//! A single limit `B` applies to both axes: a position is inside when
//! `|x| < B` and `|y| < B`. Client insertions outside are rejected, and
//! any tracked cell outside is killed when the next generation is built.

use lifegrid_types::Position;

/// Default envelope, matching the board the browser client draws.
pub const DEFAULT_BOUNDS: u64 = 401;

/// Coordinate magnitude limit applied to both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsPolicy {
    limit: u64,
}

impl BoundsPolicy {
    /// Create a policy admitting positions with `|x| < limit` and `|y| < limit`.
    pub const fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// The configured magnitude limit.
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether `position` lies inside the envelope.
    pub const fn contains(&self, position: Position) -> bool {
        position.x.unsigned_abs() < self.limit && position.y.unsigned_abs() < self.limit
    }
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_exclusive() {
        let bounds = BoundsPolicy::new(10);
        assert!(bounds.contains(Position::new(9, -9)));
        assert!(!bounds.contains(Position::new(10, 0)));
        assert!(!bounds.contains(Position::new(0, -10)));
        assert!(!bounds.contains(Position::new(-11, 3)));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let bounds = BoundsPolicy::default();
        assert!(!bounds.contains(Position::new(i64::MIN, 0)));
        assert!(!bounds.contains(Position::new(0, i64::MAX)));
    }

    #[test]
    fn zero_admits_nothing() {
        assert!(!BoundsPolicy::new(0).contains(Position::new(0, 0)));
    }
}
