use crate::math::{Rect, Vec2};

/// Category label used to filter collision queries, e.g. `ColliderTag("char")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderTag(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub width: f64,
    pub height: f64,
    pub offset: Vec2,
    pub tag: ColliderTag,
    pub collidable: bool,
}

impl Collider {
    pub fn new(width: f64, height: f64, offset: Vec2, tag: ColliderTag) -> Self {
        Self {
            width,
            height,
            offset,
            tag,
            collidable: true,
        }
    }

    pub fn bounds_at(&self, position: Vec2) -> Rect {
        Rect::new(
            position.x + self.offset.x,
            position.y + self.offset.y,
            self.width,
            self.height,
        )
    }

    /// An empty filter matches every tag.
    pub fn matches_any(&self, tags: &[ColliderTag]) -> bool {
        tags.is_empty() || tags.contains(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAR: ColliderTag = ColliderTag("char");
    const HITBOX: ColliderTag = ColliderTag("hitbox");

    #[test]
    fn bounds_follow_position_plus_offset() {
        let collider = Collider::new(20.0, 60.0, Vec2::new(0.0, -30.0), HITBOX);
        assert_eq!(
            collider.bounds_at(Vec2::new(100.0, 50.0)),
            Rect::new(100.0, 20.0, 20.0, 60.0)
        );
    }

    #[test]
    fn empty_filter_matches_everything() {
        let collider = Collider::new(1.0, 1.0, Vec2::ZERO, CHAR);
        assert!(collider.matches_any(&[]));
        assert!(collider.matches_any(&[HITBOX, CHAR]));
        assert!(!collider.matches_any(&[HITBOX]));
    }

    #[test]
    fn new_colliders_start_collidable() {
        assert!(Collider::new(1.0, 1.0, Vec2::ZERO, CHAR).collidable);
    }
}
