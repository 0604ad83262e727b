use crate::math::{Rect, Vec2};

use super::collider::Collider;
use super::graphic::Graphic;
use super::rendering::DrawSurface;
use super::sprite::{AnimatedSprite, AnimationEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Everything needed to add an entity to a scene world.
#[derive(Debug, Clone)]
pub struct EntityDesc {
    pub position: Vec2,
    pub depth: f64,
    pub collider: Option<Collider>,
    pub graphic: Option<Graphic>,
    pub visible: bool,
}

impl EntityDesc {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            depth: 0.0,
            collider: None,
            graphic: None,
            visible: true,
        }
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_graphic(mut self, graphic: Graphic) -> Self {
        self.graphic = Some(graphic);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    pub position: Vec2,
    pub depth: f64,
    pub collider: Option<Collider>,
    pub graphic: Option<Graphic>,
    pub visible: bool,
    attached: bool,
}

impl Entity {
    pub(crate) fn from_desc(id: EntityId, desc: EntityDesc) -> Self {
        Self {
            id,
            position: desc.position,
            depth: desc.depth,
            collider: desc.collider,
            graphic: desc.graphic,
            visible: desc.visible,
            attached: true,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// False once the entity has been removed from its scene, even if the
    /// removal has not been applied yet.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn detach(&mut self) {
        self.attached = false;
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.collider
            .as_ref()
            .map(|collider| collider.bounds_at(self.position))
    }

    pub fn sprite(&self) -> Option<&AnimatedSprite> {
        self.graphic.as_ref().and_then(Graphic::sprite)
    }

    pub fn sprite_mut(&mut self) -> Option<&mut AnimatedSprite> {
        self.graphic.as_mut().and_then(Graphic::sprite_mut)
    }

    /// Advances the graphic's animation. Detached entities do not tick.
    pub fn tick_graphic(&mut self) -> Option<AnimationEvent> {
        if !self.attached {
            return None;
        }
        self.graphic.as_mut().and_then(Graphic::tick)
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, camera: Vec2) {
        if !self.attached || !self.visible {
            return;
        }
        if let Some(graphic) = &self.graphic {
            graphic.draw(surface, self.position, camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::collider::ColliderTag;
    use crate::app::rendering::{Color, RecordingSurface, ShapeStyle};

    #[test]
    fn allocator_never_reuses_ids() {
        let mut allocator = EntityIdAllocator::default();
        let first = allocator.allocate();
        let second = allocator.allocate();
        let third = allocator.allocate();

        assert_eq!(first.0, 0);
        assert_eq!(second.0, 1);
        assert_eq!(third.0, 2);
    }

    #[test]
    fn render_subtracts_camera_from_position() {
        let entity = Entity::from_desc(
            EntityId(1),
            EntityDesc::at(Vec2::new(30.0, 40.0))
                .with_graphic(Graphic::rect(2.0, 2.0, ShapeStyle::Fill(Color::RED))),
        );
        let mut surface = RecordingSurface::new(100, 100);
        entity.render(&mut surface, Vec2::new(10.0, 5.0));
        assert_eq!(
            surface.calls(),
            &[crate::app::rendering::DrawCall::Rect {
                rect: Rect::new(20.0, 35.0, 2.0, 2.0),
                style: ShapeStyle::Fill(Color::RED),
            }]
        );
    }

    #[test]
    fn detached_entities_neither_render_nor_tick() {
        let mut entity = Entity::from_desc(
            EntityId(2),
            EntityDesc::at(Vec2::ZERO)
                .with_graphic(Graphic::rect(2.0, 2.0, ShapeStyle::Fill(Color::RED))),
        );
        entity.detach();
        let mut surface = RecordingSurface::new(100, 100);
        entity.render(&mut surface, Vec2::ZERO);
        assert!(surface.calls().is_empty());
        assert!(entity.tick_graphic().is_none());
    }

    #[test]
    fn bounds_come_from_collider() {
        let entity = Entity::from_desc(
            EntityId(3),
            EntityDesc::at(Vec2::new(5.0, 5.0)).with_collider(Collider::new(
                4.0,
                2.0,
                Vec2::new(-2.0, -2.0),
                ColliderTag("char"),
            )),
        );
        assert_eq!(entity.bounds(), Some(Rect::new(3.0, 3.0, 4.0, 2.0)));
    }
}
