use std::fmt;

use thiserror::Error;

use crate::math::{Rect, Vec2};

use super::assets::AssetError;
use super::collider::ColliderTag;
use super::entity::{Entity, EntityDesc, EntityId, EntityIdAllocator};
use super::input::InputSnapshot;
use super::rendering::DrawSurface;
use super::sprite::SpriteError;

pub enum SceneCommand {
    None,
    Push(Box<dyn Scene>),
    /// Pops this many scenes off the top of the stack.
    Pop(usize),
    Quit,
}

impl fmt::Debug for SceneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneCommand::None => f.write_str("None"),
            SceneCommand::Push(scene) => write!(f, "Push({})", scene.name()),
            SceneCommand::Pop(count) => write!(f, "Pop({count})"),
            SceneCommand::Quit => f.write_str("Quit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error("scene '{scene}' failed: {source}")]
    Custom {
        scene: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SceneError {
    pub fn custom(
        scene: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SceneError::Custom {
            scene,
            source: source.into(),
        }
    }
}

/// Entities of one scene plus its draw list and camera.
///
/// The entity list keeps insertion order and drives updates and collision
/// queries. The renderable list is maintained separately by callers and is
/// sorted by depth only when drawing.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    renderables: Vec<EntityId>,
    camera: Vec2,
    viewport: (u32, u32),
}

impl SceneWorld {
    pub fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            ..Self::default()
        }
    }

    /// Queues an entity; it joins the update order at the next
    /// [`Self::apply_pending`].
    pub fn add_entity(&mut self, desc: EntityDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity::from_desc(id, desc));
        id
    }

    /// Adds an entity and registers it as a renderable in one step.
    pub fn spawn(&mut self, desc: EntityDesc) -> EntityId {
        let id = self.add_entity(desc);
        self.add_renderable(id);
        id
    }

    /// Detaches the entity immediately and drops it from the draw list;
    /// physical removal happens at the next [`Self::apply_pending`]. Removing
    /// an unknown or already-removed entity returns false.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if let Some(index) = self.pending_spawns.iter().position(|entity| entity.id() == id) {
            self.pending_spawns.remove(index);
            self.remove_renderable(id);
            return true;
        }

        let Some(entity) = self
            .entities
            .iter_mut()
            .find(|entity| entity.id() == id && entity.is_attached())
        else {
            return false;
        };
        entity.detach();
        self.pending_despawns.push(id);
        self.remove_renderable(id);
        true
    }

    pub fn add_renderable(&mut self, id: EntityId) -> bool {
        if self.renderables.contains(&id) {
            return false;
        }
        self.renderables.push(id);
        true
    }

    pub fn remove_renderable(&mut self, id: EntityId) -> bool {
        let before = self.renderables.len();
        self.renderables.retain(|renderable| *renderable != id);
        self.renderables.len() != before
    }

    pub fn is_renderable(&self, id: EntityId) -> bool {
        self.renderables.contains(&id)
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort();
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities
                .retain(|entity| pending.binary_search(&entity.id()).is_err());
            self.pending_despawns.clear();
        }

        if !self.pending_spawns.is_empty() {
            self.entities.append(&mut self.pending_spawns);
        }

        let entities = &self.entities;
        self.renderables
            .retain(|id| entities.iter().any(|entity| entity.id() == *id));
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.renderables.clear();
        self.camera = Vec2::ZERO;
    }

    pub fn is_attached(&self, id: EntityId) -> bool {
        self.find_entity(id).is_some_and(Entity::is_attached)
    }

    /// Snapshot of attached entity ids in insertion order, taken at the start
    /// of an update phase.
    pub fn update_order(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|entity| entity.is_attached())
            .map(Entity::id)
            .collect()
    }

    /// Runs `f` over a snapshot of the update order. Entities removed earlier
    /// in the same pass are skipped; entities added during the pass wait for
    /// the next one.
    pub fn for_each_attached<E>(
        &mut self,
        mut f: impl FnMut(&mut SceneWorld, EntityId) -> Result<(), E>,
    ) -> Result<(), E> {
        for id in self.update_order() {
            if !self.is_attached(id) {
                continue;
            }
            f(self, id)?;
        }
        Ok(())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Looks up applied and pending entities alike.
    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .iter()
            .chain(self.pending_spawns.iter())
            .find(|entity| entity.id() == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .chain(self.pending_spawns.iter_mut())
            .find(|entity| entity.id() == id)
    }

    /// First attached, collidable entity in insertion order whose collider
    /// overlaps `prober`'s collider placed at `position`.
    pub fn collide_first(
        &self,
        prober: EntityId,
        position: Vec2,
        tags: &[ColliderTag],
    ) -> Option<EntityId> {
        let bounds = self.probe_bounds(prober, position)?;
        self.overlapping(bounds, tags, Some(prober)).next()
    }

    pub fn collide_all(
        &self,
        prober: EntityId,
        position: Vec2,
        tags: &[ColliderTag],
    ) -> Vec<EntityId> {
        let Some(bounds) = self.probe_bounds(prober, position) else {
            return Vec::new();
        };
        self.overlapping(bounds, tags, Some(prober)).collect()
    }

    pub fn collide_rect(
        &self,
        bounds: Rect,
        tags: &[ColliderTag],
        exclude: Option<EntityId>,
    ) -> Vec<EntityId> {
        self.overlapping(bounds, tags, exclude).collect()
    }

    fn probe_bounds(&self, prober: EntityId, position: Vec2) -> Option<Rect> {
        self.find_entity(prober)?
            .collider
            .as_ref()
            .map(|collider| collider.bounds_at(position))
    }

    fn overlapping<'a>(
        &'a self,
        bounds: Rect,
        tags: &'a [ColliderTag],
        exclude: Option<EntityId>,
    ) -> impl Iterator<Item = EntityId> + 'a {
        self.entities
            .iter()
            .filter(move |entity| Some(entity.id()) != exclude && entity.is_attached())
            .filter_map(move |entity| {
                let collider = entity.collider.as_ref()?;
                if !collider.collidable || !collider.matches_any(tags) {
                    return None;
                }
                collider
                    .bounds_at(entity.position)
                    .intersects(&bounds)
                    .then_some(entity.id())
            })
    }

    /// Renderables sorted back to front: higher depth draws first, ties keep
    /// registration order.
    pub fn render_order(&self) -> Vec<EntityId> {
        let mut ordered: Vec<(f64, EntityId)> = self
            .renderables
            .iter()
            .filter_map(|id| self.find_entity(*id).map(|entity| (entity.depth, *id)))
            .collect();
        ordered.sort_by(|a, b| b.0.total_cmp(&a.0));
        ordered.into_iter().map(|(_, id)| id).collect()
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        for id in self.render_order() {
            if let Some(entity) = self.find_entity(id) {
                entity.render(surface, self.camera);
            }
        }
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Vec2 {
        &mut self.camera
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}

/// One screen of the game. Scenes keep their own behaviour state and act on
/// the world the stack hands them.
pub trait Scene {
    fn name(&self) -> &'static str;
    fn load(&mut self, world: &mut SceneWorld) -> Result<(), SceneError>;
    fn update(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<SceneCommand, SceneError>;
    fn render(&self, world: &SceneWorld, surface: &mut dyn DrawSurface) {
        world.render(surface);
    }
    /// Another scene was pushed on top of this one.
    fn suspend(&mut self, _world: &mut SceneWorld) {}
    /// The scene above this one was popped.
    fn resume(&mut self, _world: &mut SceneWorld) {}
    /// The window lost focus while this scene was on top.
    fn blur(&mut self, _world: &mut SceneWorld) -> SceneCommand {
        SceneCommand::None
    }
    fn unload(&mut self, _world: &mut SceneWorld) {}
}
