use tracing::{debug, info};

use super::input::InputSnapshot;
use super::rendering::DrawSurface;
use super::scene::{Scene, SceneCommand, SceneError, SceneWorld};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStatus {
    Running,
    Quit,
    Empty,
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
}

/// LIFO scene stack. Only the top scene updates; every scene renders,
/// bottom to top.
pub struct SceneStack {
    runtimes: Vec<SceneRuntime>,
    viewport: (u32, u32),
}

impl SceneStack {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            runtimes: Vec::new(),
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn len(&self) -> usize {
        self.runtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    pub fn top_name(&self) -> Option<&'static str> {
        self.runtimes.last().map(|runtime| runtime.scene.name())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.runtimes
            .iter()
            .map(|runtime| runtime.scene.name())
            .collect()
    }

    pub fn top_world(&self) -> Option<&SceneWorld> {
        self.runtimes.last().map(|runtime| &runtime.world)
    }

    /// Loads `scene` and only then suspends the scene it covers, so a failed
    /// load leaves the stack as it was.
    pub fn push(&mut self, mut scene: Box<dyn Scene>) -> Result<(), SceneError> {
        let mut world = SceneWorld::with_viewport(self.viewport.0, self.viewport.1);
        scene.load(&mut world)?;
        world.apply_pending();
        if let Some(covered) = self.runtimes.last_mut() {
            covered.scene.suspend(&mut covered.world);
        }
        info!(
            scene = scene.name(),
            entity_count = world.entity_count(),
            stack_depth = self.runtimes.len() + 1,
            "scene_pushed"
        );
        self.runtimes.push(SceneRuntime { scene, world });
        Ok(())
    }

    /// Pops up to `count` scenes and resumes whatever is exposed. Returns how
    /// many were popped.
    pub fn pop(&mut self, count: usize) -> usize {
        let mut popped = 0;
        while popped < count {
            let Some(mut runtime) = self.runtimes.pop() else {
                break;
            };
            runtime.scene.unload(&mut runtime.world);
            info!(
                scene = runtime.scene.name(),
                stack_depth = self.runtimes.len(),
                "scene_popped"
            );
            popped += 1;
        }
        if popped > 0 {
            if let Some(exposed) = self.runtimes.last_mut() {
                exposed.scene.resume(&mut exposed.world);
            }
        }
        popped
    }

    pub fn update_top(&mut self, input: &InputSnapshot) -> Result<StackStatus, SceneError> {
        let Some(runtime) = self.runtimes.last_mut() else {
            return Ok(StackStatus::Empty);
        };
        let command = runtime.scene.update(input, &mut runtime.world)?;
        runtime.world.apply_pending();
        self.apply_command(command)
    }

    pub fn blur_top(&mut self) -> Result<StackStatus, SceneError> {
        let Some(runtime) = self.runtimes.last_mut() else {
            return Ok(StackStatus::Empty);
        };
        debug!(scene = runtime.scene.name(), "scene_blurred");
        let command = runtime.scene.blur(&mut runtime.world);
        self.apply_command(command)
    }

    pub fn apply_command(&mut self, command: SceneCommand) -> Result<StackStatus, SceneError> {
        match command {
            SceneCommand::None => {}
            SceneCommand::Push(scene) => self.push(scene)?,
            SceneCommand::Pop(count) => {
                self.pop(count);
            }
            SceneCommand::Quit => return Ok(StackStatus::Quit),
        }
        if self.runtimes.is_empty() {
            Ok(StackStatus::Empty)
        } else {
            Ok(StackStatus::Running)
        }
    }

    pub fn render_all(&self, surface: &mut dyn DrawSurface) {
        for runtime in &self.runtimes {
            runtime.scene.render(&runtime.world, surface);
        }
    }

    pub fn shutdown_all(&mut self) {
        let count = self.runtimes.len();
        while let Some(mut runtime) = self.runtimes.pop() {
            runtime.scene.unload(&mut runtime.world);
            runtime.world.clear();
        }
        if count > 0 {
            info!(scene_count = count, "scene_stack_shutdown");
        }
    }
}
