const CAMERA_GUIDE_INNER_INSET: f64 = 60.0;
const CAMERA_GUIDE_OUTER_INSET: f64 = 90.0;

impl Scene for LevelScene {
    fn name(&self) -> &'static str {
        LEVEL_SCENE_NAME
    }

    fn load(&mut self, world: &mut SceneWorld) -> Result<(), SceneError> {
        self.populate(world)?;
        Ok(())
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<SceneCommand, SceneError> {
        if self.state.outcome.is_none() && input.key_pressed(&[Key::Escape, Key::P]) {
            info!(scene = LEVEL_SCENE_NAME, "level_paused");
            return Ok(SceneCommand::Push(Box::new(PauseScene::new())));
        }

        self.tick(input, world)?;
        Ok(self.take_outcome_command())
    }

    fn render(&self, world: &SceneWorld, surface: &mut dyn DrawSurface) {
        world.render(surface);
        if self.settings().show_hitboxes {
            self.draw_colliders(world, surface);
        }
        if self.settings().show_camera {
            draw_camera_guides(&self.rig, world, surface);
        }
    }

    fn blur(&mut self, _world: &mut SceneWorld) -> SceneCommand {
        if self.state.outcome.is_some() {
            return SceneCommand::None;
        }
        info!(scene = LEVEL_SCENE_NAME, "level_paused_on_blur");
        SceneCommand::Push(Box::new(PauseScene::new()))
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        info!(
            scene = LEVEL_SCENE_NAME,
            actors = self.actors.len(),
            outcome = self.state.outcome.map(Outcome::banner),
            "level_unloaded"
        );
        self.actors.clear();
        world.clear();
    }
}

impl LevelScene {
    fn draw_colliders(&self, world: &SceneWorld, surface: &mut dyn DrawSurface) {
        let camera = world.camera();
        for entity in world.entities().iter().filter(|entity| entity.is_attached()) {
            let Some(collider) = entity.collider.as_ref() else {
                continue;
            };
            let color = if collider.collidable {
                Color::RED
            } else {
                Color::rgba(0xff, 0xff, 0xff, 0x55)
            };
            let bounds = collider.bounds_at(entity.position).translated(-camera);
            surface.rect(bounds, ShapeStyle::Stroke(color));
        }

        for slot in self.director.slots() {
            let color = if slot.occupant.is_some() {
                Color::YELLOW
            } else {
                Color::rgba(0xfa, 0xdc, 0x3c, 0x66)
            };
            surface.circle(slot.position - camera, 3.0, 1.0, ShapeStyle::Stroke(color));
        }
    }
}

/// Screen-space lines at the dead-zone edges: inner pair solid, outer pair
/// dimmed.
fn draw_camera_guides(rig: &CameraRig, world: &SceneWorld, surface: &mut dyn DrawSurface) {
    let (width, height) = world.viewport();
    let center = f64::from(width / 2);
    let height = height as f64;
    let guides = [
        (rig.inner, CAMERA_GUIDE_INNER_INSET, Color::WHITE),
        (rig.outer, CAMERA_GUIDE_OUTER_INSET, Color::rgba(0xff, 0xff, 0xff, 0x88)),
    ];
    for (distance, inset, color) in guides {
        for x in [center - distance, center + distance] {
            surface.line(Vec2::new(x, inset), Vec2::new(x, height - inset), color);
        }
    }
}
