const BACKGROUND_SCALE: f64 = 0.5;
const BACKGROUND_LIFT: f64 = 100.0;

const HUD_BLOCK_WIDTH: f64 = 8.0;
const HUD_BLOCK_PADDING: f64 = 2.0;
const HUD_BAR_HEIGHT: f64 = 16.0;
const HUD_BUBBLE_SPACING: f64 = 24.0;
const HUD_BUBBLE_DIM_ALPHA: f64 = 0.6;
/// Border and background precede the health blocks in the HUD list.
const HUD_FIRST_BLOCK: usize = 2;

const OVERLAY_TEXT_SIZE: f64 = 16.0;

/// Dead-zone camera. The rig drifts toward a point `inner` ahead of the
/// target and turns around once the target crosses `outer` behind it.
#[derive(Debug, Clone, PartialEq)]
struct CameraRig {
    x: f64,
    dir: f64,
    inner: f64,
    outer: f64,
    speed: f64,
}

impl CameraRig {
    fn new(x: f64, settings: &Settings) -> Self {
        Self {
            x,
            dir: 1.0,
            inner: settings.camera_inner,
            outer: settings.camera_outer,
            speed: settings.camera_speed,
        }
    }

    fn steer(&mut self, dir: f64) {
        self.dir = dir;
    }

    fn follow(&mut self, target: f64) {
        let mut toggle = self.x - self.outer * self.dir;
        let follow = self.x - self.inner * self.dir;
        if self.dir > 0.0 {
            toggle -= 1.0;
        }

        if sign(target - follow) == self.dir {
            let distance = target + self.inner * self.dir - self.x;
            self.x += sign(distance) * distance.abs().min(self.speed);
        }

        if sign(target - toggle) == -self.dir {
            self.dir = -self.dir;
        }
    }

    fn camera_x(&self, view_width: f64) -> f64 {
        (self.x - view_width * 0.5).max(0.0)
    }
}

/// Row of background tiles that jumps back by one tile width whenever the
/// scrolled camera passes a tile, so a short image covers the whole level.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ParallaxLayer {
    id: EntityId,
    scroll: f64,
    span: f64,
}

impl ParallaxLayer {
    fn anchor_x(&self, camera_x: f64) -> f64 {
        (camera_x * self.scroll / self.span).floor() * self.span
    }
}

fn spawn_parallax_layer(
    world: &mut SceneWorld,
    assets: &Assets,
    asset: &'static str,
    scroll: f64,
    scale: f64,
    depth: f64,
    y: f64,
) -> Result<ParallaxLayer, AssetError> {
    let image = assets.sprites().get(asset)?;
    let tile_width = (image.width as f64 * scale).max(1.0);
    let view_width = world.viewport().0 as f64;
    let tiles = (view_width / tile_width).ceil() as usize + 1;

    let children = (0..tiles)
        .map(|index| {
            Graphic::image(asset)
                .with_scale(scale)
                .with_scroll(Vec2::new(scroll, 1.0))
                .with_offset(Vec2::new(index as f64 * tile_width, 0.0))
        })
        .collect();
    let id = world.spawn(
        EntityDesc::at(Vec2::new(0.0, y))
            .with_depth(depth)
            .with_graphic(Graphic::list(children)),
    );
    Ok(ParallaxLayer {
        id,
        scroll,
        span: tile_width,
    })
}

fn spawn_backdrop(world: &mut SceneWorld, assets: &Assets) -> Result<Vec<ParallaxLayer>, AssetError> {
    let view_height = world.viewport().1 as f64;
    let mut layers = Vec::with_capacity(3);
    for (asset, scroll, depth) in [
        (BG2_PNG, 0.5, DEPTH_FAR_BACKGROUND),
        (BG_PNG, 1.0, DEPTH_BACKGROUND),
    ] {
        let height = assets.sprites().get(asset)?.height as f64;
        let y = view_height - BACKGROUND_LIFT - height * BACKGROUND_SCALE;
        layers.push(spawn_parallax_layer(
            world,
            assets,
            asset,
            scroll,
            BACKGROUND_SCALE,
            depth,
            y,
        )?);
    }

    let floor_height = assets.sprites().get(FLOOR_PNG)?.height as f64;
    layers.push(spawn_parallax_layer(
        world,
        assets,
        FLOOR_PNG,
        1.0,
        1.0,
        DEPTH_FLOOR,
        view_height - floor_height,
    )?);
    Ok(layers)
}

fn sync_parallax(world: &mut SceneWorld, layers: &[ParallaxLayer]) {
    let camera_x = world.camera().x;
    for layer in layers {
        if let Some(entity) = world.find_entity_mut(layer.id) {
            entity.position.x = layer.anchor_x(camera_x);
        }
    }
}

fn screen_fixed(graphic: Graphic) -> Graphic {
    graphic.with_scroll(Vec2::ZERO)
}

fn spawn_hud(world: &mut SceneWorld, max_health: u32, max_bubbles: u32) -> EntityId {
    let slots = max_health as f64;
    let bar_width = HUD_BLOCK_WIDTH * slots + HUD_BLOCK_PADDING * (slots + 1.0);

    let mut children = vec![
        screen_fixed(
            Graphic::rect(
                bar_width + 2.0,
                HUD_BAR_HEIGHT + 2.0,
                ShapeStyle::Fill(Color::rgb(0x88, 0x88, 0x88)),
            )
            .with_offset(Vec2::new(-1.0, -1.0)),
        ),
        screen_fixed(Graphic::rect(
            bar_width,
            HUD_BAR_HEIGHT,
            ShapeStyle::Fill(Color::BLACK),
        )),
    ];
    children.extend((0..max_health).map(|index| {
        screen_fixed(
            Graphic::rect(
                HUD_BLOCK_WIDTH,
                HUD_BAR_HEIGHT - HUD_BLOCK_PADDING * 2.0,
                ShapeStyle::Fill(Color::RED),
            )
            .with_offset(Vec2::new(
                HUD_BLOCK_PADDING + index as f64 * (HUD_BLOCK_WIDTH + HUD_BLOCK_PADDING),
                HUD_BLOCK_PADDING,
            )),
        )
    }));
    children.extend((0..max_bubbles).map(|index| {
        screen_fixed(
            Graphic::image(BUBBLES2_PNG)
                .with_offset(Vec2::new(HUD_BUBBLE_SPACING * index as f64, HUD_BUBBLE_SPACING)),
        )
    }));

    world.spawn(
        EntityDesc::at(Vec2::new(8.0, 8.0))
            .with_depth(DEPTH_HUD)
            .with_graphic(screen_fixed(Graphic::list(children))),
    )
}

/// Lit health blocks for current health; the first spent block blinks white
/// while the player is invincible.
fn sync_hud(world: &mut SceneWorld, hud: EntityId, player: &PlayerActor) {
    let Some(children) = world
        .find_entity_mut(hud)
        .and_then(|entity| entity.graphic.as_mut())
        .and_then(Graphic::children_mut)
    else {
        return;
    };

    let max_health = player.body.max_health as usize;
    let health = player.body.health as usize;
    let blocks_end = (HUD_FIRST_BLOCK + max_health).min(children.len());
    for (index, block) in children[HUD_FIRST_BLOCK..blocks_end].iter_mut().enumerate() {
        let mut color = Color::RED;
        block.alpha = if index < health { 1.0 } else { 0.0 };
        if index == health && player.body.inv_frames > 0 {
            let lit = player.body.inv_frames % HIT_FLASH_PERIOD >= HIT_FLASH_ON_FROM;
            block.alpha = if lit { 1.0 } else { 0.0 };
            color = Color::WHITE;
        }
        if let GraphicKind::Rect { style, .. } = &mut block.kind {
            *style = ShapeStyle::Fill(color);
        }
    }

    for (index, icon) in children[blocks_end..].iter_mut().enumerate() {
        icon.alpha = if index < player.bubbles as usize {
            1.0
        } else {
            HUD_BUBBLE_DIM_ALPHA
        };
    }
}

/// Full-screen title card shown before the boss arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BossIntro {
    id: EntityId,
    fade: f64,
}

impl BossIntro {
    fn spawn(world: &mut SceneWorld, hidden: bool) -> Self {
        let (width, height) = world.viewport();
        let (width, height) = (width as f64, height as f64);
        let text_width = measure_text(BOSS_INTRO_TEXT, OVERLAY_TEXT_SIZE);

        let backdrop = Graphic::rect(width, height, ShapeStyle::Fill(Color::BLACK))
            .with_offset(Vec2::new(-width * 0.5, -height * 0.5))
            .with_alpha(0.5);
        let title = Graphic::text(BOSS_INTRO_TEXT, OVERLAY_TEXT_SIZE, Color::WHITE)
            .with_offset(Vec2::new(-text_width * 0.5, -OVERLAY_TEXT_SIZE * 0.5));

        let mut desc = EntityDesc::at(Vec2::new(width * 0.5, height * 0.5))
            .with_depth(DEPTH_OVERLAY)
            .with_graphic(screen_fixed(Graphic::list(vec![
                screen_fixed(backdrop),
                screen_fixed(title),
            ])));
        if hidden {
            desc = desc.hidden();
        }
        let id = world.spawn(desc);
        info!(entity = id.0, hidden, "boss_intro_started");
        Self { id, fade: 0.0 }
    }

    /// Pulses the backdrop once over the fade; true when it has run out.
    fn advance(&mut self, world: &mut SceneWorld) -> bool {
        self.fade = (self.fade + OVERLAY_FADE_STEP).min(1.0);
        if let Some(children) = world
            .find_entity_mut(self.id)
            .and_then(|entity| entity.graphic.as_mut())
            .and_then(Graphic::children_mut)
        {
            if let Some(backdrop) = children.first_mut() {
                backdrop.alpha = (self.fade * PI).sin() * 0.5 + 0.5;
            }
        }
        self.fade >= 1.0
    }
}
