#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ActorKind {
    Player,
    Grimey,
    Boss,
    Hitbox,
    Bubble,
}

impl ActorKind {
    fn as_token(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Grimey => "grimey",
            Self::Boss => "boss",
            Self::Hitbox => "hitbox",
            Self::Bubble => "bubble",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Team {
    Hero,
    Grime,
}

#[derive(Debug, Error)]
enum GameplayError {
    #[error(transparent)]
    Director(#[from] DirectorError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HurtOutcome {
    /// Still flashing from the previous hit.
    Ignored,
    Damaged,
    Killed,
}

/// Shared state of everything that walks, takes hits and dies.
#[derive(Debug, Clone, PartialEq)]
struct Character {
    team: Team,
    health: u32,
    max_health: u32,
    velocity: Vec2,
    friction: f64,
    inv_frames: u32,
    hit_flash: bool,
    /// Keeps health pinned at max; hits still start invincibility.
    invulnerable: bool,
    ignore_collisions: bool,
    facing_left: bool,
    flip_offset: f64,
    dead: bool,
    death_ticks: u32,
}

impl Character {
    fn new(team: Team, health: u32) -> Self {
        Self {
            team,
            health,
            max_health: health,
            velocity: Vec2::ZERO,
            friction: DEFAULT_FRICTION,
            inv_frames: 0,
            hit_flash: false,
            invulnerable: false,
            ignore_collisions: false,
            facing_left: false,
            flip_offset: 0.0,
            dead: false,
            death_ticks: 0,
        }
    }

    fn facing_sign(&self) -> f64 {
        if self.facing_left {
            -1.0
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerState {
    Idle,
    Walk,
    Punch,
    BubbleStart,
    BubbleThrow,
    Dead,
}

impl PlayerState {
    fn animation(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Punch => "punch",
            Self::BubbleStart => "bubble_start",
            Self::BubbleThrow => "bubble_throw",
            Self::Dead => "dead",
        }
    }

    fn accepts_input(self) -> bool {
        matches!(self, Self::Idle | Self::Walk)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PlayerActor {
    body: Character,
    state: PlayerState,
    bubbles: u32,
    bubble_ticks: u32,
    hitbox: Option<EntityId>,
}

impl PlayerActor {
    fn new(invulnerable: bool) -> Self {
        let mut body = Character::new(Team::Hero, PLAYER_MAX_HEALTH);
        body.ignore_collisions = true;
        body.flip_offset = PLAYER_FLIP_OFFSET;
        body.invulnerable = invulnerable;
        Self {
            body,
            state: PlayerState::Idle,
            bubbles: MAX_BUBBLES,
            bubble_ticks: 0,
            hitbox: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnemyState {
    Advance,
    Attack,
    Trapped,
    Stunned,
    Dead,
}

#[derive(Debug, Clone, PartialEq)]
struct EnemyActor {
    body: Character,
    state: EnemyState,
    points: i32,
    speed: f64,
    attack_cooldown: u32,
    stun_ticks: u32,
    hitbox: Option<EntityId>,
    captor: Option<EntityId>,
}

impl EnemyActor {
    fn grimey(health: u32) -> Self {
        Self::new(health, GRIMEY_THREAT_POINTS, GRIMEY_SPEED)
    }

    fn boss(health: u32) -> Self {
        Self::new(
            health * BOSS_HEALTH_MULTIPLIER,
            BOSS_THREAT_POINTS,
            BOSS_SPEED,
        )
    }

    fn new(health: u32, points: i32, speed: f64) -> Self {
        Self {
            body: Character::new(Team::Grime, health),
            state: EnemyState::Advance,
            points,
            speed,
            attack_cooldown: 0,
            stun_ticks: 0,
            hitbox: None,
            captor: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct HitboxActor {
    owner: EntityId,
    team: Team,
    damage: u32,
    dir: f64,
    has_collided: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct BubbleActor {
    owner: EntityId,
    dir: f64,
    phase: f64,
    captive: Option<EntityId>,
}

/// Per-entity gameplay component, keyed by entity id in the level.
#[derive(Debug, Clone, PartialEq)]
enum Actor {
    Player(PlayerActor),
    Grimey(EnemyActor),
    Boss(EnemyActor),
    Hitbox(HitboxActor),
    Bubble(BubbleActor),
}

impl Actor {
    fn kind(&self) -> ActorKind {
        match self {
            Self::Player(_) => ActorKind::Player,
            Self::Grimey(_) => ActorKind::Grimey,
            Self::Boss(_) => ActorKind::Boss,
            Self::Hitbox(_) => ActorKind::Hitbox,
            Self::Bubble(_) => ActorKind::Bubble,
        }
    }

    fn body(&self) -> Option<&Character> {
        match self {
            Self::Player(player) => Some(&player.body),
            Self::Grimey(enemy) | Self::Boss(enemy) => Some(&enemy.body),
            Self::Hitbox(_) | Self::Bubble(_) => None,
        }
    }

    fn body_mut(&mut self) -> Option<&mut Character> {
        match self {
            Self::Player(player) => Some(&mut player.body),
            Self::Grimey(enemy) | Self::Boss(enemy) => Some(&mut enemy.body),
            Self::Hitbox(_) | Self::Bubble(_) => None,
        }
    }

    fn enemy_mut(&mut self) -> Option<&mut EnemyActor> {
        match self {
            Self::Grimey(enemy) | Self::Boss(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Threat points for the enemy director; the player carries the sentinel
    /// and props carry none.
    fn threat_points(&self) -> Option<i32> {
        match self {
            Self::Player(_) => Some(PLAYER_THREAT_POINTS),
            Self::Grimey(enemy) | Self::Boss(enemy) => Some(enemy.points),
            Self::Hitbox(_) | Self::Bubble(_) => None,
        }
    }

    fn is_dead(&self) -> bool {
        self.body().is_some_and(|body| body.dead)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    fn banner(self) -> &'static str {
        match self {
            Self::Victory => "YOU WIN",
            Self::Defeat => "GAME OVER",
        }
    }
}

/// Level-wide state that outlives individual entities.
#[derive(Debug, Clone, PartialEq, Default)]
struct WorldState {
    /// Horizontal walk limits; the boss room narrows them.
    bounds_x: Option<(f64, f64)>,
    room_start: Option<f64>,
    boss: Option<EntityId>,
    outcome: Option<Outcome>,
    results_pushed: bool,
}

impl WorldState {
    fn walk_bounds(&self, canvas_width: f64) -> (f64, f64) {
        self.bounds_x
            .unwrap_or((LEVEL_MIN_X, LEVEL_LENGTH + canvas_width - LEVEL_MIN_X))
    }
}
