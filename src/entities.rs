/// All game entity types: pure data plus construction defaults.
use std::collections::HashMap;

use crate::audio::Playlist;
use crate::config::GameConfig;
use crate::spawner::SpawnTimers;

// ── Geometry constants ────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f64 = 30.0;
pub const PLAYER_SPEED: f64 = 5.0;
pub const PLAYER_START_X: f64 = 400.0;
pub const PLAYER_START_Y: f64 = 300.0;
pub const PLAYER_START_HP: u32 = 100;

pub const FRUIT_SIZE: f64 = 15.0;

pub const BOSS_SIZE: f64 = 40.0;
pub const BOSS_HP: i32 = 200;
pub const BOSS_SPEED: f64 = 2.0;

/// Life lost by every particle per tick.
pub const PARTICLE_DECAY: f64 = 0.02;

// ── Factions & realms ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Shadow,
    Claw,
    Light,
    Space,
}

/// Realms are themed after the four factions and share their identifiers.
pub type Realm = Faction;

impl Faction {
    pub const ALL: [Faction; 4] = [Faction::Shadow, Faction::Claw, Faction::Light, Faction::Space];

    /// Parse a faction or realm identifier such as `"claw"` or `"lightFaction"`.
    /// Anything unrecognised falls back to `Shadow`.
    pub fn from_id(id: &str) -> Faction {
        let lower = id.trim().to_ascii_lowercase();
        let id = lower
            .strip_suffix("faction")
            .or_else(|| lower.strip_suffix("realm"))
            .unwrap_or(lower.as_str());
        match id {
            "claw" => Faction::Claw,
            "light" => Faction::Light,
            "space" => Faction::Space,
            _ => Faction::Shadow,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Faction::Shadow => "shadow",
            Faction::Claw => "claw",
            Faction::Light => "light",
            Faction::Space => "space",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Faction::Shadow => "Shadow League",
            Faction::Claw => "C.L.A.W",
            Faction::Light => "Lightly City",
            Faction::Space => "SpaceX Station",
        }
    }
}

// ── Abilities ─────────────────────────────────────────────────────────────────

/// Behavioural category of an ability, independent of its display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    Attack,
    Shield,
    Heal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ability {
    ShadowStrike,
    DarkShield,
    ShadowHeal,
    ClawStrike,
    RageMode,
    BloodHeal,
    LightBeam,
    HolyShield,
    DivineHeal,
    PlasmaShot,
    EnergyShield,
    NanoHeal,
}

// ── Particle effects ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Attack,
    Shield,
    Heal,
    Collect,
    Damage,
    Victory,
    Cast,
}

impl EffectKind {
    /// Number of particles in one burst of this effect.
    pub fn burst_size(self) -> usize {
        match self {
            EffectKind::Attack | EffectKind::Victory => 15,
            EffectKind::Shield
            | EffectKind::Heal
            | EffectKind::Collect
            | EffectKind::Damage
            | EffectKind::Cast => 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Remaining life, 1.0 at birth; the particle is gone once it reaches 0.
    pub life: f64,
    pub decay: f64,
    pub size: f64,
    pub kind: EffectKind,
    /// Realm active when the burst was emitted; selects the colour palette.
    pub faction: Faction,
}

// ── Player, fruit & boss ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub hp: u32,
    pub max_hp: u32,
    pub xp: u32,
    pub level: u32,
    pub faction: Option<Faction>,
    /// Up to three abilities, one per slot.
    pub abilities: Vec<Ability>,
    /// Ability → timestamp (ms) at which it becomes usable again.
    pub cooldowns: HashMap<Ability, u64>,
    /// Timestamp (ms) until which incoming boss damage is ignored.
    pub invulnerable_until: Option<u64>,
}

impl Default for Player {
    fn default() -> Self {
        Player {
            x: PLAYER_START_X,
            y: PLAYER_START_Y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            hp: PLAYER_START_HP,
            max_hp: PLAYER_START_HP,
            xp: 0,
            level: 1,
            faction: None,
            abilities: Vec::new(),
            cooldowns: HashMap::new(),
            invulnerable_until: None,
        }
    }
}

impl Player {
    pub fn is_invulnerable(&self, now: u64) -> bool {
        self.invulnerable_until.is_some_and(|until| now < until)
    }

    /// XP needed to reach the next level.
    pub fn xp_required(&self) -> u32 {
        self.level * 100
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub realm: Realm,
}

impl Fruit {
    pub fn new(x: f64, y: f64, realm: Realm) -> Self {
        Fruit { x, y, width: FRUIT_SIZE, height: FRUIT_SIZE, realm }
    }
}

/// A boss always hunts the session's player; the target is looked up each
/// tick rather than stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f64,
    pub realm: Realm,
    /// Timestamp (ms) of the last melee attack; `None` until the first one.
    pub last_attack: Option<u64>,
}

impl Boss {
    pub fn new(x: f64, y: f64, realm: Realm) -> Self {
        Boss {
            x,
            y,
            width: BOSS_SIZE,
            height: BOSS_SIZE,
            hp: BOSS_HP,
            max_hp: BOSS_HP,
            speed: BOSS_SPEED,
            realm,
            last_attack: None,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Movement keys currently held down.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

// ── Screens & events ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    FactionSelect,
    Game,
    GameOver,
}

/// Something that happened during a transition, queued for the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    FactionChosen { faction: Faction },
    RealmSwitched { realm: Realm },
    CooldownStarted { slot: usize, ability: Ability },
    FruitSpawned,
    BossSpawned,
    FruitCollected,
    BossDefeated,
    PlayerDamaged { damage: u32, hp: u32 },
    DamageBlocked,
    LevelUp { level: u32 },
    GameOver { level: u32 },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session.  Cloneable so pure update functions can return a new
/// copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub screen: Screen,
    pub realm: Realm,
    pub player: Player,
    pub fruits: Vec<Fruit>,
    pub bosses: Vec<Boss>,
    pub particles: Vec<Particle>,
    pub input: InputState,
    pub spawn_timers: SpawnTimers,
    pub playlist: Playlist,
    /// Events produced since the driver last drained the queue.
    pub events: Vec<GameEvent>,
    pub frame: u64,
    pub width: f64,
    pub height: f64,
}

impl GameState {
    /// Fresh session on the faction-select screen.  Spawn timers start
    /// counting from `now`.
    pub fn new(config: &GameConfig, now: u64) -> Self {
        GameState {
            screen: Screen::FactionSelect,
            realm: Faction::Shadow,
            player: Player::default(),
            fruits: Vec::new(),
            bosses: Vec::new(),
            particles: Vec::new(),
            input: InputState::default(),
            spawn_timers: SpawnTimers::new(config, now),
            playlist: Playlist::default(),
            events: Vec::new(),
            frame: 0,
            width: config.canvas_width,
            height: config.canvas_height,
        }
    }

    /// Take every queued event, leaving the queue empty.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
