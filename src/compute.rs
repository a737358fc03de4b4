/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the clock and, where needed, an RNG handle) and returns a
/// brand-new `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{EffectKind, GameEvent, GameState, Particle, Player, Screen, PARTICLE_DECAY};

pub const FRUIT_XP: u32 = 25;
pub const BOSS_XP: u32 = 100;
pub const BOSS_ATTACK_RANGE: f64 = 30.0;
pub const BOSS_ATTACK_DAMAGE: u32 = 15;
pub const BOSS_ATTACK_INTERVAL_MS: u64 = 1_000;
pub const LEVEL_UP_MAX_HP_GAIN: u32 = 20;
pub const PARTICLE_DAMPING: f64 = 0.98;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned box overlap with strict edges: touching boxes do not collide.
pub fn overlaps(
    (ax, ay, aw, ah): (f64, f64, f64, f64),
    (bx, by, bw, bh): (f64, f64, f64, f64),
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

// ── Shared helpers ───────────────────────────────────────────────────────────

/// Spawn one burst of `kind` particles at (x, y), coloured by the current realm.
pub(crate) fn emit_burst(state: &mut GameState, x: f64, y: f64, kind: EffectKind, rng: &mut impl Rng) {
    for _ in 0..kind.burst_size() {
        state.particles.push(Particle {
            x,
            y,
            vx: (rng.gen::<f64>() - 0.5) * 10.0,
            vy: (rng.gen::<f64>() - 0.5) * 10.0,
            life: 1.0,
            decay: PARTICLE_DECAY,
            size: rng.gen::<f64>() * 5.0 + 2.0,
            kind,
            faction: state.realm,
        });
    }
}

/// Resolve pending level-ups, carrying any remainder forward.
/// Returns the number of levels gained.
pub fn level_up(player: &mut Player) -> u32 {
    let mut gained = 0;
    while player.xp >= player.xp_required() {
        player.xp -= player.xp_required();
        player.level += 1;
        player.max_hp += LEVEL_UP_MAX_HP_GAIN;
        player.hp = player.max_hp;
        gained += 1;
    }
    gained
}

fn award_xp(state: &mut GameState, xp: u32) {
    state.player.xp += xp;
    if level_up(&mut state.player) > 0 {
        log::info!("level up: now level {}", state.player.level);
        state.events.push(GameEvent::LevelUp { level: state.player.level });
    }
    refresh_ui(state);
}

/// The UI observed the player: a dead player ends the session.
pub(crate) fn refresh_ui(state: &mut GameState) {
    if state.player.hp == 0 && state.screen == Screen::Game {
        log::info!("game over at level {}", state.player.level);
        state.screen = Screen::GameOver;
        state.events.push(GameEvent::GameOver { level: state.player.level });
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ───────────────────────────

/// Advance the simulation by one frame at time `now` (ms).  Outside the game
/// screen this returns the state unchanged.
pub fn tick(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    if state.screen != Screen::Game {
        return state.clone();
    }
    let mut next = state.clone();
    next.frame += 1;
    log::trace!(
        "tick: frame={} now={}ms particles={}",
        next.frame,
        now,
        next.particles.len()
    );

    move_player(&mut next);
    resolve_fruits(&mut next, rng);
    resolve_bosses(&mut next, now, rng);
    update_particles(&mut next);
    refresh_ui(&mut next);

    next
}

// ── 1. Movement ──────────────────────────────────────────────────────────────

fn move_player(state: &mut GameState) {
    let max_x = state.width - state.player.width;
    let max_y = state.height - state.player.height;
    let p = &mut state.player;
    let input = &state.input;

    if input.up {
        p.y = (p.y - p.speed).max(0.0);
    }
    if input.down {
        p.y = (p.y + p.speed).min(max_y);
    }
    if input.left {
        p.x = (p.x - p.speed).max(0.0);
    }
    if input.right {
        p.x = (p.x + p.speed).min(max_x);
    }
}

// ── 2. Fruit collection ──────────────────────────────────────────────────────

fn resolve_fruits(state: &mut GameState, rng: &mut impl Rng) {
    let p = &state.player;
    let player_box = (p.x, p.y, p.width, p.height);
    let (collected, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.fruits)
        .into_iter()
        .partition(|f| overlaps(player_box, (f.x, f.y, f.width, f.height)));
    state.fruits = kept;

    for fruit in collected {
        award_xp(state, FRUIT_XP);
        emit_burst(state, fruit.x, fruit.y, EffectKind::Collect, rng);
        state.events.push(GameEvent::FruitCollected);
    }
}

// ── 3. Boss AI & combat ──────────────────────────────────────────────────────

fn resolve_bosses(state: &mut GameState, now: u64, rng: &mut impl Rng) {
    let bosses = std::mem::take(&mut state.bosses);
    let mut survivors = Vec::with_capacity(bosses.len());

    for mut boss in bosses {
        if boss.hp <= 0 {
            log::info!("boss defeated in {} realm", boss.realm.id());
            award_xp(state, BOSS_XP);
            let (cx, cy) = boss.center();
            emit_burst(state, cx, cy, EffectKind::Victory, rng);
            state.events.push(GameEvent::BossDefeated);
            continue;
        }

        let dx = state.player.x - boss.x;
        let dy = state.player.y - boss.y;
        let dist = dx.hypot(dy);
        if dist > 0.0 {
            boss.x += dx / dist * boss.speed;
            boss.y += dy / dist * boss.speed;
        }

        let ready = boss
            .last_attack
            .map_or(true, |last| now.saturating_sub(last) >= BOSS_ATTACK_INTERVAL_MS);
        if dist < BOSS_ATTACK_RANGE && ready {
            if state.player.is_invulnerable(now) {
                state.events.push(GameEvent::DamageBlocked);
            } else {
                state.player.hp = state.player.hp.saturating_sub(BOSS_ATTACK_DAMAGE);
                let (px, py) = (state.player.x, state.player.y);
                emit_burst(state, px, py, EffectKind::Damage, rng);
                state.events.push(GameEvent::PlayerDamaged {
                    damage: BOSS_ATTACK_DAMAGE,
                    hp: state.player.hp,
                });
            }
            boss.last_attack = Some(now);
        }

        survivors.push(boss);
    }

    state.bosses = survivors;
}

// ── 4. Particle physics ──────────────────────────────────────────────────────

fn update_particles(state: &mut GameState) {
    for p in state.particles.iter_mut() {
        p.x += p.vx;
        p.y += p.vy;
        p.life -= p.decay;
        p.vx *= PARTICLE_DAMPING;
        p.vy *= PARTICLE_DAMPING;
    }
    state.particles.retain(|p| p.life > 0.0);
}
