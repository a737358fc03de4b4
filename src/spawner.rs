/// Time-gated creation of fruits and bosses.
///
/// Spawning runs on its own millisecond clock, independent of the frame
/// rate.  The timers live inside the session, so a restarted session always
/// starts with fresh timers.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Boss, Fruit, GameEvent, GameState, Screen, BOSS_SIZE, FRUIT_SIZE};

// ── Timers ───────────────────────────────────────────────────────────────────

/// A fixed-period timer that remembers when it is next due.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    pub period_ms: u64,
    pub next_due: u64,
}

impl Interval {
    pub fn new(period_ms: u64, now: u64) -> Self {
        let period_ms = period_ms.max(1);
        Interval { period_ms, next_due: now + period_ms }
    }

    /// Number of periods that elapsed up to `now`; reschedules past them.
    pub fn fire(&mut self, now: u64) -> u64 {
        if now < self.next_due {
            return 0;
        }
        let fired = (now - self.next_due) / self.period_ms + 1;
        self.next_due += fired * self.period_ms;
        fired
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTimers {
    pub fruit: Interval,
    pub boss: Interval,
}

impl SpawnTimers {
    pub fn new(config: &GameConfig, now: u64) -> Self {
        SpawnTimers {
            fruit: Interval::new(config.fruit_interval_ms, now),
            boss: Interval::new(config.boss_interval_ms, now),
        }
    }
}

// ── Spawns (pure) ────────────────────────────────────────────────────────────

/// Add one fruit at a random spot, typed to the current realm.
/// No-op outside the game screen.
pub fn spawn_fruit(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    push_fruit(&mut next, rng);
    next
}

/// Add a boss unless one is already hunting the player.
/// No-op outside the game screen.
pub fn spawn_boss(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    push_boss(&mut next, rng);
    next
}

/// Fire every spawn timer that has come due by `now`.
pub fn pump_spawners(state: &GameState, now: u64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    for _ in 0..next.spawn_timers.fruit.fire(now) {
        push_fruit(&mut next, rng);
    }
    for _ in 0..next.spawn_timers.boss.fire(now) {
        push_boss(&mut next, rng);
    }
    next
}

fn push_fruit(state: &mut GameState, rng: &mut impl Rng) {
    if state.screen != Screen::Game {
        return;
    }
    let x = random_coord(rng, state.width - FRUIT_SIZE);
    let y = random_coord(rng, state.height - FRUIT_SIZE);
    state.fruits.push(Fruit::new(x, y, state.realm));
    state.events.push(GameEvent::FruitSpawned);
}

fn push_boss(state: &mut GameState, rng: &mut impl Rng) {
    if state.screen != Screen::Game || !state.bosses.is_empty() {
        return;
    }
    let x = random_coord(rng, state.width - BOSS_SIZE);
    let y = random_coord(rng, state.height - BOSS_SIZE);
    log::info!("boss spawned in {} realm at ({x:.0}, {y:.0})", state.realm.id());
    state.bosses.push(Boss::new(x, y, state.realm));
    state.events.push(GameEvent::BossSpawned);
}

/// Uniform in `[0, max)`; collapses to 0 for a canvas smaller than the entity.
fn random_coord(rng: &mut impl Rng, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}
