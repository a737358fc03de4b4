mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use realm_arcade::abilities::{cast_at, use_ability, ABILITY_COOLDOWN_MS};
use realm_arcade::compute::tick;
use realm_arcade::config::{GameConfig, DEFAULT_BOSS_INTERVAL_MS, DEFAULT_FRUIT_INTERVAL_MS};
use realm_arcade::entities::{Faction, GameEvent, GameState, InputState, Screen};
use realm_arcade::session::{new_session, restart, select_faction, set_input, switch_realm};
use realm_arcade::spawner::pump_spawners;

use display::{Overlay, Viewport};

#[derive(Parser, Debug)]
#[command(name = "realm_arcade")]
#[command(about = "Collect fruit and fight realm bosses with your faction's abilities")]
struct Cli {
    /// Seed for a reproducible session (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation steps per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
    #[arg(long, default_value_t = DEFAULT_FRUIT_INTERVAL_MS)]
    fruit_interval_ms: u64,
    #[arg(long, default_value_t = DEFAULT_BOSS_INTERVAL_MS)]
    boss_interval_ms: u64,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many milliseconds.  Covers terminals that don't emit key-release
/// events: the OS key-repeat rate is ≥ 15 Hz, so the window is always
/// refreshed before expiry while the key is down.
const HOLD_WINDOW_MS: u64 = 133;

/// Returns true if `key` was seen within the last `HOLD_WINDOW_MS`.
fn is_held(key_seen: &HashMap<KeyCode, u64>, key: KeyCode, now: u64) -> bool {
    key_seen
        .get(&key)
        .map(|&last| now.saturating_sub(last) <= HOLD_WINDOW_MS)
        .unwrap_or(false)
}

fn any_held(key_seen: &HashMap<KeyCode, u64>, keys: &[KeyCode], now: u64) -> bool {
    keys.iter().any(|&k| is_held(key_seen, k, now))
}

fn held_input(key_seen: &HashMap<KeyCode, u64>, now: u64) -> InputState {
    InputState {
        up: any_held(key_seen, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], now),
        down: any_held(key_seen, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], now),
        left: any_held(key_seen, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], now),
        right: any_held(key_seen, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], now),
    }
}

/// F1-F4, or Shift+1..4 on terminals that swallow function keys.
fn realm_key(code: KeyCode) -> Option<Faction> {
    match code {
        KeyCode::F(n @ 1..=4) => Faction::ALL.get(n as usize - 1).copied(),
        KeyCode::Char('!') => Some(Faction::Shadow),
        KeyCode::Char('@') => Some(Faction::Claw),
        KeyCode::Char('#') => Some(Faction::Light),
        KeyCode::Char('$') => Some(Faction::Space),
        _ => None,
    }
}

fn digit(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c) => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// UI-side cooldown badges: shown on cast, hidden after the cooldown period
/// by the front end itself.
#[derive(Default)]
struct CooldownBadges {
    hide_at: [Option<u64>; 3],
}

impl CooldownBadges {
    fn show(&mut self, slot: usize, now: u64) {
        if let Some(badge) = slot.checked_sub(1).and_then(|i| self.hide_at.get_mut(i)) {
            *badge = Some(now + ABILITY_COOLDOWN_MS);
        }
    }

    fn visible(&self, now: u64) -> [bool; 3] {
        self.hide_at.map(|hide| hide.is_some_and(|t| now < t))
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PlayerDamaged { damage, hp } => log::debug!("player hit for {damage}, hp {hp}"),
        GameEvent::LevelUp { level } => log::info!("reached level {level}"),
        GameEvent::GameOver { level } => log::info!("session over at level {level}"),
        other => log::trace!("event: {other:?}"),
    }
}

/// Input model: instead of acting on each movement key event individually,
/// we record the time of the last press/repeat event for every key.  Each
/// frame the keys still "fresh" (within `HOLD_WINDOW_MS`) form the held
/// movement snapshot handed to the simulation, so diagonals and casting
/// while moving work together.  One-shot keys (abilities, realms, faction
/// choice, restart) act on their press event.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_budget: Duration,
) -> std::io::Result<()> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let mut state: GameState = new_session(config, now_ms());
    let mut key_seen: HashMap<KeyCode, u64> = HashMap::new();
    let mut badges = CooldownBadges::default();

    loop {
        let frame_start = Instant::now();
        let now = now_ms();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_seen.insert(code, now);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ => {}
                        }
                        state = on_key_press(&state, code, config, now, rng, &mut badges);
                    }
                    KeyEventKind::Repeat => {
                        key_seen.insert(code, now);
                    }
                    KeyEventKind::Release => {
                        key_seen.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) if state.screen == Screen::Game => {
                    let view = Viewport::new(&state)?;
                    if let Some((x, y)) = view.to_canvas(column, row) {
                        state = cast_at(&state, x, y, rng);
                    }
                }
                _ => {}
            }
        }

        state = set_input(&state, held_input(&key_seen, now));
        state = pump_spawners(&state, now, rng);
        state = tick(&state, now, rng);

        for event in state.drain_events() {
            log_event(&event);
            if let GameEvent::CooldownStarted { slot, .. } = event {
                badges.show(slot, now);
            }
        }

        let overlay = Overlay {
            cooldown_badges: badges.visible(now),
            now_ms: now,
            now_playing: state.playlist.current_title(),
        };
        display::render(out, &state, &overlay)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

fn on_key_press(
    state: &GameState,
    code: KeyCode,
    config: &GameConfig,
    now: u64,
    rng: &mut StdRng,
    badges: &mut CooldownBadges,
) -> GameState {
    match state.screen {
        Screen::FactionSelect => match digit(code) {
            Some(n @ 1..=4) => select_faction(state, Faction::ALL[n - 1]),
            _ => state.clone(),
        },
        Screen::Game => {
            if let Some(realm) = realm_key(code) {
                return switch_realm(state, realm);
            }
            match (code, digit(code)) {
                (_, Some(slot @ 1..=3)) => use_ability(state, slot, now, rng),
                (KeyCode::Char('n') | KeyCode::Char('N'), _) => {
                    let mut next = state.clone();
                    next.playlist.on_track_ended();
                    next
                }
                _ => state.clone(),
            }
        }
        Screen::GameOver => match code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                *badges = CooldownBadges::default();
                restart(state, config, now)
            }
            _ => state.clone(),
        },
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Log to stderr; run with RUST_LOG=debug and redirect 2> to a file.
    let _ = env_logger::Builder::from_default_env().try_init();
    let cli = Cli::parse();

    let config = GameConfig {
        fruit_interval_ms: cli.fruit_interval_ms,
        boss_interval_ms: cli.boss_interval_ms,
        ..GameConfig::default()
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_budget = Duration::from_secs(1) / cli.fps.max(1);
    log::info!("starting: {config:?}, {} fps, seed {:?}", cli.fps, cli.seed);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &config, &rx, &mut rng, frame_budget);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("game loop failed")
}
