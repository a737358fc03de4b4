/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The 800×600 canvas is scaled into the
/// play area between the border rows.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal,
    QueueableCommand,
};
use realm_arcade::entities::{
    Boss, EffectKind, Faction, Fruit, GameState, Particle, Screen,
};
use realm_arcade::hud::Hud;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_LEVEL: Color = Color::Yellow;
const C_HUD_HP: Color = Color::Red;
const C_HUD_XP: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_HP_BAR_BACK: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const C_HP_BAR_FILL: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const C_PLAYER_UNALIGNED: Color = Color::Rgb { r: 0x00, g: 0x66, b: 0xcc };

const fn hex(rgb: u32) -> Color {
    Color::Rgb {
        r: (rgb >> 16) as u8,
        g: (rgb >> 8) as u8,
        b: rgb as u8,
    }
}

fn particle_color(faction: Faction, kind: EffectKind) -> Color {
    match (faction, kind) {
        (_, EffectKind::Heal) => hex(0x32cd32),
        (_, EffectKind::Collect) => hex(0xffd700),
        (_, EffectKind::Damage) => hex(0xff0000),
        (_, EffectKind::Victory) => hex(0x00ff00),
        (Faction::Shadow, EffectKind::Attack) => hex(0x8b00ff),
        (Faction::Shadow, EffectKind::Shield) => hex(0x4b0082),
        (Faction::Shadow, EffectKind::Cast) => hex(0x9370db),
        (Faction::Claw, EffectKind::Attack | EffectKind::Cast) => hex(0xdc143c),
        (Faction::Claw, EffectKind::Shield) => hex(0xb22222),
        (Faction::Light, EffectKind::Attack | EffectKind::Cast) => hex(0xffd700),
        (Faction::Light, EffectKind::Shield) => hex(0xffff00),
        (Faction::Space, EffectKind::Attack | EffectKind::Cast) => hex(0x8a2be2),
        (Faction::Space, EffectKind::Shield) => hex(0x4b0082),
    }
}

fn fruit_color(realm: Faction) -> Color {
    match realm {
        Faction::Shadow => hex(0x8b00ff),
        Faction::Claw => hex(0xdc143c),
        Faction::Light => hex(0xffd700),
        Faction::Space => hex(0x8a2be2),
    }
}

fn player_color(faction: Faction) -> Color {
    match faction {
        Faction::Shadow => hex(0x4b0082),
        Faction::Claw => hex(0x8b0000),
        Faction::Light => hex(0xff8c00),
        Faction::Space => hex(0x1e3c72),
    }
}

fn boss_color(realm: Faction) -> Color {
    match realm {
        Faction::Shadow => hex(0x2f1b14),
        Faction::Claw => hex(0x4b0000),
        Faction::Light => hex(0xff4500),
        Faction::Space => hex(0x191970),
    }
}

// ── Front-end state the core does not own ─────────────────────────────────────

/// Things only the UI layer tracks.
pub struct Overlay<'a> {
    /// Per ability slot: is the cooldown badge currently shown?
    pub cooldown_badges: [bool; 3],
    /// Driver clock in milliseconds, for blinking effects.
    pub now_ms: u64,
    pub now_playing: Option<&'a str>,
}

/// Maps canvas coordinates onto terminal cells inside the border.
#[derive(Clone, Copy)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    canvas_w: f64,
    canvas_h: f64,
}

/// First terminal row of the play area (row 0 is the HUD, row 1 the border).
const PLAY_TOP: u16 = 2;

impl Viewport {
    pub fn new(state: &GameState) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Viewport { cols, rows, canvas_w: state.width, canvas_h: state.height })
    }

    fn play_cols(&self) -> f64 {
        self.cols.saturating_sub(2).max(1) as f64
    }

    fn play_rows(&self) -> f64 {
        self.rows.saturating_sub(4).max(1) as f64
    }

    /// Canvas point → terminal cell.
    pub fn to_cell(&self, x: f64, y: f64) -> (u16, u16) {
        let col = (x / self.canvas_w * self.play_cols()).floor().clamp(0.0, self.play_cols() - 1.0);
        let row = (y / self.canvas_h * self.play_rows()).floor().clamp(0.0, self.play_rows() - 1.0);
        (col as u16 + 1, row as u16 + PLAY_TOP)
    }

    /// Terminal cell → canvas point at the cell's centre, or `None` when the
    /// cell lies outside the play area.
    pub fn to_canvas(&self, col: u16, row: u16) -> Option<(f64, f64)> {
        if col < 1 || row < PLAY_TOP {
            return None;
        }
        let c = (col - 1) as f64;
        let r = (row - PLAY_TOP) as f64;
        if c >= self.play_cols() || r >= self.play_rows() {
            return None;
        }
        Some((
            (c + 0.5) / self.play_cols() * self.canvas_w,
            (r + 0.5) / self.play_rows() * self.canvas_h,
        ))
    }

    /// Cell span covered by a canvas rectangle; never smaller than one cell.
    fn span(&self, x: f64, y: f64, w: f64, h: f64) -> (u16, u16, u16, u16) {
        let (c0, r0) = self.to_cell(x, y);
        let (c1, r1) = self.to_cell(x + w - 0.001, y + h - 0.001);
        (c0, r0, c1.max(c0) - c0 + 1, r1.max(r0) - r0 + 1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for whichever screen is active.
pub fn render<W: Write>(out: &mut W, state: &GameState, overlay: &Overlay) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let view = Viewport::new(state)?;

    match state.screen {
        Screen::FactionSelect => draw_faction_select(out, &view)?,
        Screen::Game => draw_game(out, state, overlay, &view)?,
        Screen::GameOver => {
            draw_game(out, state, overlay, &view)?;
            draw_game_over(out, state, &view)?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_game<W: Write>(
    out: &mut W,
    state: &GameState,
    overlay: &Overlay,
    view: &Viewport,
) -> std::io::Result<()> {
    draw_border(out, view)?;
    draw_hud(out, state, overlay, view)?;

    for particle in &state.particles {
        draw_particle(out, particle, view)?;
    }
    for fruit in &state.fruits {
        draw_fruit(out, fruit, view)?;
    }
    draw_player(out, state, overlay, view)?;
    for boss in &state.bosses {
        draw_boss(out, boss, view)?;
    }

    draw_controls_hint(out, state, overlay, view)
}

// ── Faction select ────────────────────────────────────────────────────────────

fn draw_faction_select<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let cy = view.rows / 2;

    let title = "REALM  ARCADE";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Choose your faction:"))?;

    for (i, faction) in Faction::ALL.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(player_color(*faction)))?;
        out.queue(Print("█ "))?;
        out.queue(style::SetForegroundColor(fruit_color(*faction)))?;
        out.queue(Print(format!("{:<16}", faction.display_name())))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 5))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("1-4 : Choose   Q : Quit"))?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in PLAY_TOP..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled.min(width)), "░".repeat(width - filled.min(width)))
}

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    overlay: &Overlay,
    view: &Viewport,
) -> std::io::Result<()> {
    let hud = Hud::from_player(&state.player);

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("{:<9}", hud.level_text)))?;

    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!(" HP {} {:>7}", bar(hud.hp_percent, 10), hud.hp_text)))?;

    out.queue(style::SetForegroundColor(C_HUD_XP))?;
    out.queue(Print(format!("  XP {} {:>7}", bar(hud.xp_percent, 10), hud.xp_text)))?;

    // Realm and now-playing, right-aligned
    let mut right = format!("[{}]", state.realm.display_name());
    if let Some(track) = overlay.now_playing {
        right = format!("♪ {track}  {right}");
    }
    let rx = view.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(fruit_color(state.realm)))?;
    out.queue(Print(right))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fill_rect<W: Write>(
    out: &mut W,
    (col, row, w, h): (u16, u16, u16, u16),
    glyph: &str,
) -> std::io::Result<()> {
    let line = glyph.repeat(w as usize);
    for r in row..row + h {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_particle<W: Write>(out: &mut W, p: &Particle, view: &Viewport) -> std::io::Result<()> {
    let radius = p.size * p.life;
    let glyph = if radius > 4.0 {
        "●"
    } else if radius > 2.0 {
        "•"
    } else {
        "·"
    };
    let (col, row) = view.to_cell(p.x, p.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(particle_color(p.faction, p.kind)))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_fruit<W: Write>(out: &mut W, fruit: &Fruit, view: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(fruit_color(fruit.realm)))?;
    out.queue(style::SetAttribute(Attribute::Bold))?;
    fill_rect(out, view.span(fruit.x, fruit.y, fruit.width, fruit.height), "■")?;
    out.queue(style::SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    state: &GameState,
    overlay: &Overlay,
    view: &Viewport,
) -> std::io::Result<()> {
    let p = &state.player;
    let color = p.faction.map_or(C_PLAYER_UNALIGNED, player_color);
    // Pulse between solid and shaded while shielded
    let glyph = if p.is_invulnerable(overlay.now_ms)
        && (overlay.now_ms as f64 * 0.01).sin() < 0.0
    {
        "▒"
    } else {
        "█"
    };
    out.queue(style::SetForegroundColor(color))?;
    fill_rect(out, view.span(p.x, p.y, p.width, p.height), glyph)
}

fn draw_boss<W: Write>(out: &mut W, boss: &Boss, view: &Viewport) -> std::io::Result<()> {
    let span @ (col, row, w, _) = view.span(boss.x, boss.y, boss.width, boss.height);
    out.queue(style::SetForegroundColor(boss_color(boss.realm)))?;
    fill_rect(out, span, "▓")?;

    // Two-layer hp bar on the row above
    if row > PLAY_TOP {
        let ratio = (boss.hp.max(0) as f64 / boss.max_hp as f64).clamp(0.0, 1.0);
        let filled = (ratio * w as f64).round() as u16;
        out.queue(cursor::MoveTo(col, row - 1))?;
        out.queue(style::SetForegroundColor(C_HP_BAR_FILL))?;
        out.queue(Print("▄".repeat(filled as usize)))?;
        out.queue(style::SetForegroundColor(C_HP_BAR_BACK))?;
        out.queue(Print("▄".repeat((w - filled) as usize)))?;
    }
    Ok(())
}

// ── Controls hint & ability slots (last row) ──────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    overlay: &Overlay,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    for (i, ability) in state.player.abilities.iter().enumerate() {
        let cooling = overlay.cooldown_badges.get(i).copied().unwrap_or(false);
        out.queue(style::SetForegroundColor(if cooling { C_HINT } else { Color::White }))?;
        let badge = if cooling { " ⌛" } else { "" };
        out.queue(Print(format!("[{}] {}{}  ", i + 1, ability.display_name(), badge)))?;
    }
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD : Move   F1-F4 : Realm   Click : Cast   N : Next track   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let level_line = format!("Reached Level {}", state.player.level);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (level_line.as_str(), Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
