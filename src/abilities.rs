/// Faction abilities: lookup tables, cooldown gating and the three archetype
/// effects.  Every public transition is pure and returns a new `GameState`.

use rand::Rng;

use crate::compute::{emit_burst, refresh_ui};
use crate::entities::{
    Ability, Archetype, EffectKind, Faction, GameEvent, GameState, Screen,
};

/// Every ability shares the same cooldown.
pub const ABILITY_COOLDOWN_MS: u64 = 3_000;
pub const SHIELD_DURATION_MS: u64 = 2_000;
pub const ATTACK_RANGE: f64 = 100.0;
pub const ATTACK_DAMAGE: i32 = 50;
pub const HEAL_AMOUNT: u32 = 30;

// ── Tables ───────────────────────────────────────────────────────────────────

/// The attack, shield and heal ability of each faction, in slot order.
pub fn faction_abilities(faction: Faction) -> [Ability; 3] {
    match faction {
        Faction::Shadow => [Ability::ShadowStrike, Ability::DarkShield, Ability::ShadowHeal],
        Faction::Claw => [Ability::ClawStrike, Ability::RageMode, Ability::BloodHeal],
        Faction::Light => [Ability::LightBeam, Ability::HolyShield, Ability::DivineHeal],
        Faction::Space => [Ability::PlasmaShot, Ability::EnergyShield, Ability::NanoHeal],
    }
}

impl Ability {
    pub fn archetype(self) -> Archetype {
        match self {
            Ability::ShadowStrike
            | Ability::ClawStrike
            | Ability::LightBeam
            | Ability::PlasmaShot => Archetype::Attack,
            Ability::DarkShield
            | Ability::RageMode
            | Ability::HolyShield
            | Ability::EnergyShield => Archetype::Shield,
            Ability::ShadowHeal
            | Ability::BloodHeal
            | Ability::DivineHeal
            | Ability::NanoHeal => Archetype::Heal,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Ability::ShadowStrike => "Shadow Strike",
            Ability::DarkShield => "Dark Shield",
            Ability::ShadowHeal => "Shadow Heal",
            Ability::ClawStrike => "Claw Strike",
            Ability::RageMode => "Rage Mode",
            Ability::BloodHeal => "Blood Heal",
            Ability::LightBeam => "Light Beam",
            Ability::HolyShield => "Holy Shield",
            Ability::DivineHeal => "Divine Heal",
            Ability::PlasmaShot => "Plasma Shot",
            Ability::EnergyShield => "Energy Shield",
            Ability::NanoHeal => "Nano Heal",
        }
    }
}

// ── Cooldowns ────────────────────────────────────────────────────────────────

/// True while `ability` cannot be cast yet.
pub fn on_cooldown(state: &GameState, ability: Ability, now: u64) -> bool {
    state
        .player
        .cooldowns
        .get(&ability)
        .is_some_and(|&expiry| now < expiry)
}

// ── Casting ──────────────────────────────────────────────────────────────────

/// Cast the ability bound to `slot` (1..=3).
///
/// Silently does nothing outside the game screen, for an empty slot, or
/// while the ability is cooling down.
pub fn use_ability(state: &GameState, slot: usize, now: u64, rng: &mut impl Rng) -> GameState {
    if state.screen != Screen::Game {
        return state.clone();
    }
    let Some(&ability) = slot
        .checked_sub(1)
        .and_then(|i| state.player.abilities.get(i))
    else {
        return state.clone();
    };
    if on_cooldown(state, ability, now) {
        return state.clone();
    }

    let mut next = state.clone();
    next.player.cooldowns.insert(ability, now + ABILITY_COOLDOWN_MS);
    log::debug!("cast {} from slot {slot}", ability.display_name());

    match ability.archetype() {
        Archetype::Attack => attack(&mut next, rng),
        Archetype::Shield => shield(&mut next, now, rng),
        Archetype::Heal => heal(&mut next, rng),
    }

    next.events.push(GameEvent::CooldownStarted { slot, ability });
    next
}

/// Cosmetic burst where the pointer was clicked.
pub fn cast_at(state: &GameState, x: f64, y: f64, rng: &mut impl Rng) -> GameState {
    if state.screen != Screen::Game {
        return state.clone();
    }
    let mut next = state.clone();
    emit_burst(&mut next, x, y, EffectKind::Cast, rng);
    next
}

// ── Archetype effects ────────────────────────────────────────────────────────

/// Flat damage to every boss in range, measured corner to corner.
fn attack(state: &mut GameState, rng: &mut impl Rng) {
    let (px, py) = (state.player.x, state.player.y);
    let mut hits = Vec::new();
    for boss in state.bosses.iter_mut() {
        let dist = (boss.x - px).hypot(boss.y - py);
        if dist < ATTACK_RANGE {
            boss.hp -= ATTACK_DAMAGE;
            hits.push(boss.center());
        }
    }
    for (x, y) in hits {
        emit_burst(state, x, y, EffectKind::Attack, rng);
    }
}

/// A later shield extends the window; an earlier one never cuts it short.
fn shield(state: &mut GameState, now: u64, rng: &mut impl Rng) {
    let until = now + SHIELD_DURATION_MS;
    state.player.invulnerable_until = Some(
        state
            .player
            .invulnerable_until
            .map_or(until, |current| current.max(until)),
    );
    let (x, y) = (state.player.x, state.player.y);
    emit_burst(state, x, y, EffectKind::Shield, rng);
}

fn heal(state: &mut GameState, rng: &mut impl Rng) {
    let player = &mut state.player;
    player.hp = (player.hp + HEAL_AMOUNT).min(player.max_hp);
    refresh_ui(state);
    let (x, y) = (state.player.x, state.player.y);
    emit_burst(state, x, y, EffectKind::Heal, rng);
}
