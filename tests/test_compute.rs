use realm_arcade::compute::*;
use realm_arcade::config::GameConfig;
use realm_arcade::entities::*;
use realm_arcade::session::{new_session, select_faction};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A shadow-faction session already in the game screen, player at (400, 300).
fn make_state() -> GameState {
    let s = new_session(&GameConfig::default(), 0);
    let mut s = select_faction(&s, Faction::Shadow);
    s.events.clear();
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn count_kind(s: &GameState, kind: EffectKind) -> usize {
    s.particles.iter().filter(|p| p.kind == kind).count()
}

fn still_particle(life: f64) -> Particle {
    Particle {
        x: 10.0,
        y: 10.0,
        vx: 0.0,
        vy: 0.0,
        life,
        decay: PARTICLE_DECAY,
        size: 4.0,
        kind: EffectKind::Cast,
        faction: Faction::Shadow,
    }
}

// ── tick: screen gating & frame counter ──────────────────────────────────────

#[test]
fn tick_is_identity_outside_game() {
    let mut s = new_session(&GameConfig::default(), 0);
    s.input.right = true;
    s.particles.push(still_particle(1.0));
    let s2 = tick(&s, 100, &mut seeded_rng());
    assert_eq!(s2.player, s.player);
    assert_eq!(s2.particles, s.particles);
    assert_eq!(s2.frame, 0);
}

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.frame, 6);
}

#[test]
fn tick_does_not_mutate_original() {
    let mut s = make_state();
    s.input.left = true;
    let _ = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s.player.x, 400.0);
}

// ── tick: movement ───────────────────────────────────────────────────────────

#[test]
fn move_right_by_speed() {
    let mut s = make_state();
    s.input.right = true;
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.x, 405.0);
    assert_eq!(s2.player.y, 300.0);
}

#[test]
fn diagonal_moves_full_speed_on_both_axes() {
    let mut s = make_state();
    s.input.up = true;
    s.input.left = true;
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.x, 395.0);
    assert_eq!(s2.player.y, 295.0);
}

#[test]
fn move_clamps_at_far_edges() {
    let mut s = make_state();
    s.player.x = 768.0;
    s.player.y = 569.0;
    s.input.right = true;
    s.input.down = true;
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.x, 770.0); // 800 - 30
    assert_eq!(s2.player.y, 570.0); // 600 - 30
}

#[test]
fn move_clamps_at_origin() {
    let mut s = make_state();
    s.player.x = 2.0;
    s.player.y = 0.0;
    s.input.left = true;
    s.input.up = true;
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.x, 0.0);
    assert_eq!(s2.player.y, 0.0);
}

#[test]
fn player_never_leaves_canvas() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for frame in 0..2_000u64 {
        s.input = InputState {
            up: rng.gen_bool(0.5),
            down: rng.gen_bool(0.3),
            left: rng.gen_bool(0.5),
            right: rng.gen_bool(0.3),
        };
        s = tick(&s, frame * 16, &mut rng);
        assert!(s.player.x >= 0.0 && s.player.x <= s.width - s.player.width);
        assert!(s.player.y >= 0.0 && s.player.y <= s.height - s.player.height);
    }
}

// ── overlaps ─────────────────────────────────────────────────────────────────

#[test]
fn overlaps_detects_intersection() {
    assert!(overlaps((100.0, 100.0, 30.0, 30.0), (110.0, 110.0, 15.0, 15.0)));
}

#[test]
fn overlaps_rejects_touching_edges() {
    assert!(!overlaps((100.0, 100.0, 30.0, 30.0), (130.0, 100.0, 15.0, 15.0)));
    assert!(!overlaps((100.0, 100.0, 30.0, 30.0), (100.0, 85.0, 15.0, 15.0)));
}

// ── tick: fruit collection ───────────────────────────────────────────────────

#[test]
fn fruit_collected_on_overlap() {
    let mut s = make_state();
    s.player.x = 100.0;
    s.player.y = 100.0;
    s.fruits.push(Fruit::new(110.0, 110.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert!(s2.fruits.is_empty());
    assert_eq!(s2.player.xp, 25);
    assert_eq!(count_kind(&s2, EffectKind::Collect), 8);
    assert!(s2.events.contains(&GameEvent::FruitCollected));
}

#[test]
fn distant_fruit_persists() {
    let mut s = make_state();
    s.fruits.push(Fruit::new(10.0, 10.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.fruits.len(), 1);
    assert_eq!(s2.player.xp, 0);
}

#[test]
fn fourth_fruit_levels_up() {
    let mut s = make_state();
    s.player.xp = 75;
    s.player.hp = 40;
    s.fruits.push(Fruit::new(405.0, 305.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.level, 2);
    assert_eq!(s2.player.xp, 0);
    assert_eq!(s2.player.max_hp, 120);
    assert_eq!(s2.player.hp, 120);
    assert!(s2.events.contains(&GameEvent::LevelUp { level: 2 }));
}

// ── level_up ─────────────────────────────────────────────────────────────────

#[test]
fn level_up_from_hundred_xp() {
    let mut p = Player::default();
    p.xp = 100;
    assert_eq!(level_up(&mut p), 1);
    assert_eq!(p.level, 2);
    assert_eq!(p.xp, 0);
    assert_eq!(p.max_hp, 120);
    assert_eq!(p.hp, 120);
}

#[test]
fn level_up_carries_remainder() {
    let mut p = Player::default();
    p.xp = 130;
    level_up(&mut p);
    assert_eq!(p.level, 2);
    assert_eq!(p.xp, 30);
}

#[test]
fn level_up_cascades_through_several_levels() {
    // 350 xp: L1 needs 100 → 250 left, L2 needs 200 → 50 left, L3 needs 300
    let mut p = Player::default();
    p.xp = 350;
    assert_eq!(level_up(&mut p), 2);
    assert_eq!(p.level, 3);
    assert_eq!(p.xp, 50);
    assert_eq!(p.max_hp, 140);
    assert_eq!(p.hp, 140);
}

#[test]
fn level_up_noop_below_requirement() {
    let mut p = Player::default();
    p.xp = 99;
    assert_eq!(level_up(&mut p), 0);
    assert_eq!(p.level, 1);
    assert_eq!(p.xp, 99);
}

// ── tick: boss defeat & movement ─────────────────────────────────────────────

#[test]
fn dead_boss_removed_with_victory_burst() {
    let mut s = make_state();
    let mut boss = Boss::new(600.0, 500.0, Faction::Shadow);
    boss.hp = 0;
    s.bosses.push(boss);
    let s2 = tick(&s, 0, &mut seeded_rng());

    assert!(s2.bosses.is_empty());
    // +100 xp at level 1 resolves straight into level 2
    assert_eq!(s2.player.level, 2);
    assert_eq!(s2.player.xp, 0);
    assert_eq!(count_kind(&s2, EffectKind::Victory), 15);
    // Burst centred on (620, 520), then moved once by |v| < 5 per axis
    for p in s2.particles.iter().filter(|p| p.kind == EffectKind::Victory) {
        assert!((p.x - 620.0).abs() <= 5.0);
        assert!((p.y - 520.0).abs() <= 5.0);
    }
    assert!(s2.events.contains(&GameEvent::BossDefeated));
}

#[test]
fn overkilled_boss_also_dies() {
    let mut s = make_state();
    let mut boss = Boss::new(600.0, 500.0, Faction::Shadow);
    boss.hp = -30;
    s.bosses.push(boss);
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert!(s2.bosses.is_empty());
}

#[test]
fn boss_moves_toward_player() {
    let mut s = make_state(); // player at (400, 300)
    s.bosses.push(Boss::new(500.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.bosses[0].x, 498.0);
    assert_eq!(s2.bosses[0].y, 300.0);
}

#[test]
fn boss_on_top_of_player_does_not_move() {
    let mut s = make_state();
    s.bosses.push(Boss::new(400.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.bosses[0].x, 400.0);
    assert_eq!(s2.bosses[0].y, 300.0);
}

// ── tick: boss melee ─────────────────────────────────────────────────────────

#[test]
fn boss_attack_gated_by_interval() {
    let mut s = make_state();
    let mut boss = Boss::new(410.0, 300.0, Faction::Shadow);
    boss.last_attack = Some(500);
    s.bosses.push(boss);

    let s2 = tick(&s, 2_000, &mut seeded_rng());
    assert_eq!(s2.player.hp, 85);
    assert_eq!(s2.bosses[0].last_attack, Some(2_000));
    assert_eq!(count_kind(&s2, EffectKind::Damage), 8);

    // Same timestamp again: no second hit
    let s3 = tick(&s2, 2_000, &mut seeded_rng());
    assert_eq!(s3.player.hp, 85);

    // Just short of a second later: still nothing
    let s4 = tick(&s3, 2_999, &mut seeded_rng());
    assert_eq!(s4.player.hp, 85);

    let s5 = tick(&s4, 3_000, &mut seeded_rng());
    assert_eq!(s5.player.hp, 70);
}

#[test]
fn fresh_boss_attacks_immediately() {
    let mut s = make_state();
    s.bosses.push(Boss::new(420.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.hp, 85);
    assert_eq!(s2.bosses[0].last_attack, Some(0));
    assert!(s2.events.contains(&GameEvent::PlayerDamaged { damage: 15, hp: 85 }));
}

#[test]
fn boss_out_of_reach_does_not_attack() {
    let mut s = make_state();
    s.bosses.push(Boss::new(430.0, 300.0, Faction::Shadow)); // exactly 30 away
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.hp, 100);
    assert_eq!(s2.bosses[0].last_attack, None);
}

#[test]
fn invulnerable_player_blocks_hit_but_boss_resets_timer() {
    let mut s = make_state();
    s.player.invulnerable_until = Some(5_000);
    s.bosses.push(Boss::new(410.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 1_000, &mut seeded_rng());
    assert_eq!(s2.player.hp, 100);
    assert_eq!(s2.bosses[0].last_attack, Some(1_000));
    assert_eq!(count_kind(&s2, EffectKind::Damage), 0);
    assert!(s2.events.contains(&GameEvent::DamageBlocked));
}

#[test]
fn shield_expiry_is_exclusive() {
    let mut s = make_state();
    s.player.invulnerable_until = Some(1_000);
    s.bosses.push(Boss::new(410.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 1_000, &mut seeded_rng());
    assert_eq!(s2.player.hp, 85);
}

// ── tick: game over ──────────────────────────────────────────────────────────

#[test]
fn lethal_hit_ends_game() {
    let mut s = make_state();
    s.player.hp = 10;
    s.bosses.push(Boss::new(410.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.player.hp, 0); // saturates, never wraps
    assert_eq!(s2.screen, Screen::GameOver);
    assert!(s2.events.contains(&GameEvent::GameOver { level: 1 }));
}

#[test]
fn game_over_freezes_simulation() {
    let mut s = make_state();
    s.player.hp = 15;
    s.bosses.push(Boss::new(410.0, 300.0, Faction::Shadow));
    let s2 = tick(&s, 0, &mut seeded_rng());
    assert_eq!(s2.screen, Screen::GameOver);
    let s3 = tick(&s2, 5_000, &mut seeded_rng());
    assert_eq!(s3.bosses, s2.bosses);
    assert_eq!(s3.frame, s2.frame);
}

// ── tick: particles ──────────────────────────────────────────────────────────

#[test]
fn particle_moves_and_damps() {
    let mut s = make_state();
    let mut p = still_particle(1.0);
    p.vx = 1.0;
    p.vy = -2.0;
    s.particles.push(p);
    let s2 = tick(&s, 0, &mut seeded_rng());
    let p2 = &s2.particles[0];
    assert_eq!(p2.x, 11.0);
    assert_eq!(p2.y, 8.0);
    assert!((p2.vx - 0.98).abs() < 1e-12);
    assert!((p2.vy + 1.96).abs() < 1e-12);
    assert!((p2.life - 0.98).abs() < 1e-12);
}

#[test]
fn particle_expires_after_fifty_ticks() {
    let mut s = make_state();
    s.particles.push(still_particle(1.0));
    let mut rng = seeded_rng();
    for _ in 0..49 {
        s = tick(&s, 0, &mut rng);
    }
    assert_eq!(s.particles.len(), 1);
    s = tick(&s, 0, &mut rng);
    assert!(s.particles.is_empty());
}
