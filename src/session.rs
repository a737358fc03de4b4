/// Screen state machine: faction select → game → game over → restart.

use crate::abilities::faction_abilities;
use crate::config::GameConfig;
use crate::entities::{Faction, GameEvent, GameState, InputState, Realm, Screen};

/// Start a brand-new session on the faction-select screen.
pub fn new_session(config: &GameConfig, now: u64) -> GameState {
    GameState::new(config, now)
}

/// Join `faction` and enter its realm.  Only valid on the faction-select screen.
pub fn select_faction(state: &GameState, faction: Faction) -> GameState {
    if state.screen != Screen::FactionSelect {
        return state.clone();
    }
    log::info!("faction chosen: {}", faction.display_name());

    let mut next = state.clone();
    next.player.faction = Some(faction);
    next.player.abilities = faction_abilities(faction).to_vec();
    next.screen = Screen::Game;
    next.events.push(GameEvent::FactionChosen { faction });
    enter_realm(&mut next, faction);
    next
}

/// Move to another realm mid-game.  Entities are wiped; the player's level,
/// hp, xp and abilities carry over.
pub fn switch_realm(state: &GameState, realm: Realm) -> GameState {
    if state.screen != Screen::Game {
        return state.clone();
    }
    let mut next = state.clone();
    enter_realm(&mut next, realm);
    next
}

/// Throw the finished session away and build a fresh one.  Only valid once
/// the game is over.
pub fn restart(state: &GameState, config: &GameConfig, now: u64) -> GameState {
    if state.screen != Screen::GameOver {
        return state.clone();
    }
    log::info!("restarting session");
    new_session(config, now)
}

/// Replace the held-movement-key snapshot.
pub fn set_input(state: &GameState, input: InputState) -> GameState {
    GameState { input, ..state.clone() }
}

fn enter_realm(state: &mut GameState, realm: Realm) {
    log::debug!("entering {} realm", realm.id());
    state.realm = realm;
    state.fruits.clear();
    state.bosses.clear();
    state.particles.clear();
    state.events.push(GameEvent::RealmSwitched { realm });
}
