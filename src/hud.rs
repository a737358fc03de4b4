/// Values shown by the HUD, derived from the player each frame.

use crate::entities::Player;

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub level_text: String,
    pub hp_text: String,
    /// Fill of the hp bar, 0.0..=100.0.
    pub hp_percent: f64,
    pub xp_text: String,
    /// Fill of the xp bar, 0.0..=100.0.
    pub xp_percent: f64,
}

impl Hud {
    pub fn from_player(player: &Player) -> Self {
        let required = player.xp_required();
        Hud {
            level_text: format!("Level {}", player.level),
            hp_text: format!("{}/{}", player.hp, player.max_hp),
            hp_percent: percent(player.hp, player.max_hp),
            xp_text: format!("{}/{}", player.xp, required),
            xp_percent: percent(player.xp, required),
        }
    }
}

fn percent(value: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (value as f64 / max as f64 * 100.0).clamp(0.0, 100.0)
}
