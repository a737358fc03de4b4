/// Tunables for one game session.

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
pub const DEFAULT_FRUIT_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_BOSS_INTERVAL_MS: u64 = 15_000;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Logical play-field size in world units.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Period between fruit spawn attempts.
    pub fruit_interval_ms: u64,
    /// Period between boss spawn attempts.
    pub boss_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            fruit_interval_ms: DEFAULT_FRUIT_INTERVAL_MS,
            boss_interval_ms: DEFAULT_BOSS_INTERVAL_MS,
        }
    }
}
