pub mod abilities;
pub mod audio;
pub mod compute;
pub mod config;
pub mod entities;
pub mod hud;
pub mod session;
pub mod spawner;
