/// Main configuration module.
///
/// Re-exports submodules for battle, lobby and demo configuration.
pub mod battle;
pub mod lobby;
pub mod demo;
