//! Global state machine.
//!
//! Everything a session spawns is tagged `DespawnOnExit(GameState::InGame)`.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}
