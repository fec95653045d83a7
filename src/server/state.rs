// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the address of the lobby server actor, the single owner of all
//! cross-connection state. Shared with HTTP/WebSocket handlers.

use actix::Addr;
use crate::server::lobby::server::LobbyServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the lobby server actor (registry, presence, challenges).
    pub lobby_addr: Addr<LobbyServer>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(lobby_addr: Addr<LobbyServer>) -> Self {
        AppState { lobby_addr }
    }
}
