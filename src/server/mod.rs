// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the main backend server components, including:
//! - Application state management
//! - HTTP/WebSocket routing
//! - Lobby logic (registration, presence, challenge handshake)
//! - Battle delivery (timeline views pushed to each participant)

pub mod state;
pub mod router;
pub mod lobby;
pub mod ws_error;
