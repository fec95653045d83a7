//! HTTP and WebSocket routing configuration.
//!
//! Defines the single lobby endpoint. The connection actor manages the whole
//! session lifecycle from Hello to disconnect.

use actix_web::web;
use crate::server::lobby::session::ws_lobby;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws/lobby")
            .to(ws_lobby)
    );
}
