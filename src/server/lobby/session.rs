/// WebSocket session handler for the lobby.
///
/// This actor manages a single client connection: it gates everything behind
/// the Hello handshake, applies the per-session flood guard, relays routable
/// messages to the lobby server, and serializes server messages back out.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::time::{Duration, Instant};

use crate::config::lobby::MAX_MESSAGES_PER_SECOND;
use crate::server::lobby::messages::{ClientWsMessage, Registered, ServerWsMessage, SessionKicked};
use crate::server::lobby::server::{
    Disconnect, LobbyServer, PublishArmy, Register, RequestChallenge, RequestDemoBattle,
    RespondChallenge,
};
use crate::server::ws_error::ws_error_message;

/// One player's WebSocket session. `name` stays None until the lobby confirms
/// registration; until then only Hello is routable.
pub struct PlayerSession {
    pub name: Option<String>,
    pub lobby_addr: Addr<LobbyServer>,
    window_start: Instant,
    messages_this_second: u32,
}

impl PlayerSession {
    pub fn new(lobby_addr: Addr<LobbyServer>) -> Self {
        Self {
            name: None,
            lobby_addr,
            window_start: Instant::now(),
            messages_this_second: 0,
        }
    }

    /// Per-second message counter. Returns true once the cap is exceeded.
    fn flood_exceeded(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.window_start = now;
            self.messages_this_second = 0;
        }
        self.messages_this_second += 1;
        self.messages_this_second > MAX_MESSAGES_PER_SECOND
    }
}

impl Actor for PlayerSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the connection closes. Deregisters from the lobby if the
    /// session ever authenticated.
    fn stopped(&mut self, ctx: &mut Self::Context) {
        if let Some(name) = self.name.take() {
            self.lobby_addr.do_send(Disconnect {
                name,
                addr: ctx.address(),
            });
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PlayerSession {
    /// Handles incoming WebSocket messages from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                if self.flood_exceeded() {
                    ctx.text(ws_error_message("FLOOD", "Too many messages; connection closed."));
                    ctx.close(Some(ws::CloseReason {
                        code: ws::CloseCode::Policy,
                        description: Some("Flooding".into()),
                    }));
                    ctx.stop();
                    return;
                }

                let parsed: ClientWsMessage = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(_) => {
                        ctx.text(ws_error_message("INVALID_MESSAGE", "Invalid client message"));
                        return;
                    }
                };

                match (parsed, self.name.clone()) {
                    (ClientWsMessage::Hello { name }, None) => {
                        self.lobby_addr.do_send(Register {
                            name,
                            addr: ctx.address(),
                        });
                    }
                    (ClientWsMessage::Hello { .. }, Some(_)) => {
                        ctx.text(ws_error_message("ALREADY_REGISTERED", "Hello was already sent"));
                    }
                    (ClientWsMessage::Ping, _) => {
                        // Keep-alive; nothing to do.
                    }
                    (_, None) => {
                        ctx.text(ws_error_message("NOT_AUTHENTICATED", "Send Hello first"));
                    }
                    (ClientWsMessage::SetArmy { army }, Some(name)) => {
                        self.lobby_addr.do_send(PublishArmy { name, army });
                    }
                    (ClientWsMessage::Challenge { opponent_name }, Some(name)) => {
                        self.lobby_addr.do_send(RequestChallenge {
                            from: name,
                            opponent_name,
                        });
                    }
                    (ClientWsMessage::ChallengeResponse { challenger_name, accepted }, Some(name)) => {
                        self.lobby_addr.do_send(RespondChallenge {
                            responder: name,
                            challenger_name,
                            accepted,
                        });
                    }
                    (ClientWsMessage::DemoBattle { army }, Some(name)) => {
                        self.lobby_addr.do_send(RequestDemoBattle { name, army });
                    }
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<Registered> for PlayerSession {
    type Result = ();

    /// The lobby accepted our Hello; remember the name for routing.
    fn handle(&mut self, msg: Registered, _ctx: &mut Self::Context) {
        self.name = Some(msg.name);
    }
}

impl Handler<ServerWsMessage> for PlayerSession {
    type Result = ();

    /// Handles messages sent from the lobby to this session.
    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                // Serialization error: notify client and close connection.
                log::error!("Failed to serialize ServerWsMessage: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Internal server error"));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

impl Handler<SessionKicked> for PlayerSession {
    type Result = ();

    /// The lobby rejected this connection; tell the client and close.
    fn handle(&mut self, msg: SessionKicked, ctx: &mut Self::Context) {
        ctx.text(ws_error_message("KICKED", &msg.reason));
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some(msg.reason.into()),
        }));
        ctx.stop();
    }
}

/// WebSocket endpoint for the lobby. Connections start unauthenticated and
/// must send Hello before anything else is routed.
pub async fn ws_lobby(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(
        PlayerSession::new(data.lobby_addr.clone()),
        &req,
        stream,
    )
}
