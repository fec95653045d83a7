/// Lobby server actor.
///
/// Owns the name -> connection registry, published armies and pending
/// challenges. Handles registration, presence broadcast, the challenge
/// handshake, and hands accepted matches to the battle orchestrator.

use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use log::{info, debug, warn};

use crate::battle::orchestrator::{run_match, synthesize_demo_army, validate_army, MatchReport};
use crate::battle::types::{ArmyConfig, BattleWinner, Team};
use crate::config::demo::DEMO_OPPONENT_NAME;
use crate::config::lobby::{MAX_NAME_LEN, MIN_NAME_LEN};
use crate::server::lobby::messages::{Registered, ServerWsMessage, SessionKicked};
use crate::server::lobby::session::PlayerSession;
use crate::server::lobby::types::ConnectedPlayer;

type SessionAddr = Addr<PlayerSession>;

/// Main lobby server actor.
pub struct LobbyServer {
    /// Authenticated connections, keyed by registered name.
    players: HashMap<String, ConnectedPlayer>,
    /// Open challenge handshakes as (challenger, target) pairs.
    pending_challenges: HashSet<(String, String)>,
}

impl LobbyServer {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            pending_challenges: HashSet::new(),
        }
    }

    /// Send the current presence list to every authenticated connection.
    fn broadcast_presence(&self) {
        let mut users: Vec<String> = self.players.keys().cloned().collect();
        users.sort();
        let msg = ServerWsMessage::Presence { users };
        for player in self.players.values() {
            player.addr.do_send(msg.clone());
        }
    }

    fn send_to(&self, name: &str, msg: ServerWsMessage) {
        if let Some(player) = self.players.get(name) {
            player.addr.do_send(msg);
        }
    }

    /// Map the battle verdict into the tags one participant sees. Side B
    /// receives the mirrored timeline, so its winner tag is swapped too.
    fn winner_for_view(winner: Option<Team>, view: Team) -> BattleWinner {
        match winner {
            None => BattleWinner::Draw,
            Some(team) => {
                let seen = if view == Team::B { team.opponent() } else { team };
                match seen {
                    Team::A => BattleWinner::A,
                    Team::B => BattleWinner::B,
                }
            }
        }
    }

    /// Deliver one resolved match to both participants. The challenger (or
    /// demo player) is side A and gets the canonical timeline; the acceptor
    /// is side B and gets the mirrored view.
    fn deliver_match(&self, report: MatchReport, side_a: &str, side_b: Option<&str>) {
        let match_id = Uuid::new_v4();
        let opponent_of_a = side_b.unwrap_or(DEMO_OPPONENT_NAME);

        self.send_to(side_a, ServerWsMessage::BattleStart {
            match_id,
            you_are: Team::A,
            opponent_name: opponent_of_a.to_string(),
        });
        if let Some(name_b) = side_b {
            self.send_to(name_b, ServerWsMessage::BattleStart {
                match_id,
                you_are: Team::B,
                opponent_name: side_a.to_string(),
            });
        }

        info!(
            "[Lobby] Match {} resolved: {} vs {}, winner={:?}, {} frames",
            match_id,
            side_a,
            opponent_of_a,
            report.winner,
            report.canonical.len()
        );

        self.send_to(side_a, ServerWsMessage::BattleResult {
            match_id,
            winner: Self::winner_for_view(report.winner, Team::A),
            timeline: report.canonical,
        });
        if let Some(name_b) = side_b {
            self.send_to(name_b, ServerWsMessage::BattleResult {
                match_id,
                winner: Self::winner_for_view(report.winner, Team::B),
                timeline: report.mirrored,
            });
        }
    }
}

/// Message: a connection asks to register under a name.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub name: String,
    pub addr: SessionAddr,
}

/// Message: a connection closed (any state).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub name: String,
    pub addr: SessionAddr,
}

/// Message: store the caller's army for later matches.
#[derive(Message)]
#[rtype(result = "()")]
pub struct PublishArmy {
    pub name: String,
    pub army: ArmyConfig,
}

/// Message: challenge another player by name.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RequestChallenge {
    pub from: String,
    pub opponent_name: String,
}

/// Message: accept or decline a received challenge.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RespondChallenge {
    pub responder: String,
    pub challenger_name: String,
    pub accepted: bool,
}

/// Message: run a single-player battle against a synthesized opponent.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RequestDemoBattle {
    pub name: String,
    pub army: ArmyConfig,
}

impl Actor for LobbyServer {
    type Context = Context<Self>;
}

impl Handler<Register> for LobbyServer {
    type Result = ();

    /// Handles a Hello: register the name or reject the connection.
    fn handle(&mut self, msg: Register, _ctx: &mut Self::Context) -> Self::Result {
        let name = msg.name.trim().to_string();
        if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
            msg.addr.do_send(ServerWsMessage::error(
                "INVALID_NAME",
                "Name must be between 2 and 24 characters.",
            ));
            return;
        }

        if let Some(existing) = self.players.get(&name) {
            if existing.addr == msg.addr {
                // Same connection sent Hello twice; keep its registration.
                msg.addr.do_send(ServerWsMessage::error(
                    "ALREADY_REGISTERED",
                    "You are already registered under this name.",
                ));
                return;
            }
            // Duplicate name from another connection: notify and close it.
            warn!("[Lobby] Rejected duplicate name '{}'", name);
            msg.addr.do_send(SessionKicked {
                reason: format!("The name '{}' is already taken.", name),
            });
            return;
        }

        let user_id = Uuid::new_v4();
        self.players.insert(name.clone(), ConnectedPlayer {
            user_id,
            addr: msg.addr.clone(),
            army: None,
        });
        msg.addr.do_send(Registered { name: name.clone() });
        msg.addr.do_send(ServerWsMessage::HelloAck { user_id });
        debug!("[Lobby] Player '{}' joined ({})", name, user_id);
        self.broadcast_presence();
    }
}

impl Handler<Disconnect> for LobbyServer {
    type Result = ();

    /// Handles a closed connection: drop it from the registry, abandon its
    /// pending challenges and republish presence.
    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        // Remove only if the session address matches the registered one.
        match self.players.get(&msg.name) {
            Some(player) if player.addr == msg.addr => {}
            _ => return,
        }
        if let Some(player) = self.players.remove(&msg.name) {
            debug!("[Lobby] Player '{}' left ({})", msg.name, player.user_id);
        }
        self.pending_challenges
            .retain(|(challenger, target)| challenger != &msg.name && target != &msg.name);
        self.broadcast_presence();
    }
}

impl Handler<PublishArmy> for LobbyServer {
    type Result = ();

    /// Handles SetArmy: validate and store. No acknowledgment on success.
    fn handle(&mut self, msg: PublishArmy, _ctx: &mut Self::Context) -> Self::Result {
        if let Err(reason) = validate_army(&msg.army) {
            self.send_to(&msg.name, ServerWsMessage::error("INVALID_ARMY", &reason));
            return;
        }
        if let Some(player) = self.players.get_mut(&msg.name) {
            player.army = Some(msg.army);
            debug!("[Lobby] Player '{}' published an army", msg.name);
        }
    }
}

impl Handler<RequestChallenge> for LobbyServer {
    type Result = ();

    /// Handles a challenge request: notify the target, acknowledge the sender.
    fn handle(&mut self, msg: RequestChallenge, _ctx: &mut Self::Context) -> Self::Result {
        if msg.opponent_name == msg.from {
            self.send_to(&msg.from, ServerWsMessage::challenge_refused("You cannot challenge yourself."));
            return;
        }
        if !self.players.contains_key(&msg.opponent_name) {
            self.send_to(
                &msg.from,
                ServerWsMessage::challenge_refused(&format!("'{}' is not online.", msg.opponent_name)),
            );
            return;
        }

        self.pending_challenges.insert((msg.from.clone(), msg.opponent_name.clone()));
        self.send_to(&msg.opponent_name, ServerWsMessage::ChallengeReceived { from: msg.from.clone() });
        self.send_to(&msg.from, ServerWsMessage::ChallengeResult { success: true, message: None });
        debug!("[Lobby] '{}' challenged '{}'", msg.from, msg.opponent_name);
    }
}

impl Handler<RespondChallenge> for LobbyServer {
    type Result = ();

    /// Handles accept/decline. Accepting with both armies published runs the
    /// battle to completion and delivers both timeline views; anything else
    /// aborts the handshake and leaves both parties in the lobby.
    fn handle(&mut self, msg: RespondChallenge, _ctx: &mut Self::Context) -> Self::Result {
        let key = (msg.challenger_name.clone(), msg.responder.clone());
        if !self.pending_challenges.remove(&key) {
            self.send_to(&msg.responder, ServerWsMessage::error(
                "NO_SUCH_CHALLENGE",
                &format!("No pending challenge from '{}'.", msg.challenger_name),
            ));
            return;
        }

        if !msg.accepted {
            self.send_to(
                &msg.challenger_name,
                ServerWsMessage::challenge_refused(&format!("'{}' declined the challenge.", msg.responder)),
            );
            debug!("[Lobby] '{}' declined '{}'", msg.responder, msg.challenger_name);
            return;
        }

        let challenger_army = self.players.get(&msg.challenger_name).and_then(|p| p.army.clone());
        let responder_army = self.players.get(&msg.responder).and_then(|p| p.army.clone());
        let (Some(army_a), Some(army_b)) = (challenger_army, responder_army) else {
            self.send_to(&msg.responder, ServerWsMessage::error(
                "ARMY_NOT_SET",
                "Both players must publish an army before battling.",
            ));
            self.send_to(
                &msg.challenger_name,
                ServerWsMessage::challenge_refused("Both players must publish an army before battling."),
            );
            return;
        };

        // La bataille se joue entièrement ici, de manière synchrone.
        let report = run_match(&army_a, &army_b);
        self.deliver_match(report, &msg.challenger_name, Some(&msg.responder));
    }
}

impl Handler<RequestDemoBattle> for LobbyServer {
    type Result = ();

    /// Handles a demo battle: synthesize the opponent and run the same
    /// contract as a real match, with the player always on side A.
    fn handle(&mut self, msg: RequestDemoBattle, _ctx: &mut Self::Context) -> Self::Result {
        if let Err(reason) = validate_army(&msg.army) {
            self.send_to(&msg.name, ServerWsMessage::error("INVALID_ARMY", &reason));
            return;
        }
        let opponent = synthesize_demo_army();
        let report = run_match(&msg.army, &opponent);
        self.deliver_match(report, &msg.name, None);
    }
}
