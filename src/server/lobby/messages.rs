use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::battle::types::{ArmyConfig, BattleFrame, BattleWinner, Team};

/// Messages a client may send over the lobby WebSocket.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ClientWsMessage {
    Hello { name: String },
    SetArmy { army: ArmyConfig },
    Challenge { opponent_name: String },
    ChallengeResponse { challenger_name: String, accepted: bool },
    DemoBattle { army: ArmyConfig },
    Ping,
}

// Message serveur -> client
#[derive(Message, Serialize, Deserialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    HelloAck {
        user_id: Uuid,
    },
    Presence {
        users: Vec<String>,
    },
    ChallengeReceived {
        from: String,
    },
    ChallengeResult {
        success: bool,
        message: Option<String>,
    },
    BattleStart {
        match_id: Uuid,
        you_are: Team,
        opponent_name: String,
    },
    BattleResult {
        match_id: Uuid,
        winner: BattleWinner,
        timeline: Vec<BattleFrame>,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerWsMessage {
    pub fn error(code: &str, message: &str) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn challenge_refused(message: &str) -> Self {
        Self::ChallengeResult {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Confirms a successful Hello back to the session actor so it can start
/// routing subsequent messages under its registered name.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct Registered {
    pub name: String,
}

/// Orders a session actor to notify its client and close the connection.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct SessionKicked {
    pub reason: String,
}
