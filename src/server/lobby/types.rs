use actix::Addr;
use uuid::Uuid;

use crate::battle::types::ArmyConfig;
use crate::server::lobby::session::PlayerSession;

/// Registry record for one authenticated connection: identity, session
/// address, and the army published for later matches (if any).
#[derive(Clone)]
pub struct ConnectedPlayer {
    pub user_id: Uuid,
    pub addr: Addr<PlayerSession>,
    pub army: Option<ArmyConfig>,
}
