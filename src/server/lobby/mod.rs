pub mod server;
pub mod session;
pub mod messages;
pub mod types;

pub use server::LobbyServer;
