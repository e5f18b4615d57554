//! Lavalink node lifecycle. These hooks only log.

use lavalink_rs::client::LavalinkClient;
use lavalink_rs::hook;
use lavalink_rs::model::events;

/// Something that happened to the connection with a node.
#[derive(Debug, Clone, PartialEq)]
enum NodeEvent {
    Connected {
        session_id: String,
        resumed: bool,
    },
    Disconnected {
        guild: u64,
        code: u16,
        reason: String,
        by_remote: bool,
    },
}

impl NodeEvent {
    fn message(&self) -> String {
        match self {
            NodeEvent::Connected {
                session_id,
                resumed: true,
            } => format!("Lavalink node reconnected, resumed session {session_id}."),
            NodeEvent::Connected { session_id, .. } => {
                format!("Lavalink node connected with session {session_id}.")
            }
            NodeEvent::Disconnected {
                guild,
                code,
                reason,
                by_remote,
            } => {
                let by = if *by_remote { "Discord" } else { "us" };
                let reason = if reason.is_empty() {
                    "no reason given"
                } else {
                    reason
                };
                format!(
                    "Lavalink node voice socket for guild {guild} closed by {by}. Code {code}: {reason}"
                )
            }
        }
    }

    fn log(&self) {
        match self {
            NodeEvent::Connected { .. } => tracing::info!("{}", self.message()),
            NodeEvent::Disconnected { .. } => tracing::warn!("{}", self.message()),
        }
    }
}

#[hook]
pub(super) async fn ready(client: LavalinkClient, _session_id: String, event: &events::Ready) {
    NodeEvent::Connected {
        session_id: event.session_id.clone(),
        resumed: event.resumed,
    }
    .log();

    // A fresh session means the node forgot every player we had.
    if !event.resumed {
        if let Err(e) = client.delete_all_player_contexts().await {
            tracing::error!("Could not clear stale players: {e}");
        }
    }
}

#[hook]
pub(super) async fn websocket_closed(
    _client: LavalinkClient,
    _session_id: String,
    event: &events::WebSocketClosed,
) {
    NodeEvent::Disconnected {
        guild: event.guild_id.0,
        code: event.code,
        reason: event.reason.clone(),
        by_remote: event.by_remote,
    }
    .log();
}
