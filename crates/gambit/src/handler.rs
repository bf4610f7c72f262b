//! Per-connection handler: command decoding, auth, and routing.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that owns the outbound half. The flow is:
//!   1. Spawn the writer, which drains the connection's message channel
//!   2. Loop: receive a frame → decode → authenticate → dispatch to the
//!      game's coordinator
//!   3. On close, tell every joined coordinator the connection is gone
//!
//! The idle timeout only guards connections that have not joined a game.
//! Once joined, a client may stay silent indefinitely: observers never
//! send anything, and a player may think for as long as they like.
//!
//! Coordinators never touch the socket. They push [`ServerMessage`]s into
//! the channel and the writer does the I/O, so a slow client only ever
//! delays itself.

use std::collections::HashMap;
use std::sync::Arc;

use gambit_protocol::{Codec, Command, CommandEnvelope, ErrorKind, GameId, Identity, ServerMessage};
use gambit_room::{CoordinatorHandle, RoomError};
use gambit_session::{Authenticator, GameStore};
use gambit_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GambitError;
use crate::server::ServerState;

/// A game this connection has joined: the coordinator to talk to and the
/// identity it joined as.
struct Joined {
    handle: CoordinatorHandle,
    identity: Identity,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, S, C>>,
) -> Result<(), GambitError>
where
    A: Authenticator,
    S: GameStore,
    C: Codec,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::info!(%conn_id, peer = %conn.peer_addr(), "connection opened");

    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_loop(Arc::clone(&conn), rx, Arc::clone(&state)));

    let mut joined: HashMap<GameId, Joined> = HashMap::new();

    loop {
        let received = if joined.is_empty() {
            tokio::time::timeout(state.idle_timeout, conn.recv()).await
        } else {
            Ok(conn.recv().await)
        };
        let text = match received {
            Ok(Ok(Some(text))) => text,
            Ok(Ok(None)) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection never joined a game, closing");
                break;
            }
        };

        let envelope: CommandEnvelope = match state.codec.decode(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode command");
                let _ = tx.send(ServerMessage::error(
                    ErrorKind::MalformedCommand,
                    format!("error: {e}"),
                ));
                continue;
            }
        };

        let game_id = envelope.game_id;
        let command = envelope.command.name();
        if let Err(e) = execute(&state, conn_id, &tx, &mut joined, envelope).await {
            tracing::debug!(%conn_id, %game_id, command, error = %e, "command rejected");
            let _ = tx.send(e.to_server_message());
        }
    }

    for (game_id, entry) in joined {
        if let Err(e) = entry.handle.disconnect(conn_id).await {
            tracing::debug!(%conn_id, %game_id, error = %e, "disconnect not delivered");
        }
    }

    // Coordinators may still hold clones of `tx`; the socket is going
    // away regardless, so stop the writer instead of waiting on them.
    drop(tx);
    writer.abort();
    // After a client-initiated close the socket is already shut.
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close after shutdown");
    }
    Ok(())
}

/// Authenticates one command and hands it to the right coordinator.
///
/// Every failure comes back as a [`RoomError`] so the caller can turn it
/// into an `ERROR` for this connection alone.
async fn execute<A, S, C>(
    state: &ServerState<A, S, C>,
    conn_id: ConnectionId,
    tx: &mpsc::UnboundedSender<ServerMessage>,
    joined: &mut HashMap<GameId, Joined>,
    envelope: CommandEnvelope,
) -> Result<(), RoomError>
where
    A: Authenticator,
    S: GameStore,
{
    let identity = state.auth.authenticate(&envelope.auth_token).await?;
    let game_id = envelope.game_id;

    match envelope.command {
        Command::Connect => {
            let handle = match joined.get(&game_id) {
                Some(entry) if !entry.handle.is_closed() => entry.handle.clone(),
                _ => state.lobby.coordinator(game_id).await?,
            };
            let role = handle.join(conn_id, identity.clone(), tx.clone()).await?;
            tracing::debug!(%conn_id, %game_id, %identity, %role, "connected to game");
            joined.insert(game_id, Joined { handle, identity });
        }
        Command::Leave => {
            let handle = joined_as(joined, game_id, &identity)?;
            handle.leave(conn_id).await?;
            joined.remove(&game_id);
        }
        Command::Resign => {
            joined_as(joined, game_id, &identity)?.resign(conn_id).await?;
        }
        Command::MakeMove { chess_move } => {
            joined_as(joined, game_id, &identity)?
                .submit_move(conn_id, chess_move)
                .await?;
        }
    }
    Ok(())
}

/// The cached coordinator for `game_id`, provided this connection joined
/// it under the same identity that sent the current command.
fn joined_as(
    joined: &HashMap<GameId, Joined>,
    game_id: GameId,
    identity: &Identity,
) -> Result<CoordinatorHandle, RoomError> {
    match joined.get(&game_id) {
        Some(entry) if entry.identity == *identity => Ok(entry.handle.clone()),
        _ => Err(RoomError::NotAParticipant(game_id)),
    }
}

/// Drains the connection's outbound channel onto the socket.
async fn write_loop<A, S, C>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    state: Arc<ServerState<A, S, C>>,
) where
    A: Send + Sync + 'static,
    S: Send + Sync + 'static,
    C: Codec,
{
    let conn_id = conn.id();
    while let Some(msg) = rx.recv().await {
        let text = match state.codec.encode(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode server message");
                continue;
            }
        };
        if let Err(e) = conn.send(&text).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
