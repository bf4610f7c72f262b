//! Coordinator actor: an isolated Tokio task that owns one game.
//!
//! Each game runs in its own task and is reached only through an mpsc
//! channel, so every command for that game is applied one at a time, in
//! arrival order. Two players moving "at once" are simply two commands in
//! the queue: the second is judged against the board the first produced.
//!
//! Outbound delivery goes through each connection's unbounded channel.
//! `send` on an unbounded channel never waits, so the actor never blocks
//! on a slow or vanished client; a per-connection writer task elsewhere
//! does the socket I/O.

use std::collections::HashMap;
use std::sync::Arc;

use gambit_protocol::{GameId, GameSnapshot, Identity, Recipient, Role, Seats, ServerMessage};
use gambit_rules::{ChessGame, Color, GameStatus, Move, RulesError};
use gambit_session::GameStore;
use gambit_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{CoordinatorConfig, RoomError};

/// Channel sender for delivering server messages to one connection.
pub type ConnectionSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a coordinator through its channel. Each carries a
/// oneshot reply channel; the caller awaits the outcome there.
pub(crate) enum CoordinatorCommand {
    Join {
        conn: ConnectionId,
        identity: Identity,
        sender: ConnectionSender,
        reply: oneshot::Sender<Result<Role, RoomError>>,
    },
    Leave {
        conn: ConnectionId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Disconnect {
        conn: ConnectionId,
        reply: oneshot::Sender<()>,
    },
    SubmitMove {
        conn: ConnectionId,
        mv: Move,
        reply: oneshot::Sender<Result<GameStatus, RoomError>>,
    },
    Resign {
        conn: ConnectionId,
        reply: oneshot::Sender<Result<GameStatus, RoomError>>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
}

// ---------------------------------------------------------------------------
// CoordinatorHandle
// ---------------------------------------------------------------------------

/// Handle to a running coordinator. Cheap to clone: it is an
/// `mpsc::Sender` plus the game id.
///
/// The coordinator task exits once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    game_id: GameId,
    sender: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Returns `true` if the coordinator task is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Attaches `conn` to the game as `identity`.
    ///
    /// Seats are re-read from the store first. The joiner receives a
    /// `LOAD_GAME` with the full state; every other connection is told who
    /// joined and as what. Joining again from the same connection replaces
    /// its identity and sender.
    ///
    /// # Errors
    /// [`RoomError::Session`] if the game record can no longer be read.
    pub async fn join(
        &self,
        conn: ConnectionId,
        identity: Identity,
        sender: ConnectionSender,
    ) -> Result<Role, RoomError> {
        self.request(|reply| CoordinatorCommand::Join {
            conn,
            identity,
            sender,
            reply,
        })
        .await?
    }

    /// Detaches `conn`, gives up its identity's seat (if any) in the store,
    /// and tells the remaining connections.
    ///
    /// # Errors
    /// [`RoomError::NotAParticipant`] if `conn` never joined.
    pub async fn leave(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.request(|reply| CoordinatorCommand::Leave { conn, reply })
            .await?
    }

    /// The transport lost `conn`. Detaches it without touching seats, so
    /// the player can reconnect and carry on. Unknown connections are
    /// ignored.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.request(|reply| CoordinatorCommand::Disconnect { conn, reply })
            .await
    }

    /// Plays `mv` for the color `conn`'s identity holds.
    ///
    /// On success every connection gets a `LOAD_GAME`, every other
    /// connection a "moved" notification, and everyone news of check,
    /// checkmate or stalemate. On failure nothing is sent to anyone and
    /// the game is unchanged.
    ///
    /// # Errors
    /// - [`RoomError::NotAParticipant`] — unknown connection, or an
    ///   identity holding neither color
    /// - [`RoomError::Rules`] — game over, wrong turn, or illegal move
    pub async fn submit_move(&self, conn: ConnectionId, mv: Move) -> Result<GameStatus, RoomError> {
        self.request(|reply| CoordinatorCommand::SubmitMove { conn, mv, reply })
            .await?
    }

    /// Concedes the game for the color `conn`'s identity holds and tells
    /// every connection.
    ///
    /// # Errors
    /// - [`RoomError::NotAParticipant`] — as for [`submit_move`](Self::submit_move)
    /// - [`RoomError::Rules`] — the game is already over
    pub async fn resign(&self, conn: ConnectionId) -> Result<GameStatus, RoomError> {
        self.request(|reply| CoordinatorCommand::Resign { conn, reply })
            .await?
    }

    /// The current state of the game.
    pub async fn snapshot(&self) -> Result<GameSnapshot, RoomError> {
        self.request(|reply| CoordinatorCommand::Snapshot { reply })
            .await
    }

    /// Sends one command and waits for its reply.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> CoordinatorCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct Participant {
    identity: Identity,
    sender: ConnectionSender,
}

/// The coordinator's state. Lives inside its Tokio task; nothing else can
/// reach it.
struct CoordinatorActor<S> {
    game_id: GameId,
    store: Arc<S>,
    seats: Seats,
    game: ChessGame,
    participants: HashMap<ConnectionId, Participant>,
    receiver: mpsc::Receiver<CoordinatorCommand>,
}

impl<S: GameStore> CoordinatorActor<S> {
    /// Processes commands until every handle is dropped.
    async fn run(mut self) {
        tracing::info!(game_id = %self.game_id, "coordinator started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                CoordinatorCommand::Join {
                    conn,
                    identity,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(conn, identity, sender).await;
                    let _ = reply.send(result);
                }
                CoordinatorCommand::Leave { conn, reply } => {
                    let result = self.handle_leave(conn).await;
                    let _ = reply.send(result);
                }
                CoordinatorCommand::Disconnect { conn, reply } => {
                    self.handle_disconnect(conn);
                    let _ = reply.send(());
                }
                CoordinatorCommand::SubmitMove { conn, mv, reply } => {
                    let result = self.handle_move(conn, mv);
                    if let Err(err) = &result {
                        tracing::debug!(game_id = %self.game_id, %conn, %mv, %err, "move rejected");
                    }
                    let _ = reply.send(result);
                }
                CoordinatorCommand::Resign { conn, reply } => {
                    let result = self.handle_resign(conn);
                    if let Err(err) = &result {
                        tracing::debug!(game_id = %self.game_id, %conn, %err, "resign rejected");
                    }
                    let _ = reply.send(result);
                }
                CoordinatorCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
            }
        }

        tracing::info!(game_id = %self.game_id, "coordinator stopped");
    }

    async fn handle_join(
        &mut self,
        conn: ConnectionId,
        identity: Identity,
        sender: ConnectionSender,
    ) -> Result<Role, RoomError> {
        self.seats = self.store.seats(self.game_id).await?;
        let role = self.seats.role_of(&identity);

        self.participants.insert(
            conn,
            Participant {
                identity: identity.clone(),
                sender,
            },
        );
        tracing::info!(
            game_id = %self.game_id,
            %conn,
            %identity,
            %role,
            connections = self.participants.len(),
            "joined"
        );

        self.dispatch(
            Recipient::Connection(conn),
            ServerMessage::LoadGame {
                game: self.snapshot(),
            },
        );
        self.dispatch(
            Recipient::AllExcept(conn),
            ServerMessage::notification(format!("{identity} joined as {role}")),
        );
        Ok(role)
    }

    async fn handle_leave(&mut self, conn: ConnectionId) -> Result<(), RoomError> {
        let participant = self
            .participants
            .remove(&conn)
            .ok_or(RoomError::NotAParticipant(self.game_id))?;
        let identity = participant.identity;

        if let Some(color) = self.seats.color_of(&identity) {
            self.seats.set(color, None);
            if let Err(err) = self.store.clear_seat(self.game_id, color).await {
                tracing::warn!(game_id = %self.game_id, %identity, %err, "failed to clear seat");
            }
        }
        tracing::info!(
            game_id = %self.game_id,
            %conn,
            %identity,
            connections = self.participants.len(),
            "left"
        );

        self.dispatch(
            Recipient::All,
            ServerMessage::notification(format!("{identity} left the game")),
        );
        Ok(())
    }

    fn handle_disconnect(&mut self, conn: ConnectionId) {
        let Some(participant) = self.participants.remove(&conn) else {
            return;
        };
        let identity = participant.identity;
        tracing::info!(
            game_id = %self.game_id,
            %conn,
            %identity,
            connections = self.participants.len(),
            "disconnected"
        );

        self.dispatch(
            Recipient::All,
            ServerMessage::notification(format!("{identity} lost connection")),
        );
    }

    fn handle_move(&mut self, conn: ConnectionId, mv: Move) -> Result<GameStatus, RoomError> {
        let (identity, color) = self.seated(conn)?;

        if self.game.is_over() {
            return Err(RulesError::GameOver(self.game.status()).into());
        }
        if color != self.game.turn() {
            return Err(RulesError::WrongTurn {
                expected: self.game.turn(),
            }
            .into());
        }
        let status = self.game.attempt_move(mv)?;
        tracing::info!(game_id = %self.game_id, %identity, %mv, %status, "move accepted");

        self.dispatch(
            Recipient::All,
            ServerMessage::LoadGame {
                game: self.snapshot(),
            },
        );
        self.dispatch(
            Recipient::AllExcept(conn),
            ServerMessage::notification(format!("{identity} moved {mv}")),
        );
        if let Some(news) = self.outcome_notice(status) {
            self.dispatch(Recipient::All, ServerMessage::notification(news));
        }
        Ok(status)
    }

    fn handle_resign(&mut self, conn: ConnectionId) -> Result<GameStatus, RoomError> {
        let (identity, color) = self.seated(conn)?;
        let status = self.game.resign(color)?;
        tracing::info!(game_id = %self.game_id, %identity, %status, "resigned");

        self.dispatch(
            Recipient::All,
            ServerMessage::notification(format!("{identity} resigned")),
        );
        Ok(status)
    }

    /// The identity behind `conn` and the color it holds.
    fn seated(&self, conn: ConnectionId) -> Result<(Identity, Color), RoomError> {
        let participant = self
            .participants
            .get(&conn)
            .ok_or(RoomError::NotAParticipant(self.game_id))?;
        let color = self
            .seats
            .color_of(&participant.identity)
            .ok_or(RoomError::NotAParticipant(self.game_id))?;
        Ok((participant.identity.clone(), color))
    }

    /// What to tell everyone after a move, beyond the move itself.
    fn outcome_notice(&self, status: GameStatus) -> Option<String> {
        match status {
            GameStatus::Checkmate { winner } => Some(format!(
                "{} is in checkmate, {} wins",
                self.player_name(winner.opposite()),
                self.player_name(winner)
            )),
            GameStatus::Stalemate { stalemated } => Some(format!(
                "{} is in stalemate, the game is drawn",
                self.player_name(stalemated)
            )),
            GameStatus::Ongoing if self.game.is_in_check(self.game.turn()) => Some(format!(
                "{} is in check",
                self.player_name(self.game.turn())
            )),
            GameStatus::Ongoing | GameStatus::Resigned { .. } => None,
        }
    }

    /// The seated identity for `color`, or the color itself if the seat is
    /// empty.
    fn player_name(&self, color: Color) -> String {
        match self.seats.get(color) {
            Some(identity) => identity.to_string(),
            None => color.to_string(),
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id,
            seats: self.seats.clone(),
            board: self.game.board().clone(),
            turn: self.game.turn(),
            status: self.game.status(),
        }
    }

    /// Best-effort fan-out: a closed channel means the connection is on
    /// its way out and is skipped.
    fn dispatch(&self, recipient: Recipient, msg: ServerMessage) {
        for (conn, participant) in &self.participants {
            if recipient.includes(*conn) && participant.sender.send(msg.clone()).is_err() {
                tracing::debug!(game_id = %self.game_id, %conn, "dropping message for closed connection");
            }
        }
    }
}

/// Spawns a coordinator for `game_id` starting from the standard opening.
pub fn spawn_coordinator<S: GameStore>(
    game_id: GameId,
    seats: Seats,
    store: Arc<S>,
    config: &CoordinatorConfig,
) -> CoordinatorHandle {
    spawn_with_game(game_id, seats, store, ChessGame::new(), config)
}

/// Spawns a coordinator around an existing game, e.g. one built with
/// [`ChessGame::from_position`].
pub fn spawn_with_game<S: GameStore>(
    game_id: GameId,
    seats: Seats,
    store: Arc<S>,
    game: ChessGame,
    config: &CoordinatorConfig,
) -> CoordinatorHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let actor = CoordinatorActor {
        game_id,
        store,
        seats,
        game,
        participants: HashMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    CoordinatorHandle { game_id, sender: tx }
}
