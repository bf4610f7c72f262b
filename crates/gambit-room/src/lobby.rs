//! Lobby: finds or lazily starts the coordinator for a game.

use std::collections::HashMap;
use std::sync::Arc;

use gambit_protocol::GameId;
use gambit_session::GameStore;
use tokio::sync::Mutex;

use crate::coordinator::spawn_coordinator;
use crate::{CoordinatorConfig, CoordinatorHandle, RoomError};

/// Registry of running coordinators, one per game.
///
/// The map lock is held only to look up or insert a handle. Commands go
/// straight to the coordinator through the handle, so games never
/// contend with each other.
pub struct Lobby<S> {
    store: Arc<S>,
    config: CoordinatorConfig,
    coordinators: Mutex<HashMap<GameId, CoordinatorHandle>>,
}

impl<S: GameStore> Lobby<S> {
    pub fn new(store: Arc<S>, config: CoordinatorConfig) -> Self {
        Self {
            store,
            config,
            coordinators: Mutex::new(HashMap::new()),
        }
    }

    /// The coordinator for `game_id`, starting one on first use.
    ///
    /// # Errors
    /// [`RoomError::Session`] with `GameNotFound` if the store has no such
    /// game.
    pub async fn coordinator(&self, game_id: GameId) -> Result<CoordinatorHandle, RoomError> {
        if let Some(handle) = self.running(game_id).await {
            return Ok(handle);
        }

        // Read the record without holding the map lock.
        let seats = self.store.seats(game_id).await?;

        let mut coordinators = self.coordinators.lock().await;
        // Another caller may have started it meanwhile.
        match coordinators.get(&game_id) {
            Some(handle) if !handle.is_closed() => Ok(handle.clone()),
            _ => {
                let handle =
                    spawn_coordinator(game_id, seats, Arc::clone(&self.store), &self.config);
                coordinators.insert(game_id, handle.clone());
                tracing::info!(%game_id, "coordinator spawned");
                Ok(handle)
            }
        }
    }

    /// Ids of games with a running coordinator, in ascending order.
    pub async fn active_games(&self) -> Vec<GameId> {
        let coordinators = self.coordinators.lock().await;
        let mut ids: Vec<GameId> = coordinators
            .iter()
            .filter(|(_, handle)| !handle.is_closed())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    async fn running(&self, game_id: GameId) -> Option<CoordinatorHandle> {
        self.coordinators
            .lock()
            .await
            .get(&game_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }
}
