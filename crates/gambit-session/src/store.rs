//! Game records: which identity holds which color.
//!
//! The coordinator treats the store as the source of truth for seat
//! ownership. It reads seats when a connection joins and clears a seat
//! when its holder leaves; it never asks the store on the move path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use gambit_protocol::{GameId, Identity, Seats};
use gambit_rules::Color;
use tokio::sync::RwLock;

use crate::SessionError;

/// Read and update seat assignments for games.
///
/// Both methods are awaited inside a game's coordinator, so every other
/// command for that game queues behind them. That keeps a leave and a
/// following join strictly ordered, but it means implementations must
/// answer promptly: serve from memory or a local cache, and keep slow
/// network round trips (a remote database, say) behind a write-through
/// layer rather than on this call.
pub trait GameStore: Send + Sync + 'static {
    /// Current seat assignments of `game_id`.
    ///
    /// # Errors
    /// [`SessionError::GameNotFound`] if there is no such game.
    fn seats(
        &self,
        game_id: GameId,
    ) -> impl std::future::Future<Output = Result<Seats, SessionError>> + Send;

    /// Empties the `color` seat of `game_id`. Clearing an empty seat is
    /// not an error.
    ///
    /// # Errors
    /// [`SessionError::GameNotFound`] if there is no such game.
    fn clear_seat(
        &self,
        game_id: GameId,
        color: Color,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}

// ---------------------------------------------------------------------------
// MemoryGameStore
// ---------------------------------------------------------------------------

/// A [`GameStore`] kept in process memory.
///
/// Besides the trait it offers the small amount of game setup the demo
/// server and tests need: creating games and seating players.
#[derive(Debug)]
pub struct MemoryGameStore {
    games: RwLock<HashMap<GameId, Seats>>,
    next_id: AtomicU64,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a game with both seats empty and returns its id.
    pub async fn create_game(&self) -> GameId {
        let mut games = self.games.write().await;
        let mut id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        // Skip ids already taken by `insert`.
        while games.contains_key(&id) {
            id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        }
        games.insert(id, Seats::default());
        tracing::info!(game_id = %id, "game created");
        id
    }

    /// Stores a game under a caller-chosen id, replacing any record there.
    pub async fn insert(&self, game_id: GameId, seats: Seats) {
        self.games.write().await.insert(game_id, seats);
    }

    /// Seats `identity` at `color`.
    ///
    /// # Errors
    /// - [`SessionError::GameNotFound`] — no such game
    /// - [`SessionError::SeatTaken`] — someone else already holds `color`
    pub async fn assign(
        &self,
        game_id: GameId,
        color: Color,
        identity: Identity,
    ) -> Result<(), SessionError> {
        let mut games = self.games.write().await;
        let seats = games
            .get_mut(&game_id)
            .ok_or(SessionError::GameNotFound(game_id))?;

        match seats.get(color) {
            Some(holder) if *holder != identity => {
                return Err(SessionError::SeatTaken { game_id, color });
            }
            _ => {}
        }
        tracing::info!(%game_id, %color, %identity, "seat assigned");
        seats.set(color, Some(identity));
        Ok(())
    }
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore for MemoryGameStore {
    async fn seats(&self, game_id: GameId) -> Result<Seats, SessionError> {
        self.games
            .read()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(SessionError::GameNotFound(game_id))
    }

    async fn clear_seat(&self, game_id: GameId, color: Color) -> Result<(), SessionError> {
        let mut games = self.games.write().await;
        let seats = games
            .get_mut(&game_id)
            .ok_or(SessionError::GameNotFound(game_id))?;
        if let Some(previous) = seats.set(color, None) {
            tracing::info!(%game_id, %color, identity = %previous, "seat cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::new("alice")
    }

    fn bob() -> Identity {
        Identity::new("bob")
    }

    #[tokio::test]
    async fn test_create_game_starts_with_empty_seats() {
        let store = MemoryGameStore::new();
        let a = store.create_game().await;
        let b = store.create_game().await;

        assert_ne!(a, b);
        assert_eq!(store.seats(a).await, Ok(Seats::default()));
    }

    #[tokio::test]
    async fn test_create_game_skips_inserted_ids() {
        let store = MemoryGameStore::new();
        store.insert(GameId(1), Seats::default()).await;

        assert_eq!(store.create_game().await, GameId(2));
    }

    #[tokio::test]
    async fn test_seats_unknown_game_not_found() {
        let store = MemoryGameStore::new();
        assert_eq!(
            store.seats(GameId(42)).await,
            Err(SessionError::GameNotFound(GameId(42)))
        );
        assert_eq!(
            store.clear_seat(GameId(42), Color::Light).await,
            Err(SessionError::GameNotFound(GameId(42)))
        );
    }

    #[tokio::test]
    async fn test_assign_then_seat_taken() {
        let store = MemoryGameStore::new();
        let game = store.create_game().await;

        store.assign(game, Color::Light, alice()).await.unwrap();
        store.assign(game, Color::Light, alice()).await.unwrap();
        let result = store.assign(game, Color::Light, bob()).await;

        assert_eq!(
            result,
            Err(SessionError::SeatTaken {
                game_id: game,
                color: Color::Light
            })
        );
        assert_eq!(store.seats(game).await.unwrap().light, Some(alice()));
    }

    #[tokio::test]
    async fn test_clear_seat_leaves_other_seat() {
        let store = MemoryGameStore::new();
        store
            .insert(GameId(42), Seats::new(Some(alice()), Some(bob())))
            .await;

        store.clear_seat(GameId(42), Color::Dark).await.unwrap();
        store.clear_seat(GameId(42), Color::Dark).await.unwrap();

        assert_eq!(
            store.seats(GameId(42)).await,
            Ok(Seats::new(Some(alice()), None))
        );
    }
}
