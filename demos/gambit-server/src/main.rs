//! A runnable Gambit server with in-memory collaborators.
//!
//! Seeds one game with `alice` as white and `bob` as black, issues a token
//! for each plus one for an observer, and logs the tokens so you can paste
//! them into a WebSocket client:
//!
//! ```text
//! RUST_LOG=gambit=debug cargo run -p gambit-server
//! ```
//!
//! Then, from any WebSocket client connected to `ws://127.0.0.1:8080`:
//!
//! ```json
//! {"commandType": "CONNECT", "authToken": "<alice's token>", "gameID": 1}
//! {"commandType": "MAKE_MOVE", "authToken": "<alice's token>", "gameID": 1,
//!  "move": {"start": {"row": 2, "col": 5}, "end": {"row": 4, "col": 5}}}
//! ```

use std::sync::Arc;

use gambit::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_BIND: &str = "127.0.0.1:8080";

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gambit=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let bind = std::env::var("GAMBIT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let store = Arc::new(MemoryGameStore::new());
    let game_id = store.create_game().await;
    store
        .assign(game_id, Color::Light, Identity::new("alice"))
        .await?;
    store.assign(game_id, Color::Dark, Identity::new("bob")).await?;

    let auth = TokenAuthenticator::new();
    for name in ["alice", "bob", "carol"] {
        let token = auth.issue(Identity::new(name)).await;
        tracing::info!(game_id = game_id.0, identity = name, %token, "issued token");
    }

    let server = GambitServer::builder()
        .bind(&bind)
        .build(auth, store)
        .await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await?;
    Ok(())
}
