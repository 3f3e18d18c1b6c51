//! Q&A server binary
//!
//! Run with: cargo run -p climate-rag --bin climate-rag-server

use climate_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "climate_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                      Climate RAG                          ║
║        Transition plan Q&A over uploaded PDFs             ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = RagConfig::load("climate-rag.toml")?;

    // The credential is the one hard requirement; stop before doing
    // anything else without it.
    config.require_api_key()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.openai.chat_model);
    tracing::info!("  - Embedding model: {}", config.openai.embed_model);
    tracing::info!("  - Retrieval depth: {}", config.retrieval.top_k);
    tracing::info!("  - Question limit: {}", config.limits.max_questions);
    if config.access.enabled() {
        tracing::info!("  - Access gate: enabled");
    }

    // Create the server (builds the OpenAI client and storage dirs)
    let server = RagServer::new(config.clone())?;

    // Probe the upstream API; a failure here is worth a warning, not an
    // abort, since the key may still work for the actual endpoints.
    let client = reqwest::Client::new();
    let probe = client
        .get(format!("{}/models", config.openai.base_url))
        .bearer_auth(config.require_api_key()?)
        .send()
        .await;
    match probe {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("OpenAI API reachable at {}", config.openai.base_url);
        }
        Ok(resp) => {
            tracing::warn!(
                "OpenAI API responded with HTTP {} - check the API key",
                resp.status()
            );
        }
        Err(e) => {
            tracing::warn!("OpenAI API not reachable: {}", e);
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/session                 - Create a session");
    println!("  POST /api/session/:id/unlock      - Unlock a gated session");
    println!("  POST /api/session/:id/upload      - Upload a PDF");
    println!("  POST /api/session/:id/ask         - Ask questions");
    println!("  GET  /api/session/:id/transcript  - Q&A history");
    println!("  GET  /api/session/:id/export      - Download transcript");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
