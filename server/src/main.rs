use anyhow::Result;
use clap::Parser;
use sketchparty_server::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Room coordinator for the sketchparty drawing-and-guessing game.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    addr: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchparty_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = router(AppState::new());

    let listener = tokio::net::TcpListener::bind((args.addr.as_str(), args.port)).await?;
    tracing::info!("server listening on ws://{}:{}/ws", args.addr, args.port);
    axum::serve(listener, app).await?;
    Ok(())
}
