use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loqa_calldesk::store::format::{
    format_duration, format_percentage, format_timestamp, format_tour_date, preview_json,
};
use loqa_calldesk::{
    create_router, AppState, CallSessionHandle, CallTransport, Config, LiveCallSession,
    NatsTransport, OutboundCallClient, RowStore, SessionUpdate, WebCallClient,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Operator desk for the voice-calling assistant")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/loqa-calldesk")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Create a web call session on the provider
    CreateCall {
        /// Join the call right away
        #[arg(long)]
        join: bool,
    },
    /// Join a pre-created web call and stream its transcript
    Join {
        #[arg(long)]
        call_id: String,
        #[arg(long, env = "LOQA_CALLDESK_ACCESS_TOKEN")]
        access_token: String,
    },
    /// Ask the webhook to place an outbound call
    Trigger { phone_number: String },
    /// List call history, newest first
    Calls,
    /// List semantic analysis results, newest first
    Analysis,
    /// List upcoming tours
    Meetings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cfg = Config::load(&args.config)?;

    info!("Loaded config: {}", cfg.service.name);

    match args.command {
        Command::Serve => serve(&cfg).await,
        Command::CreateCall { join } => {
            let client = webcall_client(&cfg);
            let handle = client.create_web_call().await?;
            println!("Web call session created: {}", handle.call_id());

            if join {
                let transport = NatsTransport::resolve(cfg.transport.nats_url.as_deref()).await;
                run_live_call(&transport, handle).await?;
            }
            Ok(())
        }
        Command::Join {
            call_id,
            access_token,
        } => {
            let transport = NatsTransport::resolve(cfg.transport.nats_url.as_deref()).await;
            run_live_call(&transport, CallSessionHandle::new(call_id, access_token)).await
        }
        Command::Trigger { phone_number } => {
            let client = OutboundCallClient::new(&cfg.outbound.webhook_url);
            client.trigger_call(&phone_number).await?;
            println!("Successfully sent {} to the webhook.", phone_number.trim());
            Ok(())
        }
        Command::Calls => {
            let rows = row_store(&cfg).call_history().await?;
            for row in rows {
                println!(
                    "{:<6} {:<24} {:<16} {:<10} {}",
                    row.id,
                    format_timestamp(&row.created_at),
                    row.recipient_number.as_deref().unwrap_or("N/A"),
                    format_duration(row.call_duration),
                    row.disconnection_reason.as_deref().unwrap_or("N/A"),
                );
            }
            Ok(())
        }
        Command::Analysis => {
            let rows = row_store(&cfg).semantic_analysis().await?;
            for row in rows {
                println!(
                    "{:<6} call={:<6} {:<10} conf={:<7} talk={:<7} {:<12} {}",
                    row.id,
                    row.call_id.map(|id| id.to_string()).unwrap_or_else(|| "N/A".to_string()),
                    row.sentiment.as_deref().unwrap_or("N/A"),
                    format_percentage(row.agent_confidence),
                    format_percentage(row.agent_talk_time_percentage),
                    row.predicted_outcome.as_deref().unwrap_or("N/A"),
                    preview_json(row.buying_signals.as_ref()),
                );
            }
            Ok(())
        }
        Command::Meetings => {
            let today = chrono::Utc::now().date_naive();
            let rows = row_store(&cfg).upcoming_meetings(today).await?;
            if rows.is_empty() {
                println!("No upcoming meetings scheduled.");
            }
            for row in rows {
                println!(
                    "{:<32} {:<20} {}",
                    format_tour_date(Some(row.tour_date)),
                    row.name.as_deref().unwrap_or("N/A"),
                    row.recipient_number.as_deref().unwrap_or("N/A"),
                );
            }
            Ok(())
        }
    }
}

fn webcall_client(cfg: &Config) -> WebCallClient {
    WebCallClient::new(&cfg.webcall.api_url, &cfg.webcall.api_key, &cfg.webcall.agent_id)
}

fn row_store(cfg: &Config) -> RowStore {
    RowStore::new(&cfg.row_store.url, &cfg.row_store.api_key)
}

async fn serve(cfg: &Config) -> Result<()> {
    let transport = NatsTransport::resolve(cfg.transport.nats_url.as_deref()).await;
    let state = AppState::from_config(cfg, transport);
    let app = create_router(state.clone());

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    state.end_all().await;

    Ok(())
}

/// Join a call and print status and transcript until it ends or Ctrl+C
async fn run_live_call(transport: &CallTransport, handle: CallSessionHandle) -> Result<()> {
    let call_id = handle.call_id().to_string();
    let session = LiveCallSession::start(handle, transport)?
        .with_close_callback(move || info!("Operator closed call {}", call_id));

    let mut updates = session
        .take_updates()
        .context("Session update stream already taken")?;

    println!("[{}]", session.status().label());

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(SessionUpdate::Status(status)) => {
                    println!("[{}]", status.label());
                    if let Some(message) = status.operator_message() {
                        println!("{}", message);
                    }
                    if status.is_terminal() {
                        break;
                    }
                }
                Some(SessionUpdate::Transcript(batch)) => {
                    for entry in batch {
                        println!("{:>5}: {}", entry.role, entry.content);
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Hanging up");
                break;
            }
        }
    }

    session.hang_up();

    Ok(())
}
