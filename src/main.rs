//! Ambulance IVR - voice triage agent for emergency calls
//!
//! Answers a phone call through a Twilio-compatible voice platform, walks the
//! caller through a scripted triage dialog, assigns an ambulance, logs a CSV
//! report and texts the caller a summary.

mod api;
mod config;
mod dialog;
mod dispatch;
mod notification;
mod operator;
mod report;
mod runtime;
mod telephony;

use api::{create_router, AppState};
use clap::Parser;
use config::AppConfig;
use dispatch::Fleet;
use notification::NotificationSender;
use operator::CallTarget;
use rand::rngs::StdRng;
use rand::SeedableRng;
use report::CsvReportLog;
use runtime::{
    CallServices, MessagingChannel, ReportSink, SessionManager, UnconfiguredPlatform,
    VoicePlatform,
};
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use telephony::TwilioClient;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ambulance-ivr", version, about = "Voice triage agent for ambulance dispatch")]
struct Cli {
    /// Port for the voice webhook server (overrides `IVR_PORT`)
    #[arg(long)]
    port: Option<u16>,

    /// CSV file receiving one row per completed call (overrides `IVR_REPORT_PATH`)
    #[arg(long)]
    report_path: Option<PathBuf>,

    /// Phone number to call once the server is up (with country code)
    #[arg(long, value_name = "NUMBER")]
    call: Option<String>,

    /// Public base URL forwarding to this server, e.g. an ngrok tunnel
    #[arg(long, value_name = "URL", env = "IVR_PUBLIC_URL")]
    public_url: Option<String>,

    /// Only serve the webhook; never place or prompt for a call
    #[arg(long, conflicts_with = "call")]
    no_call: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambulance_ivr=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(path) = cli.report_path.clone() {
        config.report_path = path;
    }

    // Voice platform client; without it calls cannot be placed and SMS fails
    let (voice, messaging): (Arc<dyn VoicePlatform>, Arc<dyn MessagingChannel>) =
        match TwilioClient::new(&config.credentials, &config.api_base) {
            Ok(client) => {
                let client = Arc::new(client);
                (
                    Arc::clone(&client) as Arc<dyn VoicePlatform>,
                    client as Arc<dyn MessagingChannel>,
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Voice platform not configured; SMS summaries will fail");
                let unconfigured = Arc::new(UnconfiguredPlatform::new(e.to_string()));
                (
                    Arc::clone(&unconfigured) as Arc<dyn VoicePlatform>,
                    unconfigured as Arc<dyn MessagingChannel>,
                )
            }
        };

    tracing::info!(path = %config.report_path.display(), "Writing call reports");
    let reports: Arc<dyn ReportSink> = Arc::new(CsvReportLog::new(config.report_path.clone()));

    let services = CallServices::new(
        reports,
        NotificationSender::new(messaging, config.credentials.phone_number.clone()),
        Fleet::default(),
        StdRng::from_entropy(),
    );
    let state = AppState::new(SessionManager::new(services, config.session_ttl));
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server in the background
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Ambulance IVR listening on {}", addr);
    let mut server = tokio::spawn(async move { axum::serve(listener, app).await });

    if let Some(target) = resolve_call_target(&cli, config.port).await {
        match config.credentials.validate() {
            Ok(valid) => {
                // Failures are already reported to the operator
                let _ = operator::place_initial_call(voice.as_ref(), valid.phone_number, &target)
                    .await;
            }
            Err(e) => println!("\nERROR: {e}"),
        }
    }

    println!("\n--- The agent is running. Keep this terminal open. ---");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
        result = &mut server => {
            result??;
        }
    }

    Ok(())
}

/// Work out who to call: flags first, then an interactive prompt
async fn resolve_call_target(cli: &Cli, port: u16) -> Option<CallTarget> {
    if cli.no_call {
        return None;
    }

    if let Some(number) = &cli.call {
        let Some(url) = &cli.public_url else {
            println!("\nERROR: --call needs --public-url (or IVR_PUBLIC_URL)");
            return None;
        };
        return match CallTarget::new(number, url) {
            Ok(target) => Some(target),
            Err(e) => {
                println!("\n{e}");
                None
            }
        };
    }

    if !std::io::stdin().is_terminal() {
        tracing::info!("No call requested and no terminal attached; serving webhook only");
        return None;
    }

    operator::print_setup_banner(port);
    match operator::prompt_call_target().await {
        Ok(target) => target,
        Err(e) => {
            println!("\n{e}");
            None
        }
    }
}
