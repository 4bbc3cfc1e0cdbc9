use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Select;
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tandem_client::{
    AgentPhase, ClientConfig, NegotiationEngine, SignalingConnection, WebRtcEngine,
};
use tandem_core::{IceServerConfig, Role};
use tandem_server::ServerConfig;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tandem")]
#[command(version, about = "Two-party signaling relay and negotiation client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long, env = "TANDEM_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },

    /// Join the room as one participant and negotiate a session.
    Join {
        #[arg(long, env = "TANDEM_URL", default_value = "ws://127.0.0.1:8080/ws")]
        url: String,

        /// initiator (caller) or responder (callee). Prompted when omitted.
        #[arg(long, env = "TANDEM_ROLE")]
        role: Option<Role>,

        #[arg(long, env = "TANDEM_TURN_URL")]
        turn_url: Option<String>,

        #[arg(long, env = "TANDEM_TURN_USERNAME", requires = "turn_url")]
        turn_username: Option<String>,

        #[arg(long, env = "TANDEM_TURN_CREDENTIAL", requires = "turn_url")]
        turn_credential: Option<String>,

        /// Seconds between keepalive pings.
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        keepalive_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { bind } => {
            println!("{}", "Starting signaling relay...".green().bold());
            let config = ServerConfig {
                bind_addr: bind,
                ..ServerConfig::default()
            };
            tandem_server::serve(config).await?;
            println!("{}", "Relay stopped".yellow());
        }

        Commands::Join {
            url,
            role,
            turn_url,
            turn_username,
            turn_credential,
            keepalive_secs,
        } => {
            let role = match role {
                Some(role) => role,
                None => prompt_role()?,
            };

            let mut config = ClientConfig::new(url, role);
            config.keepalive_interval = Duration::from_secs(keepalive_secs);
            if let Some(turn) = turn_url {
                config.ice_servers.push(IceServerConfig {
                    urls: vec![turn],
                    username: turn_username,
                    credential: turn_credential,
                });
            }

            run_join(config).await?;
        }
    }

    Ok(())
}

fn prompt_role() -> Result<Role> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("no role given; pass --role or set TANDEM_ROLE");
    }

    let roles = [Role::Initiator, Role::Responder];
    let picked = Select::new()
        .with_prompt("Join as")
        .items(&roles.map(|r| r.as_str()))
        .default(0)
        .interact()
        .context("role prompt failed")?;

    Ok(roles[picked])
}

async fn run_join(config: ClientConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel(64);
    let engine = Arc::new(
        WebRtcEngine::new(&config.ice_servers, event_tx)
            .await
            .context("failed to create peer connection")?,
    );

    let connection = SignalingConnection::connect(&config, engine.clone())
        .await
        .with_context(|| format!("failed to reach signaling server at {}", config.url))?;
    println!(
        "{} {} as {}",
        "Joined".green().bold(),
        config.url,
        config.role.to_string().cyan()
    );

    let mut phases = connection.phases();
    let mut session = tokio::spawn(connection.run(event_rx));
    let mut phases_open = true;
    print_phase(*phases.borrow_and_update());

    loop {
        tokio::select! {
            changed = phases.changed(), if phases_open => {
                if changed.is_err() {
                    phases_open = false;
                    continue;
                }
                let phase = *phases.borrow_and_update();
                print_phase(phase);
            }

            res = &mut session => {
                match res {
                    Ok(Ok(phase)) => println!("{} ({:?})", "Signaling closed".yellow(), phase),
                    Ok(Err(e)) => eprintln!("{} {}", "Signaling failed:".red().bold(), e),
                    Err(e) => eprintln!("{} {}", "Signaling task failed:".red().bold(), e),
                }
                break;
            }

            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Leaving...".yellow());
                session.abort();
                break;
            }
        }
    }

    engine.close().await.context("failed to close peer connection")?;
    Ok(())
}

fn print_phase(phase: AgentPhase) {
    println!("{}", phase_message(phase));
}

fn phase_message(phase: AgentPhase) -> ColoredString {
    match phase {
        AgentPhase::Idle => "Waiting for peer".dimmed(),
        AgentPhase::AwaitingRemoteDescription => "Offer sent".cyan(),
        AgentPhase::HaveRemoteDescription => "Descriptions exchanged".cyan(),
        AgentPhase::Connected => "Session connected".green().bold(),
        AgentPhase::Failed => "Session failed".red().bold(),
    }
}
