use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use clipbot_core::DefaultHttpClient;
use clipbot_core::platforms::twitch::{
    HelixConfig, TwitchHelixClient, DEFAULT_AUTH_URL, DEFAULT_HELIX_URL,
};
use clipbot_core::platforms::twitch_irc::{ChatMessage, TwitchIrcClient};
use clipbot_core::services::clips::{ClipResolver, ResolverConfig};
use clipbot_core::services::ClipsCommandService;

#[derive(Parser, Debug, Clone)]
#[command(name = "clipbot")]
#[command(author, version, about = "Clipbot - answers !clips requests in Twitch chat")]
struct Args {
    /// Twitch application client id
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    client_id: String,

    /// Twitch application client secret
    #[arg(long, env = "TWITCH_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Chat login the bot connects as
    #[arg(long, env = "TWITCH_BOT_USERNAME")]
    bot_username: String,

    /// Chat OAuth token for the bot account, with or without the "oauth:" prefix
    #[arg(long, env = "TWITCH_BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Channels to join, comma separated
    #[arg(long, env = "TWITCH_CHANNELS", value_delimiter = ',', required = true)]
    channels: Vec<String>,

    #[arg(long, env = "TWITCH_HELIX_URL", default_value = DEFAULT_HELIX_URL)]
    helix_url: String,

    #[arg(long, env = "TWITCH_AUTH_URL", default_value = DEFAULT_AUTH_URL)]
    auth_url: String,

    /// Days searched when a command gives no start date
    #[arg(long, default_value = "7")]
    lookback_days: u32,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("clipbot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!(
        "Clipbot starting. user={}, channels={:?}, lookback_days={}",
        args.bot_username, args.channels, args.lookback_days
    );

    if let Err(e) = run(args).await {
        error!("Clipbot error: {:?}", e);
        return Err(e);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = HelixConfig::new(&args.client_id, &args.client_secret);
    config.helix_url = args.helix_url.clone();
    config.auth_url = args.auth_url.clone();

    let mut helix = TwitchHelixClient::new(config, Arc::new(DefaultHttpClient::new()));
    helix
        .provision_token()
        .await
        .context("could not obtain a Twitch app access token")?;
    let helix = Arc::new(helix);

    let resolver = ClipResolver::new(
        helix.clone(),
        ResolverConfig {
            default_lookback: Duration::days(i64::from(args.lookback_days)),
            ..Default::default()
        },
    );
    let service = ClipsCommandService::new(helix, resolver);

    let mut irc = TwitchIrcClient::connect(&args.bot_username, &args.bot_token)
        .await
        .context("could not connect to Twitch chat")?;
    let mut incoming = irc
        .incoming
        .take()
        .context("chat receiver already taken")?;
    for channel in &args.channels {
        info!("Joining {}", channel);
        irc.join_channel(channel);
    }
    let irc = Arc::new(irc);

    loop {
        tokio::select! {
            maybe_msg = incoming.recv() => {
                let Some(msg) = maybe_msg else {
                    warn!("Chat connection closed; exiting.");
                    break;
                };
                if msg.user_name.eq_ignore_ascii_case(&args.bot_username)
                    || !ClipsCommandService::is_command(&msg.text)
                {
                    continue;
                }
                tokio::spawn(handle_chat(service.clone(), irc.clone(), msg));
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!("Failed to listen for Ctrl-C: {:?}", e);
                }
                info!("Ctrl-C detected; shutting down...");
                break;
            }
        }
    }

    irc.shutdown();
    Ok(())
}

async fn handle_chat(service: ClipsCommandService, irc: Arc<TwitchIrcClient>, msg: ChatMessage) {
    debug!("[{}] {}: {}", msg.channel, msg.user_name, msg.text);
    if let Some(reply) = service.handle_message(&msg.text).await {
        irc.send_reply(&msg.channel, &reply);
    }
}
