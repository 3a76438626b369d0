//! src/platforms/twitch_irc/client.rs

use std::io;

use tokio::io::{split, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tokio_native_tls::native_tls;
use tokio_native_tls::TlsConnector;
use tracing::{debug, error, info};

use crate::Error;

const IRC_HOST: &str = "irc.chat.twitch.tv";
const IRC_TLS_PORT: u16 = 6697;

/// One raw IRC line split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrcLine {
    pub tags: Option<String>,
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl IrcLine {
    pub fn parse(line: &str) -> Self {
        let mut rest = line.trim();
        let mut parsed = IrcLine::default();

        if let Some(stripped) = rest.strip_prefix('@') {
            match stripped.split_once(' ') {
                Some((tags, tail)) => {
                    parsed.tags = Some(tags.to_string());
                    rest = tail;
                }
                None => {
                    parsed.tags = Some(stripped.to_string());
                    return parsed;
                }
            }
        }

        if let Some(stripped) = rest.strip_prefix(':') {
            match stripped.split_once(' ') {
                Some((prefix, tail)) => {
                    parsed.prefix = Some(prefix.to_string());
                    rest = tail;
                }
                None => {
                    parsed.prefix = Some(stripped.to_string());
                    return parsed;
                }
            }
        }

        let (command, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        parsed.command = command.to_uppercase();

        let params_part = match tail.find(" :").map(|i| (i, &tail[i + 2..])).or_else(|| {
            tail.strip_prefix(':').map(|t| (0, t))
        }) {
            Some((idx, trailing)) => {
                parsed.trailing = Some(trailing.to_string());
                &tail[..idx]
            }
            None => tail,
        };
        parsed.params = params_part.split_whitespace().map(str::to_string).collect();
        parsed
    }

    /// Value of `key` in the IRCv3 tag block, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_deref()?.split(';').find_map(|kv| {
            let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
            (k == key).then_some(v)
        })
    }

    /// Nick portion of a `nick!user@host` prefix.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        prefix.split_once('!').map(|(nick, _)| nick)
    }
}

/// A chat message received on a joined channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Channel including the leading `#`.
    pub channel: String,
    pub user_name: String,
    pub user_id: Option<String>,
    pub text: String,
}

impl ChatMessage {
    /// Builds a message from a PRIVMSG line; anything else yields `None`.
    pub fn from_line(line: &IrcLine) -> Option<Self> {
        if line.command != "PRIVMSG" {
            return None;
        }
        let channel = line.params.first()?.clone();
        let text = line.trailing.clone()?;
        let user_name = line
            .tag("display-name")
            .filter(|dn| !dn.is_empty())
            .or_else(|| line.nick())
            .unwrap_or_default()
            .to_string();
        let user_id = line.tag("user-id").map(str::to_string);

        Some(Self {
            channel,
            user_name,
            user_id,
            text,
        })
    }
}

/// TLS IRC connection to Twitch chat.
pub struct TwitchIrcClient {
    raw_outgoing: mpsc::UnboundedSender<String>,

    /// Incoming chat messages; `take()` it to consume them elsewhere.
    pub incoming: Option<mpsc::UnboundedReceiver<ChatMessage>>,

    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
}

impl TwitchIrcClient {
    /// Connects to `irc.chat.twitch.tv:6697` over TLS, sends PASS/NICK and
    /// spawns the read/write tasks.
    pub async fn connect(username: &str, oauth_token: &str) -> Result<Self, Error> {
        Self::connect_to(IRC_HOST, IRC_TLS_PORT, username, oauth_token).await
    }

    /// Same as [`connect`](Self::connect) against an arbitrary TLS endpoint.
    /// Socket and handshake failures surface as `Error::Io`.
    pub async fn connect_to(
        host: &str,
        port: u16,
        username: &str,
        oauth_token: &str,
    ) -> Result<Self, Error> {
        let tcp = TcpStream::connect((host, port)).await?;

        let native_connector = native_tls::TlsConnector::new()
            .map_err(|e| io::Error::other(format!("TLSConnector::new() => {e}")))?;
        let connector = TlsConnector::from(native_connector);
        let tls_stream = connector
            .connect(host, tcp)
            .await
            .map_err(|e| io::Error::other(format!("TLS connect() => {e}")))?;

        let (read_half, write_half) = split(tls_stream);

        let (tx_outgoing, rx_outgoing) = mpsc::unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = mpsc::unbounded_channel::<ChatMessage>();

        let write_task = tokio::spawn(Self::writer_loop(write_half, rx_outgoing));

        let pass = if oauth_token.starts_with("oauth:") {
            oauth_token.to_string()
        } else {
            format!("oauth:{}", oauth_token)
        };
        tx_outgoing.send(format!("PASS {}", pass)).ok();
        tx_outgoing.send(format!("NICK {}", username.to_lowercase())).ok();
        tx_outgoing
            .send("CAP REQ :twitch.tv/commands twitch.tv/tags".to_string())
            .ok();

        let read_task = tokio::spawn(Self::reader_loop(read_half, tx_incoming, tx_outgoing.clone()));

        info!("(TwitchIrcClient) connected to {}:{} as {}", host, port, username);
        Ok(Self {
            raw_outgoing: tx_outgoing,
            incoming: Some(rx_incoming),
            read_task,
            write_task,
        })
    }

    async fn reader_loop<R>(
        read_half: R,
        tx_incoming: mpsc::UnboundedSender<ChatMessage>,
        tx_outgoing: mpsc::UnboundedSender<String>,
    ) where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(read_half);
        let mut line_buffer = String::new();

        loop {
            line_buffer.clear();
            match reader.read_line(&mut line_buffer).await {
                Ok(0) => {
                    info!("(TwitchIrcClient) read_loop => EOF");
                    break;
                }
                Ok(_) => {
                    let raw = line_buffer.trim_end();
                    if raw.is_empty() {
                        continue;
                    }
                    debug!("<< {}", raw);

                    let parsed = IrcLine::parse(raw);
                    if parsed.command == "PING" {
                        let payload = parsed.trailing.as_deref().unwrap_or("tmi.twitch.tv");
                        tx_outgoing.send(format!("PONG :{}", payload)).ok();
                        continue;
                    }

                    if let Some(msg) = ChatMessage::from_line(&parsed) {
                        if tx_incoming.send(msg).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("(TwitchIrcClient) read error => {:?}", e);
                    break;
                }
            }
        }

        info!("(TwitchIrcClient) reader_loop ended.");
    }

    async fn writer_loop<W>(write_half: W, mut rx_outgoing: mpsc::UnboundedReceiver<String>)
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(write_half);

        while let Some(line) = rx_outgoing.recv().await {
            if line.starts_with("PASS ") {
                debug!(">> PASS oauth:***");
            } else {
                debug!(">> {}", line);
            }
            let result = async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\r\n").await?;
                writer.flush().await
            }
            .await;
            if let Err(e) = result {
                error!("writer error => {:?}", e);
                break;
            }
        }

        info!("(TwitchIrcClient) writer_loop ended.");
    }

    pub fn send_raw_line(&self, line: &str) {
        let _ = self.raw_outgoing.send(line.to_string());
    }

    pub fn join_channel(&self, channel: &str) {
        self.send_raw_line(&format!("JOIN {}", normalize_channel(channel)));
    }

    pub fn send_privmsg(&self, channel: &str, message: &str) {
        self.send_raw_line(&format!("PRIVMSG {} :{}", normalize_channel(channel), message));
    }

    /// IRC has no multi-line messages, so each non-empty line is sent on its own.
    pub fn send_reply(&self, channel: &str, reply: &str) {
        for line in reply.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.send_privmsg(channel, line);
        }
    }

    pub fn shutdown(&self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

/// `Streamer` and `#streamer` both become `#streamer`.
pub fn normalize_channel(channel: &str) -> String {
    format!("#{}", channel.trim().trim_start_matches('#').to_lowercase())
}
