use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use icast_core::{
    DEFAULT_OUTPUT, DEFAULT_PORT, RECV_BUFFER_LEN, ReceiveError, Receiver, ReceiverConfig,
    ScoreboardFacts,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("ICAST_BUILD_COMMIT"),
    ", built ",
    env!("ICAST_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "icast")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Receiver for iCast scoreboard broadcasts: decodes UDP datagrams into a JSON snapshot.",
    long_about = None,
    after_help = "Examples:\n  icast listen -o match-facts.json\n  icast decode --hex 0000003100000032 --stdout\n  icast send --message '12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME' --count 1"
)]
struct Cli {
    /// Only log warnings and errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every published snapshot
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Receive broadcasts and keep the snapshot file up to date.
    #[command(alias = "receive")]
    Listen {
        /// Local address to bind
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        bind: IpAddr,

        /// UDP port the scoreboard broadcasts on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Snapshot path (JSON), replaced atomically on every packet
        #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Receive buffer size in bytes; longer datagrams are truncated
        #[arg(long, default_value_t = RECV_BUFFER_LEN)]
        buffer_len: usize,
    },

    /// Decode a single captured datagram and print or write the snapshot.
    #[command(
        after_help = "Examples:\n  icast decode packet.bin --stdout\n  icast decode --hex 0000003100000032 -o match-facts.json --pretty"
    )]
    Decode {
        /// Path to a file holding one raw datagram
        #[arg(required_unless_present = "hex")]
        input: Option<PathBuf>,

        /// Raw datagram as a hex string instead of a file
        #[arg(long, conflicts_with = "input")]
        hex: Option<String>,

        /// Snapshot output path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Broadcast a test message in the scoreboard wire format.
    Send {
        /// Semicolon-separated message to encode (ASCII only)
        #[arg(short, long)]
        message: String,

        /// Destination address
        #[arg(long, default_value_t = SocketAddr::from((Ipv4Addr::BROADCAST, DEFAULT_PORT)))]
        to: SocketAddr,

        /// Number of datagrams to send (0 sends until interrupted)
        #[arg(long, default_value_t = 0)]
        count: u64,

        /// Delay between datagrams in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Listen {
            bind,
            port,
            output,
            buffer_len,
        } => cmd_listen(ReceiverConfig {
            bind_addr: SocketAddr::new(bind, port),
            output,
            recv_buffer_len: buffer_len,
        }),
        Commands::Decode {
            input,
            hex,
            output,
            stdout,
            pretty,
        } => cmd_decode(input, hex, output, stdout, pretty, cli.quiet),
        Commands::Send {
            message,
            to,
            count,
            interval_ms,
        } => cmd_send(&message, to, count, Duration::from_millis(interval_ms)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

/// Install the stderr subscriber; returns false when one was already installed.
fn init_logging(quiet: bool, verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(quiet, verbose)));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            eprintln!("warning: logging disabled: {}", err);
            false
        }
    }
}

fn default_log_level(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_listen(config: ReceiverConfig) -> Result<(), CliError> {
    ensure_parent_dir(&config.output)?;

    let mut receiver = Receiver::bind(&config).map_err(|err| {
        CliError::new(
            format!("failed to bind UDP socket on {}: {}", config.bind_addr, err),
            Some("check that the address is local and the port is free".to_string()),
        )
    })?;
    info!(
        addr = %config.bind_addr,
        output = %config.output.display(),
        "listening for scoreboard broadcasts"
    );

    receiver.run().map(|_| ()).map_err(|err| {
        CliError::new(
            format!("receive loop stopped: {}", err),
            Some("the socket is no longer usable; restart the receiver".to_string()),
        )
    })
}

fn cmd_decode(
    input: Option<PathBuf>,
    hex: Option<String>,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let raw = match (input, hex) {
        (_, Some(hex)) => icast_core::decode_hex(&hex).map_err(|err| {
            CliError::new(
                format!("invalid hex datagram: {}", err),
                Some("use an even number of hex digits, e.g. 0000003100000032".to_string()),
            )
        })?,
        (Some(input), None) => read_datagram_file(&input)?,
        (None, None) => {
            return Err(CliError::new(
                "missing datagram input",
                Some("pass a datagram file or --hex".to_string()),
            ));
        }
    };

    let facts = icast_core::decode_datagram(&raw).map_err(decode_error)?;
    let json = serialize_facts(&facts, pretty)?;

    if stdout {
        print!("{}", json);
        return Ok(());
    }

    let output = output.ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--output or --stdout".to_string()),
        )
    })?;
    ensure_parent_dir(&output)?;
    icast_core::write_atomic(&output, json.as_bytes())
        .with_context(|| format!("Failed to write snapshot: {}", output.display()))?;

    if !quiet {
        eprintln!("OK: snapshot written -> {}", output.display());
    }
    Ok(())
}

fn cmd_send(message: &str, to: SocketAddr, count: u64, interval: Duration) -> Result<(), CliError> {
    let payload = icast_core::encode_message(message).map_err(|err| {
        CliError::new(
            format!("cannot encode message: {}", err),
            Some("the wire format carries ASCII text only".to_string()),
        )
    })?;

    let local: IpAddr = match to {
        SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
        SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
    };
    let socket = UdpSocket::bind((local, 0)).context("Failed to open UDP socket")?;
    socket
        .set_broadcast(true)
        .context("Failed to enable broadcast")?;

    info!(%to, bytes = payload.len(), "sending scoreboard datagrams");
    let mut sent = 0u64;
    loop {
        socket
            .send_to(&payload, to)
            .with_context(|| format!("Failed to send datagram to {}", to))?;
        sent += 1;
        if count != 0 && sent >= count {
            break;
        }
        thread::sleep(interval);
    }
    info!(sent, "done");
    Ok(())
}

fn decode_error(err: ReceiveError) -> CliError {
    let hint = match err {
        ReceiveError::Decode(_) => "the datagram must carry ASCII text, 4 bytes per character",
        ReceiveError::Arity(_) => "a scoreboard message has at least 13 ';'-separated fields",
        ReceiveError::Publish(_) | ReceiveError::Transport(_) => "retry the command",
    };
    CliError::new(
        format!("failed to decode datagram: {}", err),
        Some(hint.to_string()),
    )
}

fn serialize_facts(facts: &ScoreboardFacts, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(facts)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(facts)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn read_datagram_file(input: &Path) -> Result<Vec<u8>, CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a file holding one raw datagram, or use --hex".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a file holding one raw datagram, or use --hex".to_string()),
        ));
    }
    fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))
        .map_err(Into::into)
}

fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}
