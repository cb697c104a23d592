//! Specter CLI
//!
//! Usage:
//!   specter --watch emf --seconds 10       # Print frames for a while
//!   specter --interactive                   # Command console
//!   specter --serve                         # HTTP + WebSocket render feed
//!   specter --watch radar --json            # JSON frames

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use specter::core::{parse_command, run_server, Command, EngineConfig, ParseError, Session, SettingsStore, HELP};
use specter::types::{AudioMode, Frame, InstrumentKind};
use specter::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "specter",
    version = VERSION,
    about = "Specter - procedural ghost-detector instrument engines",
    long_about = "Specter drives three pseudo-instruments from hand-authored patterns.\n\n\
                  Instruments:\n  \
                  emf           - field-strength gauge, 0-300 mG, 20 Hz\n  \
                  radar         - fading ghost dots on a polar plot, 10 Hz\n  \
                  magnetometer  - candle flame intensity, 20 Hz\n\n\
                  Modes:\n  \
                  --watch <instrument>  Print frames for --seconds\n  \
                  --interactive         Command console (default)\n  \
                  --serve               HTTP + WebSocket render feed"
)]
struct Args {
    /// Print frames from one instrument
    #[arg(short, long, value_name = "INSTRUMENT")]
    watch: Option<InstrumentKind>,

    /// How long to watch (seconds)
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Interactive command console
    #[arg(short, long)]
    interactive: bool,

    /// Run the render feed server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Seed every engine RNG for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings file (default: ./specter_settings.json)
    #[arg(long, default_value = "./specter_settings.json")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("specter=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(args).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let session = Session::with_store(&config, SettingsStore::new(&args.settings))?;

    if args.serve {
        run_server(&args.addr, session).await?;
    } else if args.interactive {
        run_interactive(session, &args).await?;
    } else if let Some(kind) = args.watch {
        run_watch(session, kind, &args).await;
    } else {
        // Default to the console if no mode specified
        run_interactive(session, &args).await?;
    }
    Ok(())
}

/// Print frames from one instrument until the time is up
async fn run_watch(mut session: Session, kind: InstrumentKind, args: &Args) {
    if !args.json {
        print_header(&format!("Watching {}", kind), args.no_color);
    }
    session.start(kind).await;
    let limit = Duration::from_secs_f64(args.seconds.max(0.0));
    match kind {
        InstrumentKind::Emf => watch_feed(session.emf_feed(), limit, args).await,
        InstrumentKind::Radar => watch_feed(session.radar_feed(), limit, args).await,
        InstrumentKind::Magnetometer => watch_feed(session.magnetometer_feed(), limit, args).await,
    }
    session.stop(kind).await;
}

async fn watch_feed<F>(mut rx: watch::Receiver<F>, limit: Duration, args: &Args)
where
    F: Clone + Into<Frame>,
{
    let deadline = tokio::time::sleep(limit);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame: Frame = rx.borrow_and_update().clone().into();
                print_frame(&frame, args);
            }
        }
    }
}

/// Command console
async fn run_interactive(mut session: Session, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    print_header("Console", args.no_color);
    println!("{}", HELP);
    println!();
    if session.premium_locked() {
        println!("{}", "premium: locked".dimmed());
        println!();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"specter> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                continue;
            }
        };

        match command {
            Command::Start(kind) => {
                session.start(kind).await;
                println!("{} {} started", kind.emoji(), kind);
            }
            Command::Stop(kind) => {
                session.stop(kind).await;
                println!("{} {} stopped", kind.emoji(), kind);
            }
            Command::Show(kind) => print_frame(&session.frame(kind), args),
            Command::Tab(tab) => {
                let audio = session.switch_tab(tab).await;
                println!("tab {} | audio {}", tab.title().bold(), audio_label(audio));
            }
            Command::Sensitivity(value) => match session.set_sensitivity(value).await {
                Ok(()) => println!("sensitivity {:.2}", value),
                Err(e) => println!("{}", e.to_string().yellow()),
            },
            Command::Sweep => println!("audio {}", audio_label(session.trigger_radar_audio())),
            Command::Status => print_status(&session, args),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    session.stop_all().await;
    println!("\nSession ended.");
    Ok(())
}

fn print_frame(frame: &Frame, args: &Args) {
    if args.json {
        match serde_json::to_string(frame) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: {}", e),
        }
    } else if args.no_color {
        println!("{}", frame.to_parseable_string());
    } else {
        println!("{}", frame.to_terminal_string());
    }
}

fn print_status(session: &Session, args: &Args) {
    if args.json {
        match serde_json::to_string(&session.status()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: {}", e),
        }
        return;
    }
    for status in session.status() {
        let kind = status.instrument;
        let state = if status.running { "running" } else { "stopped" };
        if args.no_color {
            println!("{} {} ticks={}", kind.name(), state, status.ticks);
        } else {
            println!(
                "{}{} {:<13}{} {} ticks={}",
                kind.color_code(),
                kind.emoji(),
                kind.to_string(),
                InstrumentKind::color_reset(),
                state,
                status.ticks
            );
        }
    }
    let s = session.settings();
    println!(
        "sensitivity={:.2} volume={:.2} sound={} premium={}",
        s.radar_sensitivity, s.volume, s.sound_enabled, s.has_unlocked_premium
    );
}

fn audio_label(audio: AudioMode) -> &'static str {
    match audio {
        AudioMode::Radar => "radar sweep",
        AudioMode::Emf => "emf crackle",
        AudioMode::Spirit => "spirit static",
        AudioMode::None => "off",
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  Specter v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m╔══════════════════════════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║  👻 Specter v{} - {:<40}║\x1b[0m", VERSION, mode);
        println!("\x1b[1m╚══════════════════════════════════════════════════════════╝\x1b[0m");
    }
    println!();
}
