//! spell-it main entry point
//!
//! Three ways to run:
//! 1. interactive (default) - words typed at the prompt are spelled aloud
//! 2. `say <words>` - spell the words once and exit
//! 3. `serve` - serve the web build over HTTP
//!
//! The interactive loop polls stdin with mio, waking up whenever the next
//! letter is due so the speller can hand it to the synthesizer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token};
use spell_it::input::{Command, LineBuffer, HELP};
use spell_it::locale;
use spell_it::server::{ServerConfig, StaticServer};
use spell_it::state::config::{Config, Theme};
use spell_it::state::Speller;
use spell_it::SpellError;
use std::fs::File;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::mem::ManuallyDrop;
use std::os::unix::io::{AsRawFd, FromRawFd};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

/// Longest the loop sleeps when nothing is due
const IDLE_TIMEOUT: Duration = Duration::from_millis(100);

/// Shown when the platform cannot speak at all
const UNSUPPORTED_ALERT: &str = "Sorry, your platform does not support speech synthesis.";

#[derive(Parser, Debug)]
#[command(name = "spell-it", version, about = "Spell words aloud, one letter at a time")]
struct Cli {
    /// Write debug logs to spell-it.log
    #[arg(short, long)]
    debug: bool,

    /// Use this config file instead of ~/.spell-it.cfg
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Spell words typed at the prompt (default)
    Interactive,
    /// Spell the given words and exit
    Say {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Serve the web build over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Directory to serve
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

/// Whether the front end keeps going after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    if cli.debug {
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("spell-it.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open spell-it.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "spell-it version {} starting (debug mode, logging to spell-it.log)",
            spell_it::VERSION
        );
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;
    info!("Configuration loaded from {:?}", config.path());

    match cli.command.unwrap_or(Mode::Interactive) {
        Mode::Interactive => run_interactive(Speller::new(config)),
        Mode::Say { words } => run_say(Speller::new(config), &words.join(" ")),
        Mode::Serve { host, port, root } => {
            let mut server_config = ServerConfig::from_config(&config);
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            if let Some(root) = root {
                server_config.root = root;
            }
            run_serve(server_config)
        }
    }
}

fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let addr = config.addr();

    println!("Serving {} at http://{}", config.root.display(), addr);
    runtime
        .block_on(StaticServer::new(config).run_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        }))
        .with_context(|| format!("serving on {}", addr))
}

fn run_say(mut speller: Speller, text: &str) -> anyhow::Result<()> {
    match speller.spell(text, Instant::now()) {
        Err(SpellError::Unsupported) => {
            eprintln!("{}", UNSUPPORTED_ALERT);
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
        Ok(_) => {}
    }
    drain(&mut speller);
    Ok(())
}

/// Speak everything still queued, sleeping between letters
fn drain(speller: &mut Speller) {
    loop {
        speller.tick(Instant::now());
        match speller.time_until_next(Instant::now()) {
            Some(wait) => std::thread::sleep(wait),
            None => break,
        }
    }
}

fn prompt(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\x1b[34mspell>\x1b[0m ",
        Theme::Dark => "\x1b[96mspell>\x1b[0m ",
    }
}

fn show_prompt(speller: &Speller) {
    print!("{}", prompt(speller.preferences().theme));
    let _ = io::stdout().flush();
}

fn handle_command(speller: &mut Speller, command: Command) -> Flow {
    match command {
        Command::Spell(text) => match speller.spell(&text, Instant::now()) {
            Ok(0) => debug!("Nothing to spell"),
            Ok(n) => debug!("Queued {} letters", n),
            Err(SpellError::Unsupported) => println!("{}", UNSUPPORTED_ALERT),
            Err(e) => {
                error!("Spelling failed: {}", e);
                println!("Could not spell that: {}", e);
            }
        },
        Command::Stop => {
            if let Err(e) = speller.stop() {
                error!("Stop failed: {}", e);
            }
        }
        Command::Voice(gender) => {
            speller.set_gender(gender);
            describe_voice(speller);
        }
        Command::Mode(mode) => {
            speller.set_mode(mode);
            println!("Spelling mode: {}", mode);
        }
        Command::Locale(tag) => {
            speller.set_locale(&tag);
            if tag.is_empty() {
                println!("Locale cleared");
            } else if !speller
                .catalog()
                .locales()
                .iter()
                .any(|l| locale::same_locale(l, &tag))
            {
                println!("No voices for {}; the platform default will be used", tag);
            }
            describe_voice(speller);
        }
        Command::ListLocales => {
            let selected = speller.preferences().locale.clone();
            for (tag, label) in speller.locale_options() {
                let mark = if tag == selected { '*' } else { ' ' };
                println!("{} {}", mark, label);
            }
        }
        Command::ListVoices => match speller.refresh_voices() {
            Ok(_) => {
                for voice in speller.catalog().voices() {
                    println!("  {} ({})", voice.name, voice.locale);
                }
                describe_voice(speller);
            }
            Err(SpellError::Unsupported) => println!("{}", UNSUPPORTED_ALERT),
            Err(e) => println!("Could not list voices: {}", e),
        },
        Command::ToggleTheme => match speller.toggle_theme() {
            Ok(theme) => println!("Theme: {}", theme),
            Err(e) => {
                error!("Could not save theme: {}", e);
                println!("Theme changed but not saved: {}", e);
            }
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
        Command::Nothing => {}
        Command::Unknown(raw) => println!("Unknown command {}; type :help", raw),
    }
    Flow::Continue
}

fn describe_voice(speller: &Speller) {
    let prefs = speller.preferences();
    match speller.selected_voice() {
        Some(voice) => println!("Voice: {} ({}) for {}", voice.name, voice.locale, prefs.gender),
        None => println!("Voice: platform default for {}", prefs.gender),
    }
}

/// Run the prompt; falls back to line-by-line reading when stdin is not a TTY
fn run_interactive(mut speller: Speller) -> anyhow::Result<()> {
    if !speller.speech_supported() {
        println!("{}", UNSUPPORTED_ALERT);
    }

    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal, reading commands line by line");
        for line in io::stdin().lock().lines() {
            if handle_command(&mut speller, Command::parse(&line?)) == Flow::Quit {
                break;
            }
            drain(&mut speller);
        }
        return Ok(());
    }

    println!("spell-it {} - type :help for commands", spell_it::VERSION);
    describe_voice(&speller);
    show_prompt(&speller);

    let stdin_fd = io::stdin().as_raw_fd();
    // Read straight from the descriptor so nothing sits in std's stdin buffer
    // while mio reports it as drained.
    let mut stdin_file = ManuallyDrop::new(unsafe { File::from_raw_fd(stdin_fd) });

    let mut poll = Poll::new()?;
    let mut stdin_source = mio::unix::SourceFd(&stdin_fd);
    poll.registry()
        .register(&mut stdin_source, STDIN, Interest::READABLE)?;
    let mut events = Events::with_capacity(16);

    let mut buf = [0u8; 4096];
    let mut lines = LineBuffer::new();

    info!("Entering event loop");
    loop {
        // Speak any letters that are due
        speller.tick(Instant::now());

        let timeout = speller
            .time_until_next(Instant::now())
            .map(|d| d.min(IDLE_TIMEOUT))
            .unwrap_or(IDLE_TIMEOUT);

        if let Err(e) = poll.poll(&mut events, Some(timeout)) {
            if e.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(e.into());
        }

        for event in events.iter() {
            if event.token() != STDIN {
                continue;
            }

            let n = match stdin_file.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                info!("stdin closed");
                drain(&mut speller);
                return Ok(());
            }

            for line in lines.push(&buf[..n]) {
                if handle_command(&mut speller, Command::parse(&line)) == Flow::Quit {
                    speller.stop()?;
                    return Ok(());
                }
                show_prompt(&speller);
            }
        }
    }
}
