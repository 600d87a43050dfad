use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use fortress_core::{Engine, EngineConfig, Notification, StructureKind};
use tracing::{debug, info, warn};

mod command;
mod pacer;

use command::{Command, USAGE};
use pacer::TickPacer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Focus timer that builds a prehistoric fortress", long_about = None)]
struct Cli {
    /// JSON engine configuration. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Session length in minutes.
    #[arg(long)]
    minutes: Option<u32>,
    /// Print notifications and snapshots as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(?config, "Starting engine");

    let mut session = Session {
        engine: Engine::new(&config),
        json: cli.json,
    };
    let lines = spawn_stdin_reader();

    println!("🦕 Fortress ready. Type 'help' for commands.");
    session.print_status()?;
    while let Ok(line) = lines.recv() {
        if session.handle_line(&line, &lines)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(minutes) = cli.minutes {
        config.default_minutes = minutes;
    }
    Ok(config.normalized())
}

/// Forward stdin lines over a channel so the real-time countdown can wait on
/// input and the clock at once.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Session {
    engine: Engine,
    json: bool,
}

impl Session {
    fn handle_line(&mut self, line: &str, lines: &Receiver<String>) -> Result<Flow> {
        let command = match command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                println!("{:#}", err);
                println!("{}", USAGE);
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "Command");

        match command {
            Command::Act(action) => {
                self.engine.dispatch(&action);
                self.flush()?;
                if action.affects_taming() {
                    self.print_wild();
                }
            }
            Command::Tick(seconds) => {
                for _ in 0..seconds {
                    self.engine.tick();
                }
                self.flush()?;
                println!("⏱️ {}", self.engine.timer());
            }
            Command::Run => return self.run_realtime(lines),
            Command::Status => self.print_status()?,
            Command::Log => self.print_log()?,
            Command::Help => println!("{}", USAGE),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Tick once a second until the session completes or is paused. Lines
    /// typed meanwhile are handled as they arrive.
    fn run_realtime(&mut self, lines: &Receiver<String>) -> Result<Flow> {
        self.engine.start();
        let mut pacer = TickPacer::new(Instant::now(), Duration::from_secs(1));
        let mut input_open = true;
        while self.engine.timer().running {
            let wait = pacer.wait(Instant::now());
            if input_open {
                match lines.recv_timeout(wait) {
                    Ok(line) => {
                        if self.handle_line(&line, lines)? == Flow::Quit {
                            return Ok(Flow::Quit);
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Input closed; finishing the session");
                        input_open = false;
                    }
                }
            } else {
                thread::sleep(wait);
            }
            for _ in 0..pacer.due(Instant::now()) {
                if !self.engine.timer().running {
                    break;
                }
                self.engine.tick();
                if !self.json {
                    println!("⏱️ {}", self.engine.timer());
                }
            }
            self.flush()?;
        }
        Ok(Flow::Continue)
    }

    fn flush(&mut self) -> Result<()> {
        for note in self.engine.drain_notifications() {
            println!("{}", render(&note, self.json)?);
        }
        Ok(())
    }

    fn print_status(&self) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(self.engine.state())?);
            return Ok(());
        }
        let engine = &self.engine;
        let timer = engine.timer();
        println!(
            "⏱️ {} ({:?}, {} min session)",
            timer,
            timer.phase(),
            timer.configured_minutes
        );
        println!("{}", engine.ledger().describe());
        println!("🏰 Power {}", engine.fortress().power);
        for kind in StructureKind::ALL {
            let mark = if engine.can_afford(kind) { "✓" } else { " " };
            println!(
                "  {} {} Lv.{}  next: {} [{}]",
                kind.emoji(),
                kind.title(),
                engine.fortress().level(kind),
                engine.next_cost(kind),
                mark
            );
        }
        self.print_wild();
        let breakdown = engine.stable_breakdown();
        if breakdown.is_empty() {
            println!("🏠 Stable: empty");
        } else {
            let parts: Vec<String> = breakdown
                .iter()
                .map(|(species, count)| format!("{} {} x{}", species.emoji(), species, count))
                .collect();
            println!("🏠 Stable ({}): {}", engine.stable().len(), parts.join(", "));
        }
        let notes = engine.defender_perks().notes();
        if !notes.is_empty() {
            println!("Defender perks: {}", notes.join("; "));
        }
        println!(
            "📅 Daily raid: {}",
            if engine.daily_raid_available() {
                "ready"
            } else {
                "done for today"
            }
        );
        Ok(())
    }

    fn print_wild(&self) {
        if self.json {
            return;
        }
        let wild = self.engine.wild();
        if wild.is_empty() {
            println!("🌿 No wild creatures nearby");
            return;
        }
        println!("🌿 Wild:");
        for creature in wild {
            println!(
                "  {} {} {} Lv.{} tier {} ({}) {}% hostility {} walked {}",
                creature.id,
                creature.species.emoji(),
                creature.species,
                creature.level,
                creature.difficulty,
                creature.species.temperament(),
                creature.progress_percent(),
                creature.hostility,
                creature.walked_distance
            );
        }
    }

    fn print_log(&self) -> Result<()> {
        let log = self.engine.raid_log();
        if self.json {
            println!("{}", serde_json::to_string_pretty(log)?);
        } else if log.is_empty() {
            println!("No raids yet");
        } else {
            for entry in log.iter() {
                println!("{}", entry.describe());
            }
        }
        Ok(())
    }
}

/// One notification as a line of output: JSON when `json` is set, otherwise
/// the plain title and summary.
fn render(note: &Notification, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(note)?)
    } else {
        Ok(note.to_string())
    }
}
