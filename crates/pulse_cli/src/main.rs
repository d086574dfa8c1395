use clap::Parser;
use pulse_bridge::Controller;
use pulse_core::settings;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file (created with defaults if missing)
    #[arg(short, long, default_value = "pulse.cfg")]
    settings: String,

    /// Tick interval in milliseconds
    #[arg(short, long, default_value_t = 50)]
    tick_ms: u64,
}

#[derive(Debug)]
enum Command {
    Thrust,
    Climax,
    Peak,
    Fade(bool),
    Reload,
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let cmd = match (words.next()?, words.next()) {
        ("thrust", None) => Command::Thrust,
        ("climax", None) => Command::Climax,
        ("peak", None) => Command::Peak,
        ("fade", Some("on")) => Command::Fade(true),
        ("fade", Some("off")) => Command::Fade(false),
        ("reload", None) => Command::Reload,
        ("status", None) => Command::Status,
        ("quit", None) | ("exit", None) => Command::Quit,
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(cmd)
}

/// Blocking stdin reader feeding the async loop. EOF ends the stream,
/// which the main loop treats as quit.
fn spawn_stdin_reader(tx: mpsc::Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match parse_command(trimmed) {
                Some(cmd) => {
                    let quitting = matches!(cmd, Command::Quit);
                    if tx.blocking_send(cmd).is_err() || quitting {
                        break;
                    }
                }
                None => {
                    eprintln!("commands: thrust | climax | peak | fade on|off | reload | status | quit");
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let tuning = settings::load(&args.settings)?;
    info!("loaded settings from {}", args.settings);

    let mut controller = Controller::new(tuning)?;
    info!(
        "pulse online, ticking every {}ms, sending to {}",
        args.tick_ms,
        controller.tuning().destination()
    );
    println!("Pulse online. Commands: thrust | climax | peak | fade on|off | reload | status | quit");

    let (tx, mut rx) = mpsc::channel::<Command>(16);
    spawn_stdin_reader(tx);

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;
                controller.tick(dt);
            }

            cmd = rx.recv() => {
                let Some(cmd) = cmd else { break; };
                match cmd {
                    Command::Thrust => controller.thrust(),
                    Command::Climax => controller.climax(),
                    Command::Peak => controller.peak(),
                    Command::Fade(on) => {
                        controller.set_fading(on);
                        info!("fading {}", if on { "enabled" } else { "disabled" });
                    }
                    Command::Reload => {
                        // Reload on top of the running tuning so fields with
                        // bad edits keep their live values.
                        match settings::load_with(&args.settings, controller.tuning().clone()) {
                            Ok(tuning) => {
                                controller.apply_tuning(tuning);
                                info!("settings reloaded from {}", args.settings);
                            }
                            Err(e) => warn!("settings reload failed: {:#}", e),
                        }
                    }
                    Command::Status => {
                        println!("{}", serde_json::to_string(&controller.snapshot())?);
                    }
                    Command::Quit => break,
                }
            }
        }
    }

    controller.close();
    info!("pulse shut down");
    Ok(())
}
