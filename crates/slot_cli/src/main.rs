//! Vibe Slot CLI
//!
//! Spin the raffle reels in the terminal, or play a JSON request in one shot.

mod render;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_core::{Registry, SlotConfig, SlotMachine};
use std::io;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "vibe_slot")]
#[command(about = "Randomly assign participants to roles with a slot machine", long_about = None)]
struct Cli {
    /// RNG seed for reproducible draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Timing config JSON (falls back to VIBE_SLOT_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin every role, then respin the listed ones
    Spin {
        /// Participant names, comma or newline separated (defaults to the sample roster)
        #[arg(long)]
        participants: Option<String>,

        /// Role names, comma separated (defaults to Moderator, Notary)
        #[arg(long)]
        roles: Option<String>,

        /// Role name to respin after the full spin; repeatable
        #[arg(long = "respin")]
        respins: Vec<String>,

        /// Animation speed multiplier; 0 skips the animation
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// Print the final machine snapshot as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// Print the participant roster before spinning
        #[arg(long, default_value = "false")]
        list: bool,
    },

    /// Play a JSON round request file and print the response
    Play {
        /// Request file path
        #[arg(long)]
        request: PathBuf,
    },
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin { participants, roles, respins, speed, json, list } => {
            let config = load_config(cli.config.as_ref())?;
            let registry = build_registry(participants.as_deref(), roles.as_deref())?;
            info!(
                participants = registry.participants().len(),
                roles = registry.roles().len(),
                "starting session"
            );

            let mut machine = SlotMachine::new(registry, config, cli.seed);
            if list {
                println!("{}", render::roster(machine.registry().participants()));
            }
            println!("{}", render::header(&machine));

            machine.spin_all()?;
            play_out(&mut machine, speed)?;

            for name in &respins {
                let role_id = machine
                    .registry()
                    .roles()
                    .iter()
                    .find(|r| r.name == name.trim())
                    .map(|r| r.id.clone())
                    .with_context(|| format!("no role named '{name}'"))?;
                println!("Respinning {name}...");
                machine.respin(&role_id)?;
                play_out(&mut machine, speed)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&machine.snapshot())?);
            }
        }

        Commands::Play { request } => {
            let content = std::fs::read_to_string(&request)
                .with_context(|| format!("failed to read {}", request.display()))?;
            let response = slot_core::play_round_json(&content)?;
            println!("{response}");
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<SlotConfig> {
    let config = match path {
        Some(path) => SlotConfig::from_file(&path.to_string_lossy())?,
        None => SlotConfig::from_env()?,
    };
    Ok(config)
}

fn build_registry(participants: Option<&str>, roles: Option<&str>) -> Result<Registry> {
    let defaults = Registry::with_defaults();
    let mut registry = Registry::from_parts(
        if participants.is_some() { Vec::new() } else { defaults.participants().to_vec() },
        if roles.is_some() { Vec::new() } else { defaults.roles().to_vec() },
    )?;

    if let Some(raw) = participants {
        registry.add_participants(raw);
    }
    if let Some(raw) = roles {
        for name in raw.split(',').filter(|n| !n.trim().is_empty()) {
            registry.add_role(name)?;
        }
    }

    Ok(registry)
}

/// Drive the machine against the wall clock until the round settles.
fn play_out(machine: &mut SlotMachine, speed: f64) -> Result<()> {
    let mut out = io::stdout();

    if speed <= 0.0 {
        let notices = machine.run_until_settled();
        render::frame(&mut out, machine, &notices)?;
        println!();
        return Ok(());
    }

    let frame_ms = machine.config().tick_ms;
    while !machine.is_settled() {
        let notices = machine.advance(frame_ms);
        render::frame(&mut out, machine, &notices)?;
        sleep(Duration::from_secs_f64(frame_ms as f64 / 1000.0 / speed));
    }
    println!();
    Ok(())
}
