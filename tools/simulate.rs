//! simulate.rs - headless run of a room with a scripted player.
//!
//! USAGE:
//! ```bash
//! cargo run --bin simulate -- assets/rooms/tower_climb.room \
//!     --script idle:30,right:20,right+jump:12,idle:60 \
//!     --policy assets/policy/floaty.ron
//! ```
//!
//! Prints one line per tick for the player (or every `--every` ticks), and
//! every body event as it happens.

use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use yaplat_rs::{
    room::Room,
    sim::{Class, InputCmd, MovementPolicy, PhysicsScale, Replay, TicRunner},
    world::TileProvider,
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Room layout file
    #[arg(value_name = "ROOM")]
    room: PathBuf,

    /// Ticks to run (defaults to the script length)
    #[arg(long)]
    ticks: Option<u32>,

    /// Comma-separated `action[+action]:ticks` segments; actions are
    /// `idle`, `left`, `right`, `jump`, `down`
    #[arg(long, default_value = "idle:30,right:20,right+jump:12,idle:60")]
    script: String,

    /// RON file overriding the player's movement policy
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Use the close-up physics scale
    #[arg(long)]
    zoomed: bool,

    /// Print the trace only every N ticks
    #[arg(long, default_value_t = 1)]
    every: u32,
}

/// Expand the script string into one key state per tick.
fn parse_script(src: &str) -> anyhow::Result<Vec<InputCmd>> {
    let mut out = Vec::new();
    for seg in src.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (actions, ticks) = seg
            .split_once(':')
            .with_context(|| format!("segment `{seg}` lacks `:ticks`"))?;
        let ticks: usize = ticks
            .parse()
            .with_context(|| format!("bad tick count in `{seg}`"))?;

        let mut cmd = InputCmd::default();
        for action in actions.split('+') {
            match action {
                "idle" => {}
                "left" => cmd.move_x -= 1.0,
                "right" => cmd.move_x += 1.0,
                "jump" => cmd.jump = true,
                "down" => cmd.down = true,
                other => bail!("unknown action `{other}` in `{seg}`"),
            }
        }
        out.extend(std::iter::repeat_n(cmd, ticks));
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("yaplat_rs=warn".parse()?))
        .init();

    let opts = Opts::parse();
    let room = Room::load(&opts.room).with_context(|| format!("loading {:?}", opts.room))?;
    let script = parse_script(&opts.script)?;
    let ticks = opts.ticks.unwrap_or(script.len() as u32);

    let scale = if opts.zoomed {
        PhysicsScale::zoomed_in()
    } else {
        PhysicsScale::default()
    };

    let mut sim = TicRunner::new(scale);
    let bodies = room.populate(&mut sim)?;
    let player = bodies
        .iter()
        .copied()
        .find(|&e| {
            sim.world()
                .get::<&Class>(e)
                .is_ok_and(|c| c.0.id == "player")
        })
        .context("room has no player spawn")?;
    if let Some(path) = &opts.policy {
        let policy = MovementPolicy::load(path).with_context(|| format!("loading {path:?}"))?;
        sim.set_policy(player, policy);
    }
    sim.set_brain(player, Replay::new(script));

    println!(
        "room {} ({}x{} tiles, unit {}), {} bodies, {} ticks",
        room.name(),
        room.grid().width(),
        room.grid().height(),
        sim.unit(),
        bodies.len(),
        ticks
    );
    println!("{:>5} {:>6} {:>6} {:>4} {:>4} {:>3}", "tick", "x", "y", "vx", "vy", "gnd");

    let every = opts.every.max(1);
    for t in 1..=ticks {
        let events = sim.tick(room.grid());
        for (ent, evs) in &events {
            for ev in evs {
                let who = if *ent == player { "player" } else { "other" };
                println!("{t:>5} {who} {ev:?}");
            }
        }
        if t % every == 0 {
            if let Some(b) = sim.body(player) {
                println!(
                    "{t:>5} {:>6} {:>6} {:>4} {:>4} {:>3}",
                    b.pos.x,
                    b.pos.y,
                    b.vel.x,
                    b.vel.y,
                    if b.grounded { "yes" } else { "no" }
                );
            }
        }
    }
    Ok(())
}
