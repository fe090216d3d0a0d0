//! Room viewer: draws a room's tiles and spawn placements.
//!
//! ```bash
//! cargo run --bin yaplat_rs -- assets/rooms/meadow.room
//! ```
//!
//! Space starts/stops the simulation so the enemies can be watched at work.

use anyhow::Context;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use yaplat_rs::{
    renderer::{RendererExt, Software, Viewport, scene},
    room::Room,
    sim::TicRunner,
};

const WIDTH: usize = 1024;
const HEIGHT: usize = 640;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("yaplat_rs=info".parse()?))
        .init();

    // ─────────── parse CLI ────────────
    let path = std::env::args()
        .nth(1)
        .context("usage: yaplat_rs <room file>")?;
    let room = Room::load(&path).with_context(|| format!("loading {path}"))?;

    let mut sim = TicRunner::default();
    room.populate(&mut sim)?;
    print!("{}", room.to_layout_string());

    let vp = Viewport::fit(room.grid(), sim.unit(), WIDTH, HEIGHT);
    let mut renderer = Software::default();
    let mut calls = Vec::new();

    let title = format!("yaplat: {}", room.name());
    let mut win = Window::new(&title, WIDTH, HEIGHT, WindowOptions::default())?;
    win.set_target_fps(60);

    let mut running = false;
    while win.is_open() && !win.is_key_down(Key::Escape) {
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            running = !running;
            sim.resync();
            info!(running, "simulation toggled");
        }
        if running {
            sim.pump(room.grid());
        }

        scene::fill_scene(room.grid(), sim.world(), &vp, &mut calls);
        let mut shown = Ok(());
        renderer.draw_frame(WIDTH, HEIGHT, &calls, |fb, w, h| {
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;
    }
    Ok(())
}
