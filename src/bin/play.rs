use anyhow::Context;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use yaplat_rs::{
    renderer::{RendererExt, Software, Viewport, scene},
    room::Room,
    sim::{Class, InputCmd, PhysicsScale, TicRunner},
};

const W: usize = 1280;
const H: usize = 720;
const DEFAULT_ROOM: &str = "assets/rooms/meadow.room";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("yaplat_rs=info".parse()?))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_ROOM.into());
    let room = Room::load(&path).with_context(|| format!("loading {path}"))?;

    let mut sim = TicRunner::default();
    let bodies = room.populate(&mut sim)?;
    let player_ent = bodies
        .iter()
        .copied()
        .find(|&e| {
            sim.world()
                .get::<&Class>(e)
                .is_ok_and(|c| c.0.id == "player")
        })
        .context("room has no player spawn")?;

    let mut vp = Viewport::fit(room.grid(), sim.unit(), W, H);
    let mut renderer = Software::default();
    let mut calls = Vec::new();

    let mut win = Window::new("yaplat", W, H, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut zoomed = false;
    sim.resync();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- build one InputCmd per frame ------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::Left) || win.is_key_down(Key::A) {
            cmd.move_x -= 1.0;
        }
        if win.is_key_down(Key::Right) || win.is_key_down(Key::D) {
            cmd.move_x += 1.0;
        }
        cmd.jump = win.is_key_down(Key::Space)
            || win.is_key_down(Key::Up)
            || win.is_key_down(Key::W);
        cmd.down = win.is_key_down(Key::Down) || win.is_key_down(Key::S);

        /* actions ---------------------------------------------------------- */
        if win.is_key_pressed(Key::R, KeyRepeat::No) {
            sim.respawn(player_ent);
            info!("player respawned");
        }
        if win.is_key_pressed(Key::Z, KeyRepeat::No) {
            zoomed = !zoomed;
            sim.rebind(if zoomed {
                PhysicsScale::zoomed_in()
            } else {
                PhysicsScale::default()
            });
            vp = Viewport::fit(room.grid(), sim.unit(), W, H);
        }

        /* send to ECS ------------------------------------------------------ */
        sim.set_input(player_ent, cmd);
        sim.pump(room.grid());

        /* draw */
        scene::fill_scene(room.grid(), sim.world(), &vp, &mut calls);
        let mut shown = Ok(());
        renderer.draw_frame(W, H, &calls, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            if let Some(body) = sim.body(player_ent) {
                info!(
                    avg_ms,
                    x = body.pos.x,
                    y = body.pos.y,
                    grounded = body.grounded,
                    "frame stats"
                );
            }
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
