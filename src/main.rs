// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{crate_version, Parser, Subcommand};
use crossbeam_channel::{bounded, RecvTimeoutError};
use duration_string::DurationString;
use lightcore::config::Rig;
use lightcore::dmx::{DmxBridge, DmxFrame};
use lightcore::lighting::{palette, BeatSnapshot, EffectRegistry};
use tracing::info;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A spatial lighting effect engine."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Loads and verifies a rig configuration.
    Validate {
        /// The path to the rig config.
        path: PathBuf,
        /// Prints the parsed config back out as YAML.
        #[arg[short, long]]
        dump: bool,
    },
    /// Lists the built-in effects and palettes.
    Effects {},
    /// Runs a rig against a free-running beat clock and reports timing.
    Simulate {
        /// The path to the rig config.
        path: PathBuf,
        /// How long to run, e.g. 10s or 2m.
        #[arg[short, long, default_value = "5s"]]
        duration: String,
        /// Prints the non-zero DMX channels of the last frame.
        #[arg[long]]
        dump_dmx: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let registry = EffectRegistry::with_builtins();

    match cli.command {
        Commands::Validate { path, dump } => {
            let rig = Rig::deserialize(&path)?;
            let engine = rig.build_engine(&registry)?;
            let stack = engine.stack();

            println!("Rig {} is valid.", path.display());
            println!("Fixtures (count: {}):", engine.fixtures().len());
            for fixture in engine.fixtures() {
                println!(
                    "- {} (universe {}, address {}, {} channels)",
                    fixture.info.name,
                    fixture.info.universe,
                    fixture.info.address,
                    fixture.info.channels.len()
                );
            }
            println!("Layers (count: {}):", stack.layer_count());
            for layer in stack.layers() {
                println!(
                    "- {} ({:?}, opacity {:.2}{})",
                    layer.effect_id(),
                    layer.blend_mode(),
                    layer.opacity(),
                    if layer.is_enabled() { "" } else { ", disabled" }
                );
            }
            println!("Movement layers (count: {}):", stack.movement_layer_count());
            for layer in stack.movement_layers() {
                println!("- {} ({:?})", layer.effect_id(), layer.blend_mode());
            }

            if dump {
                println!("\n{}", rig.to_yaml()?);
            }
        }
        Commands::Effects {} => {
            println!("Color effects:");
            for id in registry.spatial_ids() {
                println!("- {}", id);
            }
            println!("\nMovement effects:");
            for id in registry.movement_ids() {
                println!("- {}", id);
            }
            println!("\nPalettes:");
            for name in palette::names() {
                println!("- {}", name);
            }
        }
        Commands::Simulate {
            path,
            duration,
            dump_dmx,
        } => {
            let duration: Duration = DurationString::from_string(duration)?.into();
            let rig = Rig::deserialize(&path)?;
            let mut engine = rig.build_engine(&registry)?;
            let fps = rig.engine().fps();
            let bpm = rig.engine().bpm();

            let fixtures = engine.fixtures().to_vec();
            let mut colors = engine.color_reader();
            let mut outputs = engine.output_reader();
            let tick_duration = Duration::from_secs(1).div_f64(fps);
            let (stop_tx, stop_rx) = bounded::<()>(1);

            // Stands in for a DMX transport: latches each new frame and converts it.
            let consumer = thread::spawn(move || {
                let mut frame = DmxFrame::new();
                let mut converted = 0u64;
                loop {
                    match stop_rx.recv_timeout(tick_duration / 2) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if !colors.has_new_frame() {
                        continue;
                    }
                    let color_frame = colors.swap_read();
                    let output_frame = outputs.swap_read();
                    DmxBridge::convert_into(&mut frame, &fixtures, &color_frame, &output_frame);
                    converted += 1;
                }
                (converted, frame)
            });

            info!(fps, bpm, duration = ?duration, "Starting simulation");
            let start = Instant::now();
            let mut next = start;
            let mut slowest = Duration::ZERO;
            let mut total = Duration::ZERO;
            while start.elapsed() < duration {
                let elapsed = start.elapsed().as_secs_f64();
                let tick_start = Instant::now();
                engine.tick(elapsed, &BeatSnapshot::at(bpm, elapsed));
                let tick_time = tick_start.elapsed();
                slowest = slowest.max(tick_time);
                total += tick_time;

                next += tick_duration;
                spin_sleep::sleep(next.saturating_duration_since(Instant::now()));
            }

            // The consumer may already be gone if it panicked; join reports that.
            let _ = stop_tx.send(());
            let (converted, frame) = consumer
                .join()
                .map_err(|_| "DMX consumer thread panicked")?;

            let ticks = engine.ticks().max(1);
            println!("Ticks: {}", engine.ticks());
            println!("Dropped frames: {}", engine.dropped_frames());
            println!("Frames converted: {}", converted);
            println!(
                "Tick time: avg {:?}, max {:?}",
                total / ticks as u32,
                slowest
            );

            if dump_dmx {
                for (universe, data) in frame.universes() {
                    println!("Universe {}:", universe);
                    for (index, value) in data.iter().enumerate().filter(|(_, v)| **v != 0) {
                        println!("  {:>3}: {}", index + 1, value);
                    }
                }
            }
        }
    }

    Ok(())
}
