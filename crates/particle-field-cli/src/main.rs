use anyhow::Result;
use clap::Parser;
use particle_field_core::{AnimationConfig, AnimationController, Mount, RecordingSurface};
use std::time::Duration;

/// Headless preview of the connected-particle background animation: runs the
/// controller for a number of frames against a recording surface and prints
/// per-frame draw statistics as JSON.
#[derive(Parser, Debug)]
#[command(name = "particle-field")]
struct Args {
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    #[arg(long, default_value_t = 600.0)]
    height: f64,
    #[arg(long, default_value_t = 120)]
    frames: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Simulate a touch device (static centered target).
    #[arg(long, default_value_t = false)]
    touch: bool,
    /// Sweep the pointer across the viewport diagonal over the run.
    #[arg(long, default_value_t = false)]
    sweep: bool,
}

fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;
    let args = Args::parse();

    let config = AnimationConfig {
        seed: args.seed,
        ..AnimationConfig::default()
    };
    let mut surface = RecordingSurface::default();
    let mut controller = AnimationController::try_new(
        config,
        Some(Mount {
            width: args.width,
            height: args.height,
            device_pixel_ratio: 1.0,
            touch: args.touch,
        }),
        Some(&mut surface),
    )?;

    let dt = Duration::from_millis(16);
    let mut frames = Vec::with_capacity(args.frames);
    for i in 0..args.frames {
        controller.tick(dt);
        if args.sweep && args.frames > 1 {
            let t = i as f64 / (args.frames - 1) as f64;
            controller.pointer_moved(t * args.width, t * args.height);
        }
        surface.commands.clear();
        frames.push(controller.render(&mut surface));
    }

    let summary = serde_json::json!({
        "width": args.width,
        "height": args.height,
        "density": controller.field().density,
        "particles": controller.field().len(),
        "target": controller.target(),
        "frames": frames,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
