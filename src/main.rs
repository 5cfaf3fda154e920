//! Command-line entry point: host either widget in a window.
//!
//! ```text
//! glimmer model <path-or-url>
//! glimmer particles [preset.toml]
//! ```

use glimmer::{ParticleOptions, Shell};

fn build_shell() -> Result<Shell, String> {
    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .ok_or_else(|| "usage: glimmer <model|particles> [arg]".to_owned())?;

    match mode.as_str() {
        "model" => {
            let source = args.next().ok_or_else(|| {
                "usage: glimmer model <path-or-url>".to_owned()
            })?;
            Ok(Shell::builder()
                .with_title("Glimmer — Model Viewer")
                .with_model(source)
                .build())
        }
        "particles" => {
            let options = match args.next() {
                Some(preset) => {
                    ParticleOptions::load(std::path::Path::new(&preset))
                        .map_err(|e| {
                            format!("failed to load preset {preset:?}: {e}")
                        })?
                }
                None => ParticleOptions::default(),
            };
            Ok(Shell::builder()
                .with_title("Glimmer — Particles")
                .with_particles(options)
                .build())
        }
        other => Err(format!(
            "unknown mode {other:?}, expected \"model\" or \"particles\""
        )),
    }
}

fn main() {
    env_logger::init();

    let shell = match build_shell() {
        Ok(shell) => shell,
        Err(msg) => {
            log::error!("{msg}");
            std::process::exit(1);
        }
    };

    if let Err(e) = shell.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
