//! Binary entry point: arguments in, scene text on stdin, image out.

use std::fs::File;
use std::io::{self, BufWriter, Read};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use lucent::cli::Args;
use lucent::logger::init_logger;
use lucent::output;
use lucent::parser;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.debug_level.into());

    info!("lucent - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));
    info!(
        "Image resolution: {}x{}, shadows: {}",
        args.width,
        args.height,
        if args.shadows { "on" } else { "off" }
    );

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("reading scene description from stdin")?;

    let description = match parser::parse_scene(&text, args.shadows) {
        Ok(description) => description,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    info!(
        "scene loaded: {} shapes, {} point lights, {} spotlights",
        description.scene.shape_count(),
        description.scene.point_light_count(),
        description.scene.spot_light_count()
    );

    let frame = description
        .scene
        .render(&description.camera, args.width, args.height);

    match &args.output {
        Some(path) if path.extension().is_some_and(|ext| ext == "png") => {
            output::save_png(&frame, path)
                .with_context(|| format!("saving {}", path.display()))?;
        }
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            output::write_ppm(&frame, &mut out)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("image saved as {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            output::write_ppm(&frame, &mut out).context("writing PPM to stdout")?;
        }
    }

    Ok(())
}
