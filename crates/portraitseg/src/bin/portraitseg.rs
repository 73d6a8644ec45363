//! `portraitseg` CLI - inspect portrait transforms and masks.
//!
//! ## Usage
//!
//! ```bash
//! # Round-trip an image through the model transform
//! portraitseg transform portrait.jpg restored.png
//!
//! # Overlay a mask at half opacity
//! portraitseg composite portrait.jpg mask.png overlay.png --opacity 0.5
//!
//! # Print a seeded train/validation split
//! portraitseg split 1800 --valid-fraction 0.2 --seed 42
//! ```

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use portraitseg::{
    backend::{create_device, SelectedBackend, BACKEND_NAME},
    composite_files, round_trip_file,
    train::split_train_val,
    util::{MeanProfile, Narrowing},
    CliConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "portraitseg")]
#[command(version, about = "Portrait segmentation transform and mask tools", long_about = None)]
struct Cli {
    /// JSON configuration file supplying defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Round-trip an image through the model transform and save the result
    Transform {
        /// Input image path
        input: PathBuf,

        /// Output image path
        output: PathBuf,

        /// Mean color profile (voc)
        #[arg(long)]
        profile: Option<MeanProfile>,

        /// Narrowing rule for out-of-range values (saturate, wrap)
        #[arg(long)]
        narrowing: Option<Narrowing>,
    },

    /// Overlay a mask on a portrait
    Composite {
        /// Portrait image path
        image: PathBuf,

        /// Gray mask image path
        mask: PathBuf,

        /// Output image path
        output: PathBuf,

        /// Weight of the composite (0.0-1.0)
        #[arg(long)]
        opacity: Option<f32>,

        /// Keep the region outside the mask
        #[arg(long)]
        background: bool,
    },

    /// Print a train/validation index split as JSON
    Split {
        /// Number of samples
        count: usize,

        /// Fraction of samples assigned to validation
        #[arg(long)]
        valid_fraction: Option<f64>,

        /// Shuffle with this seed before splitting
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show backend information
    Info,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("portraitseg={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Transform {
            input,
            output,
            profile,
            narrowing,
        } => {
            if !input.exists() {
                anyhow::bail!("Input file does not exist: {}", input.display());
            }

            let profile = profile.unwrap_or(config.profile);
            let narrowing = narrowing.unwrap_or(config.narrowing);
            let device = create_device();
            tracing::debug!(backend = BACKEND_NAME, %profile, %narrowing, "transforming image");

            let report = round_trip_file::<SelectedBackend>(
                &input, &output, profile, narrowing, &device,
            )?;
            tracing::info!(
                width = report.width,
                height = report.height,
                min = report.min,
                max = report.max,
                mean = report.mean,
                "model tensor statistics"
            );
            tracing::info!(
                max_deviation = report.max_deviation,
                output = %output.display(),
                "saved round-trip image"
            );
            Ok(())
        }

        Commands::Composite {
            image,
            mask,
            output,
            opacity,
            background,
        } => {
            let opacity = opacity.unwrap_or(config.opacity);
            let background = background || config.background;

            composite_files(&image, &mask, &output, opacity, background)?;
            tracing::info!(output = %output.display(), "saved composite");
            Ok(())
        }

        Commands::Split {
            count,
            valid_fraction,
            seed,
        } => {
            let valid_fraction = valid_fraction.unwrap_or(config.valid_fraction);
            let seed = seed.or(config.seed);

            let split = split_train_val(count, valid_fraction, seed)?;
            println!("{}", serde_json::to_string_pretty(&split)?);
            Ok(())
        }

        Commands::Info => {
            println!("portraitseg information:");
            println!("  Backend: {BACKEND_NAME}");
            println!("  Device: {:?}", create_device());
            Ok(())
        }
    }
}
