//! uspin - Main entry point

use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use uspin::cli::{Cli, Commands};
use uspin::{DryRunManager, EopkgManager, ImageSpec, PackageManager, apply_stack};

/// Initialize the logger with appropriate settings
fn init_logger() {
    // Allows RUST_LOG env var to override
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Validate { spec } => {
            info!("Validating image spec: {}", spec.display());
            let image = ImageSpec::load(&spec)?;
            println!(
                "✓ {} is valid: {} operations in {} blocks",
                spec.display(),
                image.stack().len(),
                image.stack().blocks().len()
            );
        }
        Commands::Plan { spec, json } => {
            let image = ImageSpec::load(&spec)?;
            debug!("{}", image.stack().summary());

            let mut manager = DryRunManager::new();
            apply_stack(&mut manager, image.stack())?;

            if json {
                println!("{}", serde_json::to_string_pretty(manager.calls())?);
            } else {
                for (i, call) in manager.calls().iter().enumerate() {
                    println!("{:>3}. {}", i + 1, call);
                }
            }
        }
        Commands::Build {
            spec,
            root,
            eopkg,
            dry_run,
        } => {
            let image = ImageSpec::load(&spec)?;
            build(&image, &root, &eopkg, dry_run)?;
            println!("✓ Applied {} to {}", spec.display(), root.display());
        }
    }

    Ok(())
}

fn build(image: &ImageSpec, root: &Path, eopkg: &Path, dry_run: bool) -> anyhow::Result<()> {
    let mut manager: Box<dyn PackageManager> = if dry_run {
        info!("Dry run: no changes will be made to {}", root.display());
        Box::new(DryRunManager::new())
    } else {
        info!("Installing into {}", root.display());
        Box::new(EopkgManager::new(root).with_binary(eopkg))
    };

    apply_stack(manager.as_mut(), image.stack())?;
    Ok(())
}
