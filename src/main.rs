//! viewport-capture - Main entry point
//!
//! Thin command layer over the library: loads settings, resolves the preset
//! directory when a command needs it, and prints scripts and reports.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use viewport_capture::cli::{Cli, Commands, PresetCommands};
use viewport_capture::preset;
use viewport_capture::{
    capture, emit, Catalog, Emission, FsStorage, PathResolver, PresetStore, Presets, Settings,
    SnapshotContext,
};

/// Initialize tracing; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        eprintln!("✗ {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?.with_preset_path(cli.preset_path);
    let catalog = Catalog::builtin();

    match cli.command {
        Commands::Catalog { group, queries } => {
            for spec in catalog.iter().filter(|s| group.is_none_or(|g| s.group == g)) {
                let guard = spec
                    .requires
                    .map(|r| format!(" (requires {r})"))
                    .unwrap_or_default();
                if queries {
                    println!(
                        "{:<32} {:<16} {:<6} {}{guard}",
                        spec.id,
                        spec.group,
                        spec.domain,
                        spec.target.query_statement()
                    );
                } else {
                    println!("{:<32} {:<16} {}{guard}", spec.id, spec.group, spec.domain);
                }
            }
        }
        Commands::Capture {
            snapshot,
            save,
            force,
            output,
        } => {
            let context = SnapshotContext::from_file(&snapshot)
                .with_context(|| format!("Failed to load snapshot {:?}", snapshot))?;
            let captured = capture(&context, &catalog);
            for skipped in &captured.skipped {
                eprintln!("! skipped {}: {}", skipped.id, skipped.reason);
            }

            let emission = emit(&captured.state, &catalog);
            report_omitted(&emission);
            write_script(emission.script(), output.as_deref())?;

            if let Some(name) = save {
                let presets = open_presets(&settings)?;
                if presets.exists(&name) && !force {
                    bail!("preset '{name}' already exists (use --force to overwrite)");
                }
                presets.save(&name, &captured.state)?;
                eprintln!("✓ Saved preset '{name}' to {}", presets.store().location());
            }
        }
        Commands::Emit { state } => {
            let text = fs::read_to_string(&state)
                .with_context(|| format!("Failed to read state from {:?}", state))?;
            let state = preset::from_json(&text, &catalog)?;
            let emission = emit(&state, &catalog);
            report_omitted(&emission);
            println!("{}", emission.script());
        }
        Commands::Preset { action } => run_preset_command(action, &settings)?,
    }

    Ok(())
}

fn run_preset_command(action: PresetCommands, settings: &Settings) -> Result<()> {
    let presets = open_presets(settings)?;

    match action {
        PresetCommands::Path => println!("{}", presets.store().location()),
        PresetCommands::List => {
            for name in presets.list()? {
                println!("{name}");
            }
        }
        PresetCommands::Show { name, json } => {
            if json {
                println!("{}", presets.store().load(&name)?);
            } else {
                let state = presets.load(&name)?;
                let emission = emit(&state, presets.catalog());
                report_omitted(&emission);
                println!("{}", emission.script());
            }
        }
        PresetCommands::Save { name, from, force } => {
            let text = fs::read_to_string(&from)
                .with_context(|| format!("Failed to read state from {:?}", from))?;
            let state = preset::from_json(&text, presets.catalog())?;
            if presets.exists(&name) && !force {
                bail!("preset '{name}' already exists (use --force to overwrite)");
            }
            presets.save(&name, &state)?;
            println!("✓ Saved preset '{name}'");
        }
        PresetCommands::Delete { name } => {
            presets.delete(&name)?;
            println!("✓ Deleted preset '{name}'");
        }
    }

    Ok(())
}

fn open_presets(settings: &Settings) -> Result<Presets<FsStorage>> {
    let storage = FsStorage;
    let resolver = match &settings.host_app_dir {
        Some(dir) => PathResolver::new(&storage, Some(dir.clone())),
        None => PathResolver::detect(&storage),
    };
    let location = resolver.resolve(settings.custom_preset_path.as_deref())?;
    info!(location = %location, "preset directory resolved");

    Ok(Presets::new(
        PresetStore::new(storage, location),
        Catalog::builtin(),
    ))
}

fn report_omitted(emission: &Emission) {
    for omitted in &emission.omitted {
        eprintln!("! omitted {}: {}", omitted.id, omitted.reason);
    }
}

fn write_script(script: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{script}\n"))
                .with_context(|| format!("Failed to write script to {:?}", path))?;
            eprintln!("✓ Script written to {:?}", path);
        }
        None => println!("{script}"),
    }
    Ok(())
}
