use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::AttrGroup;

/// viewport-capture - Capture viewport display settings as replayable MEL
#[derive(Parser)]
#[command(name = "viewport-capture")]
#[command(about = "Capture Maya viewport display settings and replay them as MEL scripts")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Preferred preset directory, overriding the settings file.
    ///
    /// Ignored with a warning when the directory is missing or read-only;
    /// presets then go to `<host user dir>/viewportCapture/presets`.
    #[arg(long, global = true)]
    pub preset_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the attributes the tool captures
    Catalog {
        /// Only list one group (e.g. display, hardware2)
        #[arg(short, long)]
        group: Option<AttrGroup>,
        /// Show the MEL query used for each attribute
        #[arg(long)]
        queries: bool,
    },
    /// Capture a viewport snapshot and print the replay script
    Capture {
        /// Snapshot JSON with the queried viewport values
        snapshot: PathBuf,
        /// Also save the captured state as a preset
        #[arg(short, long)]
        save: Option<String>,
        /// Overwrite an existing preset of the same name
        #[arg(long)]
        force: bool,
        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the replay script for a saved state file
    Emit {
        /// Preset JSON (current or legacy layout)
        state: PathBuf,
    },
    /// Manage named presets
    Preset {
        #[command(subcommand)]
        action: PresetCommands,
    },
}

#[derive(Subcommand)]
pub enum PresetCommands {
    /// Print the resolved preset directory
    Path,
    /// List saved presets
    List,
    /// Print a preset's replay script
    Show {
        /// Preset name
        name: String,
        /// Print the stored JSON instead of the script
        #[arg(long)]
        json: bool,
    },
    /// Save a state file as a named preset
    Save {
        /// Preset name
        name: String,
        /// State JSON to store
        #[arg(long)]
        from: PathBuf,
        /// Overwrite an existing preset of the same name
        #[arg(long)]
        force: bool,
    },
    /// Delete a preset
    Delete {
        /// Preset name
        name: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_command() {
        let result = Cli::try_parse_from(["viewport-capture"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_capture_with_save() {
        let result = Cli::try_parse_from([
            "viewport-capture",
            "capture",
            "snap.json",
            "--save",
            "Previs_Default",
            "--force",
        ]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        match cli.command {
            Commands::Capture {
                snapshot,
                save,
                force,
                output,
            } => {
                assert_eq!(snapshot.to_str().unwrap(), "snap.json");
                assert_eq!(save.as_deref(), Some("Previs_Default"));
                assert!(force);
                assert!(output.is_none());
            }
            _ => panic!("Expected Capture command"),
        }
    }

    #[test]
    fn test_cli_global_preset_path_after_subcommand() {
        let cli = Cli::try_parse_from([
            "viewport-capture",
            "preset",
            "list",
            "--preset-path",
            "/studio/presets",
        ])
        .unwrap();
        assert_eq!(cli.preset_path.as_deref(), Some("/studio/presets"));
        assert!(matches!(
            cli.command,
            Commands::Preset {
                action: PresetCommands::List
            }
        ));
    }

    #[test]
    fn test_cli_catalog_group() {
        let cli =
            Cli::try_parse_from(["viewport-capture", "catalog", "--group", "hardware2"]).unwrap();
        match cli.command {
            Commands::Catalog { group, queries } => {
                assert_eq!(group, Some(AttrGroup::Hardware2));
                assert!(!queries);
            }
            _ => panic!("Expected Catalog command"),
        }
    }

    #[test]
    fn test_cli_catalog_unknown_group() {
        let result = Cli::try_parse_from(["viewport-capture", "catalog", "--group", "lighting"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_preset_save_requires_source() {
        let result = Cli::try_parse_from(["viewport-capture", "preset", "save", "look"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "viewport-capture",
            "preset",
            "save",
            "look",
            "--from",
            "state.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Preset {
                action: PresetCommands::Save { name, from, force },
            } => {
                assert_eq!(name, "look");
                assert_eq!(from.to_str().unwrap(), "state.json");
                assert!(!force);
            }
            _ => panic!("Expected Preset Save command"),
        }
    }
}
