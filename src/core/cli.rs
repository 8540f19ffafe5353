//! Command line interface for iconforge
//!
//! Two tasks mirror the classic build setup: `generate` runs the icon font
//! pipeline once and `watch` re-runs it whenever a source SVG changes.
//! Flags override the project file, which overrides built-in defaults.

use crate::core::config_file::{ConfigFile, PipelineConfig, PROJECT_FILE_NAME};
use crate::core::errors::ForgeResult;
use crate::font::FontFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// iconforge CLI arguments
///
/// Examples:
///   iconforge generate                                   # Use ./iconforge.json or defaults
///   iconforge generate -s "icons/*.svg" -n demo-icons     # Override source and font name
///   iconforge generate --format ttf,woff                  # Only emit two formats
///   iconforge watch --debounce-ms 250                     # Rebuild on change
///   iconforge init                                        # Write ./iconforge.json
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "iconforge",
    version,
    about = "Build icon fonts from a folder of SVG icons",
    long_about = "iconforge turns a set of SVG icons into an icon font (TTF, EOT, WOFF), an SCSS partial, a compiled CSS file and an HTML gallery page listing every glyph."
)]
pub struct CliArgs {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[clap(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,

    /// Also write logs to a dated file in the user config directory
    #[clap(
        long = "log-file",
        global = true,
        help = "Also write logs to the user config directory",
        long_help = "Also write logs to a daily log file under the user config directory (for example ~/.config/iconforge/logs). Useful for long-running watch sessions."
    )]
    pub log_file: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full generation once
    Generate(BuildArgs),
    /// Watch the sources and regenerate on change
    Watch(WatchArgs),
    /// Write a project configuration file with every default spelled out
    Init {
        #[clap(default_value = PROJECT_FILE_NAME, help = "Where to write the configuration file")]
        path: PathBuf,
    },
}

/// Options shared by `generate` and `watch`
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[clap(
        long = "config",
        short = 'c',
        help = "Project configuration file",
        long_help = "Project configuration file (JSON). Defaults to ./iconforge.json when it exists."
    )]
    pub config: Option<PathBuf>,

    #[clap(long = "source", short = 's', help = "Glob matching the SVG sources")]
    pub source: Option<String>,

    #[clap(
        long = "font-name",
        short = 'n',
        help = "Font family name, also used as the output file stem"
    )]
    pub font_name: Option<String>,

    #[clap(long = "output", short = 'o', help = "Directory receiving every artifact")]
    pub output: Option<PathBuf>,

    #[clap(
        long = "format",
        short = 'f',
        value_enum,
        value_delimiter = ',',
        help = "Font formats to emit (comma separated)"
    )]
    pub formats: Vec<FontFormat>,

    #[clap(
        long = "timestamp",
        help = "Creation time written into the font, in seconds since the Unix epoch",
        long_help = "Creation time written into the font header, in seconds since the Unix epoch. Pin it to make repeated builds byte-for-byte identical."
    )]
    pub timestamp: Option<i64>,

    #[clap(
        long = "no-autohint",
        help = "Skip the ttfautohint pass over the generated TTF"
    )]
    pub no_autohint: bool,

    #[clap(long = "export-ufo", help = "Also write the normalized glyphs as a UFO source")]
    pub export_ufo: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    #[clap(flatten)]
    pub build: BuildArgs,

    #[clap(
        long = "debounce-ms",
        help = "Quiet period before a burst of changes triggers a rebuild"
    )]
    pub debounce_ms: Option<u64>,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        let build = match &self.command {
            Command::Generate(build) => build,
            Command::Watch(watch) => &watch.build,
            Command::Init { .. } => return Ok(()),
        };

        if let Some(path) = &build.config {
            if !path.is_file() {
                return Err(format!(
                    "Configuration file does not exist: {}\nRun `iconforge init` to create one.",
                    path.display()
                ));
            }
        }

        if let Some(name) = &build.font_name {
            if name.is_empty() {
                return Err("Font name must not be empty".to_string());
            }
        }

        Ok(())
    }
}

impl BuildArgs {
    /// The settings given on the command line, as a partial configuration
    pub fn overrides(&self) -> ConfigFile {
        ConfigFile {
            source_pattern: self.source.clone(),
            font_name: self.font_name.clone(),
            output_dir: self.output.clone(),
            formats: (!self.formats.is_empty()).then(|| self.formats.clone()),
            timestamp: self.timestamp,
            autohint: self.no_autohint.then_some(false),
            export_ufo: self.export_ufo.then_some(true),
            ..ConfigFile::default()
        }
    }

    /// Project file plus flags, resolved and validated
    pub fn resolve_config(&self) -> ForgeResult<PipelineConfig> {
        let file = ConfigFile::discover(self.config.as_deref())?;
        Ok(file.merge(self.overrides()).resolve()?)
    }
}

impl WatchArgs {
    pub fn resolve_config(&self) -> ForgeResult<PipelineConfig> {
        let mut overrides = self.build.overrides();
        overrides.debounce_ms = self.debounce_ms;

        let file = ConfigFile::discover(self.build.config.as_deref())?;
        Ok(file.merge(overrides).resolve()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_formats() {
        let args = CliArgs::try_parse_from([
            "iconforge",
            "generate",
            "--source",
            "icons/*.svg",
            "--font-name",
            "demo-icons",
            "--format",
            "ttf,woff",
        ])
        .unwrap();

        let Command::Generate(build) = args.command else {
            panic!("expected generate");
        };
        assert_eq!(build.font_name.as_deref(), Some("demo-icons"));
        assert_eq!(build.formats, vec![FontFormat::Ttf, FontFormat::Woff]);
    }

    #[test]
    fn test_parse_watch_and_global_flags() {
        let args = CliArgs::try_parse_from([
            "iconforge",
            "watch",
            "-vv",
            "--debounce-ms",
            "250",
            "-n",
            "demo",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        let Command::Watch(watch) = args.command else {
            panic!("expected watch");
        };
        assert_eq!(watch.debounce_ms, Some(250));
        assert_eq!(watch.build.font_name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_overrides_only_set_given_flags() {
        let build = BuildArgs {
            font_name: Some("demo".to_string()),
            ..BuildArgs::default()
        };
        let overrides = build.overrides();
        assert_eq!(overrides.font_name.as_deref(), Some("demo"));
        assert_eq!(overrides.formats, None);
        assert_eq!(overrides.autohint, None);
    }

    #[test]
    fn test_no_autohint_flag() {
        let args =
            CliArgs::try_parse_from(["iconforge", "generate", "--no-autohint"]).unwrap();
        let Command::Generate(build) = args.command else {
            panic!("expected generate");
        };
        assert_eq!(build.overrides().autohint, Some(false));
    }

    #[test]
    fn test_missing_config_file_fails_validation() {
        let args = CliArgs::try_parse_from([
            "iconforge",
            "generate",
            "--config",
            "/no/such/iconforge.json",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }
}
