use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::source::{FileSlideSource, HttpSlideSource, MemorySlideSource, SlideSource};

#[derive(Parser)]
#[command(name = "scrolldeck")]
#[command(author, version, about)]
#[command(long_about = "A full-screen, scroll-driven slide viewer.\n\n\
    Slides are HTML documents listed by a backend endpoint or a local file.\n\n\
    Examples:\n  \
    scrolldeck                                 View slides from the configured endpoint\n  \
    scrolldeck --endpoint http://host:5000     View slides from another server\n  \
    scrolldeck --file deck.yaml --watch        View a local slide list, reloading on change\n  \
    scrolldeck --demo --windowed               Try the built-in demo deck in a window\n  \
    scrolldeck list                            Print the slide list")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Reload the slide list when the --file changes
    #[arg(long, requires = "file")]
    pub watch: bool,

    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Where to read slides from. At most one may be given; without any, the
/// configured endpoint is used.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// Base URL of the slide service (serves /api/slides)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Read the slide list from a YAML or JSON file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Use the built-in demo deck
    #[arg(long)]
    pub demo: bool,
}

impl SourceArgs {
    pub fn build(&self, config: &Config) -> anyhow::Result<Arc<dyn SlideSource>> {
        if self.demo {
            return Ok(Arc::new(MemorySlideSource::demo()));
        }
        if let Some(file) = &self.file {
            if !file.exists() {
                anyhow::bail!("File not found: {}", file.display());
            }
            return Ok(Arc::new(FileSlideSource::new(file)));
        }
        let endpoint = config.resolve_endpoint(self.endpoint.as_deref());
        if !crate::source::is_absolute_url(&endpoint) {
            anyhow::bail!("Invalid endpoint: {endpoint}. Must start with http:// or https://.");
        }
        Ok(Arc::new(HttpSlideSource::new(endpoint)))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the slide list
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. endpoint, defaults.theme, timing.settle_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the configuration file location
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::List { source, json }) => crate::commands::list::run(&source, json),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("scrolldeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                let config = Config::load_or_default();
                let source = self.source.build(&config)?;
                let options = crate::app::ViewerOptions {
                    windowed: self.windowed,
                    start_slide: self.slide.or(config.start_slide()),
                    theme: crate::theme::Theme::from_name(config.theme_name()),
                    timings: config.timings(),
                    watch: if self.watch {
                        self.source.file.clone()
                    } else {
                        None
                    },
                };
                crate::app::run(source, options)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_viewer_flags() {
        let cli = Cli::try_parse_from([
            "scrolldeck",
            "--file",
            "deck.yaml",
            "--watch",
            "--slide",
            "3",
            "-vv",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.source.file, Some(PathBuf::from("deck.yaml")));
        assert!(cli.watch);
        assert_eq!(cli.slide, Some(3));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_sources_are_exclusive() {
        assert!(Cli::try_parse_from(["scrolldeck", "--demo", "--file", "x.yaml"]).is_err());
        assert!(Cli::try_parse_from(["scrolldeck", "--watch"]).is_err());
    }

    #[test]
    fn test_parse_list_subcommand() {
        let cli = Cli::try_parse_from(["scrolldeck", "list", "--demo", "--json"]).unwrap();
        match cli.command {
            Some(Commands::List { source, json }) => {
                assert!(source.demo);
                assert!(json);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_build_sources() {
        let config = Config::default();
        let demo = SourceArgs {
            demo: true,
            ..SourceArgs::default()
        };
        assert_eq!(demo.build(&config).unwrap().describe(), "built-in slides");

        let http = SourceArgs {
            endpoint: Some("http://example.com/".to_string()),
            ..SourceArgs::default()
        };
        assert_eq!(http.build(&config).unwrap().describe(), "http://example.com");

        let bad = SourceArgs {
            endpoint: Some("example.com".to_string()),
            ..SourceArgs::default()
        };
        assert!(bad.build(&config).is_err());

        let missing = SourceArgs {
            file: Some(PathBuf::from("/no/such/deck.yaml")),
            ..SourceArgs::default()
        };
        assert!(missing.build(&config).is_err());
    }
}
