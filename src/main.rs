use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use review_mock::{Mock, Settings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "review-mock")]
#[command(about = "Drive a mock chroot for package reviews", long_about = None)]
struct Args {
    /// Mock config name (passed as `-r`); mock's default config when unset
    #[arg(short = 'r', long = "config", env = "MOCK_CONFIG")]
    mock_config: Option<String>,

    /// Extra options for every mock invocation
    #[arg(long, env = "MOCK_OPTIONS", allow_hyphen_values = true)]
    mock_options: Option<String>,

    /// Directory for built packages and logs
    #[arg(long, env = "REVIEW_RESULTDIR")]
    resultdir: Option<PathBuf>,

    /// JSON settings file; command line flags override its values
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the chroot's root name
    Root,
    /// Print the chroot directories and mock options in use
    Paths,
    /// Initialize the chroot
    Init,
    /// Install packages into the chroot
    Install {
        #[arg(required = true)]
        rpms: Vec<PathBuf>,
    },
    /// Run rpmlint on installed packages
    Lint {
        #[arg(required = true)]
        rpms: Vec<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the result directory for an existing build
    Cached { name: String },
    /// Remove dangling symlinks from the chroot's BUILD directory
    Cleanup,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };
    if args.mock_config.is_some() {
        settings.mock_config = args.mock_config.clone();
    }
    if args.mock_options.is_some() {
        settings.mock_options = args.mock_options.clone();
    }
    if args.resultdir.is_some() {
        settings.resultdir = args.resultdir.clone();
    }
    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mock = Mock::new(load_settings(&args)?);

    match args.command {
        Commands::Root => {
            println!("{}", mock.resolve_root()?);
        }
        Commands::Paths => {
            println!("root:      {}", mock.resolve_root()?);
            println!("topdir:    {}", mock.topdir()?.display());
            println!("rpmdb:     {}", mock.rpmdb_dir()?.display());
            println!("resultdir: {}", mock.result_dir().display());
            println!("options:   {}", mock.mock_options().trim());
        }
        Commands::Init => {
            if let Err(err) = mock.init() {
                eprint!("{}", err.output());
                anyhow::bail!(err);
            }
        }
        Commands::Install { mut rpms } => {
            if let Err(err) = mock.install(&mut rpms) {
                eprint!("{}", err.output());
                anyhow::bail!(err);
            }
        }
        Commands::Lint { rpms, json } => {
            let report = mock.lint(&rpms);
            if json {
                let rendered =
                    serde_json::to_string_pretty(&report).context("Cannot render lint report")?;
                println!("{}", rendered);
            } else {
                print!("{}", report.text);
            }
            if !report.success {
                std::process::exit(1);
            }
        }
        Commands::Cached { name } => {
            println!("{}", mock.has_cached_build(&name));
        }
        Commands::Cleanup => {
            mock.cleanup_builddir();
        }
    }

    Ok(())
}
