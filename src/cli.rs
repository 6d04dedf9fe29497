use crate::diagram::render::{write_diagram, ImageFormat};
use crate::diagram::stack::observability_stack;
use crate::error::AppError;
use crate::http::client::{ClientConfig, DemoAppClient};
use crate::loadgen::config::{LoadConfig, LoadProfile};
use crate::loadgen::report::LoadReport;
use crate::loadgen::runner::Runner;
/// CLI argument parsing and command execution.
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Obsbench - load generation and diagram tooling for the observability demo stack.
#[derive(Parser, Debug)]
#[command(name = "obsbench")]
#[command(about = "Synthetic load and architecture diagrams for the observability demo stack")]
#[command(
    long_about = r#"Obsbench - tooling around the observability demo service

FEATURES:
  • Load Testing: weighted synthetic traffic against the demo service with
    live progress and a text/JSON/CSV report
  • Diagram Rendering: the fixed architecture diagram of the observability
    stack as a self-contained SVG or Graphviz DOT file

EXAMPLES:
  # Drive 100 requests at 10 simulated users
  obsbench load-test --host http://localhost:8080 --runs 100 --users 10

  # Reproducible run from a profile file
  obsbench load-test --host http://localhost:8080 --profile soak.toml --seed 42

  # Render the architecture diagram
  obsbench diagram --assets-dir docs/assets --output docs/architecture.svg"#
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a load test against the demo service
    #[command(name = "load-test")]
    LoadTest {
        /// Base URL of the target service (e.g. http://localhost:8080)
        #[arg(long)]
        host: String,

        /// Number of simulated users (concurrency cap)
        #[arg(short, long)]
        users: Option<usize>,

        /// Total number of requests to make
        #[arg(short, long)]
        runs: Option<usize>,

        /// Wait time between task launches (e.g. "1-3s" or "500ms")
        #[arg(long)]
        wait_time: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Seed for the task-selection RNG (reproducible runs)
        #[arg(long)]
        seed: Option<u64>,

        /// TOML load profile; CLI flags take precedence over its values
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output_format: LoadOutputFormat,

        /// Plan and classify without making any HTTP requests
        #[arg(long)]
        dry_run: bool,
    },

    /// Render the architecture diagram of the observability stack
    Diagram {
        /// Output file path
        #[arg(short, long, default_value = "architecture.svg")]
        output: PathBuf,

        /// Directory holding the custom icon assets
        #[arg(long, value_name = "DIR", default_value = ".")]
        assets_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "svg")]
        format: DiagramFormat,
    },
}

/// Report formats for the load test.
#[derive(Debug, Clone, ValueEnum)]
pub enum LoadOutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output
    Csv,
}

/// Image formats for the diagram.
#[derive(Debug, Clone, ValueEnum)]
pub enum DiagramFormat {
    /// Self-contained SVG
    Svg,
    /// Graphviz DOT text
    Dot,
}

impl From<DiagramFormat> for ImageFormat {
    fn from(format: DiagramFormat) -> Self {
        match format {
            DiagramFormat::Svg => ImageFormat::Svg,
            DiagramFormat::Dot => ImageFormat::Dot,
        }
    }
}

/// Resolved load-test arguments after merging CLI flags with the profile.
struct LoadTestArgs {
    host: String,
    users: usize,
    runs: usize,
    wait_time: String,
    timeout_secs: u64,
    seed: Option<u64>,
    output_format: LoadOutputFormat,
    dry_run: bool,
}

impl LoadTestArgs {
    /// CLI flags win over profile values; defaults fill the rest.
    fn resolve(
        host: String,
        users: Option<usize>,
        runs: Option<usize>,
        wait_time: Option<String>,
        timeout_secs: u64,
        seed: Option<u64>,
        profile: Option<&Path>,
        output_format: LoadOutputFormat,
        dry_run: bool,
    ) -> Result<Self, AppError> {
        let profile = match profile {
            Some(path) => LoadProfile::from_path(path).map_err(AppError::Config)?,
            None => LoadProfile::default(),
        };

        Ok(Self {
            host,
            users: users.or(profile.users).unwrap_or(10),
            runs: runs.or(profile.runs).unwrap_or(100),
            wait_time: wait_time
                .or(profile.wait_time)
                .unwrap_or_else(|| "1-3s".to_string()),
            timeout_secs,
            seed: seed.or(profile.seed),
            output_format,
            dry_run,
        })
    }
}

impl Cli {
    /// Execute the CLI command.
    pub fn run(self) -> Result<(), AppError> {
        match self.command {
            Command::LoadTest {
                host,
                users,
                runs,
                wait_time,
                timeout_secs,
                seed,
                profile,
                output_format,
                dry_run,
            } => {
                let args = LoadTestArgs::resolve(
                    host,
                    users,
                    runs,
                    wait_time,
                    timeout_secs,
                    seed,
                    profile.as_deref(),
                    output_format,
                    dry_run,
                )?;
                Self::run_load_test(args)
            }
            Command::Diagram {
                output,
                assets_dir,
                format,
            } => Self::run_diagram(&output, &assets_dir, format),
        }
    }

    /// Run load test command.
    fn run_load_test(args: LoadTestArgs) -> Result<(), AppError> {
        if args.runs == 0 {
            return Err(AppError::Config("Run count must be at least 1".to_string()));
        }
        if args.users == 0 {
            return Err(AppError::Config(
                "User count must be at least 1".to_string(),
            ));
        }

        let mut config = LoadConfig::new(args.users, args.runs);
        config.timeout = Duration::from_secs(args.timeout_secs);
        config.dry_run = args.dry_run;
        config.seed = args.seed;
        config.wait_time =
            Some(LoadConfig::parse_wait_time(&args.wait_time).map_err(AppError::Config)?);

        let client_config = ClientConfig {
            base_url: args.host.clone(),
            timeout: config.timeout,
            headers: Vec::new(),
        };
        let client = Arc::new(DemoAppClient::new(client_config)?);

        if args.dry_run {
            eprintln!("Dry run mode: no HTTP requests will be made");
        } else {
            eprintln!(
                "Starting load test against {} with {} requests at {} users",
                args.host, args.runs, args.users
            );
        }

        let runner = Runner::new(config);

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| AppError::Config(format!("Failed to create async runtime: {}", e)))?;

        let progress_bar = if !args.dry_run {
            let pb = indicatif::ProgressBar::new(args.runs as u64);
            pb.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                    .expect("valid progress bar template")
                    .progress_chars("#>-"),
            );
            pb.set_message("Starting load test...");
            Some(Arc::new(pb))
        } else {
            None
        };

        let start = Instant::now();
        let results = if let Some(ref pb) = progress_bar {
            rt.block_on(runner.run_with_progress(client, Some(pb.clone())))?
        } else {
            rt.block_on(runner.run(client))?
        };
        let elapsed = start.elapsed();

        let report = LoadReport::from_results(&results, elapsed);
        match args.output_format {
            LoadOutputFormat::Text => print!("{}", report.to_text()),
            LoadOutputFormat::Json => println!("{}", report.to_json()?),
            LoadOutputFormat::Csv => print!("{}", report.to_csv()),
        }

        Ok(())
    }

    /// Run diagram command.
    fn run_diagram(output: &Path, assets_dir: &Path, format: DiagramFormat) -> Result<(), AppError> {
        let diagram = observability_stack(assets_dir);
        write_diagram(&diagram, output, format.into())?;
        eprintln!("Diagram written to {}", output.display());
        Ok(())
    }
}
