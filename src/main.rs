use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use stealth_scout::output::{self, ScoredProfile};
use stealth_scout::scoring::{Preset, Tier};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_OUTPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score profiles and print them ranked (default if no subcommand)
    Score(ScoreArgs),
    /// Print tier, category and location statistics
    Summary(InputArgs),
    /// Open a profile in browser by its rank
    Open {
        /// Rank of the profile to open (1-based, as shown by score)
        index: usize,

        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Validate the effective rule set and report every problem
    Check,
    /// Write a default config file with the preset's rules spelled out
    Init {
        /// Overwrite an existing config without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct InputArgs {
    /// Profile JSON file (repeatable; defaults to `inputs` in the config)
    #[arg(short, long = "input", value_name = "FILE")]
    inputs: Vec<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ScoreArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Write JSON, CSV and summary reports into this directory
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Terminal output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Only print profiles at this tier or better
    #[arg(long, value_enum, ignore_case = true)]
    min_tier: Option<Tier>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "stealth-scout")]
#[command(about = "Score and tier founder profiles with configurable heuristics", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-profile breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/stealth-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in rule set to use instead of the configured one
    #[arg(short, long, global = true, value_enum)]
    preset: Option<Preset>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    stealth_scout::logging::init_tracing(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Score(ScoreArgs::default()));
    let start_time = Instant::now();

    // Init runs before loading, since the config may not exist yet
    if let Commands::Init { force } = command {
        let preset = cli.preset.unwrap_or_default();
        match stealth_scout::config::run_init(cli.config, preset, force) {
            Ok(Some(path)) => println!("Config written to {}", path.display()),
            Ok(None) => println!("Aborted."),
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match stealth_scout::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate rules at startup
    let rules = config.effective_rules(cli.preset);
    if let Err(errors) = stealth_scout::scoring::validate_rules(&rules) {
        eprintln!("Rule set errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let input_args = match &command {
        Commands::Score(args) => &args.inputs,
        Commands::Summary(args) => args,
        Commands::Open { inputs, .. } => inputs,
        Commands::Check | Commands::Init { .. } => {
            println!(
                "Rule set OK: {} signals, {} penalties, scale {}",
                rules.signals.len(),
                rules.penalties.len(),
                output::format_score(rules.scale_max)
            );
            std::process::exit(EXIT_SUCCESS);
        }
    };

    let inputs = if input_args.inputs.is_empty() {
        config.inputs.clone()
    } else {
        input_args.inputs.clone()
    };
    if inputs.is_empty() {
        eprintln!("No input files given.");
        eprintln!("Pass --input FILE or add them to the config:");
        eprintln!("  inputs:");
        eprintln!("    - profiles.json");
        std::process::exit(EXIT_INPUT);
    }

    let scored = match stealth_scout::batch::load_and_score_profiles(&inputs, &rules) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let use_colors = output::should_use_colors();

    match command {
        Commands::Score(args) => {
            let shown: Vec<ScoredProfile> = scored
                .iter()
                .filter(|(_, result)| args.min_tier.map_or(true, |min| result.tier.at_least(min)))
                .map(|(record, result)| ScoredProfile { record, result })
                .collect();

            match args.format {
                OutputFormat::Table if cli.verbose && !shown.is_empty() => {
                    for scored in &shown {
                        println!("{}", output::format_profile_detail(scored, use_colors));
                        println!();
                    }
                }
                OutputFormat::Table => {
                    println!("{}", output::format_scored_table(&shown, use_colors));
                }
                OutputFormat::Tsv => {
                    let tsv = output::format_tsv(&shown);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                OutputFormat::Json => {
                    let rows: Vec<_> = shown
                        .iter()
                        .map(|s| output::ReportRow::new(s.record, s.result))
                        .collect();
                    match output::render_json(&rows) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Output error: {:#}", e);
                            std::process::exit(EXIT_OUTPUT);
                        }
                    }
                }
            }

            if let Some(out_dir) = args.out_dir.or(config.output_dir) {
                let rows = output::build_rows(&scored);
                let summary = output::summarize(&scored);
                match output::write_reports(&out_dir, &rows, &summary) {
                    Ok(paths) => {
                        eprintln!("Wrote {} reports to {}", paths.len(), out_dir.display());
                    }
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_OUTPUT);
                    }
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} profiles ({} shown) in {:?}",
                    scored.len(),
                    shown.len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Summary(_) => {
            let summary = output::summarize(&scored);
            println!("{}", output::format_summary(&summary, use_colors));
        }
        Commands::Open { index, .. } => {
            // Validate index bounds (1-based)
            if index < 1 || index > scored.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    scored.len()
                );
                std::process::exit(EXIT_INPUT);
            }

            let (record, _result) = &scored[index - 1];
            if let Err(e) = stealth_scout::browser::open_url(&record.url) {
                eprintln!("Failed to open browser: {:#}", e);
                std::process::exit(EXIT_OUTPUT);
            }

            println!("Opening {} in browser: {}", record.display_name(), record.url);
        }
        Commands::Check | Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
