use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use regatta_scorer::config::OutputFormat;
use regatta_scorer::publish::PublishedResults;
use regatta_scorer::standings::ClassResult;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank every class in a results file and print the leaderboards
    Rank {
        /// Regatta results file (YAML, or JSON with a .json extension)
        file: PathBuf,
        /// Only rank this class
        #[arg(long)]
        class: Option<String>,
        /// Output format (defaults to the config file setting, then table)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Report every questionable result in a results file
    Check {
        file: PathBuf,
    },
    /// Count wins and podiums per sailor across results files
    Podium {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write the ranked results of an event to a JSON file
    Publish {
        file: PathBuf,
        /// Destination for the published results
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "regatta-scorer")]
#[command(about = "Low-point regatta scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/regatta-scorer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);
    let config = match regatta_scorer::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring();
    if let Err(errors) = regatta_scorer::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    debug!(discard_threshold = scoring.discard_threshold(), "scoring config");

    let use_colors = regatta_scorer::output::should_use_colors();

    let code = match cli.command {
        Commands::Rank {
            file,
            class,
            format,
        } => {
            let regatta = load_or_exit(&file);
            let classes: Vec<_> = match class {
                Some(name) => match regatta.class(&name) {
                    Some(c) => vec![c],
                    None => {
                        eprintln!("No class named '{}' in {}", name, file.display());
                        std::process::exit(EXIT_CONFIG);
                    }
                },
                None => regatta.classes.iter().collect(),
            };

            let results: Vec<ClassResult> = classes
                .into_iter()
                .map(|c| ClassResult {
                    event: regatta.event.clone(),
                    class: c.name.clone(),
                    entries: c.rank(&scoring),
                })
                .collect();

            match format.unwrap_or_else(|| config.output_format()) {
                OutputFormat::Table => {
                    let tables: Vec<String> = results
                        .iter()
                        .map(|r| {
                            regatta_scorer::output::format_leaderboard(
                                &r.class,
                                &r.entries,
                                use_colors,
                            )
                        })
                        .collect();
                    if tables.is_empty() {
                        println!("No classes in {}.", file.display());
                    } else {
                        println!("{}", tables.join("\n\n"));
                    }
                }
                OutputFormat::Tsv => {
                    for result in &results {
                        let tsv = regatta_scorer::output::format_tsv(&result.entries);
                        if !tsv.is_empty() {
                            println!("{}", tsv);
                        }
                    }
                }
                OutputFormat::Json => match regatta_scorer::output::format_json(&results) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
            }
            EXIT_SUCCESS
        }
        Commands::Check { file } => {
            let regatta = load_or_exit(&file);
            let mut problems = 0;
            for class in &regatta.classes {
                if let Err(errors) = regatta_scorer::scoring::validate_class(class) {
                    problems += errors.len();
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                }
            }
            if problems > 0 {
                eprintln!("{} problem(s) found in {}", problems, file.display());
                EXIT_CONFIG
            } else {
                println!(
                    "{}: {} class(es) OK",
                    regatta.event,
                    regatta.classes.len()
                );
                EXIT_SUCCESS
            }
        }
        Commands::Podium { files } => {
            let mut results = Vec::new();
            for file in &files {
                let regatta = load_or_exit(file);
                let published = PublishedResults::from_regatta(&regatta, &scoring);
                results.extend(published.classes);
            }
            let records = regatta_scorer::standings::tally(&results);
            println!(
                "{}",
                regatta_scorer::output::format_standings(&records, use_colors)
            );
            EXIT_SUCCESS
        }
        Commands::Publish { file, out } => {
            let regatta = load_or_exit(&file);
            for class in &regatta.classes {
                if let Err(errors) = regatta_scorer::scoring::validate_class(class) {
                    warn!(
                        class = %class.name,
                        problems = errors.len(),
                        "publishing with questionable results"
                    );
                }
            }
            let published = PublishedResults::from_regatta(&regatta, &scoring);
            match regatta_scorer::publish::save_published(&out, &published) {
                Ok(()) => {
                    println!(
                        "Published {} class(es) of {} to {}",
                        published.classes.len(),
                        published.event,
                        out.display()
                    );
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!("Publish failed: {:#}", e);
                    EXIT_FAILURE
                }
            }
        }
    };

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(code);
}

fn load_or_exit(path: &std::path::Path) -> regatta_scorer::regatta::RegattaFile {
    match regatta_scorer::regatta::load_regatta(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Results error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}
