use std::fs;
use std::path::{Path, PathBuf};

use cardio_ai::{render, render_form, InferenceService, PredictionRequest, ServiceError};
use cardio_data::{load_and_clean, Acquirer, DataError, FetchError, LoadedDataset};
use cardio_model::{evaluate, train_and_save, TrainConfig};
use clap::{Args, Parser, Subcommand};
use log::{debug, LevelFilter};

mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "cardio",
    version,
    about = "Heart-disease risk pipeline: fetch data, train, evaluate and predict",
    long_about = "cardio downloads the Cleveland heart-disease dataset, trains a logistic\n\
        regression model on it and serves single-patient risk predictions.\n\n\
        EXAMPLES:\n\
        \n  cardio fetch                         Download heart.csv\
        \n  cardio train                         Train and save heart_disease_model.json\
        \n  cardio evaluate                      Compare classifiers on the held-out split\
        \n  cardio fields                        List the prediction input fields\
        \n  cardio predict --input patient.json  Predict from a JSON object\
        \n  cardio predict --set age=63 --set sex=1 ...",
    after_help = "Settings are read from cardio.toml in the working directory when present."
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download the raw dataset
    Fetch(FetchArgs),
    /// Clean the dataset, fit the model and save it
    Train(TrainArgs),
    /// Compare logistic regression and a decision tree on the test split
    Evaluate(EvaluateArgs),
    /// List the input fields a prediction needs
    Fields,
    /// Predict heart-disease risk for one patient
    Predict(PredictArgs),
}

#[derive(Debug, Args)]
struct FetchArgs {
    /// Source URL
    #[arg(long)]
    url: Option<String>,

    /// Destination file
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TrainArgs {
    /// Raw dataset file
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Split seed
    #[arg(long)]
    seed: Option<u64>,

    /// Share of rows held out for testing
    #[arg(long)]
    test_fraction: Option<f64>,
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    /// Raw dataset file
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Split seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// Model artifact
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// JSON object with all 13 fields
    #[arg(long, value_name = "JSON_FILE", conflicts_with = "set")]
    input: Option<PathBuf>,

    /// One field as name=value; repeat for every field
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Print the response as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    std::process::exit(run_cli());
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    debug!("effective config: {config:?}");

    match cli.command {
        Command::Fetch(args) => run_fetch(&config, &args),
        Command::Train(args) => run_train(&config, &args),
        Command::Evaluate(args) => run_evaluate(&config, &args),
        Command::Fields => {
            print!("{}", render_form());
            0
        }
        Command::Predict(args) => run_predict(&config, &args),
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn run_fetch(config: &Config, args: &FetchArgs) -> i32 {
    let url = args.url.as_deref().unwrap_or(&config.dataset.url);
    let out = args.out.as_deref().unwrap_or(&config.dataset.path);

    let result = Acquirer::new().and_then(|acquirer| acquirer.download(url, out));
    match result {
        Ok(bytes) => {
            debug!("wrote {bytes} bytes to {}", out.display());
            println!("Download successful");
            0
        }
        Err(FetchError::Status(code)) => {
            println!("Failed to download. Status code: {code}");
            1
        }
        Err(e) => {
            println!("Failed to download. An error occurred: {e}");
            1
        }
    }
}

/// Load the dataset, printing the not-found message the pipeline expects.
fn load_dataset(path: &Path) -> Option<LoadedDataset> {
    match load_and_clean(path) {
        Ok(loaded) => Some(loaded),
        Err(DataError::DatasetNotFound(p)) => {
            println!("Error: {} not found.", p.display());
            None
        }
        Err(e) => {
            eprintln!("error: {e}");
            None
        }
    }
}

fn training_config(config: &Config, seed: Option<u64>, test_fraction: Option<f64>) -> TrainConfig {
    let mut training = config.training.clone();
    if let Some(seed) = seed {
        training.seed = seed;
    }
    if let Some(f) = test_fraction {
        training.test_fraction = f;
    }
    training
}

fn run_train(config: &Config, args: &TrainArgs) -> i32 {
    let data = args.data.as_deref().unwrap_or(&config.dataset.path);
    let model_path = args.model.as_deref().unwrap_or(&config.model.path);
    let training = training_config(config, args.seed, args.test_fraction);
    if let Err(e) = training.validate() {
        eprintln!("error: {e}");
        return 2;
    }

    let Some(loaded) = load_dataset(data) else {
        return 1;
    };
    match train_and_save(&loaded.dataset, &training, model_path) {
        Ok(_) => {
            println!("Model saved as {}", model_path.display());
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

fn run_evaluate(config: &Config, args: &EvaluateArgs) -> i32 {
    let data = args.data.as_deref().unwrap_or(&config.dataset.path);
    let training = training_config(config, args.seed, None);

    let Some(loaded) = load_dataset(data) else {
        return 1;
    };
    println!("Dataset loaded successfully.");
    println!("Missing values before cleaning:");
    for (name, count) in loaded.report.missing_by_name() {
        println!("{name:<9} {count}");
    }
    println!(
        "Rows read: {}, dropped: {}, kept: {}",
        loaded.report.rows_read,
        loaded.report.rows_dropped,
        loaded.report.rows_kept()
    );

    match evaluate(&loaded.dataset, &training) {
        Ok(report) => {
            print!("{report}");
            println!("Verification complete.");
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

fn read_request(args: &PredictArgs) -> Result<PredictionRequest, String> {
    match &args.input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
            PredictionRequest::from_json_str(&text).map_err(|e| e.to_string())
        }
        None => PredictionRequest::from_assignments(&args.set).map_err(|e| e.to_string()),
    }
}

fn run_predict(config: &Config, args: &PredictArgs) -> i32 {
    let model_path = args.model.as_deref().unwrap_or(&config.model.path);
    let service = match InferenceService::open(model_path) {
        Ok(service) => service,
        Err(ServiceError::ModelNotFound(_)) => {
            eprintln!("Model file not found. Please run 'cardio train' first.");
            return 1;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let request = match read_request(args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    match service.predict(&request) {
        Ok(prediction) if args.json => match serde_json::to_string_pretty(&prediction) {
            Ok(text) => {
                println!("{text}");
                0
            }
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        },
        Ok(prediction) => {
            print!("{}", render(&prediction));
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}
