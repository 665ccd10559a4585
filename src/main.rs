use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sigmanet::data::label::label_from_path;
use sigmanet::{
    evaluate, server, train_loop, Backprop, FileList, GaussianRng, GrayInput, ImageFolder,
    Network, TrainConfig,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sigmanet")]
#[command(about = "Train and run sigmoid feedforward networks on labelled images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network file; defaults to the config's `network_path`
    #[arg(short, long, global = true)]
    network: Option<PathBuf>,

    /// JSON training config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for initialization and batching
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Verbosity level
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on images stored as <DIR>/<label>/<file>
    Train {
        dir: PathBuf,

        /// Continue from the existing network file instead of a random one
        #[arg(long)]
        resume: bool,
    },

    /// Report cost and accuracy on a labelled image folder
    Test { dir: PathBuf },

    /// Classify a single image
    Predict { file: PathBuf },

    /// Serve predictions over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:7878")]
        addr: String,
    },

    /// Print the layer sizes, labels and parameters of a network
    Show,

    /// Write the default training config as JSON
    InitConfig { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => TrainConfig::load_json(path)
            .with_context(|| format!("Could not load config {}", path.display()))?,
        None => TrainConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let network_path = cli.network.clone().unwrap_or_else(|| config.network_path.clone());

    match cli.command {
        Commands::Train { dir, resume } => train(&config, &network_path, &dir, resume),
        Commands::Test { dir } => test(&config, &network_path, &dir),
        Commands::Predict { file } => predict(&network_path, &file),
        Commands::Serve { addr } => {
            let network = load_network(&network_path)?;
            server::serve(&addr, network)?;
            Ok(())
        }
        Commands::Show => {
            print!("{}", load_network(&network_path)?);
            Ok(())
        }
        Commands::InitConfig { path } => {
            config.save_json(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn train(config: &TrainConfig, network_path: &Path, dir: &Path, resume: bool) -> Result<()> {
    config.validate()?;
    let files = collect_files(dir)?;
    let mut rng = GaussianRng::from_seed_option(config.seed);

    let mut backprop = if resume {
        let network = load_network(network_path)?;
        Backprop::from_network(network, config.cost, config.regularization)?
    } else {
        Backprop::new(
            &config.layer_sizes(),
            Some(config.output_labels.clone()),
            config.cost,
            config.regularization,
            &mut rng,
        )?
    };
    let network = backprop.network();
    let folder = ImageFolder::new(files, network.input_size(), network.output_size());

    info!(
        samples = folder.files().len(),
        epochs = config.epochs,
        batch_size = config.batch_size,
        "training"
    );
    let cost = train_loop(&mut backprop, &folder, config, &mut rng, None)?;
    info!(cost, "training finished");

    save_network(backprop.network(), network_path)?;
    println!("Saved network to {}", network_path.display());
    Ok(())
}

fn test(config: &TrainConfig, network_path: &Path, dir: &Path) -> Result<()> {
    let files = collect_files(dir)?;
    let network = load_network(network_path)?;
    let folder = ImageFolder::new(files, network.input_size(), network.output_size());
    let dataset = folder.load_all()?;

    let mut backprop = Backprop::from_network(network, config.cost, config.regularization)?;
    let eval = evaluate(&mut backprop, &dataset)?;
    println!("Samples:  {}", eval.samples);
    println!("Cost:     {:.6}", eval.cost);
    println!("Accuracy: {:.2}%", eval.accuracy * 100.0);
    Ok(())
}

fn predict(network_path: &Path, file: &Path) -> Result<()> {
    let mut network = load_network(network_path)?;
    let input = GrayInput::load(file)?;
    let prediction = network.predict(&input.data)?;

    println!(
        "Prediction: {} ({:.2}% confidence)",
        prediction.label,
        prediction.confidence * 100.0
    );
    if let Ok(label) = label_from_path(file) {
        println!("Correct label: {label}");
    }
    Ok(())
}

fn collect_files(dir: &Path) -> Result<FileList> {
    let files = FileList::collect(dir)?;
    if files.is_empty() {
        bail!("No files found in {}", dir.display());
    }
    for (label, path) in files.preview(5) {
        info!(?label, path = %path.display(), "sample");
    }
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

fn load_network(path: &Path) -> Result<Network> {
    let network = if is_json(path) {
        Network::load_json(path)
    } else {
        Network::load(path)
    };
    network.with_context(|| format!("Could not load network {}", path.display()))
}

fn save_network(network: &Network, path: &Path) -> Result<()> {
    if is_json(path) {
        network.save_json(path)?;
    } else {
        network.save(path)?;
    }
    Ok(())
}
