// wren: command-line front end
//
// Usage:
//   wren prepare --root data/digits                      # training split, 75/25
//   wren prepare --root data/digits --split testing --fraction 0.8 --seed 7
//   wren prepare --root data/digits --export out/        # also write IDX files
//   wren inspect --dir out/ --prefix train               # summarise IDX files

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use wren::data::{
    Dataset, SplitName, DEFAULT_HEIGHT, DEFAULT_TRAINING_FRACTION, DEFAULT_WIDTH, NUM_DIGITS,
};
use wren::pipeline::{prepare, PrepareConfig};
use wren::Result;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log per-image progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble, normalize, encode and split a digit image folder
    Prepare(PrepareArgs),
    /// Print class counts of an exported IDX dataset
    Inspect {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value = "train")]
        prefix: String,
    },
}

#[derive(Args)]
struct PrepareArgs {
    #[arg(long)]
    root: PathBuf,
    #[arg(long, default_value = "training")]
    split: String,
    #[arg(long, default_value_t = DEFAULT_TRAINING_FRACTION)]
    fraction: f64,
    /// Seed for a reproducible split
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
    /// Resize images that do not match --height/--width
    #[arg(long)]
    resize: bool,
    /// Decode files on all cores
    #[arg(long)]
    parallel: bool,
    /// Write the raw train/valid partitions as IDX files here
    #[arg(long)]
    export: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_counts(title: &str, counts: &[usize; NUM_DIGITS]) {
    println!("{title}");
    for (digit, count) in counts.iter().enumerate() {
        println!("  {digit}: {count}");
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    let split: SplitName = args.split.parse()?;
    let config = PrepareConfig::new(args.root)
        .split(split)
        .training_fraction(args.fraction)
        .image_size(args.height, args.width)
        .resize(args.resize)
        .parallel(args.parallel);

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let prepared = prepare(&config, &mut rng)?;

    print_counts(&format!("{split} examples per class:"), &prepared.class_counts);
    println!(
        "train: {} examples, valid: {} examples (realised fraction {:.3})",
        prepared.encoded.train.len(),
        prepared.encoded.valid.len(),
        prepared.encoded.realized_fraction()
    );

    if let Some(dir) = args.export.as_deref() {
        prepared.raw.train.save_idx(dir, "train")?;
        prepared.raw.valid.save_idx(dir, "valid")?;
        println!("exported IDX files to {}", dir.display());
    }
    Ok(())
}

fn run_inspect(dir: &Path, prefix: &str) -> Result<()> {
    let ds = Dataset::load_idx(dir, prefix)?;
    println!("{} examples of shape {}", ds.len(), ds.image_shape());
    print_counts("examples per class:", &ds.class_counts());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Prepare(args) => run_prepare(args),
        Commands::Inspect { dir, prefix } => run_inspect(&dir, &prefix),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
