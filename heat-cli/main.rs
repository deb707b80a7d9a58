use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use heat_cli::HeatDecoder;
use heat_cli::heat_core::{HeatConfig, init_thread_pool};
use heat_cli::io::{load_config, load_edge_table, load_heatmap, save_config};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "heat")]
#[command(about = "Decode planar wireframes from corner heatmaps and edge scores")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a wireframe and print it as JSON
    Decode(DecodeArgs),
    /// Write a configuration preset to disk
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct DecodeArgs {
    /// Grayscale corner heatmap, 255 = confidence 1.0
    #[arg(long)]
    heatmap: PathBuf,
    /// JSON edge table: [{"a": [x, y], "b": [x, y], "p": prob}, ...]
    #[arg(long)]
    edges: PathBuf,
    /// TOML or JSON configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Probability of segments missing from the edge table
    #[arg(long, default_value_t = 0.0)]
    default_probability: f32,
    #[arg(long)]
    threads: Option<usize>,
    /// Also print the per-round trace as JSON on stderr
    #[arg(long, default_value_t = false)]
    trace: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Preset {
    Default,
    Outdoor,
    Floorplan,
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,
    /// Output path; extension picks TOML or JSON
    #[arg(long, default_value = "heat.toml")]
    out: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.cmd {
        Command::Decode(args) => run_decode(args),
        Command::Config(args) => run_config(args),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_decode(args: DecodeArgs) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => HeatConfig::default(),
    };
    if let Some(n) = args.threads {
        cfg.n_threads = n;
    }
    cfg.validate()?;
    if let Err(e) = init_thread_pool(cfg.n_threads) {
        warn!("Thread pool already initialized: {e}");
    }
    info!("{}", cfg.summary());

    let map = load_heatmap(&args.heatmap)?;
    let table = load_edge_table(&args.edges, args.default_probability)?;
    info!("Loaded {}x{} heatmap, {} scored segments", map.width, map.height, table.len());

    let decoded = HeatDecoder::new(&cfg)?.decode(&map, &table)?;
    println!("{}", serde_json::to_string_pretty(&decoded.wireframe)?);
    if args.trace {
        eprintln!("{}", serde_json::to_string_pretty(&decoded.trace)?);
    }
    Ok(())
}

fn run_config(args: ConfigArgs) -> Result<(), Box<dyn Error>> {
    let cfg = match args.preset {
        Preset::Default => HeatConfig::default(),
        Preset::Outdoor => HeatConfig::outdoor_preset(),
        Preset::Floorplan => HeatConfig::floorplan_preset(),
    };
    save_config(&cfg, &args.out)?;
    println!("Wrote {} to {}", cfg.summary(), args.out.display());
    Ok(())
}
