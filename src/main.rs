//! Self-play data generator.
//!
//! Plays games of the engine against itself, in parallel, and writes every
//! position with its search policy and final outcome to a CSV file.

use clap::Parser;
use connect4_zero::logging::setup_logging;
use connect4_zero::recording::CsvWriter;
use connect4_zero::{
    play_game, GameRecord, MCTSHyperparameters, Player, Predictor, TorchPredictor,
    UniformPredictor,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tch::Device;

#[derive(Parser, Debug)]
#[command(name = "connect4_zero")]
#[command(about = "AlphaZero-style Connect-Four self-play")]
struct Args {
    /// Number of self-play games
    #[arg(short = 'g', long, default_value_t = 10)]
    games: usize,

    /// MCTS simulations per move (overrides the config file)
    #[arg(short = 's', long)]
    simulations: Option<usize>,

    /// PUCT exploration constant (overrides the config file)
    #[arg(long)]
    c_puct: Option<f32>,

    /// Random seed; game `i` uses `seed + i`
    #[arg(long, default_value_t = 2025)]
    seed: u64,

    /// JSON file with MCTS hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// TorchScript model returning (policy_logits, value); uniform predictor if absent
    #[arg(long)]
    model: Option<PathBuf>,

    /// Directory for the generated CSV
    #[arg(long, default_value = "selfplay_data")]
    output_dir: PathBuf,

    /// Directory for rotated log files (stderr only if absent)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Worker threads for parallel games (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn build_params(args: &Args) -> connect4_zero::Result<MCTSHyperparameters> {
    let mut params = match &args.config {
        Some(path) => MCTSHyperparameters::from_json_file(path)?,
        None => MCTSHyperparameters::default(),
    };
    if let Some(simulations) = args.simulations {
        params.num_simulations = simulations;
    }
    if let Some(c_puct) = args.c_puct {
        params.c_puct = c_puct;
    }
    params.validate()?;
    Ok(params)
}

fn run_self_play<P: Predictor + Sync>(
    predictor: &P,
    params: &MCTSHyperparameters,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let records: Vec<GameRecord> = (0..args.games)
        .into_par_iter()
        .map(|game_id| {
            let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(game_id as u64));
            play_game(predictor, params, &mut rng, game_id)
        })
        .collect::<connect4_zero::Result<Vec<_>>>()?;

    let mut writer = CsvWriter::new(&args.output_dir)?;
    for record in &records {
        writer.write_game(record)?;
    }
    writer.flush()?;

    let count = |winner: Option<Player>| records.iter().filter(|r| r.winner == winner).count();
    let total_plies: usize = records.iter().map(|r| r.len()).sum();
    log::info!(
        "{} games in {:.1}s: Player1 {} / Player2 {} / draws {}, {:.1} plies per game",
        records.len(),
        start.elapsed().as_secs_f64(),
        count(Some(Player::Player1)),
        count(Some(Player::Player2)),
        count(None),
        total_plies as f64 / records.len().max(1) as f64
    );
    log::info!(
        "wrote {} examples to {}",
        writer.rows_written(),
        writer.path().display()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let _logger = setup_logging(args.log_dir.as_deref())?;

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }

    let params = build_params(&args)?;
    log::info!("self-play with {:?}", params);

    match &args.model {
        Some(path) => {
            let predictor = Mutex::new(TorchPredictor::load(path, Device::cuda_if_available())?);
            run_self_play(&predictor, &params, &args)
        }
        None => run_self_play(&UniformPredictor, &params, &args),
    }
}
