//! Root-parallel search.
//!
//! Each shard owns an independent [`MCTS`] table and runs its share of the
//! simulation budget on the rayon pool; only root statistics are merged
//! afterwards. Shards never share a table, so no virtual loss is needed.

use crate::game::game_board::GameBoard;
use crate::game::player::Player;
use crate::game::state::{State, COLS};
use crate::mcts::algorithm::{RootNoise, MCTS};
use crate::mcts::mcts_result::SearchResult;
use crate::mcts::selection::{argmax_legal, visit_policy};
use crate::neural::predictor::Predictor;
use crate::Result;
use rayon::prelude::*;

struct ShardRoot {
    visits: [u32; COLS],
    value_sum: [f32; COLS],
    prior: Option<[f32; COLS]>,
}

/// Splits `simulations` over `shards` engines and merges their root statistics.
pub fn search_sharded<P: Predictor + Sync + ?Sized>(
    state: &State,
    player: Player,
    predictor: &P,
    c_puct: f32,
    simulations: usize,
    shards: usize,
    root_noise: Option<&RootNoise>,
) -> Result<SearchResult> {
    let shards = shards.clamp(1, simulations.max(1));
    let base = simulations / shards;
    let remainder = simulations % shards;

    let roots: Vec<ShardRoot> = (0..shards)
        .into_par_iter()
        .map(|shard| {
            let budget = base + usize::from(shard < remainder);
            let mut mcts = MCTS::new(c_puct);
            mcts.search(state, player, predictor, budget, root_noise)?;
            let stats = mcts.stats(state, player);
            Ok(ShardRoot {
                visits: mcts.visit_counts(state, player),
                value_sum: stats.map(|n| *n.value_sum()).unwrap_or([0.0; COLS]),
                prior: stats.map(|n| *n.prior()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let result = merge_roots(state, player, &roots, simulations);
    log::debug!(
        "sharded search: {} shards, visits {:?}, best {:?}",
        shards,
        result.visit_counts,
        result.best_column
    );
    Ok(result)
}

fn merge_roots(state: &State, player: Player, roots: &[ShardRoot], simulations: usize) -> SearchResult {
    let board = GameBoard::from_state(*state, player);
    let legal = board.legal_mask();

    let mut visit_counts = [0u32; COLS];
    let mut value_sum = [0.0f32; COLS];
    for root in roots {
        for col in 0..COLS {
            visit_counts[col] += root.visits[col];
            value_sum[col] += root.value_sum[col];
        }
    }

    let total: u32 = visit_counts.iter().sum();
    let root_value = if total > 0 {
        value_sum.iter().sum::<f32>() / total as f32
    } else {
        0.0
    };

    let best_column = if board.is_done() {
        None
    } else if total > 0 {
        argmax_legal(&visit_counts, &legal)
    } else {
        match roots.iter().find_map(|r| r.prior) {
            Some(prior) => argmax_legal(&prior, &legal),
            None => argmax_legal(&[0u32; COLS], &legal),
        }
    };

    let policy = visit_policy(&visit_counts, &legal, 1.0).unwrap_or_else(|| {
        let mut one_hot = [0.0f32; COLS];
        if let Some(col) = best_column {
            one_hot[col] = 1.0;
        }
        one_hot
    });

    SearchResult {
        visit_counts,
        policy,
        root_value,
        best_column,
        simulations,
    }
}
