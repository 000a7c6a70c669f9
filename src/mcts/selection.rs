//! Selection strategies for PUCT MCTS
//!
//! - In-tree edge choice with the PUCT score
//! - Root move choice from visit counts (greedy or temperature-scaled)

use crate::game::state::COLS;
use crate::mcts::node::NodeStats;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand_distr::Distribution;

/// PUCT score of one edge.
///
/// Formula: Q(s,a) + c_puct × P(s,a) × sqrt(N(s)) / (1 + N(s,a))
pub fn puct_score(q: f32, prior: f32, parent_visits: u32, child_visits: u32, c_puct: f32) -> f32 {
    q + c_puct * prior * (parent_visits as f32).sqrt() / (1.0 + child_visits as f32)
}

/// Selects the legal column with the highest PUCT score.
///
/// `prior` overrides the stored priors (used for noisy root priors). Ties go to
/// the lowest column index. Returns `None` when no column is legal.
pub fn select_column(
    node: &NodeStats,
    prior: &[f32; COLS],
    legal: &[bool; COLS],
    c_puct: f32,
) -> Option<usize> {
    let parent_visits = node.total_visits();
    let mut best: Option<(usize, f32)> = None;

    for col in (0..COLS).filter(|&c| legal[c]) {
        let score = puct_score(
            node.value_avg()[col],
            prior[col],
            parent_visits,
            node.visit_count()[col],
            c_puct,
        );
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((col, score)),
        }
    }

    best.map(|(col, _)| col)
}

/// Index of the largest value among legal columns, lowest index on ties.
pub fn argmax_legal<T: PartialOrd + Copy>(values: &[T; COLS], legal: &[bool; COLS]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for col in (0..COLS).filter(|&c| legal[c]) {
        match best {
            Some(b) if values[col] <= values[b] => {}
            _ => best = Some(col),
        }
    }
    best
}

/// Visit-count policy with temperature over legal columns.
///
/// `pi(a) ∝ N(a)^(1/T)`. Returns `None` when there are no visits on legal
/// columns, so the caller can fall back to a deterministic choice.
pub fn visit_policy(
    visits: &[u32; COLS],
    legal: &[bool; COLS],
    temperature: f32,
) -> Option<[f32; COLS]> {
    let best = argmax_legal(visits, legal)?;
    if visits[best] == 0 {
        return None;
    }

    let mut policy = [0.0f32; COLS];
    if temperature <= f32::EPSILON {
        policy[best] = 1.0;
        return Some(policy);
    }

    // Scale by the max count first so large exponents cannot overflow.
    let max_visits = visits[best] as f64;
    let exponent = 1.0 / temperature as f64;
    let mut weights = [0.0f64; COLS];
    for col in (0..COLS).filter(|&c| legal[c]) {
        weights[col] = (visits[col] as f64 / max_visits).powf(exponent);
    }
    let total: f64 = weights.iter().sum();
    for col in 0..COLS {
        policy[col] = (weights[col] / total) as f32;
    }
    Some(policy)
}

/// Samples a column proportionally to `policy`.
pub fn sample_column(policy: &[f32; COLS], rng: &mut StdRng) -> Option<usize> {
    let total: f32 = policy.iter().filter(|p| **p > 0.0).sum();
    if total <= 0.0 {
        return None;
    }

    let u: f32 = StandardUniform.sample(rng);
    let target = u * total;
    let mut cumulative = 0.0f32;
    let mut last_positive = None;
    for (col, &p) in policy.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(col);
        if target < cumulative {
            return Some(col);
        }
    }
    // rounding can leave target just above the final cumulative sum
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const ALL_LEGAL: [bool; COLS] = [true; COLS];

    #[test]
    fn test_puct_score_formula() {
        let score = puct_score(0.5, 0.2, 16, 3, 1.5);
        let expected = 0.5 + 1.5 * 0.2 * 4.0 / 4.0;
        assert!((score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_select_column_unvisited_ties_to_lowest() {
        let node = NodeStats::new([1.0 / COLS as f32; COLS]);
        let selected = select_column(&node, node.prior(), &ALL_LEGAL, 1.0);
        assert_eq!(selected, Some(0));
    }

    #[test]
    fn test_select_column_follows_prior_once_visited() {
        let mut prior = [0.05; COLS];
        prior[4] = 0.7;
        let mut node = NodeStats::new(prior);
        node.record(0, 0.0);

        let selected = select_column(&node, node.prior(), &ALL_LEGAL, 1.0);
        assert_eq!(selected, Some(4));
    }

    #[test]
    fn test_select_column_skips_illegal() {
        let mut prior = [0.0; COLS];
        prior[0] = 1.0;
        let mut node = NodeStats::new(prior);
        node.record(0, 1.0);

        let mut legal = ALL_LEGAL;
        legal[0] = false;
        let selected = select_column(&node, node.prior(), &legal, 1.0);
        assert_eq!(selected, Some(1));

        assert_eq!(select_column(&node, node.prior(), &[false; COLS], 1.0), None);
    }

    #[test]
    fn test_select_column_prefers_high_value() {
        let mut node = NodeStats::new([1.0 / COLS as f32; COLS]);
        for _ in 0..5 {
            node.record(3, 1.0);
            node.record(1, -1.0);
        }
        let selected = select_column(&node, node.prior(), &ALL_LEGAL, 1.0);
        assert_eq!(selected, Some(3));
    }

    #[test]
    fn test_visit_policy_greedy_and_temperature() {
        let visits = [0, 10, 30, 0, 10, 0, 0];
        let greedy = visit_policy(&visits, &ALL_LEGAL, 0.0).unwrap();
        assert_eq!(greedy[2], 1.0);
        assert_eq!(greedy.iter().sum::<f32>(), 1.0);

        let proportional = visit_policy(&visits, &ALL_LEGAL, 1.0).unwrap();
        assert!((proportional[2] - 0.6).abs() < 1e-6);
        assert!((proportional[1] - 0.2).abs() < 1e-6);
        assert_eq!(proportional[0], 0.0);

        assert!(visit_policy(&[0; COLS], &ALL_LEGAL, 1.0).is_none());
    }

    #[test]
    fn test_visit_policy_ignores_illegal_columns() {
        let visits = [50, 1, 0, 0, 0, 0, 0];
        let mut legal = ALL_LEGAL;
        legal[0] = false;
        let policy = visit_policy(&visits, &legal, 1.0).unwrap();
        assert_eq!(policy[0], 0.0);
        assert_eq!(policy[1], 1.0);
    }

    #[test]
    fn test_sample_column_respects_support() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut policy = [0.0; COLS];
        policy[5] = 1.0;
        for _ in 0..20 {
            assert_eq!(sample_column(&policy, &mut rng), Some(5));
        }

        let mut split = [0.0; COLS];
        split[1] = 0.5;
        split[6] = 0.5;
        let mut seen = [0usize; COLS];
        for _ in 0..400 {
            seen[sample_column(&split, &mut rng).unwrap()] += 1;
        }
        assert_eq!(seen[1] + seen[6], 400);
        assert!(seen[1] > 100 && seen[6] > 100);

        assert_eq!(sample_column(&[0.0; COLS], &mut rng), None);
    }
}
