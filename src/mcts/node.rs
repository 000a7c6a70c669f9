//! Per-state search statistics.
//!
//! One entry stores the four parallel per-column vectors of the transposition
//! table: visit counts, value sums, running averages and priors. Entries are
//! created whole at expansion time and afterwards only grow through
//! [`NodeStats::record`].

use crate::game::state::COLS;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStats {
    visit_count: [u32; COLS],
    value_sum: [f32; COLS],
    value_avg: [f32; COLS],
    prior: [f32; COLS],
}

impl NodeStats {
    pub fn new(prior: [f32; COLS]) -> Self {
        NodeStats {
            visit_count: [0; COLS],
            value_sum: [0.0; COLS],
            value_avg: [0.0; COLS],
            prior,
        }
    }

    /// Credits one traversal of edge `col` with `value`.
    pub fn record(&mut self, col: usize, value: f32) {
        self.visit_count[col] += 1;
        self.value_sum[col] += value;
        self.value_avg[col] = self.value_sum[col] / self.visit_count[col].max(1) as f32;
    }

    pub fn visit_count(&self) -> &[u32; COLS] {
        &self.visit_count
    }

    pub fn value_sum(&self) -> &[f32; COLS] {
        &self.value_sum
    }

    /// Running averages; zero for edges that were never visited.
    pub fn value_avg(&self) -> &[f32; COLS] {
        &self.value_avg
    }

    pub fn prior(&self) -> &[f32; COLS] {
        &self.prior
    }

    /// N(s): total visits over all edges.
    pub fn total_visits(&self) -> u32 {
        self.visit_count.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_zeroed() {
        let node = NodeStats::new([1.0 / COLS as f32; COLS]);
        assert_eq!(node.total_visits(), 0);
        assert!(node.value_avg().iter().all(|&q| q == 0.0));
        assert!(node.value_sum().iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_record_keeps_average_consistent() {
        let mut node = NodeStats::new([0.0; COLS]);
        node.record(2, 1.0);
        node.record(2, -0.5);
        node.record(4, 0.25);

        assert_eq!(node.visit_count()[2], 2);
        assert!((node.value_sum()[2] - 0.5).abs() < 1e-6);
        assert!((node.value_avg()[2] - 0.25).abs() < 1e-6);
        assert!((node.value_avg()[4] - 0.25).abs() < 1e-6);
        assert_eq!(node.value_avg()[0], 0.0);
        assert_eq!(node.total_visits(), 3);
    }

    #[test]
    fn test_record_leaves_prior_untouched() {
        let prior = [0.1, 0.2, 0.3, 0.1, 0.1, 0.1, 0.1];
        let mut node = NodeStats::new(prior);
        node.record(1, 1.0);
        assert_eq!(node.prior(), &prior);
    }
}
