
// imports
use crate::accumulator::Accumulator;


// distances past this are computed on the fly
const MAX_CACHED: usize = 1 << 12;

/// Distance decay weights, `weights[d] = 1 / (d + 1)`, looked up by token distance.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    window_size: usize,
    weights: Vec<f64>,
}

impl WeightTable {

    /// A non positive window size gives an empty table, hence no pairs.
    pub fn new(window_size: i64) -> WeightTable {
        let window_size = usize::try_from(window_size.max(0)).unwrap_or(usize::MAX);
        let cached = window_size.min(MAX_CACHED);
        WeightTable {
            window_size,
            weights: (0..cached).map(|d| 1.0 / (d as f64 + 1.0)).collect(),
        }
    }

    /// Weight of a pair `distance` tokens apart, `distance` in `1..=window_size`.
    #[inline]
    pub fn get(&self, distance: usize) -> f64 {
        match self.weights.get(distance.wrapping_sub(1)) {
            Some(w) => *w,
            None => 1.0 / distance as f64,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    // the precomputed prefix only
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

}


/// Accumulates every pair of `ids` at most `window_size` positions apart,
/// each pair counted once (only `j > i`).
pub fn window_pass(ids: &[u32], weights: &WeightTable, acc: &mut Accumulator) {

    let n = ids.len();
    let window_size = weights.window_size();

    for i in 0..n {
        let window_end = i.saturating_add(window_size).saturating_add(1).min(n);
        for j in i+1..window_end {
            let w = weights.get(j - i) as f32;
            acc.add(ids[i], ids[j], w);
        }
    }
}
