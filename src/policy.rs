//! Action selection shared by the agents.

use ndarray::Array2;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use crate::env::Action;
use crate::error::{Error, Result};


/// Index and value of the largest entry. Ties are broken uniformly at random.
pub fn argmax<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> (Action, f64) {
    let mut top = f64::NEG_INFINITY;
    let mut ties: Vec<Action> = Vec::new();
    for (a, &v) in values.iter().enumerate() {
        if v > top {
            top = v;
            ties.clear();
        }
        if v == top {
            ties.push(a);
        }
    }
    if ties.is_empty() {
        return (0, top);
    }
    let winner = ties[rng.random_range(0..ties.len())];
    (winner, values[winner])
}

/// With probability `epsilon` a uniformly random action, otherwise a greedy one.
pub fn epsilon_greedy<R: Rng + ?Sized>(values: &[f64], epsilon: f64, rng: &mut R) -> Action {
    if rng.random::<f64>() < epsilon {
        rng.random_range(0..values.len())
    } else {
        argmax(values, rng).0
    }
}

/// Action probabilities of the epsilon-greedy policy. Greedy mass is shared
/// between tied actions.
pub fn epsilon_greedy_probs(values: &[f64], epsilon: f64) -> Vec<f64> {
    let n = values.len() as f64;
    let top = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let num_top = values.iter().filter(|&&v| v == top).count() as f64;
    values.iter()
        .map(|&v| {
            let greedy = if v == top { (1.0 - epsilon) / num_top } else { 0.0 };
            epsilon / n + greedy
        })
        .collect()
}

/// Softmax over action preferences. The largest preference is subtracted
/// first so large preferences don't overflow.
pub fn softmax(preferences: &[f64]) -> Vec<f64> {
    let c = preferences.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let numerators: Vec<f64> = preferences.iter().map(|&h| (h - c).exp()).collect();
    let denominator: f64 = numerators.iter().sum();
    numerators.iter().map(|&x| x / denominator).collect()
}

/// Draw an action with the given probabilities.
pub fn sample_action<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> Result<Action> {
    let dist = WeightedIndex::new(probs)
        .map_err(|e| Error::Policy(e.to_string()))?;
    Ok(dist.sample(rng))
}

/// Linear value of every action for a set of active tiles. Row `a` of
/// `weights` holds the weights of action `a`.
pub fn linear_action_values(weights: &Array2<f64>, tiles: &[usize]) -> Vec<f64> {
    weights.rows()
        .into_iter()
        .map(|row| tiles.iter().map(|&i| row[i]).sum())
        .collect()
}
