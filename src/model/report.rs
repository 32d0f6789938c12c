//! Per-epoch training statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Loss summary of one training epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Summed loss divided by `pairs`, or 0 when nothing was trained.
    pub average_loss: f64,
    /// Positive plus negative pairs seen during the epoch.
    pub pairs: usize,
}

impl EpochReport {
    pub(crate) fn new(epoch: usize, total_loss: f64, pairs: usize) -> Self {
        let average_loss = if pairs > 0 {
            total_loss / pairs as f64
        } else {
            0.0
        };
        Self {
            epoch,
            average_loss,
            pairs,
        }
    }
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "epoch {}: loss {:.6} over {} pairs",
            self.epoch, self.average_loss, self.pairs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        let r = EpochReport::new(2, 6.0, 4);
        assert_eq!(r.average_loss, 1.5);
        assert_eq!(EpochReport::new(1, 0.0, 0).average_loss, 0.0);
        assert_eq!(r.to_string(), "epoch 2: loss 1.500000 over 4 pairs");
    }
}
