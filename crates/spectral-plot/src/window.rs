// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tapering windows applied to each Welch segment.

use std::f64::consts::PI;

/// Periodic Hann window of length `size`.
///
/// Periodic (not symmetric) so that overlapping segments at 50% sum to a
/// constant, which is the form spectral estimators expect.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    reason = "window length and index to f64 are exact for practical sizes"
)]
pub fn hann(size: usize) -> Vec<f64> {
    match size {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let n = size as f64;
            (0..size)
                .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n).cos())
                .collect()
        }
    }
}

/// Sum of squared coefficients, the power normalisation for density scaling.
#[must_use]
pub fn energy(window: &[f64]) -> f64 {
    window.iter().map(|w| w * w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_shape() {
        let w = hann(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
        // Periodic form: w[k] == w[n - k]
        assert!((w[1] - w[7]).abs() < 1e-12);
    }

    #[test]
    fn test_hann_overlap_add_is_constant() {
        let w = hann(16);
        for i in 0..8 {
            assert!((w[i] + w[i + 8] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_energy() {
        // Σ hann² over a full period is 3n/8
        let w = hann(64);
        assert!((energy(&w) - 24.0).abs() < 1e-9);
        assert!(hann(0).is_empty());
        assert_eq!(hann(1), vec![1.0]);
    }
}
