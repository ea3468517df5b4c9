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

//! Full-length discrete Fourier transform of real samples.

use num_complex::Complex;
use rustfft::FftPlanner;

/// Complex DFT of `samples`, same length as the input.
#[must_use]
pub fn dft(samples: &[f64]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    if buffer.is_empty() {
        return buffer;
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}

/// Squared magnitude |X_k|² of every DFT coefficient.
#[must_use]
pub fn power_spectrum(samples: &[f64]) -> Vec<f64> {
    dft(samples).iter().map(Complex::norm_sqr).collect()
}

/// Sample frequencies for a length-`n` DFT, in the usual
/// `[0, 1, ..., n/2-1, -n/2, ..., -1] * fs / n` order.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    reason = "bin indices are far below 2^52"
)]
pub fn fft_frequencies(n: usize, sampling_rate: f64) -> Vec<f64> {
    let positive = n.div_ceil(2);
    let len = n as f64;
    (0..n)
        .map(|k| {
            let bin = if k < positive { k as f64 } else { k as f64 - len };
            bin * sampling_rate / len
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_is_flat() {
        let mut impulse = vec![0.0; 16];
        impulse[0] = 1.0;
        for p in power_spectrum(&impulse) {
            assert!((p - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_length_preserved() {
        let x: Vec<f64> = (0..37).map(f64::from).collect();
        assert_eq!(dft(&x).len(), 37);
        assert!(dft(&[]).is_empty());
    }

    #[test]
    fn test_sine_bin() {
        let n = 64;
        let x: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 5.0 * f64::from(i) / f64::from(n)).sin())
            .collect();
        let p = power_spectrum(&x);
        let peak = p
            .iter()
            .take(32)
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 5);
        // A real sine puts (N/2)^2 into each of its two mirrored bins
        assert!((p[5] - 1024.0).abs() < 1e-6);
        assert!((p[59] - 1024.0).abs() < 1e-6);
    }

    #[test]
    fn test_fft_frequencies_layout() {
        assert_eq!(fft_frequencies(4, 4.0), vec![0.0, 1.0, -2.0, -1.0]);
        assert_eq!(fft_frequencies(5, 5.0), vec![0.0, 1.0, 2.0, -2.0, -1.0]);
        assert!(fft_frequencies(0, 1.0).is_empty());
    }
}
