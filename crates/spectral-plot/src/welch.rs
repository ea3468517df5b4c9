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

//! Welch's overlapped-segment averaged periodogram method.
//!
//! All estimators here share one segmentation discipline:
//!
//! - periodic Hann window of `nperseg` samples
//! - 50% overlap (`noverlap = nperseg / 2`), trailing partial segment dropped
//! - per-segment mean removal before windowing
//! - one-sided spectrum with `nperseg / 2 + 1` bins at `k * fs / nperseg`
//! - density scaling `1 / (fs * Σw²)`, with every bin except DC and an
//!   even-length Nyquist bin doubled to fold in negative frequencies
//!
//! Segments are combined with either the arithmetic mean or the
//! bias-corrected median (see [`Averaging`]).

use std::sync::Arc;

use log::{debug, warn};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{validate_sampling_rate, SpectralError};
use crate::window;

/// How per-segment periodograms are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Averaging {
    /// Arithmetic mean of the segment periodograms (classic Welch).
    #[default]
    Mean,
    /// Median of the segment periodograms, divided by the median bias so
    /// it estimates the same quantity as the mean. Robust to transients.
    Median,
}

impl Averaging {
    /// Label used for plot legends.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
        }
    }
}

/// Parameters for a Welch estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WelchConfig {
    /// Samples per segment (window length and FFT length).
    pub nperseg: usize,
    /// Segment averaging strategy.
    pub averaging: Averaging,
}

impl WelchConfig {
    #[must_use]
    pub fn new(nperseg: usize) -> Self {
        Self {
            nperseg,
            averaging: Averaging::Mean,
        }
    }

    #[must_use]
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    /// Overlap between consecutive segments.
    #[must_use]
    pub fn noverlap(&self) -> usize {
        self.nperseg / 2
    }
}

/// A real-valued spectral estimate: PSD or coherence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectralEstimate {
    /// Frequencies in Hz, ascending.
    pub frequencies: Vec<f64>,
    /// Estimate at each frequency.
    pub values: Vec<f64>,
}

impl SpectralEstimate {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spacing between adjacent frequency bins, if there are at least two.
    #[must_use]
    pub fn resolution(&self) -> Option<f64> {
        match self.frequencies.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }

    /// Frequency and value of the largest bin.
    #[must_use]
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &v)| (self.frequencies[i], v))
    }

    /// Iterate `(frequency, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// A complex cross-spectral density estimate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossSpectralEstimate {
    /// Frequencies in Hz, ascending.
    pub frequencies: Vec<f64>,
    /// Cross spectrum `E[conj(X) * Y]` at each frequency.
    pub values: Vec<Complex<f64>>,
}

impl CrossSpectralEstimate {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// |Pxy| at each frequency.
    #[must_use]
    pub fn magnitude(&self) -> SpectralEstimate {
        SpectralEstimate {
            frequencies: self.frequencies.clone(),
            values: self.values.iter().map(|c| c.norm()).collect(),
        }
    }

    /// Re(Pxy) at each frequency.
    #[must_use]
    pub fn real(&self) -> SpectralEstimate {
        SpectralEstimate {
            frequencies: self.frequencies.clone(),
            values: self.values.iter().map(|c| c.re).collect(),
        }
    }
}

/// Welch power spectral density of `x`.
///
/// `nperseg` larger than the signal is clamped to the signal length.
pub fn welch(
    x: &[f64],
    sampling_rate: f64,
    config: WelchConfig,
) -> Result<SpectralEstimate, SpectralError> {
    let plan = SegmentPlan::new(x.len(), sampling_rate, config)?;
    let spectra = plan.segment_spectra(x);

    let periodograms: Vec<Vec<f64>> = spectra
        .iter()
        .map(|seg| {
            seg.iter()
                .enumerate()
                .map(|(k, c)| c.norm_sqr() * plan.bin_scale(k))
                .collect()
        })
        .collect();

    let values = match config.averaging {
        Averaging::Mean => mean_over_segments(&periodograms),
        Averaging::Median => median_over_segments(&periodograms),
    };

    Ok(SpectralEstimate {
        frequencies: plan.frequencies(),
        values,
    })
}

/// Welch cross power spectral density `E[conj(X) * Y]` of `x` and `y`.
pub fn csd(
    x: &[f64],
    y: &[f64],
    sampling_rate: f64,
    config: WelchConfig,
) -> Result<CrossSpectralEstimate, SpectralError> {
    check_same_length(x, y)?;
    let plan = SegmentPlan::new(x.len(), sampling_rate, config)?;
    let x_spectra = plan.segment_spectra(x);
    let y_spectra = plan.segment_spectra(y);

    let cross: Vec<Vec<Complex<f64>>> = x_spectra
        .iter()
        .zip(&y_spectra)
        .map(|(xs, ys)| {
            xs.iter()
                .zip(ys)
                .enumerate()
                .map(|(k, (xk, yk))| xk.conj() * yk * plan.bin_scale(k))
                .collect()
        })
        .collect();

    let values = match config.averaging {
        Averaging::Mean => {
            let re = mean_over_segments(&component(&cross, |c| c.re));
            let im = mean_over_segments(&component(&cross, |c| c.im));
            zip_complex(re, im)
        }
        Averaging::Median => {
            let re = median_over_segments(&component(&cross, |c| c.re));
            let im = median_over_segments(&component(&cross, |c| c.im));
            zip_complex(re, im)
        }
    };

    Ok(CrossSpectralEstimate {
        frequencies: plan.frequencies(),
        values,
    })
}

/// Magnitude-squared coherence `|Pxy|² / (Pxx * Pyy)` of `x` and `y`.
///
/// Bins where either auto-spectrum is zero report 0. Values are clamped to
/// [0, 1] to absorb rounding.
pub fn coherence(
    x: &[f64],
    y: &[f64],
    sampling_rate: f64,
    config: WelchConfig,
) -> Result<SpectralEstimate, SpectralError> {
    check_same_length(x, y)?;
    let pxx = welch(x, sampling_rate, config)?;
    let pyy = welch(y, sampling_rate, config)?;
    let pxy = csd(x, y, sampling_rate, config)?;
    coherence_from(&pxx, &pyy, &pxy)
}

/// Coherence from already computed auto- and cross-spectra.
///
/// All three estimates must share one frequency grid.
pub fn coherence_from(
    pxx: &SpectralEstimate,
    pyy: &SpectralEstimate,
    pxy: &CrossSpectralEstimate,
) -> Result<SpectralEstimate, SpectralError> {
    if pxx.len() != pxy.len() || pyy.len() != pxy.len() {
        return Err(SpectralError::ShapeMismatch(format!(
            "coherence inputs differ in length (Pxx {}, Pyy {}, Pxy {})",
            pxx.len(),
            pyy.len(),
            pxy.len()
        )));
    }

    let values = pxy
        .values
        .iter()
        .zip(pxx.values.iter().zip(&pyy.values))
        .map(|(cross, (&sxx, &syy))| {
            let denom = sxx * syy;
            if denom > 0.0 {
                (cross.norm_sqr() / denom).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect();

    Ok(SpectralEstimate {
        frequencies: pxy.frequencies.clone(),
        values,
    })
}

/// Bias of the median of `n` chi-squared(2) periodogram samples relative
/// to their mean.
#[must_use]
pub fn median_bias(n: usize) -> f64 {
    let terms = n.saturating_sub(1) / 2;
    1.0 + (1..=terms)
        .map(|i| {
            #[allow(
                clippy::cast_precision_loss,
                reason = "segment counts are small"
            )]
            let even = 2.0 * i as f64;
            1.0 / (even + 1.0) - 1.0 / even
        })
        .sum::<f64>()
}

fn check_same_length(x: &[f64], y: &[f64]) -> Result<(), SpectralError> {
    if x.len() == y.len() {
        Ok(())
    } else {
        Err(SpectralError::ShapeMismatch(format!(
            "cross-spectral inputs differ in length ({} vs {})",
            x.len(),
            y.len()
        )))
    }
}

/// Segmentation, window and scaling for one estimator call.
struct SegmentPlan {
    nperseg: usize,
    step: usize,
    segments: usize,
    sampling_rate: f64,
    window: Vec<f64>,
    scale: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl SegmentPlan {
    fn new(len: usize, sampling_rate: f64, config: WelchConfig) -> Result<Self, SpectralError> {
        validate_sampling_rate(sampling_rate)?;
        if len == 0 {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one sample".to_string(),
            ));
        }
        if config.nperseg == 0 {
            return Err(SpectralError::invalid(
                "nperseg",
                "segment length must be at least one sample",
            ));
        }

        let nperseg = if config.nperseg > len {
            warn!(
                "nperseg = {} is greater than signal length {len}, using nperseg = {len}",
                config.nperseg
            );
            len
        } else {
            config.nperseg
        };

        let noverlap = nperseg / 2;
        let step = nperseg - noverlap;
        let segments = (len - nperseg) / step + 1;

        let window = window::hann(nperseg);
        let scale = 1.0 / (sampling_rate * window::energy(&window));
        let fft = FftPlanner::<f64>::new().plan_fft_forward(nperseg);

        debug!(
            "Welch plan: {len} samples, nperseg={nperseg}, noverlap={noverlap}, {segments} segments"
        );

        Ok(Self {
            nperseg,
            step,
            segments,
            sampling_rate,
            window,
            scale,
            fft,
        })
    }

    fn bins(&self) -> usize {
        self.nperseg / 2 + 1
    }

    /// Density scale for bin `k`, including the one-sided doubling.
    fn bin_scale(&self, k: usize) -> f64 {
        let nyquist = self.nperseg % 2 == 0 && k == self.nperseg / 2;
        if k == 0 || nyquist {
            self.scale
        } else {
            2.0 * self.scale
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "bin indices and segment length are far below 2^52"
    )]
    fn frequencies(&self) -> Vec<f64> {
        let n = self.nperseg as f64;
        (0..self.bins())
            .map(|k| k as f64 * self.sampling_rate / n)
            .collect()
    }

    /// One-sided FFT of every detrended, windowed segment of `x`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "segment length is far below 2^52"
    )]
    fn segment_spectra(&self, x: &[f64]) -> Vec<Vec<Complex<f64>>> {
        let bins = self.bins();
        let mut buffer = vec![Complex::new(0.0, 0.0); self.nperseg];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];

        (0..self.segments)
            .map(|s| {
                let start = s * self.step;
                let segment = &x[start..start + self.nperseg];
                let mean = segment.iter().sum::<f64>() / self.nperseg as f64;

                for ((slot, &sample), &w) in buffer.iter_mut().zip(segment).zip(&self.window) {
                    *slot = Complex::new((sample - mean) * w, 0.0);
                }
                self.fft.process_with_scratch(&mut buffer, &mut scratch);
                buffer[..bins].to_vec()
            })
            .collect()
    }
}

fn component(
    spectra: &[Vec<Complex<f64>>],
    part: impl Fn(&Complex<f64>) -> f64,
) -> Vec<Vec<f64>> {
    spectra
        .iter()
        .map(|seg| seg.iter().map(&part).collect())
        .collect()
}

fn zip_complex(re: Vec<f64>, im: Vec<f64>) -> Vec<Complex<f64>> {
    re.into_iter()
        .zip(im)
        .map(|(re, im)| Complex::new(re, im))
        .collect()
}

#[allow(
    clippy::cast_precision_loss,
    reason = "segment counts are small"
)]
fn mean_over_segments(segments: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    let count = segments.len() as f64;
    (0..first.len())
        .map(|k| segments.iter().map(|seg| seg[k]).sum::<f64>() / count)
        .collect()
}

fn median_over_segments(segments: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    if segments.len() == 1 {
        return first.clone();
    }

    let bias = median_bias(segments.len());
    let mut column = Vec::with_capacity(segments.len());
    (0..first.len())
        .map(|k| {
            column.clear();
            column.extend(segments.iter().map(|seg| seg[k]));
            median(&mut column) / bias
        })
        .collect()
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
