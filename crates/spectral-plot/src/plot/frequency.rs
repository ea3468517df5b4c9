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

//! Single-channel frequency-domain view.

use log::debug;

use super::FREQUENCY_LABEL;
use crate::dft;
use crate::error::{validate_sampling_rate, SpectralError};
use crate::figure::{Axes, AxisScale, Figure, Series};
use crate::signal::Signal;
use crate::welch::{self, Averaging, WelchConfig};

/// Welch segment length used by [`plot_frequency_domain`].
///
/// Clamped to the signal length when the signal is shorter, so the
/// effective window is `min(DEFAULT_WELCH_SEGMENT_LENGTH, N)`.
pub const DEFAULT_WELCH_SEGMENT_LENGTH: usize = 1024;

/// X coordinates used for the DFT panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DftAxis {
    /// Coefficient index `0..N`.
    #[default]
    BinIndex,
    /// Signed bin frequency in Hz, `k * fs / N` wrapped to negative
    /// frequencies above Nyquist.
    Frequency,
}

/// Knobs for [`plot_frequency_domain_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPlotOptions {
    /// Requested Welch segment length before clamping.
    pub segment_length: usize,
    pub dft_axis: DftAxis,
}

impl Default for FrequencyPlotOptions {
    fn default() -> Self {
        Self {
            segment_length: DEFAULT_WELCH_SEGMENT_LENGTH,
            dft_axis: DftAxis::default(),
        }
    }
}

/// DFT power and Welch PSD (mean and median) of `signal`, with default
/// options.
///
/// Returns a 2×1 figure: the top panel is |X_k|² against coefficient index,
/// the bottom panel holds both PSD curves on a log axis.
pub fn plot_frequency_domain(signal: &Signal, sampling_rate: f64) -> Result<Figure, SpectralError> {
    plot_frequency_domain_with(signal, sampling_rate, &FrequencyPlotOptions::default())
}

/// [`plot_frequency_domain`] with explicit options.
#[allow(
    clippy::cast_precision_loss,
    reason = "DFT bin index to f64 is exact for practical lengths"
)]
pub fn plot_frequency_domain_with(
    signal: &Signal,
    sampling_rate: f64,
    options: &FrequencyPlotOptions,
) -> Result<Figure, SpectralError> {
    validate_sampling_rate(sampling_rate)?;
    if signal.is_empty() {
        return Err(SpectralError::ShapeMismatch(
            "signal must contain at least one sample".to_string(),
        ));
    }
    if options.segment_length == 0 {
        return Err(SpectralError::invalid(
            "segment_length",
            "segment length must be at least one sample",
        ));
    }

    let samples = signal.samples();
    let nperseg = options.segment_length.min(samples.len());
    if nperseg < options.segment_length {
        debug!(
            "Signal has {} samples, clamping Welch segment length {} to {nperseg}",
            samples.len(),
            options.segment_length
        );
    }

    let power = dft::power_spectrum(samples);
    let bins = match options.dft_axis {
        DftAxis::BinIndex => (0..power.len()).map(|k| k as f64).collect(),
        DftAxis::Frequency => dft::fft_frequencies(power.len(), sampling_rate),
    };

    let mean = welch::welch(samples, sampling_rate, WelchConfig::new(nperseg))?;
    let median = welch::welch(
        samples,
        sampling_rate,
        WelchConfig::new(nperseg).with_averaging(Averaging::Median),
    )?;

    let (mut figure, grid) = Figure::subplots(2, 1);

    let dft_panel = &mut figure[grid[(0, 0)]];
    *dft_panel = Axes::new("DFT").with_labels("Frequency [Hz]", "DFT frequency");
    dft_panel.plot(Series::new(bins, power));

    let psd_panel = &mut figure[grid[(1, 0)]];
    *psd_panel = Axes::new("Welch PSD")
        .with_labels(FREQUENCY_LABEL, "PSD [uV²/Hz]")
        .with_y_scale(AxisScale::Log)
        .with_legend();
    psd_panel
        .plot(Series::from(mean).with_label(Averaging::Mean.label()))
        .plot(Series::from(median).with_label(Averaging::Median.label()));

    debug!(
        "Frequency-domain figure: {} DFT bins, {} PSD bins at nperseg={nperseg}",
        samples.len(),
        figure[grid[(1, 0)]].series[0].len()
    );

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, fs: f64, n: usize) -> Signal {
        Signal::new(
            (0..n)
                .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_two_panels_with_expected_labels() {
        let fig = plot_frequency_domain(&sine(50.0, 1000.0, 2048), 1000.0).unwrap();
        assert_eq!((fig.rows(), fig.cols()), (2, 1));

        let dft_panel = fig.axes_at(0, 0).unwrap();
        assert_eq!(dft_panel.y_scale, AxisScale::Linear);
        assert_eq!(dft_panel.series[0].len(), 2048);
        assert!((dft_panel.series[0].x[5] - 5.0).abs() < f64::EPSILON);

        let psd_panel = fig.axes_at(1, 0).unwrap();
        assert_eq!(psd_panel.y_scale, AxisScale::Log);
        assert_eq!(psd_panel.legend_labels(), vec!["mean", "median"]);
        assert_eq!(psd_panel.series[0].len(), DEFAULT_WELCH_SEGMENT_LENGTH / 2 + 1);
    }

    #[test]
    fn test_short_signal_clamps_window() {
        let fig = plot_frequency_domain(&sine(10.0, 100.0, 300), 100.0).unwrap();
        let psd_panel = fig.axes_at(1, 0).unwrap();
        assert_eq!(psd_panel.series[0].len(), 151);
        assert_eq!(psd_panel.series[1].len(), 151);
    }

    #[test]
    fn test_psd_peak_near_tone() {
        let fs = 1000.0;
        let fig = plot_frequency_domain(&sine(50.0, fs, 8192), fs).unwrap();
        let psd_panel = fig.axes_at(1, 0).unwrap();
        let resolution = fs / DEFAULT_WELCH_SEGMENT_LENGTH as f64;
        for series in &psd_panel.series {
            let (idx, _) = series
                .y
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .unwrap();
            assert!((series.x[idx] - 50.0).abs() <= resolution);
        }
    }

    #[test]
    fn test_zero_signal_renders() {
        let fig = plot_frequency_domain(&Signal::new(vec![0.0; 512]).unwrap(), 250.0).unwrap();
        for panel in fig.panels() {
            for series in &panel.series {
                assert!(series.y.iter().all(|&v| v == 0.0));
                assert!(series
                    .plot_points(panel.y_scale)
                    .iter()
                    .all(|p| p[1].is_finite()));
            }
        }
    }

    #[test]
    fn test_frequency_axis_option() {
        let options = FrequencyPlotOptions {
            dft_axis: DftAxis::Frequency,
            ..FrequencyPlotOptions::default()
        };
        let fig = plot_frequency_domain_with(&sine(5.0, 8.0, 8), 8.0, &options).unwrap();
        let x = &fig.axes_at(0, 0).unwrap().series[0].x;
        assert_eq!(x, &vec![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let signal = sine(1.0, 10.0, 10);
        assert!(matches!(
            plot_frequency_domain(&signal, 0.0),
            Err(SpectralError::InvalidParameter { .. })
        ));
        let options = FrequencyPlotOptions {
            segment_length: 0,
            ..FrequencyPlotOptions::default()
        };
        assert!(matches!(
            plot_frequency_domain_with(&signal, 10.0, &options),
            Err(SpectralError::InvalidParameter { name: "segment_length", .. })
        ));
    }
}
