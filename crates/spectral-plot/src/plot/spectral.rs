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

//! Channel-pair spectral view: PSD of both channels, their cross spectrum
//! and their coherence, all from the same Welch segmentation.

use log::{debug, info};

use super::FREQUENCY_LABEL;
use crate::error::{validate_sampling_rate, SpectralError};
use crate::figure::{Axes, AxesGrid, AxisScale, Figure, Series};
use crate::signal::MultiChannelSignal;
use crate::welch::{self, WelchConfig};

/// `wspace` / `hspace` of the 2×2 pair grid. Wide enough that rotated tick
/// labels and axis titles of neighbouring panels do not collide.
pub const SPECTRAL_GRID_SPACING: f64 = 0.6;

/// Segment length `floor(samples / number_segments)` for a pair plot.
///
/// Rejects a zero segment count and any count that leaves an empty window.
pub fn segment_length(samples: usize, number_segments: usize) -> Result<usize, SpectralError> {
    if number_segments == 0 {
        return Err(SpectralError::invalid(
            "number_segments",
            "must be a positive integer",
        ));
    }
    match samples / number_segments {
        0 => Err(SpectralError::DegenerateSegmentation {
            samples,
            segments: number_segments,
        }),
        length => Ok(length),
    }
}

/// PSD(X), PSD(Y), CSD(X, Y) and coherence(X, Y) on a 2×2 grid.
///
/// Every estimator uses Welch's method with window length
/// `floor(N / number_segments)`, so all four panels share one frequency
/// grid. Panels, row-major:
///
/// | | col 0 | col 1 |
/// |---|---|---|
/// | row 0 | PSD of X (log) | PSD of Y (log) |
/// | row 1 | \|CSD\| of X and Y (log) | coherence (linear) |
///
/// All parameters are validated before any estimate is computed.
pub fn plot_spectral(
    signal: &MultiChannelSignal,
    x: usize,
    y: usize,
    sampling_rate: f64,
    number_segments: usize,
) -> Result<(Figure, AxesGrid), SpectralError> {
    validate_sampling_rate(sampling_rate)?;
    signal.check_channel("x", x)?;
    signal.check_channel("y", y)?;
    let nperseg = segment_length(signal.samples(), number_segments)?;

    info!(
        "Spectral pair: channels {x} and {y}, {} samples at {sampling_rate} Hz, {number_segments} segments of {nperseg}",
        signal.samples()
    );

    let channel_x = signal.channel(x)?;
    let channel_y = signal.channel(y)?;
    let config = WelchConfig::new(nperseg);

    let psd_x = welch::welch(&channel_x, sampling_rate, config)?;
    let psd_y = welch::welch(&channel_y, sampling_rate, config)?;
    let csd_xy = welch::csd(&channel_x, &channel_y, sampling_rate, config)?;
    let coherence_xy = welch::coherence_from(&psd_x, &psd_y, &csd_xy)?;

    debug!(
        "Spectral pair estimates: {} bins, resolution {:?} Hz",
        psd_x.len(),
        psd_x.resolution()
    );

    let (figure, grid) = Figure::subplots(2, 2);
    let mut figure = figure.with_spacing(SPECTRAL_GRID_SPACING, SPECTRAL_GRID_SPACING);

    figure[grid[(0, 0)]] = panel("PSD for X", "PSD [V²/Hz]", AxisScale::Log, psd_x.into());
    figure[grid[(0, 1)]] = panel("PSD for Y", "PSD [V²/Hz]", AxisScale::Log, psd_y.into());
    figure[grid[(1, 0)]] = panel(
        "CPSD for X and Y",
        "CSD [V²/Hz]",
        AxisScale::Log,
        csd_xy.magnitude().into(),
    );
    figure[grid[(1, 1)]] = panel(
        "Coherence for X,Y",
        "Coherence",
        AxisScale::Linear,
        coherence_xy.into(),
    );

    Ok((figure, grid))
}

fn panel(title: &str, y_label: &str, scale: AxisScale, series: Series) -> Axes {
    let mut axes = Axes::new(title)
        .with_labels(FREQUENCY_LABEL, y_label)
        .with_y_scale(scale);
    axes.plot(series);
    axes
}
