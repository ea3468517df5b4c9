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

//! End-to-end checks of the two plotters on known signals.

use std::f64::consts::PI;

use spectral_plot::{
    plot_frequency_domain, plot_spectral, AxisScale, Figure, MultiChannelSignal, Series, Signal,
    SpectralError,
};

const FS: f64 = 1000.0;

fn sine(freq: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * freq * i as f64 / FS).sin())
        .collect()
}

fn noise(seed: u64, n: usize) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
        })
        .collect()
}

fn peak_frequency(series: &Series) -> f64 {
    let (idx, _) = series
        .y
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .expect("series is not empty");
    series.x[idx]
}

fn value_at(series: &Series, freq: f64) -> f64 {
    let idx = series
        .x
        .iter()
        .position(|&f| (f - freq).abs() < 1e-9)
        .expect("frequency present on grid");
    series.y[idx]
}

fn panel_series(figure: &Figure, row: usize, col: usize) -> &Series {
    &figure.axes_at(row, col).expect("panel exists").series[0]
}

#[test]
fn duplicated_50hz_channel_is_fully_coherent() {
    let tone = sine(50.0, 1000);
    let signal = MultiChannelSignal::from_channels(&[tone.clone(), tone]).unwrap();

    let (figure, grid) = plot_spectral(&signal, 0, 1, FS, 4).unwrap();

    // L = 250 gives a 4 Hz grid, so 50 Hz falls between the 48 and 52 Hz bins
    let psd_x = &figure[grid[(0, 0)]].series[0];
    let psd_y = &figure[grid[(0, 1)]].series[0];
    assert!((psd_x.x[1] - 4.0).abs() < 1e-12);
    let peak = peak_frequency(psd_x);
    assert!((peak - 50.0).abs() <= 4.0);
    assert!((peak_frequency(psd_y) - 50.0).abs() <= 4.0);

    let coherence = &figure[grid[(1, 1)]].series[0];
    assert!((value_at(coherence, peak) - 1.0).abs() < 1e-9);
}

#[test]
fn same_channel_cross_spectrum_equals_psd() {
    let x: Vec<f64> = sine(120.0, 3000)
        .iter()
        .zip(noise(5, 3000))
        .map(|(s, n)| s + n)
        .collect();
    let signal = MultiChannelSignal::from_channels(&[x]).unwrap();

    let (figure, _) = plot_spectral(&signal, 0, 0, FS, 6).unwrap();
    let psd = panel_series(&figure, 0, 0);
    let cross = panel_series(&figure, 1, 0);
    let coherence = panel_series(&figure, 1, 1);

    for (p, c) in psd.y.iter().zip(&cross.y) {
        assert!((p - c).abs() <= 1e-9 * p.abs().max(1e-12));
    }
    assert!(coherence.y.iter().all(|&c| (c - 1.0).abs() < 1e-9));
}

#[test]
fn coherence_stays_in_unit_interval() {
    let a: Vec<f64> = sine(80.0, 5000)
        .iter()
        .zip(noise(1, 5000))
        .map(|(s, n)| s + 0.2 * n)
        .collect();
    let b: Vec<f64> = sine(80.0, 5000)
        .iter()
        .zip(noise(2, 5000))
        .map(|(s, n)| 0.5 * s + n)
        .collect();
    let c = noise(3, 5000);
    let signal = MultiChannelSignal::from_channels(&[a, b, c]).unwrap();

    for (x, y) in [(0, 1), (0, 2), (1, 2), (2, 0)] {
        let (figure, grid) = plot_spectral(&signal, x, y, FS, 10).unwrap();
        let coherence = &figure[grid[(1, 1)]].series[0];
        assert!(coherence.y.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    // Shared tone shows up as high coherence, independent noise does not
    let (figure, grid) = plot_spectral(&signal, 0, 1, FS, 10).unwrap();
    assert!(value_at(&figure[grid[(1, 1)]].series[0], 80.0) > 0.8);
}

#[test]
fn pair_plot_rejects_invalid_input() {
    let signal = MultiChannelSignal::from_channels(&[sine(10.0, 16), sine(20.0, 16)]).unwrap();

    assert!(matches!(
        plot_spectral(&signal, 0, 1, FS, 17),
        Err(SpectralError::DegenerateSegmentation {
            samples: 16,
            segments: 17
        })
    ));
    assert!(matches!(
        plot_spectral(&signal, 0, 2, FS, 2),
        Err(SpectralError::InvalidParameter { .. })
    ));
    assert!(matches!(
        plot_spectral(&signal, 0, 1, FS, 0),
        Err(SpectralError::InvalidParameter { .. })
    ));
}

#[test]
fn frequency_domain_peaks_at_tone() {
    let signal = Signal::new(sine(50.0, 4096)).unwrap();
    let figure = plot_frequency_domain(&signal, FS).unwrap();

    let psd_panel = figure.axes_at(1, 0).unwrap();
    assert_eq!(psd_panel.y_scale, AxisScale::Log);
    let resolution = psd_panel.series[0].x[1];
    for series in &psd_panel.series {
        assert!((peak_frequency(series) - 50.0).abs() <= resolution);
    }
}

#[test]
fn frequency_domain_of_silence_is_flat_zero() {
    let signal = Signal::new(vec![0.0; 2000]).unwrap();
    let figure = plot_frequency_domain(&signal, FS).unwrap();
    for panel in figure.panels() {
        for series in &panel.series {
            assert!(series.y.iter().all(|&v| v == 0.0));
        }
    }
}
