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

//! Frequency-domain views of sampled signals.
//!
//! This library computes standard spectral estimates and packages them as
//! plot-ready [`Figure`] values. It is split into layers that can be used
//! on their own:
//!
//! - **Signal layer**: [`Signal`] and [`MultiChannelSignal`] containers with
//!   shape validation
//! - **Estimator layer**: full DFT ([`dft`]) and Welch PSD, CSD and
//!   coherence ([`welch`])
//! - **Figure layer**: an explicit figure/axes/series model ([`figure`])
//!   with no global "current figure" state
//! - **Plot layer**: [`plot_frequency_domain`] and [`plot_spectral`], which
//!   wire the estimators into figures
//!
//! # Quick Start
//!
//! ```
//! use spectral_plot::{plot_spectral, MultiChannelSignal};
//!
//! let fs = 1000.0;
//! let tone: Vec<f64> = (0..1000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 50.0 * f64::from(i) / fs).sin())
//!     .collect();
//! let signal = MultiChannelSignal::from_channels(&[tone.clone(), tone]).unwrap();
//!
//! let (figure, axes) = plot_spectral(&signal, 0, 1, fs, 4).unwrap();
//! let coherence = &figure[axes[(1, 1)]];
//! assert_eq!(coherence.title, "Coherence for X,Y");
//! ```
//!
//! # Using the Estimators Directly
//!
//! ```
//! use spectral_plot::welch::{welch, Averaging, WelchConfig};
//!
//! let x: Vec<f64> = (0..4096).map(|i| (f64::from(i) * 0.3).sin()).collect();
//! let psd = welch(&x, 100.0, WelchConfig::new(256).with_averaging(Averaging::Median)).unwrap();
//! let (peak_hz, _) = psd.peak().unwrap();
//! println!("peak at {peak_hz:.2} Hz");
//! ```

pub mod dft;
pub mod error;
pub mod figure;
pub mod plot;
pub mod signal;
pub mod welch;
mod window;

pub use error::SpectralError;
pub use figure::{Axes, AxesGrid, AxesId, AxisScale, Figure, Series, Spacing, LOG_FLOOR};
pub use plot::{
    plot_frequency_domain, plot_frequency_domain_with, plot_spectral, segment_length, DftAxis,
    FrequencyPlotOptions, DEFAULT_WELCH_SEGMENT_LENGTH,
};
pub use signal::{MultiChannelSignal, Signal};
pub use welch::{Averaging, CrossSpectralEstimate, SpectralEstimate, WelchConfig};
