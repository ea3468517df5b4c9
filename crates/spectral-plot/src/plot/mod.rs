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

//! Plotters that turn a signal into a ready-to-render [`Figure`].
//!
//! - [`plot_frequency_domain`]: DFT power plus mean/median Welch PSD of one
//!   channel.
//! - [`plot_spectral`]: PSD, CSD and coherence of a channel pair on a 2×2
//!   grid.
//!
//! [`Figure`]: crate::figure::Figure

mod frequency;
mod spectral;

pub use frequency::{
    plot_frequency_domain, plot_frequency_domain_with, DftAxis, FrequencyPlotOptions,
    DEFAULT_WELCH_SEGMENT_LENGTH,
};
pub use spectral::{plot_spectral, segment_length, SPECTRAL_GRID_SPACING};

/// X-axis label shared by every frequency panel.
pub const FREQUENCY_LABEL: &str = "frequency [Hz]";
