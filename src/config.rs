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

//! Viewer configuration management.
//!
//! Preferences are stored in TOML via `confy`. Every field has a serde
//! default so older or hand-edited files load without errors. Command-line
//! flags override these values for a single run.

use serde::{Deserialize, Serialize};
use spectral_plot::{DftAxis, DEFAULT_WELCH_SEGMENT_LENGTH};

const APP_NAME: &str = "spectral-viewer";
const CONFIG_NAME: &str = "config";

/// X axis of the DFT panel, as stored in the config file.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DftAxisSetting {
    /// Coefficient index (matches the classic bin-index plot).
    #[default]
    Bins,
    /// Signed frequency in Hz.
    Hertz,
}

impl From<DftAxisSetting> for DftAxis {
    fn from(setting: DftAxisSetting) -> Self {
        match setting {
            DftAxisSetting::Bins => DftAxis::BinIndex,
            DftAxisSetting::Hertz => DftAxis::Frequency,
        }
    }
}

/// Viewer configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Sampling rate (Hz) for inputs that do not carry one, such as CSV
    #[serde(default = "default_sampling_rate")]
    pub default_sampling_rate: f64,

    /// Channel shown in the frequency-domain view
    #[serde(default)]
    pub frequency_channel: usize,

    /// First channel of the spectral pair
    #[serde(default)]
    pub channel_x: usize,

    /// Second channel of the spectral pair
    #[serde(default = "default_channel_y")]
    pub channel_y: usize,

    /// Number of segments the pair view splits the signal into
    #[serde(default = "default_number_segments")]
    pub number_segments: usize,

    /// Welch segment length for the frequency-domain view (clamped to the signal length)
    #[serde(default = "default_welch_segment_length")]
    pub welch_segment_length: usize,

    /// X axis of the DFT panel
    #[serde(default)]
    pub dft_axis: DftAxisSetting,

    /// Initial window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Initial window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_sampling_rate() -> f64 {
    1000.0
}

fn default_channel_y() -> usize {
    1
}

fn default_number_segments() -> usize {
    4
}

fn default_welch_segment_length() -> usize {
    DEFAULT_WELCH_SEGMENT_LENGTH
}

fn default_window_width() -> f32 {
    1200.0
}

fn default_window_height() -> f32 {
    800.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            default_sampling_rate: default_sampling_rate(),
            frequency_channel: 0,
            channel_x: 0,
            channel_y: default_channel_y(),
            number_segments: default_number_segments(),
            welch_segment_length: default_welch_segment_length(),
            dft_axis: DftAxisSetting::default(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_serde_defaults() {
        // An empty document must deserialize to the same values as Default
        let parsed: AppConfig = serde::Deserialize::deserialize(
            serde::de::value::MapDeserializer::<_, serde::de::value::Error>::new(
                std::iter::empty::<(String, String)>(),
            ),
        )
        .unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_dft_axis_conversion() {
        assert_eq!(DftAxis::from(DftAxisSetting::Bins), DftAxis::BinIndex);
        assert_eq!(DftAxis::from(DftAxisSetting::Hertz), DftAxis::Frequency);
    }

    #[test]
    fn test_default_pair_is_first_two_channels() {
        let config = AppConfig::default();
        assert_eq!((config.channel_x, config.channel_y), (0, 1));
        assert_eq!(config.number_segments, 4);
        assert_eq!(config.welch_segment_length, 1024);
    }
}
