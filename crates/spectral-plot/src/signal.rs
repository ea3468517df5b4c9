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

//! Sampled signal containers.
//!
//! A [`Signal`] is a single channel of uniformly spaced real samples. A
//! [`MultiChannelSignal`] is an (N, C) array where each column is one
//! channel, stored sample-major so a row holds one instant across channels.

use crate::error::SpectralError;

/// Single-channel real signal. Holds at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
}

impl Signal {
    /// Wrap a sample vector. Empty input is rejected.
    pub fn new(samples: Vec<f64>) -> Result<Self, SpectralError> {
        if samples.is_empty() {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one sample".to_string(),
            ));
        }
        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.samples
    }
}

impl TryFrom<Vec<f64>> for Signal {
    type Error = SpectralError;

    fn try_from(samples: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl TryFrom<&[f64]> for Signal {
    type Error = SpectralError;

    fn try_from(samples: &[f64]) -> Result<Self, Self::Error> {
        Self::new(samples.to_vec())
    }
}

/// Multi-channel real signal of shape (samples, channels).
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChannelSignal {
    data: Vec<f64>,
    samples: usize,
    channels: usize,
}

impl MultiChannelSignal {
    /// Build from rows, one row per sample instant.
    ///
    /// Every row must have the same, non-zero number of channels.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SpectralError> {
        let Some(first) = rows.first() else {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one sample".to_string(),
            ));
        };
        let channels = first.len();
        if channels == 0 {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one channel".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * channels);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != channels {
                return Err(SpectralError::ShapeMismatch(format!(
                    "row {i} has {} channels, expected {channels}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            samples: rows.len(),
            channels,
        })
    }

    /// Build from columns, one vector per channel.
    pub fn from_channels(columns: &[Vec<f64>]) -> Result<Self, SpectralError> {
        let Some(first) = columns.first() else {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one channel".to_string(),
            ));
        };
        let samples = first.len();
        if samples == 0 {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one sample".to_string(),
            ));
        }
        if let Some((c, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, col)| col.len() != samples)
        {
            return Err(SpectralError::ShapeMismatch(format!(
                "channel {c} has {} samples, expected {samples}",
                col.len()
            )));
        }

        let channels = columns.len();
        let mut data = Vec::with_capacity(samples * channels);
        for i in 0..samples {
            data.extend(columns.iter().map(|col| col[i]));
        }

        Ok(Self {
            data,
            samples,
            channels,
        })
    }

    /// Build from a flat sample-major buffer (interleaved channels).
    pub fn from_interleaved(data: Vec<f64>, channels: usize) -> Result<Self, SpectralError> {
        if channels == 0 {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one channel".to_string(),
            ));
        }
        if data.is_empty() {
            return Err(SpectralError::ShapeMismatch(
                "signal must contain at least one sample".to_string(),
            ));
        }
        if data.len() % channels != 0 {
            return Err(SpectralError::ShapeMismatch(format!(
                "{} values cannot be split evenly into {channels} channels",
                data.len()
            )));
        }
        Ok(Self {
            samples: data.len() / channels,
            data,
            channels,
        })
    }

    /// Number of samples per channel (N).
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of channels (C).
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape as `(samples, channels)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.samples, self.channels)
    }

    /// Copy one column out as a contiguous vector.
    pub fn channel(&self, index: usize) -> Result<Vec<f64>, SpectralError> {
        self.check_channel("channel", index)?;
        Ok(self
            .data
            .iter()
            .skip(index)
            .step_by(self.channels)
            .copied()
            .collect())
    }

    /// Extract one column as a standalone [`Signal`].
    pub fn channel_signal(&self, index: usize) -> Result<Signal, SpectralError> {
        Signal::new(self.channel(index)?)
    }

    pub(crate) fn check_channel(&self, name: &'static str, index: usize) -> Result<(), SpectralError> {
        if index < self.channels {
            Ok(())
        } else {
            Err(SpectralError::invalid(
                name,
                format!(
                    "channel index {index} is out of range for a signal with {} channels",
                    self.channels
                ),
            ))
        }
    }
}

impl From<Signal> for MultiChannelSignal {
    fn from(signal: Signal) -> Self {
        let samples = signal.len();
        Self {
            data: signal.into_inner(),
            samples,
            channels: 1,
        }
    }
}
