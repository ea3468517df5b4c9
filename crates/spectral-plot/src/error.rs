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

//! Error type shared by the estimators and the plotters.

use thiserror::Error;

/// Errors raised while validating inputs to a spectral computation.
///
/// Every variant is reported before any estimator runs, so a failed call
/// never produces a partial figure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpectralError {
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{segments} segments over {samples} samples leaves a zero-length window")]
    DegenerateSegmentation { samples: usize, segments: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl SpectralError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Check that a sampling rate is usable for frequency-axis scaling.
pub(crate) fn validate_sampling_rate(sampling_rate: f64) -> Result<(), SpectralError> {
    if sampling_rate.is_finite() && sampling_rate > 0.0 {
        Ok(())
    } else {
        Err(SpectralError::invalid(
            "sampling_rate",
            format!("must be a positive finite number, got {sampling_rate}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_rate_validation() {
        assert!(validate_sampling_rate(1000.0).is_ok());
        assert!(validate_sampling_rate(0.0).is_err());
        assert!(validate_sampling_rate(-5.0).is_err());
        assert!(validate_sampling_rate(f64::NAN).is_err());
        assert!(validate_sampling_rate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = SpectralError::DegenerateSegmentation {
            samples: 3,
            segments: 10,
        };
        assert_eq!(
            err.to_string(),
            "10 segments over 3 samples leaves a zero-length window"
        );

        let err = SpectralError::invalid("x", "channel 4 out of range");
        assert_eq!(err.to_string(), "invalid parameter 'x': channel 4 out of range");
    }
}
