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

//! Signal loading for the viewer.
//!
//! Supported inputs:
//! - CSV: one numeric column per channel, optional header row, `#` comments
//! - WAV: any channel count, integer or float samples, normalized to [-1, 1]
//! - Demo: a synthetic two-channel recording for trying the viewer out

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader};
use spectral_plot::{MultiChannelSignal, SpectralError};
use thiserror::Error;

/// Errors raised while reading a signal file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported file extension '.{0}' (expected .csv or .wav)")]
    UnsupportedFormat(String),

    #[error("line {line}: '{value}' is not a number")]
    InvalidNumber { line: u64, value: String },

    #[error("no samples found")]
    Empty,

    #[error(transparent)]
    Shape(#[from] SpectralError),
}

/// A signal ready for plotting.
#[derive(Debug, Clone)]
pub struct LoadedSignal {
    /// Display name (file name or "demo").
    pub name: String,
    pub signal: MultiChannelSignal,
    /// Sampling rate carried by the source, if it has one.
    pub sampling_rate: Option<f64>,
}

/// Load a signal file, choosing the decoder from the extension.
pub fn load(path: &Path) -> Result<LoadedSignal, SourceError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let (signal, sampling_rate) = match extension.as_str() {
        "csv" | "txt" => {
            let file = File::open(path).map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            (read_csv(BufReader::new(file))?, None)
        }
        "wav" => {
            let reader = WavReader::open(path)?;
            let (signal, rate) = read_wav(reader)?;
            (signal, Some(rate))
        }
        other => return Err(SourceError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {}:", path.display());
    log::info!("  Samples: {}", signal.samples());
    log::info!("  Channels: {}", signal.channels());
    if let Some(rate) = sampling_rate {
        log::info!("  Sample rate: {rate} Hz");
    }

    Ok(LoadedSignal {
        name,
        signal,
        sampling_rate,
    })
}

/// Parse CSV text into a multi-channel signal.
///
/// A first row that does not parse as numbers is treated as a header.
/// Rows with a different column count are rejected, as are empty fields
/// between values.
pub fn read_csv<R: Read>(reader: R) -> Result<MultiChannelSignal, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        // Trailing separators are tolerated, blanks between values are not.
        let fields: Vec<&str> = record.iter().collect();
        let used = fields.iter().rposition(|field| !field.is_empty()).map_or(0, |i| i + 1);

        let parsed: Result<Vec<f64>, String> = fields[..used]
            .iter()
            .map(|field| field.parse::<f64>().ok().ok_or_else(|| (*field).to_string()))
            .collect();

        match parsed {
            Ok(row) if row.is_empty() => {}
            Ok(row) => rows.push(row),
            Err(value) if index == 0 && !value.is_empty() => {
                log::debug!("Treating first CSV row as a header");
            }
            Err(value) => return Err(SourceError::InvalidNumber { line, value }),
        }
    }

    if rows.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(MultiChannelSignal::from_rows(&rows)?)
}

/// Decode all frames of a WAV stream. Returns the signal and its sample rate.
pub fn read_wav<R: Read>(reader: WavReader<R>) -> Result<(MultiChannelSignal, f64), SourceError> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels);

    let data: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let full_scale = f64::from(1u32 << (spec.bits_per_sample.saturating_sub(1)));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / full_scale))
                .collect::<Result<_, _>>()?
        }
    };

    if data.is_empty() {
        return Err(SourceError::Empty);
    }

    let signal = MultiChannelSignal::from_interleaved(data, channels)?;
    Ok((signal, f64::from(spec.sample_rate)))
}

/// Sampling rate of the demo signal.
pub const DEMO_SAMPLING_RATE: f64 = 1000.0;
const DEMO_SAMPLES: usize = 4000;
const DEMO_DELAY_SAMPLES: usize = 5;

/// Synthetic two-channel recording.
///
/// Channel 0 is a 50 Hz tone with a weaker 120 Hz tone. Channel 1 is
/// channel 0 delayed by a few samples, attenuated, with pseudo-random noise
/// added, so the pair view shows high coherence only at the two tones.
#[allow(
    clippy::cast_precision_loss,
    reason = "sample index to f64 is exact for the demo length"
)]
pub fn demo_signal() -> Result<LoadedSignal, SourceError> {
    use std::f64::consts::PI;

    let tone = |i: usize| {
        let t = i as f64 / DEMO_SAMPLING_RATE;
        (2.0 * PI * 50.0 * t).sin() + 0.3 * (2.0 * PI * 120.0 * t).sin()
    };

    let mut state: u64 = 0x5DEE_CE66;
    let mut noise = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    };

    let rows: Vec<Vec<f64>> = (0..DEMO_SAMPLES)
        .map(|i| {
            let delayed = i.checked_sub(DEMO_DELAY_SAMPLES).map_or(0.0, tone);
            vec![tone(i), 0.8 * delayed + 0.5 * noise()]
        })
        .collect();

    Ok(LoadedSignal {
        name: "demo".to_string(),
        signal: MultiChannelSignal::from_rows(&rows)?,
        sampling_rate: Some(DEMO_SAMPLING_RATE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_csv_with_header() {
        let text = "ch0,ch1\n1.0,2.0\n3.0,4.0\n5.0,6.0\n";
        let signal = read_csv(text.as_bytes()).unwrap();
        assert_eq!(signal.shape(), (3, 2));
        assert_eq!(signal.channel(1).unwrap(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_csv_without_header_and_comments() {
        let text = "# recorded on bench\n0.5\n-0.5\n 0.25 \n";
        let signal = read_csv(text.as_bytes()).unwrap();
        assert_eq!(signal.shape(), (3, 1));
        assert_eq!(signal.channel(0).unwrap(), vec![0.5, -0.5, 0.25]);
    }

    #[test]
    fn test_csv_ragged_rows_rejected() {
        let text = "1,2\n3\n";
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(SourceError::Shape(SpectralError::ShapeMismatch(_)))
        ));
    }

    #[test]
    fn test_csv_bad_value_after_header() {
        let text = "a,b\n1,2\n3,oops\n";
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(SourceError::InvalidNumber { line: 3, ref value }) if value == "oops"
        ));
    }

    #[test]
    fn test_csv_blank_field_rejected() {
        let text = "1,,3\n4,5,6\n";
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(SourceError::InvalidNumber { line: 1, ref value }) if value.is_empty()
        ));

        let text = "a,b,c\n1,2,3\n4,,6\n";
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(SourceError::InvalidNumber { line: 3, ref value }) if value.is_empty()
        ));
    }

    #[test]
    fn test_csv_trailing_separator_allowed() {
        let text = "1,2,\n3,4,\n";
        let signal = read_csv(text.as_bytes()).unwrap();
        assert_eq!(signal.shape(), (2, 2));
        assert_eq!(signal.channel(1).unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_csv_header_only_is_empty() {
        assert!(matches!(read_csv("x,y\n".as_bytes()), Err(SourceError::Empty)));
    }

    #[test]
    fn test_wav_round_trip_stereo() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
            for (l, r) in [(16384i16, -16384i16), (0, 8192)] {
                writer.write_sample(l).unwrap();
                writer.write_sample(r).unwrap();
            }
            writer.finalize().unwrap();
        }
        buffer.set_position(0);

        let (signal, rate) = read_wav(WavReader::new(buffer).unwrap()).unwrap();
        assert!((rate - 8000.0).abs() < f64::EPSILON);
        assert_eq!(signal.shape(), (2, 2));
        assert_eq!(signal.channel(0).unwrap(), vec![0.5, 0.0]);
        assert_eq!(signal.channel(1).unwrap(), vec![-0.5, 0.25]);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load(Path::new("recording.mp3")),
            Err(SourceError::UnsupportedFormat(ext)) if ext == "mp3"
        ));
    }

    #[test]
    fn test_demo_signal_shape() {
        let demo = demo_signal().unwrap();
        assert_eq!(demo.signal.shape(), (DEMO_SAMPLES, 2));
        assert_eq!(demo.sampling_rate, Some(DEMO_SAMPLING_RATE));
        let ch1 = demo.signal.channel(1).unwrap();
        assert!(ch1.iter().all(|v| v.is_finite()));
    }
}
