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

//! Parameter bar for the two spectral views.

use spectral_plot::{DftAxis, FrequencyPlotOptions};

use crate::config::{AppConfig, DftAxisSetting};

/// Parameters shared by both views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub sampling_rate: f64,
    /// Channel shown in the frequency-domain view.
    pub frequency_channel: usize,
    pub channel_x: usize,
    pub channel_y: usize,
    pub number_segments: usize,
    pub welch_segment_length: usize,
    pub dft_axis: DftAxisSetting,
}

impl ViewParams {
    /// Start from saved preferences.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sampling_rate: config.default_sampling_rate,
            frequency_channel: config.frequency_channel,
            channel_x: config.channel_x,
            channel_y: config.channel_y,
            number_segments: config.number_segments,
            welch_segment_length: config.welch_segment_length,
            dft_axis: config.dft_axis,
        }
    }

    /// Copy the current parameters back into `config` for saving.
    pub fn store_into(&self, config: &mut AppConfig) {
        config.default_sampling_rate = self.sampling_rate;
        config.frequency_channel = self.frequency_channel;
        config.channel_x = self.channel_x;
        config.channel_y = self.channel_y;
        config.number_segments = self.number_segments;
        config.welch_segment_length = self.welch_segment_length;
        config.dft_axis = self.dft_axis;
    }

    /// Pull channel selections back inside a signal with `channels` channels.
    pub fn clamp_channels(&mut self, channels: usize) {
        let max_channel = channels.saturating_sub(1);
        self.frequency_channel = self.frequency_channel.min(max_channel);
        self.channel_x = self.channel_x.min(max_channel);
        self.channel_y = self.channel_y.min(max_channel);
    }

    pub fn frequency_options(&self) -> FrequencyPlotOptions {
        FrequencyPlotOptions {
            segment_length: self.welch_segment_length,
            dft_axis: DftAxis::from(self.dft_axis),
        }
    }
}

/// What the user asked for from the control bar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlAction {
    #[default]
    None,
    /// Parameters changed, figures must be recomputed.
    Recompute,
    /// Open a signal file.
    Open,
    /// Switch back to the demo signal.
    LoadDemo,
    /// Persist the current parameters.
    SaveSettings,
}

/// Draw the parameter bar. `channels` bounds the channel selectors.
pub fn show_controls(
    ui: &mut egui::Ui,
    params: &mut ViewParams,
    channels: usize,
    source_name: &str,
) -> ControlAction {
    let before = *params;
    let mut action = ControlAction::None;
    let max_channel = channels.saturating_sub(1);

    ui.horizontal(|ui| {
        if ui.button("📂 Open...").clicked() {
            action = ControlAction::Open;
        }
        if ui.button("🎨 Demo").clicked() {
            action = ControlAction::LoadDemo;
        }
        ui.label(format!("Source: {source_name} ({channels} ch)"));

        ui.separator();

        ui.label("Sample Rate:");
        ui.add(
            egui::DragValue::new(&mut params.sampling_rate)
                .range(0.001..=f64::MAX)
                .speed(10.0)
                .suffix(" Hz"),
        );

        ui.separator();

        if ui.button("💾 Save Settings").clicked() {
            action = ControlAction::SaveSettings;
        }
    });

    ui.horizontal(|ui| {
        ui.label("Channel:");
        ui.add(egui::DragValue::new(&mut params.frequency_channel).range(0..=max_channel));

        ui.label("Welch Segment:");
        ui.add(egui::DragValue::new(&mut params.welch_segment_length).range(1..=1 << 20));

        ui.label("DFT Axis:");
        ui.radio_value(&mut params.dft_axis, DftAxisSetting::Bins, "Bins");
        ui.radio_value(&mut params.dft_axis, DftAxisSetting::Hertz, "Hz");

        ui.separator();

        ui.label("X:");
        ui.add(egui::DragValue::new(&mut params.channel_x).range(0..=max_channel));
        ui.label("Y:");
        ui.add(egui::DragValue::new(&mut params.channel_y).range(0..=max_channel));
        ui.label("Segments:");
        ui.add(egui::DragValue::new(&mut params.number_segments).range(1..=usize::MAX));
    });

    if action == ControlAction::None && *params != before {
        action = ControlAction::Recompute;
    }
    action
}
