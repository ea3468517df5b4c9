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

//! Main window: control bar on top, one figure view below.

use eframe::egui;
use spectral_plot::{plot_frequency_domain_with, plot_spectral, Figure, SpectralError};

use crate::config::AppConfig;
use crate::signal_source::{self, LoadedSignal};
use crate::ui::{self, ControlAction, ViewParams};

/// Which figure the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewTab {
    FrequencyDomain,
    SpectralPair,
}

/// Status line shown under the controls.
#[derive(Debug, Clone)]
enum StatusMessage {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct SpectralViewerApp {
    config: AppConfig,
    source: LoadedSignal,
    params: ViewParams,
    tab: ViewTab,
    frequency_figure: Result<Figure, String>,
    pair_figure: Result<Figure, String>,
    status: Option<StatusMessage>,
}

impl SpectralViewerApp {
    pub fn new(config: AppConfig, source: LoadedSignal, mut params: ViewParams) -> Self {
        params.clamp_channels(source.signal.channels());
        let mut app = Self {
            config,
            source,
            params,
            tab: ViewTab::FrequencyDomain,
            frequency_figure: Err(String::new()),
            pair_figure: Err(String::new()),
            status: None,
        };
        app.recompute();
        app
    }

    /// Rebuild both figures from the current source and parameters.
    fn recompute(&mut self) {
        self.frequency_figure = frequency_figure(&self.source, &self.params).map_err(|e| {
            log::warn!("Frequency-domain view failed: {e}");
            e.to_string()
        });
        self.pair_figure = pair_figure(&self.source, &self.params).map_err(|e| {
            log::warn!("Spectral pair view failed: {e}");
            e.to_string()
        });
    }

    fn set_source(&mut self, source: LoadedSignal) {
        if let Some(rate) = source.sampling_rate {
            self.params.sampling_rate = rate;
        }
        self.params.clamp_channels(source.signal.channels());
        self.status = Some(StatusMessage::Info(format!(
            "Loaded {} ({} samples, {} channels)",
            source.name,
            source.signal.samples(),
            source.signal.channels()
        )));
        self.source = source;
        self.recompute();
    }

    fn open_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Signals", &["csv", "txt", "wav"])
            .pick_file()
        else {
            return;
        };

        match signal_source::load(&path) {
            Ok(source) => self.set_source(source),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    fn load_demo(&mut self) {
        match signal_source::demo_signal() {
            Ok(source) => self.set_source(source),
            Err(e) => self.status = Some(StatusMessage::Error(e.to_string())),
        }
    }

    fn save_settings(&mut self) {
        self.params.store_into(&mut self.config);
        match self.config.save() {
            Ok(()) => {
                let location = AppConfig::get_config_path()
                    .map_or_else(|_| "config file".to_string(), |p| p.display().to_string());
                log::info!("Settings saved to {location}");
                self.status = Some(StatusMessage::Info(format!("Settings saved to {location}")));
            }
            Err(e) => {
                log::error!("Failed to save settings: {e}");
                self.status = Some(StatusMessage::Error(format!("Failed to save settings: {e}")));
            }
        }
    }
}

impl eframe::App for SpectralViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            let action = ui::show_controls(
                ui,
                &mut self.params,
                self.source.signal.channels(),
                &self.source.name,
            );
            match action {
                ControlAction::None => {}
                ControlAction::Recompute => self.recompute(),
                ControlAction::Open => self.open_file(),
                ControlAction::LoadDemo => self.load_demo(),
                ControlAction::SaveSettings => self.save_settings(),
            }

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, ViewTab::FrequencyDomain, "Frequency domain");
                ui.selectable_value(&mut self.tab, ViewTab::SpectralPair, "Spectral pair");

                match &self.status {
                    Some(StatusMessage::Info(text)) => {
                        ui.separator();
                        ui.label(text);
                    }
                    Some(StatusMessage::Error(text)) => {
                        ui.separator();
                        ui.colored_label(egui::Color32::LIGHT_RED, text);
                    }
                    None => {}
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (id, figure) = match self.tab {
                ViewTab::FrequencyDomain => ("frequency", &self.frequency_figure),
                ViewTab::SpectralPair => ("pair", &self.pair_figure),
            };
            match figure {
                Ok(figure) => ui::show_figure(ui, id, figure),
                Err(message) => {
                    ui.label(egui::RichText::new(message).color(egui::Color32::LIGHT_RED));
                }
            }
        });
    }
}

/// DFT and Welch PSD of the selected channel.
fn frequency_figure(source: &LoadedSignal, params: &ViewParams) -> Result<Figure, SpectralError> {
    let channel = source.signal.channel_signal(params.frequency_channel)?;
    let figure = plot_frequency_domain_with(
        &channel,
        params.sampling_rate,
        &params.frequency_options(),
    )?;
    Ok(figure.with_title(format!(
        "{}: channel {}",
        source.name, params.frequency_channel
    )))
}

/// PSD, CSD and coherence of the selected channel pair.
fn pair_figure(source: &LoadedSignal, params: &ViewParams) -> Result<Figure, SpectralError> {
    let (figure, grid) = plot_spectral(
        &source.signal,
        params.channel_x,
        params.channel_y,
        params.sampling_rate,
        params.number_segments,
    )?;

    let mut figure = figure.with_title(format!(
        "{}: channels {} and {}",
        source.name, params.channel_x, params.channel_y
    ));
    // Name the channels in the two PSD panel titles.
    figure[grid[(0, 0)]].title = format!("PSD for X (channel {})", params.channel_x);
    figure[grid[(0, 1)]].title = format!("PSD for Y (channel {})", params.channel_y);
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_params() -> ViewParams {
        let mut params = ViewParams::from_config(&AppConfig::default());
        params.sampling_rate = signal_source::DEMO_SAMPLING_RATE;
        params
    }

    #[test]
    fn test_frequency_figure_for_demo() {
        let source = signal_source::demo_signal().unwrap();
        let figure = frequency_figure(&source, &demo_params()).unwrap();
        assert_eq!((figure.rows(), figure.cols()), (2, 1));
        assert_eq!(figure.title.as_deref(), Some("demo: channel 0"));
    }

    #[test]
    fn test_pair_figure_titles_name_channels() {
        let source = signal_source::demo_signal().unwrap();
        let figure = pair_figure(&source, &demo_params()).unwrap();
        assert_eq!((figure.rows(), figure.cols()), (2, 2));
        assert_eq!(figure.axes_at(0, 0).unwrap().title, "PSD for X (channel 0)");
        assert_eq!(figure.axes_at(0, 1).unwrap().title, "PSD for Y (channel 1)");
        assert_eq!(figure.axes_at(1, 1).unwrap().title, "Coherence for X,Y");
    }

    #[test]
    fn test_pair_figure_rejects_missing_channel() {
        let source = signal_source::demo_signal().unwrap();
        let mut params = demo_params();
        params.channel_y = 5;
        assert!(matches!(
            pair_figure(&source, &params),
            Err(SpectralError::InvalidParameter { name: "y", .. })
        ));
    }

    #[test]
    fn test_new_clamps_channels_and_builds_figures() {
        let source = signal_source::demo_signal().unwrap();
        let mut params = demo_params();
        params.channel_y = 9;
        let app = SpectralViewerApp::new(AppConfig::default(), source, params);
        assert_eq!(app.params.channel_y, 1);
        assert!(app.frequency_figure.is_ok());
        assert!(app.pair_figure.is_ok());
    }
}
