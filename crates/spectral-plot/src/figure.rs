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

//! In-memory figure model.
//!
//! A [`Figure`] owns a grid of [`Axes`] panels, each holding labelled
//! [`Series`]. Nothing here draws pixels: a renderer walks the figure and
//! maps it onto whatever plotting backend it uses. Panels are addressed
//! through [`AxesId`] handles so callers can keep annotating a figure after
//! it has been built.

use std::ops::{Index, IndexMut};

use crate::welch::SpectralEstimate;

/// Smallest value drawn on a logarithmic axis. Zero and negative values are
/// raised to this floor so an all-zero spectrum still renders.
pub const LOG_FLOOR: f64 = 1e-30;

/// Y-axis scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    /// Base-10 logarithmic.
    Log,
}

impl AxisScale {
    /// Map a data value into plot coordinates for this scale.
    #[must_use]
    pub fn transform(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log => {
                if value.is_nan() || value < LOG_FLOOR {
                    LOG_FLOOR.log10()
                } else {
                    value.log10()
                }
            }
        }
    }

    /// Map a plot coordinate back to the data value it represents.
    #[must_use]
    pub fn inverse(self, coordinate: f64) -> f64 {
        match self {
            Self::Linear => coordinate,
            Self::Log => 10f64.powf(coordinate),
        }
    }
}

/// One named line on a panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    /// Legend entry; unnamed series are left out of the legend.
    pub label: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    /// Create a series; `x` and `y` are truncated to the shorter length.
    #[must_use]
    pub fn new(mut x: Vec<f64>, mut y: Vec<f64>) -> Self {
        let len = x.len().min(y.len());
        x.truncate(len);
        y.truncate(len);
        Self { label: None, x, y }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Points in plot coordinates for the given y scale.
    #[must_use]
    pub fn plot_points(&self, scale: AxisScale) -> Vec<[f64; 2]> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| [x, scale.transform(y)])
            .collect()
    }
}

impl From<&SpectralEstimate> for Series {
    fn from(estimate: &SpectralEstimate) -> Self {
        Self::new(estimate.frequencies.clone(), estimate.values.clone())
    }
}

impl From<SpectralEstimate> for Series {
    fn from(estimate: SpectralEstimate) -> Self {
        Self::new(estimate.frequencies, estimate.values)
    }
}

/// A single plot panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_scale: AxisScale,
    pub show_legend: bool,
    pub series: Vec<Series>,
}

impl Axes {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    #[must_use]
    pub fn with_y_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    #[must_use]
    pub fn with_legend(mut self) -> Self {
        self.show_legend = true;
        self
    }

    /// Append a series to this panel.
    pub fn plot(&mut self, series: impl Into<Series>) -> &mut Self {
        self.series.push(series.into());
        self
    }

    /// Labels of all named series, in drawing order.
    #[must_use]
    pub fn legend_labels(&self) -> Vec<&str> {
        self.series
            .iter()
            .filter_map(|s| s.label.as_deref())
            .collect()
    }
}

/// Inter-panel spacing as a fraction of the average panel width / height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

/// Handle to one panel of a [`Figure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxesId(usize);

impl AxesId {
    /// Position of the panel in the figure's row-major panel list.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Row-major grid of panel handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxesGrid {
    rows: usize,
    cols: usize,
    ids: Vec<AxesId>,
}

impl AxesGrid {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<AxesId> {
        if row < self.rows && col < self.cols {
            self.ids.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = AxesId> + '_ {
        self.ids.iter().copied()
    }
}

impl Index<(usize, usize)> for AxesGrid {
    type Output = AxesId;

    fn index(&self, (row, col): (usize, usize)) -> &AxesId {
        assert!(
            row < self.rows && col < self.cols,
            "axes ({row}, {col}) outside a {}x{} grid",
            self.rows,
            self.cols
        );
        &self.ids[row * self.cols + col]
    }
}

/// A renderable figure: a rows × cols grid of panels.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub spacing: Spacing,
    rows: usize,
    cols: usize,
    axes: Vec<Axes>,
}

impl Figure {
    /// Create a figure with `rows * cols` empty panels.
    ///
    /// A zero dimension is raised to one so every figure has a panel.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            title: None,
            spacing: Spacing::default(),
            rows,
            cols,
            axes: vec![Axes::default(); rows * cols],
        }
    }

    /// Create a figure and hand back the grid of its panels.
    #[must_use]
    pub fn subplots(rows: usize, cols: usize) -> (Self, AxesGrid) {
        let figure = Self::new(rows, cols);
        let grid = figure.grid();
        (figure, grid)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, wspace: f64, hspace: f64) -> Self {
        self.spacing = Spacing { wspace, hspace };
        self
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Handles to every panel, row-major.
    #[must_use]
    pub fn grid(&self) -> AxesGrid {
        AxesGrid {
            rows: self.rows,
            cols: self.cols,
            ids: (0..self.axes.len()).map(AxesId).collect(),
        }
    }

    /// Panel at `(row, col)`, if inside the grid.
    #[must_use]
    pub fn axes_at(&self, row: usize, col: usize) -> Option<&Axes> {
        if row < self.rows && col < self.cols {
            self.axes.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// All panels, row-major.
    #[must_use]
    pub fn panels(&self) -> &[Axes] {
        &self.axes
    }

    /// Panels grouped by row.
    pub fn panel_rows(&self) -> impl Iterator<Item = &[Axes]> + '_ {
        self.axes.chunks(self.cols)
    }
}

impl Index<AxesId> for Figure {
    type Output = Axes;

    fn index(&self, id: AxesId) -> &Axes {
        &self.axes[id.0]
    }
}

impl IndexMut<AxesId> for Figure {
    fn index_mut(&mut self, id: AxesId) -> &mut Axes {
        &mut self.axes[id.0]
    }
}
