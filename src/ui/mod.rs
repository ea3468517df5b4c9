//! UI components for Spectral Viewer.
//!
//! This module contains the figure renderer and the parameter controls.

pub mod controls;
pub mod figure_view;

pub use controls::{show_controls, ControlAction, ViewParams};
pub use figure_view::show_figure;
