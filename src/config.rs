//! # Config Module
//!
//! Conversion options, loadable from JSON.

use crate::curves::ArcHandles;
use crate::errors::ConvertError;
use crate::path_data::ParseMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options for one conversion call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConvertOptions {
    /// Frames per second written to the document.
    pub frame_rate: f64,
    /// Document length in frames for a single source image.
    pub duration: f64,
    /// Report malformed path data and reference cycles as errors instead of
    /// dropping them.
    pub strict: bool,
    /// Emit every contour of a path instead of only the first one.
    pub all_subpaths: bool,
    /// Nesting limit for `<use>` chains.
    pub max_reference_depth: usize,
    /// Total `<use>` expansions allowed per source document.
    pub max_reference_expansions: usize,
    /// Handle length for arc pieces. `exact` keeps arcs on the ellipse.
    pub arc_handles: ArcHandles,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            duration: 60.0,
            strict: false,
            all_subpaths: false,
            max_reference_depth: 16,
            max_reference_expansions: 10_000,
            arc_handles: ArcHandles::Classic,
        }
    }
}

impl ConvertOptions {
    /// Reads options from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}
