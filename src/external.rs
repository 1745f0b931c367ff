//! Seams to the processes shotlab does not run itself: media probing and slate
//! rendering. Callers supply implementations; the library only consumes the results.

use std::path::Path;

use crate::foundation::core::Size;
use crate::foundation::error::ShotResult;

/// Stream metadata reported by a media probe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbeInfo {
    pub width: u32,
    pub height: u32,
    /// Display window, when it differs from the data window.
    pub display_width: Option<u32>,
    pub display_height: Option<u32>,
    pub channels: u32,
    pub fps: f64,
    /// Pixel aspect ratio.
    pub par: f64,
    pub timecode: String,
}

impl Default for ProbeInfo {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            display_width: None,
            display_height: None,
            channels: 3,
            fps: 24.0,
            par: 1.0,
            timecode: "00:00:00:00".to_owned(),
        }
    }
}

impl ProbeInfo {
    /// Display window size, falling back to the data window per axis.
    pub fn display_size(&self) -> Size {
        Size::new(
            self.display_width.unwrap_or(self.width),
            self.display_height.unwrap_or(self.height),
        )
    }
}

/// Reads stream metadata from a media file (ffprobe, iinfo, ...).
pub trait MediaProbe {
    fn probe(&self, path: &Path) -> ShotResult<ProbeInfo>;
}

/// Rendered slate frame, RGBA8 straight alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlateRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Renders a slate template filled with shot data.
pub trait SlateRenderer {
    fn render_slate(
        &self,
        template: &Path,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> ShotResult<SlateRaster>;
}
