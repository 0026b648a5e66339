//! Recording page canvas.
//!
//! `PageCanvas` is the page surface certificates are drawn on. It does not
//! produce PDF bytes: every drawing call is recorded as a serializable
//! `DrawCommand`, in millimetres with a top-left origin, and the finished
//! `RenderedPage` is handed to a PDF writer outside this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::font_metrics::{get_metrics, FontVariant};
use crate::layout::justify::{TextCanvas, TextMeasurer};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f32, y: f32 },

    #[error("unsupported image source: {0}")]
    UnsupportedImageSource(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Draw commands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// `x` is where the text starts.
    Left,
    /// `x` is the horizontal centre of the text.
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        line_width: f32,
    },
    Image {
        source: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    // The PDF writer rasterizes the symbol; only the payload travels here.
    QrCode {
        payload: String,
        x: f32,
        y: f32,
        size: f32,
        margin: u8,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font: FontVariant,
        size_pt: f32,
        color: Rgb,
        align: TextAlign,
    },
}

/// One finished page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

pub struct PageCanvas {
    width: f32,
    height: f32,
    font_size_pt: f32,
    text_color: Rgb,
    commands: Vec<DrawCommand>,
}

impl PageCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            font_size_pt: 12.0,
            text_color: Rgb::BLACK,
            commands: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_font_size(&mut self, size_pt: f32) {
        self.font_size_pt = size_pt;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn fill_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    ) -> Result<(), CanvasError> {
        ensure_finite(x, y)?;
        ensure_finite(width, height)?;
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
        Ok(())
    }

    pub fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        line_width: f32,
    ) -> Result<(), CanvasError> {
        ensure_finite(x, y)?;
        ensure_finite(width, height)?;
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        });
        Ok(())
    }

    /// Places an image. Only `http(s)://` URLs and `data:image/` URIs are accepted.
    pub fn draw_image(
        &mut self,
        source: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CanvasError> {
        let supported = source.starts_with("https://")
            || source.starts_with("http://")
            || source.starts_with("data:image/");
        if !supported {
            return Err(CanvasError::UnsupportedImageSource(source.to_string()));
        }
        ensure_finite(x, y)?;
        ensure_finite(width, height)?;
        self.commands.push(DrawCommand::Image {
            source: source.to_string(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    pub fn draw_qr_code(
        &mut self,
        payload: &str,
        x: f32,
        y: f32,
        size: f32,
        margin: u8,
    ) -> Result<(), CanvasError> {
        ensure_finite(x, y)?;
        ensure_finite(size, size)?;
        self.commands.push(DrawCommand::QrCode {
            payload: payload.to_string(),
            x,
            y,
            size,
            margin,
        });
        Ok(())
    }

    /// Draws text in the current size and colour.
    pub fn draw_text_aligned(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        bold: bool,
        align: TextAlign,
    ) -> Result<(), CanvasError> {
        ensure_finite(x, y)?;
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font: FontVariant::from_bold(bold),
            size_pt: self.font_size_pt,
            color: self.text_color,
            align,
        });
        Ok(())
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn finish(self) -> RenderedPage {
        RenderedPage {
            width: self.width,
            height: self.height,
            commands: self.commands,
        }
    }
}

impl TextMeasurer for PageCanvas {
    fn measure(&self, text: &str, bold: bool) -> f32 {
        get_metrics(FontVariant::from_bold(bold)).measure_mm(text, self.font_size_pt)
    }
}

impl TextCanvas for PageCanvas {
    type Error = CanvasError;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, bold: bool) -> Result<(), CanvasError> {
        self.draw_text_aligned(text, x, y, bold, TextAlign::Left)
    }
}

fn ensure_finite(x: f32, y: f32) -> Result<(), CanvasError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(CanvasError::NonFiniteCoordinate { x, y })
    }
}
