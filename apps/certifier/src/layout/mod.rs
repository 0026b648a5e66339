// Certificate page layout: font metrics, justified paragraph engine, recording canvas.
// Rendering is CPU-bound; batch callers run it inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod font_metrics;
pub mod justify;

// Re-export the public API consumed by the certificate module.
pub use canvas::{CanvasError, DrawCommand, PageCanvas, RenderedPage, Rgb, TextAlign};
pub use font_metrics::{default_certificate_geometry, CertificateGeometry};
pub use justify::{layout_paragraph, ParagraphLayout, StyledRun, TextCanvas, TextMeasurer};
