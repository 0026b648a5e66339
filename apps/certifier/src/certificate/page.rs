//! Draws one certificate onto a page canvas.
//!
//! Page structure, top to bottom:
//! 1. Background: the event's template artwork stretched over the page, or a
//!    white page with a thin grey border when there is none.
//! 2. The justified certificate paragraph in the left text column.
//! 3. A QR code pointing at the public validation page.
//! 4. The certificate code, centred under the QR code.

use tracing::warn;

use crate::certificate::code::validation_url;
use crate::certificate::wording::certificate_runs;
use crate::layout::{
    layout_paragraph, CanvasError, CertificateGeometry, PageCanvas, ParagraphLayout,
    RenderedPage, Rgb, TextAlign,
};
use crate::models::{Attendee, Event};

const BORDER_COLOR: Rgb = Rgb(200, 200, 200);
const BORDER_LINE_WIDTH: f32 = 1.0;
const CAPTION_COLOR: Rgb = Rgb(80, 80, 80);

/// Draws the full certificate for `attendee` on `canvas`.
///
/// Returns where the paragraph ended. A rejected template image is logged and
/// replaced with a white background; every other canvas error is returned.
pub fn draw_certificate_page(
    canvas: &mut PageCanvas,
    attendee: &Attendee,
    event: &Event,
    code: &str,
    geometry: &CertificateGeometry,
    base_url: &str,
) -> Result<ParagraphLayout, CanvasError> {
    draw_background(canvas, event, geometry)?;

    canvas.set_font_size(geometry.body_font_size_pt);
    canvas.set_text_color(Rgb::BLACK);
    let paragraph = layout_paragraph(
        &certificate_runs(attendee, event),
        geometry.text_x,
        geometry.text_y,
        geometry.text_width,
        geometry.line_height(),
        canvas,
    )?;

    canvas.draw_qr_code(
        &validation_url(base_url, code),
        geometry.qr_x,
        geometry.qr_y,
        geometry.qr_size,
        geometry.qr_margin,
    )?;

    canvas.set_font_size(geometry.caption_font_size_pt);
    canvas.set_text_color(CAPTION_COLOR);
    canvas.draw_text_aligned(
        &format!("Cód: {code}"),
        geometry.qr_x + geometry.qr_size / 2.0,
        geometry.qr_y + geometry.qr_size + geometry.caption_gap,
        false,
        TextAlign::Center,
    )?;

    Ok(paragraph)
}

/// Renders a certificate on a fresh page sized by `geometry`.
pub fn render_certificate_page(
    attendee: &Attendee,
    event: &Event,
    code: &str,
    geometry: &CertificateGeometry,
    base_url: &str,
) -> Result<RenderedPage, CanvasError> {
    let mut canvas = PageCanvas::new(geometry.page_width, geometry.page_height);
    draw_certificate_page(&mut canvas, attendee, event, code, geometry, base_url)?;
    Ok(canvas.finish())
}

fn draw_background(
    canvas: &mut PageCanvas,
    event: &Event,
    geometry: &CertificateGeometry,
) -> Result<(), CanvasError> {
    let (width, height) = (canvas.width(), canvas.height());

    match event.certificate_template_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            if let Err(e) = canvas.draw_image(url, 0.0, 0.0, width, height) {
                warn!(
                    event_id = %event.id,
                    error = %e,
                    "Certificate template rejected, using plain background"
                );
                canvas.fill_rect(0.0, 0.0, width, height, Rgb::WHITE)?;
            }
        }
        _ => {
            canvas.fill_rect(0.0, 0.0, width, height, Rgb::WHITE)?;
            let inset = geometry.border_inset;
            canvas.stroke_rect(
                inset,
                inset,
                width - 2.0 * inset,
                height - 2.0 * inset,
                BORDER_COLOR,
                BORDER_LINE_WIDTH,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_certificate_geometry;
    use crate::layout::font_metrics::FontVariant;
    use crate::layout::{DrawCommand, TextMeasurer};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    const BASE_URL: &str = "https://eventos.example.org";

    fn make_attendee() -> Attendee {
        Attendee {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            full_name: "Maria Aparecida dos Santos Oliveira".to_string(),
            cpf: "52998224725".to_string(),
            phone: String::new(),
        }
    }

    fn make_event(template: Option<&str>) -> Event {
        Event {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: "Práticas de Alfabetização e Letramento".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            location: None,
            is_open: true,
            workload: 4,
            certificates_released: true,
            certificate_template_url: template.map(str::to_string),
        }
    }

    fn text_commands(page: &RenderedPage) -> Vec<(&str, f32, f32, FontVariant)> {
        page.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    text, x, y, font, ..
                } => Some((text.as_str(), *x, *y, *font)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plain_background_has_white_fill_and_border() {
        let geometry = default_certificate_geometry();
        let page = render_certificate_page(
            &make_attendee(),
            &make_event(None),
            "123456/2026",
            &geometry,
            BASE_URL,
        )
        .unwrap();
        assert!(matches!(
            page.commands[0],
            DrawCommand::FillRect { color: Rgb::WHITE, .. }
        ));
        assert!(matches!(
            page.commands[1],
            DrawCommand::StrokeRect { x, y, .. } if x == 5.0 && y == 5.0
        ));
    }

    #[test]
    fn test_template_background_is_stretched_image() {
        let geometry = default_certificate_geometry();
        let event = make_event(Some("https://cdn.example.org/modelo.png"));
        let page =
            render_certificate_page(&make_attendee(), &event, "123456/2026", &geometry, BASE_URL)
                .unwrap();
        assert_eq!(
            page.commands[0],
            DrawCommand::Image {
                source: "https://cdn.example.org/modelo.png".to_string(),
                x: 0.0,
                y: 0.0,
                width: 297.0,
                height: 210.0,
            }
        );
    }

    #[test]
    fn test_rejected_template_falls_back_to_white() {
        let geometry = default_certificate_geometry();
        let event = make_event(Some("modelo.png"));
        let page =
            render_certificate_page(&make_attendee(), &event, "123456/2026", &geometry, BASE_URL)
                .unwrap();
        assert!(matches!(
            page.commands[0],
            DrawCommand::FillRect { color: Rgb::WHITE, .. }
        ));
        assert!(
            !page
                .commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Image { .. })),
            "no image command after fallback"
        );
    }

    #[test]
    fn test_paragraph_stays_inside_text_column() {
        let geometry = default_certificate_geometry();
        let mut canvas = PageCanvas::new(geometry.page_width, geometry.page_height);
        let attendee = make_attendee();
        let event = make_event(None);
        let paragraph =
            draw_certificate_page(&mut canvas, &attendee, &event, "1/2026", &geometry, BASE_URL)
                .unwrap();
        assert!(paragraph.line_count >= 3, "long sentence should wrap");
        assert!(paragraph.end_y < geometry.qr_y, "paragraph must end above the QR code");

        canvas.set_font_size(geometry.body_font_size_pt);
        for command in canvas.commands() {
            if let DrawCommand::Text {
                text,
                x,
                font,
                align: TextAlign::Left,
                ..
            } = command
            {
                let width = canvas.measure(text, *font == FontVariant::HelveticaBold);
                assert!(*x >= geometry.text_x - 1e-3);
                assert!(
                    x + width <= geometry.text_x + geometry.text_width + 1e-2,
                    "{text} overflows the column"
                );
            }
        }
    }

    #[test]
    fn test_name_is_bold_and_first_line_starts_at_margin() {
        let geometry = default_certificate_geometry();
        let page = render_certificate_page(
            &make_attendee(),
            &make_event(None),
            "123456/2026",
            &geometry,
            BASE_URL,
        )
        .unwrap();
        let texts = text_commands(&page);
        assert_eq!(texts[0].0, "Certificamos");
        assert_eq!((texts[0].1, texts[0].2), (geometry.text_x, geometry.text_y));
        let maria = texts.iter().find(|t| t.0 == "Maria").unwrap();
        assert_eq!(maria.3, FontVariant::HelveticaBold);
        let comma_after_name = texts.iter().find(|t| t.0 == ",").unwrap();
        assert_eq!(comma_after_name.3, FontVariant::Helvetica);
    }

    #[test]
    fn test_qr_code_and_caption() {
        let geometry = default_certificate_geometry();
        let page = render_certificate_page(
            &make_attendee(),
            &make_event(None),
            "654321/2026",
            &geometry,
            "https://eventos.example.org/",
        )
        .unwrap();

        let qr = page
            .commands
            .iter()
            .find(|c| matches!(c, DrawCommand::QrCode { .. }))
            .unwrap();
        assert_eq!(
            qr,
            &DrawCommand::QrCode {
                payload: "https://eventos.example.org/validate?code=654321/2026".to_string(),
                x: 25.0,
                y: 145.0,
                size: 30.0,
                margin: 1,
            }
        );

        match page.commands.last().unwrap() {
            DrawCommand::Text {
                text,
                x,
                y,
                size_pt,
                color,
                align,
                ..
            } => {
                assert_eq!(text, "Cód: 654321/2026");
                assert_eq!((*x, *y), (40.0, 180.0));
                assert_eq!(*size_pt, 9.0);
                assert_eq!(*color, Rgb(80, 80, 80));
                assert_eq!(*align, TextAlign::Center);
            }
            other => panic!("expected caption text, got {other:?}"),
        }
    }
}
