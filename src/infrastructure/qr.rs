//! QR image rendering
//!
//! Renders a ticket's QR payload to an SVG image and wraps it in a
//! `data:` URL that dashboard and e-mail clients can embed directly.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::shared::errors::InfraError;

/// Rendered QR image as a data URL.
#[derive(Debug, Clone)]
pub struct QrImage {
    pub data_url: String,
}

/// Render a payload string into an SVG QR code data URL.
pub fn render_data_url(payload: &str) -> Result<QrImage, InfraError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| InfraError::Crypto(format!("QR encode failed: {e}")))?;

    let image = code
        .render()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    let data_url = format!("data:image/svg+xml;base64,{}", BASE64.encode(image));
    Ok(QrImage { data_url })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_svg_data_url() {
        let image = render_data_url("CF|v=1|pid=p1").unwrap();
        assert!(image.data_url.starts_with("data:image/svg+xml;base64,"));

        let b64 = image.data_url.trim_start_matches("data:image/svg+xml;base64,");
        let svg = String::from_utf8(BASE64.decode(b64).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn same_payload_renders_identically() {
        let a = render_data_url("CF|pid=x").unwrap();
        let b = render_data_url("CF|pid=x").unwrap();
        assert_eq!(a.data_url, b.data_url);
    }
}
