use std::path::Path;
use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

use super::RenderError;

const FONT_FAMILY: &str = "sans-serif";

static INSTALLED: OnceLock<Result<(), RenderError>> = OnceLock::new();

/// Registers `bytes` as the chart font. The first call wins; later calls
/// return the outcome of that first registration.
///
/// Call before the first render to replace the embedded default.
pub fn install_font(bytes: &'static [u8]) -> Result<(), RenderError> {
    INSTALLED.get_or_init(|| register(bytes)).clone()
}

/// Reads a TTF/OTF file for [`install_font`]. The bytes live for the rest of
/// the process.
pub fn load_font_file(path: impl AsRef<Path>) -> Result<&'static [u8], RenderError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| RenderError::Font(format!("cannot read {}: {e}", path.display())))?;
    Ok(Box::leak(bytes.into_boxed_slice()))
}

pub(crate) fn ensure_font() -> Result<(), RenderError> {
    install_font(epaint_default_fonts::UBUNTU_LIGHT)
}

fn register(bytes: &'static [u8]) -> Result<(), RenderError> {
    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| RenderError::Font("invalid font data".into()))?;
    tracing::debug!(bytes = bytes.len(), "registered chart font");
    Ok(())
}
