//! Small pure helpers behind the window layout.

use std::io::Cursor;

use eframe::egui::Color32;
use labeler_core::{ImageFile, Session};

pub const ACTIVE_FILL: Color32 = Color32::from_rgb(240, 173, 78);
pub const INACTIVE_FILL: Color32 = Color32::from_rgb(51, 122, 183);
pub const MAX_IMAGE_SIZE: [f32; 2] = [600.0, 400.0];

pub fn button_fill(active: bool) -> Color32 {
    if active { ACTIVE_FILL } else { INACTIVE_FILL }
}

pub fn button_text(index: usize, class: &str) -> String {
    format!("{index} {class}")
}

/// egui caches decoded images per URI, keyed here by file name.
pub fn image_uri(file: &ImageFile) -> String {
    format!("bytes://{}", file.name)
}

/// Format and pixel size, when the bytes are an image we can read.
pub fn describe_image(bytes: &[u8]) -> Option<String> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let format = reader.format()?;
    let (w, h) = reader.into_dimensions().ok()?;
    Some(format!("{format:?} {w}x{h}"))
}

pub fn position_line(session: &Session, detail: Option<&str>) -> String {
    let file = session.current_file();
    let mut line = format!("{}/{}  {}", session.index() + 1, session.len(), file.name);
    if let Some(detail) = detail {
        line.push_str("  (");
        line.push_str(detail);
        line.push(')');
    }
    let labels = session.current_labels().to_field();
    if !labels.is_empty() {
        line.push_str("  [");
        line.push_str(&labels);
        line.push(']');
    }
    line
}
