//! Scoped page preview artifacts.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::RecognitionError;

/// A PNG preview of an uploaded page.
///
/// Backed by a temporary file that is removed when the handle drops.
/// Callers hold the preview only while the upload is displayed; replacing
/// a file releases the old preview with its handle, so repeated uploads
/// in one session do not accumulate files.
pub struct PagePreview {
    file: NamedTempFile,
    width: u32,
    height: u32,
}

impl PagePreview {
    /// Render a page image into a fresh preview file.
    pub fn from_image(image: &DynamicImage) -> Result<Self, RecognitionError> {
        let file = tempfile::Builder::new()
            .prefix("sempliscan-preview-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| RecognitionError::Preview(e.to_string()))?;

        image
            .save_with_format(file.path(), image::ImageFormat::Png)
            .map_err(|e| RecognitionError::Preview(e.to_string()))?;

        let (width, height) = image.dimensions();
        debug!("wrote page preview to {}", file.path().display());
        Ok(Self {
            file,
            width,
            height,
        })
    }

    /// Path of the preview file, valid while the handle lives.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Preview dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Release the preview, deleting the backing file.
    pub fn release(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_file_exists_until_released() {
        let image = DynamicImage::new_luma8(4, 4);
        let preview = PagePreview::from_image(&image).unwrap();
        let path = preview.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(preview.dimensions(), (4, 4));

        preview.release();
        assert!(!path.exists());
    }
}
