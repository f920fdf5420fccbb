//! PDF loading and content extraction using lopdf and pdf-extract.

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PdfType, Result};
use crate::error::PdfError;

/// Loaded PDF with text and image accessors.
pub struct PdfExtractor {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Load a PDF from bytes. PDFs encrypted with an empty password are
    /// decrypted transparently.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document =
            Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document, raw_data })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Classify the PDF by what it carries.
    pub fn analyze(&self) -> PdfType {
        let has_text = self
            .extract_text()
            .map(|t| t.trim().len() > 50)
            .unwrap_or(false);
        let has_images = !self.extract_all_images().is_empty();

        let pdf_type = match (has_text, has_images) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        };
        debug!(
            "PDF analysis: has_text={}, has_images={} -> {:?}",
            has_text, has_images, pdf_type
        );
        pdf_type
    }

    /// Extract embedded text from the whole document.
    pub fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Extract embedded images from one page (1-indexed), falling back to
    /// a whole-document scan when the page carries no XObject images.
    pub fn extract_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();
        if let Some(resources) = self.page_resources(page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobject_dict))) =
                    self.document.dereference(xobjects)
                {
                    for (_name, object_ref) in xobject_dict.iter() {
                        if let Ok((_, object)) = self.document.dereference(object_ref) {
                            if let Some(image) = self.image_from_object(object) {
                                images.push(image);
                            }
                        }
                    }
                }
            }
        }

        if images.is_empty() {
            debug!("no XObject images on page {}, scanning all objects", page);
            images = self.extract_all_images();
        }

        debug!("extracted {} images from page {}", images.len(), page);
        Ok(images)
    }

    /// Extract every embedded image in the document.
    pub fn extract_all_images(&self) -> Vec<DynamicImage> {
        self.document
            .objects
            .values()
            .filter_map(|object| self.image_from_object(object))
            .collect()
    }

    fn image_from_object(&self, object: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = object else {
            return None;
        };
        let dict = &stream.dict;
        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
        trace!("found image object: {}x{}", width, height);

        if let Ok(filter) = dict.get(b"Filter") {
            let filter_name = match filter {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                _ => None,
            };
            match filter_name {
                Some(b"DCTDecode") => {
                    return image::load_from_memory_with_format(
                        &stream.content,
                        image::ImageFormat::Jpeg,
                    )
                    .ok();
                }
                Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                    trace!("unsupported image filter, skipping");
                    return None;
                }
                _ => {}
            }
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => {
                    self.document.get_object(*r).ok().and_then(|o| o.as_name().ok())
                }
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");
        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);

        if bits != 8 {
            trace!("unsupported bits per component: {}", bits);
            return None;
        }
        image_from_raw(&data, width, height, color_space)
    }

    /// Resources dictionary for a page, following Parent inheritance.
    fn page_resources(&self, page_id: ObjectId) -> Option<Dictionary> {
        let mut node_id = page_id;
        loop {
            let Ok(Object::Dictionary(dict)) = self.document.get_object(node_id) else {
                return None;
            };
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(resources))) =
                    self.document.dereference(resources)
                {
                    return Some(resources.clone());
                }
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => node_id = *parent_id,
                _ => return None,
            }
        }
    }
}

fn image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    let pixel_count = (width * height) as usize;

    let rgba = match color_space {
        b"DeviceRGB" | b"RGB" if data.len() >= pixel_count * 3 => {
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for chunk in data[..pixel_count * 3].chunks_exact(3) {
                rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
            }
            rgba
        }
        b"DeviceGray" | b"G" if data.len() >= pixel_count => {
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for &gray in &data[..pixel_count] {
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
            rgba
        }
        _ => {
            trace!(
                "could not decode raw image: colorspace={:?}, len={}",
                String::from_utf8_lossy(color_space),
                data.len()
            );
            return None;
        }
    };

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_fail_to_parse() {
        assert!(matches!(
            PdfExtractor::load(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn raw_gray_image_decodes() {
        let data = vec![128u8; 4];
        let image = image_from_raw(&data, 2, 2, b"DeviceGray").unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
    }

    #[test]
    fn raw_rgb_image_decodes() {
        let data = vec![10u8; 12];
        let image = image_from_raw(&data, 2, 2, b"DeviceRGB").unwrap();
        assert_eq!(image.width(), 2);
    }

    #[test]
    fn short_raw_data_is_rejected() {
        assert!(image_from_raw(&[0u8; 2], 2, 2, b"DeviceGray").is_none());
        assert!(image_from_raw(&[0u8; 4], 2, 2, b"Indexed").is_none());
    }
}
