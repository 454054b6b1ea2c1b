//! PDF text, metadata and page image extraction using lopdf and pdf-extract.

use std::cell::OnceCell;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PageSource, Result};
use crate::error::PdfError;
use crate::models::Metadata;

/// Info dictionary entries copied into [`Metadata`].
const INFO_KEYS: [(&[u8], &str); 6] = [
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Keywords", "keywords"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
];

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    /// Per-page text from pdf-extract, computed on first fallback.
    fallback_pages: OnceCell<Option<Vec<String>>>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            fallback_pages: OnceCell::new(),
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.fallback_pages = OnceCell::new();
        Ok(())
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Page text from pdf-extract. It parses the whole file, so it only runs
    /// when lopdf cannot produce text for a page.
    fn fallback_page_text(&self, page: u32) -> Option<String> {
        let pages = self.fallback_pages.get_or_init(|| {
            let data = self.raw_data.as_slice();
            match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data)) {
                Ok(Ok(pages)) => Some(pages),
                Ok(Err(e)) => {
                    debug!("pdf-extract failed: {}", e);
                    None
                }
                Err(_) => {
                    debug!("pdf-extract panicked, giving up on fallback text");
                    None
                }
            }
        });

        pages
            .as_ref()
            .and_then(|pages| pages.get(page.checked_sub(1)? as usize))
            .cloned()
    }

    fn try_extract_image_from_object(&self, doc: &Document, obj: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = obj else {
            return None;
        };
        let dict = &stream.dict;

        // Check if it's an image XObject
        let subtype = dict.get(b"Subtype").ok()?;
        if subtype.as_name().ok()? != b"Image" {
            return None;
        }

        let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
        let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;

        trace!("Found image object: {}x{}", width, height);

        if let Ok(filter) = dict.get(b"Filter") {
            let filter_name = match filter {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                _ => None,
            };

            match filter_name {
                Some(b"DCTDecode") => {
                    // Scanned pages are usually JPEG; the raw stream is the file
                    return image::load_from_memory_with_format(
                        &stream.content,
                        image::ImageFormat::Jpeg,
                    )
                    .ok();
                }
                Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                    trace!("Unsupported image filter {:?}", filter_name.map(String::from_utf8_lossy));
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
                Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");

        let bits = match dict.get(b"BitsPerComponent").ok().and_then(|o| o.as_i64().ok()) {
            Some(bits) => u8::try_from(bits).ok()?,
            None => 8,
        };

        create_image_from_raw(&data, width, height, color_space, bits)
    }

    /// Get resources dictionary for a page, walking up the page tree.
    fn page_resources(&self, doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
        let dict = doc.get_object(node_id).ok()?.as_dict().ok()?;

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                return Some(res_dict.clone());
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.page_resources(doc, *parent_id),
            _ => None,
        }
    }
}

/// Decode an uncompressed 8-bit gray or RGB image. Dimensions come from the
/// file, so the sample data must cover them before anything is allocated.
fn create_image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: u8,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let channels: usize = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        _ => {
            trace!("Unsupported colorspace {:?}", String::from_utf8_lossy(color_space));
            return None;
        }
    };

    let pixels = (width as usize).checked_mul(height as usize)?;
    let needed = pixels.checked_mul(channels)?;
    if pixels == 0 || data.len() < needed {
        trace!(
            "Image data too short: {}x{} needs {} bytes, have {}",
            width,
            height,
            needed,
            data.len()
        );
        return None;
    }

    let mut rgba_data = Vec::with_capacity(pixels * 4);
    for sample in data[..needed].chunks_exact(channels) {
        match *sample {
            [gray] => rgba_data.extend_from_slice(&[gray, gray, gray, 255]),
            [r, g, b] => rgba_data.extend_from_slice(&[r, g, b, 255]),
            _ => return None,
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba_data).map(DynamicImage::ImageRgba8)
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or Latin-1).
fn decode_pdf_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfExtractor {
    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        let Ok(doc) = self.document() else {
            return metadata;
        };

        let info = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| doc.dereference(info).ok())
            .and_then(|(_, obj)| obj.as_dict().ok());

        if let Some(info) = info {
            for (pdf_key, key) in INFO_KEYS {
                let value = info
                    .get(pdf_key)
                    .ok()
                    .and_then(|obj| doc.dereference(obj).ok())
                    .and_then(|(_, obj)| decode_pdf_string(obj));

                if let Some(value) = value.map(|v| v.trim().to_string()) {
                    if !value.is_empty() {
                        metadata.insert(key.to_string(), value);
                    }
                }
            }
        }

        trace!("Info dictionary: {:?}", metadata);
        metadata
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        match doc.extract_text(&[page]) {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(text) => Ok(self.fallback_page_text(page).unwrap_or(text)),
            Err(e) => self.fallback_page_text(page).ok_or(PdfError::TextExtraction {
                page,
                reason: e.to_string(),
            }),
        }
    }

    fn page_image(&self, page: u32) -> Result<DynamicImage> {
        let doc = self.document()?;

        let pages = doc.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let xobjects = self
            .page_resources(doc, *page_id)
            .and_then(|resources| resources.get(b"XObject").ok().cloned())
            .and_then(|xobjects| match doc.dereference(&xobjects) {
                Ok((_, Object::Dictionary(dict))) => Some(dict.clone()),
                _ => None,
            });

        // The largest image on the page is taken to be the scan
        let image = xobjects
            .iter()
            .flat_map(|dict| dict.iter())
            .filter_map(|(_, obj_ref)| doc.dereference(obj_ref).ok())
            .filter_map(|(_, obj)| self.try_extract_image_from_object(doc, obj))
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height()));

        debug!("Page {} image: {:?}", page, image.as_ref().map(|i| (i.width(), i.height())));
        image.ok_or(PdfError::NoPageImage(page))
    }
}
