//! # PDF Writer
//!
//! A from-scratch PDF 1.7 writer for a single fixed-size page. Writing the
//! raw bytes ourselves keeps the engine self-contained; the subset of the
//! spec a one-page vector report needs is small.
//!
//! Structure of the output:
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, pages, fonts, images, content)
//! ...
//! xref                <- byte offsets of each object
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! The canvas speaks PDF's native coordinate system: origin bottom-left,
//! y increasing upward, units in points. Text uses the two standard
//! Helvetica faces with WinAnsi encoding, so nothing is embedded. Images
//! become XObjects — JPEG via DCTDecode passthrough, decoded RGB via
//! FlateDecode with an optional SMask for transparency.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use crate::donut::PathCmd;
use crate::error::ReportError;
use crate::font::Font;
use crate::image::{ImagePixelData, LoadedImage};
use crate::model::Color;
use miniz_oxide::deflate::compress_to_vec_zlib;

/// Cubic tangent length for a quarter-circle arc.
const CIRCLE_KAPPA: f64 = 0.552_284_749_8;

/// Accumulates content-stream operators and image resources for one page.
pub struct PageCanvas {
    width: f64,
    height: f64,
    ops: String,
    images: Vec<LoadedImage>,
}

impl PageCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        PageCanvas {
            width,
            height,
            ops: String::new(),
            images: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let _ = write!(
            self.ops,
            "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
            color.r, color.g, color.b, x, y, w, h
        );
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color, line_width: f64) {
        let _ = write!(
            self.ops,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\nQ\n",
            color.r, color.g, color.b, line_width, x, y, w, h
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, line_width: f64) {
        let _ = write!(
            self.ops,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            color.r, color.g, color.b, line_width, x1, y1, x2, y2
        );
    }

    /// Fill an arbitrary path (nonzero winding).
    pub fn fill_path(&mut self, path: &[PathCmd], color: Color) {
        if path.is_empty() {
            return;
        }
        let _ = write!(self.ops, "q\n{:.3} {:.3} {:.3} rg\n", color.r, color.g, color.b);
        for cmd in path {
            match cmd {
                PathCmd::MoveTo(p) => {
                    let _ = write!(self.ops, "{:.2} {:.2} m\n", p.x, p.y);
                }
                PathCmd::LineTo(p) => {
                    let _ = write!(self.ops, "{:.2} {:.2} l\n", p.x, p.y);
                }
                PathCmd::CurveTo(c0, c1, p) => {
                    let _ = write!(
                        self.ops,
                        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
                        c0.x, c0.y, c1.x, c1.y, p.x, p.y
                    );
                }
                PathCmd::Close => {
                    let _ = write!(self.ops, "h\n");
                }
            }
        }
        let _ = write!(self.ops, "f\nQ\n");
    }

    /// Fill a circle from four Bézier quadrants.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) {
        if r <= 0.0 {
            return;
        }
        let k = CIRCLE_KAPPA * r;
        let _ = write!(self.ops, "q\n{:.3} {:.3} {:.3} rg\n", color.r, color.g, color.b);
        let _ = write!(self.ops, "{:.2} {:.2} m\n", cx + r, cy);
        let _ = write!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
            cx + r, cy + k, cx + k, cy + r, cx, cy + r
        );
        let _ = write!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
            cx - k, cy + r, cx - r, cy + k, cx - r, cy
        );
        let _ = write!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
            cx - r, cy - k, cx - k, cy - r, cx, cy - r
        );
        let _ = write!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
            cx + k, cy - r, cx + r, cy - k, cx + r, cy
        );
        let _ = write!(self.ops, "h\nf\nQ\n");
    }

    /// Draw text with its baseline at `y`.
    pub fn text(&mut self, content: &str, x: f64, y: f64, font: Font, size: f64, color: Color) {
        if content.is_empty() {
            return;
        }
        let _ = write!(
            self.ops,
            "BT\n{:.3} {:.3} {:.3} rg\n/{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            color.r,
            color.g,
            color.b,
            font_resource(font),
            size,
            x,
            y,
            encode_winansi(content)
        );
    }

    /// Register a decoded image; the returned index is stable for the life
    /// of the canvas and is what `draw_image` takes.
    pub fn register_image(&mut self, image: LoadedImage) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }

    pub fn draw_image(&mut self, index: usize, x: f64, y: f64, w: f64, h: f64) {
        let _ = write!(
            self.ops,
            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            w, h, x, y, index
        );
    }
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F0",
        Font::HelveticaBold => "F1",
    }
}

/// Encode a string for a PDF literal string in WinAnsiEncoding, escaping
/// delimiters and emitting octal escapes outside the printable ASCII range.
/// Unmappable characters degrade to `?`.
fn encode_winansi(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        let b = unicode_to_winansi(ch).unwrap_or(b'?');
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Map a Unicode codepoint to a WinAnsiEncoding (Windows-1252) byte.
/// Most of Latin-1 maps directly; 0x80..=0x9F holds the typographic extras.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x2122 => Some(0x99), // Trade mark sign
        _ => None,
    }
}

fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Serialize the canvas into a complete single-page PDF file.
pub fn write_document(canvas: &PageCanvas, title: &str) -> Result<Vec<u8>, ReportError> {
    if !(canvas.width.is_finite() && canvas.height.is_finite())
        || canvas.width <= 0.0
        || canvas.height <= 0.0
    {
        return Err(ReportError::Pdf(format!(
            "page size {}x{} is not drawable",
            canvas.width, canvas.height
        )));
    }

    // Object IDs: 0 placeholder (PDF objects are 1-indexed), 1 catalog,
    // 2 page tree, 3-4 the two fonts, then images, content, page, info.
    let mut objects: Vec<Vec<u8>> = vec![Vec::new(); 3];

    objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

    for font in [Font::Helvetica, Font::HelveticaBold] {
        objects.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            )
            .into_bytes(),
        );
    }

    let mut xobject_refs: Vec<usize> = Vec::new();
    for image in &canvas.images {
        xobject_refs.push(write_image_xobject(&mut objects, image));
    }

    let compressed = compress_to_vec_zlib(canvas.ops.as_bytes(), 6);
    let content_id = objects.len();
    let mut content = Vec::new();
    let _ = write!(
        content,
        "<< /Length {} /Filter /FlateDecode >>\nstream\n",
        compressed.len()
    );
    content.extend_from_slice(&compressed);
    content.extend_from_slice(b"\nendstream");
    objects.push(content);

    let xobjects = if xobject_refs.is_empty() {
        String::new()
    } else {
        let entries: Vec<String> = xobject_refs
            .iter()
            .enumerate()
            .map(|(i, id)| format!("/Im{} {} 0 R", i, id))
            .collect();
        format!(" /XObject << {} >>", entries.join(" "))
    };
    let page_id = objects.len();
    objects.push(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R \
             /Resources << /Font << /F0 3 0 R /F1 4 0 R >>{} >> >>",
            canvas.width, canvas.height, content_id, xobjects
        )
        .into_bytes(),
    );

    objects[2] = format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", page_id).into_bytes();

    let info_id = objects.len();
    objects.push(
        format!(
            "<< /Title ({}) /Producer (weekplate 0.3) /Creator (weekplate) >>",
            escape_pdf_string(title)
        )
        .into_bytes(),
    );

    Ok(serialize(&objects, info_id))
}

/// Write one image as one or two XObjects (SMask for alpha). Returns the
/// main XObject's id.
fn write_image_xobject(objects: &mut Vec<Vec<u8>>, image: &LoadedImage) -> usize {
    match &image.pixel_data {
        ImagePixelData::Jpeg { data, grayscale } => {
            let id = objects.len();
            let mut obj = Vec::new();
            let _ = write!(
                obj,
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
                image.width_px,
                image.height_px,
                if *grayscale { "/DeviceGray" } else { "/DeviceRGB" },
                data.len()
            );
            obj.extend_from_slice(data);
            obj.extend_from_slice(b"\nendstream");
            objects.push(obj);
            id
        }
        ImagePixelData::Decoded { rgb, alpha } => {
            let smask_ref = alpha.as_ref().map(|alpha_data| {
                let compressed = compress_to_vec_zlib(alpha_data, 6);
                let smask_id = objects.len();
                let mut obj = Vec::new();
                let _ = write!(
                    obj,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed.len()
                );
                obj.extend_from_slice(&compressed);
                obj.extend_from_slice(b"\nendstream");
                objects.push(obj);
                format!(" /SMask {} 0 R", smask_id)
            });

            let compressed = compress_to_vec_zlib(rgb, 6);
            let id = objects.len();
            let mut obj = Vec::new();
            let _ = write!(
                obj,
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode \
                 /Length {}{} >>\nstream\n",
                image.width_px,
                image.height_px,
                compressed.len(),
                smask_ref.unwrap_or_default()
            );
            obj.extend_from_slice(&compressed);
            obj.extend_from_slice(b"\nendstream");
            objects.push(obj);
            id
        }
    }
}

/// Lay the objects out with a cross-reference table and trailer.
fn serialize(objects: &[Vec<u8>], info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, obj) in objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{} 0 obj\n", i);
        output.extend_from_slice(obj);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", objects.len());
    let _ = write!(output, "0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }

    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len(),
        info_id,
        xref_offset
    );

    output
}
