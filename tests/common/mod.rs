//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use printpdf::lopdf::content::Content;
use printpdf::lopdf::{Dictionary, Document, Object, ObjectId};
use rust_xlsxwriter::{Image, Workbook};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// A small solid-color PNG; distinct colors give distinct bytes
pub fn png(r: u8, g: u8, b: u8) -> Vec<u8> {
    let buffer = ImageBuffer::from_pixel(8, 6, Rgb([r, g, b]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

pub fn write_png(path: &Path, r: u8, g: u8, b: u8) {
    std::fs::write(path, png(r, g, b)).unwrap();
}

/// One sheet cell, addressed 0-based the way rust_xlsxwriter does
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// Builds a single-sheet workbook from header/rows and anchored pictures
pub struct SheetFixture<'a> {
    headers: Vec<&'a str>,
    rows: Vec<Vec<Option<Cell<'a>>>>,
    /// (0-based row, 0-based column, png bytes)
    images: Vec<(u32, u16, Vec<u8>)>,
}

impl<'a> SheetFixture<'a> {
    pub fn new(headers: &[&'a str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<Option<Cell<'a>>>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn image(mut self, row: u32, col: u16, bytes: Vec<u8>) -> Self {
        self.images.push((row, col, bytes));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in self.headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (idx, cells) in self.rows.iter().enumerate() {
            let row = idx as u32 + 1;
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    Some(Cell::Text(text)) => {
                        sheet.write_string(row, col as u16, *text).unwrap();
                    }
                    Some(Cell::Number(value)) => {
                        sheet.write_number(row, col as u16, *value).unwrap();
                    }
                    None => {}
                }
            }
        }
        for (row, col, bytes) in &self.images {
            let image = Image::new_from_buffer(bytes).unwrap();
            sheet.insert_image(*row, *col, &image).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    pub fn save(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).unwrap();
    }
}

pub fn text(value: &str) -> Option<Cell<'_>> {
    Some(Cell::Text(value))
}

pub fn number<'a>(value: f64) -> Option<Cell<'a>> {
    Some(Cell::Number(value))
}

// ═══════════════════════════════════════════════════════════════════════════
// PDF TEXT
// ═══════════════════════════════════════════════════════════════════════════

/// Strings shown on each page, one entry per `Tj`, decoded through the
/// ToUnicode map of the font selected by the preceding `Tf`
pub fn pdf_text(path: &Path) -> Vec<Vec<String>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let maps: HashMap<Vec<u8>, HashMap<u16, char>> = page_fonts(&doc, page_id)
                .into_iter()
                .map(|(name, font)| (name, to_unicode(&doc, font)))
                .collect();
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

            let mut font = None;
            let mut shown = Vec::new();
            for op in &content.operations {
                match op.operator.as_str() {
                    "Tf" => {
                        font = op
                            .operands
                            .first()
                            .and_then(|name| name.as_name().ok())
                            .and_then(|name| maps.get(name));
                    }
                    "Tj" => {
                        if let (Some(map), Some(Object::String(bytes, _))) =
                            (font, op.operands.first())
                        {
                            shown.push(decode_glyphs(map, bytes));
                        }
                    }
                    _ => {}
                }
            }
            shown
        })
        .collect()
}

/// Every string shown anywhere in the document
pub fn pdf_lines(path: &Path) -> Vec<String> {
    pdf_text(path).into_iter().flatten().collect()
}

/// Follows `obj` through an indirect reference, if it is one
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Font dictionaries of a page keyed by resource name. lopdf's
/// `get_page_fonts` skips a `/Font` entry stored as a reference, which is
/// how printpdf writes it, so `/Resources`, `/Font` and each font are
/// dereferenced here.
fn page_fonts(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, &Dictionary)> {
    let Some(resources) = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Resources").ok())
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
    else {
        return Vec::new();
    };
    let Some(fonts) = resources
        .get(b"Font")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
    else {
        return Vec::new();
    };
    fonts
        .iter()
        .filter_map(|(name, value)| {
            let font = resolve(doc, value)?.as_dict().ok()?;
            Some((name.clone(), font))
        })
        .collect()
}

fn to_unicode(doc: &Document, font: &Dictionary) -> HashMap<u16, char> {
    let Ok(stream) = font
        .get(b"ToUnicode")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_object(id))
        .and_then(Object::as_stream)
    else {
        return HashMap::new();
    };
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let mut map = HashMap::new();
    let mut in_block = false;
    for line in String::from_utf8_lossy(&data).lines() {
        let line = line.trim();
        if line.ends_with("beginbfchar") {
            in_block = true;
        } else if line == "endbfchar" {
            in_block = false;
        } else if in_block {
            let codes: Vec<u32> = line
                .split(['<', '>'])
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .filter_map(|hex| u32::from_str_radix(hex, 16).ok())
                .collect();
            if let [glyph, unicode] = codes[..] {
                if let Some(c) = char::from_u32(unicode) {
                    map.insert(glyph as u16, c);
                }
            }
        }
    }
    map
}

fn decode_glyphs(map: &HashMap<u16, char>, bytes: &[u8]) -> String {
    bytes
        .chunks(2)
        .map(|pair| {
            let glyph = u16::from_be_bytes([pair[0], *pair.get(1).unwrap_or(&0)]);
            map.get(&glyph).copied().unwrap_or('\u{FFFD}')
        })
        .collect()
}
