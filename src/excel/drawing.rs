//! Workbook package walking for embedded images
//!
//! Cell values come from calamine, which does not expose where pictures are
//! anchored. This module follows the package relationships by hand:
//! workbook → active sheet → drawing part → anchors → media files.

use crate::error::{CatalogError, CatalogResult};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const REL_DRAWING_SUFFIX: &str = "/drawing";
const REL_WORKSHEET_SUFFIX: &str = "/worksheet";

/// A worksheet and the package part holding it
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPart {
    pub name: String,
    pub path: String,
}

/// An embedded image and the 1-based row its top-left corner sits in
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnchor {
    pub row: u32,
    /// Package path of the image bytes, e.g. `xl/media/image1.png`
    pub media: String,
}

/// Result of enumerating the images of one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorScan {
    /// Resolved anchors, in drawing order
    pub anchors: Vec<ImageAnchor>,
    /// Pictures whose anchor row or media target could not be resolved
    pub unresolved: usize,
}

impl AnchorScan {
    /// Group anchors by row, keeping drawing order inside each row
    pub fn by_row(&self) -> HashMap<u32, Vec<&ImageAnchor>> {
        let mut map: HashMap<u32, Vec<&ImageAnchor>> = HashMap::new();
        for anchor in &self.anchors {
            map.entry(anchor.row).or_default().push(anchor);
        }
        map
    }
}

/// The zip container of an `.xlsx` workbook
pub struct WorkbookPackage<R: Read + Seek> {
    zip: ZipArchive<R>,
}

impl<R: Read + Seek> WorkbookPackage<R> {
    pub fn new(reader: R) -> CatalogResult<Self> {
        let zip = ZipArchive::new(reader)?;
        Ok(Self { zip })
    }

    /// Read a whole part; `None` when the package has no such entry
    pub fn read_part(&mut self, path: &str) -> CatalogResult<Option<Vec<u8>>> {
        let name = match self
            .zip
            .file_names()
            .find(|name| name.eq_ignore_ascii_case(path))
        {
            Some(name) => name.to_owned(),
            None => return Ok(None),
        };
        let mut file = match self.zip.by_name(&name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn require_part(&mut self, path: &str) -> CatalogResult<Vec<u8>> {
        self.read_part(path)?
            .ok_or_else(|| CatalogError::Workbook(format!("missing workbook part '{}'", path)))
    }

    /// The sheet the workbook opens on (`activeTab`), or the first sheet
    pub fn active_sheet(&mut self) -> CatalogResult<SheetPart> {
        let workbook = parse_workbook(&self.require_part(WORKBOOK_PART)?)?;
        if workbook.sheets.is_empty() {
            return Err(CatalogError::Workbook("workbook has no sheets".to_string()));
        }
        let relationships = match self.read_part(&rels_path(WORKBOOK_PART))? {
            Some(xml) => parse_relationships(&xml)?,
            None => Vec::new(),
        };

        let index = workbook.active_tab.min(workbook.sheets.len() - 1);
        let (name, rel_id) = &workbook.sheets[index];
        let target = relationships
            .iter()
            .find(|rel| &rel.id == rel_id && rel.kind.ends_with(REL_WORKSHEET_SUFFIX))
            .map(|rel| resolve_target(WORKBOOK_PART, &rel.target))
            .ok_or_else(|| {
                CatalogError::Workbook(format!("sheet '{}' has no worksheet part", name))
            })?;

        debug!(sheet = %name, part = %target, "selected active sheet");
        Ok(SheetPart {
            name: name.clone(),
            path: target,
        })
    }

    /// Enumerate every picture anchored on the given sheet
    pub fn image_anchors(&mut self, sheet: &SheetPart) -> CatalogResult<AnchorScan> {
        let mut scan = AnchorScan::default();
        let sheet_rels = match self.read_part(&rels_path(&sheet.path))? {
            Some(xml) => parse_relationships(&xml)?,
            None => return Ok(scan),
        };

        for drawing in sheet_rels
            .iter()
            .filter(|rel| rel.kind.ends_with(REL_DRAWING_SUFFIX))
        {
            let drawing_path = resolve_target(&sheet.path, &drawing.target);
            let xml = match self.read_part(&drawing_path)? {
                Some(xml) => xml,
                None => continue,
            };
            let anchors = parse_drawing(&xml)?;
            let media: HashMap<String, String> = match self.read_part(&rels_path(&drawing_path))? {
                Some(rels) => parse_relationships(&rels)?
                    .into_iter()
                    .map(|rel| (rel.id, resolve_target(&drawing_path, &rel.target)))
                    .collect(),
                None => HashMap::new(),
            };

            for anchor in anchors {
                // Shapes, charts and text boxes carry no image reference
                if !anchor.picture {
                    continue;
                }
                let target = anchor.embed.as_ref().and_then(|embed| media.get(embed));
                match (anchor.row, target) {
                    (Some(row), Some(target)) => scan.anchors.push(ImageAnchor {
                        row: row + 1,
                        media: target.clone(),
                    }),
                    _ => scan.unresolved += 1,
                }
            }
        }

        debug!(
            anchors = scan.anchors.len(),
            unresolved = scan.unresolved,
            "scanned sheet drawings"
        );
        Ok(scan)
    }
}

//==============================================================================
// Part parsers
//==============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WorkbookInfo {
    /// (sheet name, relationship id) in tab order
    pub sheets: Vec<(String, String)>,
    pub active_tab: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Relationship {
    pub id: String,
    pub kind: String,
    pub target: String,
}

/// One `twoCellAnchor` / `oneCellAnchor` / `absoluteAnchor` entry
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DrawingAnchor {
    /// Zero-based `from` row, when the anchor has one
    pub row: Option<u32>,
    /// The anchor holds a picture (`a:blip`), embedded or linked
    pub picture: bool,
    /// Relationship id of the embedded picture bytes; absent for pictures
    /// that only carry an external `r:link`
    pub embed: Option<String>,
}

fn xml_reader(xml: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(xml);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.expand_empty_elements = true;
    config.trim_text(true);
    reader
}

/// Attribute value looked up by local name, ignoring any namespace prefix
fn attribute(
    event: &BytesStart<'_>,
    local: &[u8],
    decoder: Decoder,
) -> CatalogResult<Option<String>> {
    for attr in event.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.decode_and_unescape_value(decoder)?.into_owned()));
        }
    }
    Ok(None)
}

pub(crate) fn parse_workbook(xml: &[u8]) -> CatalogResult<WorkbookInfo> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut info = WorkbookInfo::default();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(event) => match event.local_name().as_ref() {
                b"workbookView" => {
                    if let Some(tab) = attribute(&event, b"activeTab", reader.decoder())? {
                        info.active_tab = tab.trim().parse().unwrap_or(0);
                    }
                }
                b"sheet" => {
                    let name = attribute(&event, b"name", reader.decoder())?;
                    let id = attribute(&event, b"id", reader.decoder())?;
                    if let Some((name, id)) = name.zip(id) {
                        info.sheets.push((name, id));
                    }
                }
                _ => (),
            },
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }
    Ok(info)
}

pub(crate) fn parse_relationships(xml: &[u8]) -> CatalogResult<Vec<Relationship>> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut relationships = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(event) if event.local_name().as_ref() == b"Relationship" => {
                let decoder = reader.decoder();
                let id = attribute(&event, b"Id", decoder)?;
                let target = attribute(&event, b"Target", decoder)?;
                let kind = attribute(&event, b"Type", decoder)?.unwrap_or_default();
                if let Some((id, target)) = id.zip(target) {
                    relationships.push(Relationship { id, kind, target });
                }
            }
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }
    Ok(relationships)
}

pub(crate) fn parse_drawing(xml: &[u8]) -> CatalogResult<Vec<DrawingAnchor>> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut anchors = Vec::new();

    let mut current: Option<DrawingAnchor> = None;
    let mut in_from = false;
    let mut in_row = false;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(event) => match event.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor" | b"absoluteAnchor" => {
                    current = Some(DrawingAnchor::default());
                }
                b"from" if current.is_some() => in_from = true,
                b"row" if in_from => in_row = true,
                b"blip" => {
                    if let Some(anchor) = current.as_mut() {
                        anchor.picture = true;
                        if anchor.embed.is_none() {
                            anchor.embed = attribute(&event, b"embed", reader.decoder())?;
                        }
                    }
                }
                _ => (),
            },
            Event::Text(text) if in_row => {
                if let Some(anchor) = current.as_mut() {
                    anchor.row = String::from_utf8_lossy(&text).trim().parse().ok();
                }
            }
            Event::End(event) => match event.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor" | b"absoluteAnchor" => {
                    if let Some(anchor) = current.take() {
                        anchors.push(anchor);
                    }
                    in_from = false;
                    in_row = false;
                }
                b"from" => in_from = false,
                b"row" => in_row = false,
                _ => (),
            },
            Event::Eof => break,
            _ => (),
        }
        buf.clear();
    }
    Ok(anchors)
}

//==============================================================================
// Part paths
//==============================================================================

/// `xl/worksheets/sheet1.xml` → `xl/worksheets/_rels/sheet1.xml.rels`
pub(crate) fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns the relationship
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    let target = target.replace('\\', "/");
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => (),
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
