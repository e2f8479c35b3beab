//! Page flow: places a sequence of measured blocks onto fixed-size pages

use super::layout::{MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

const EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: PAGE_WIDTH_MM,
            height: PAGE_HEIGHT_MM,
            margin: MARGIN_MM,
        }
    }

    pub fn frame_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// A block placed on a page; `top` is measured from the page's top edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub block: usize,
    pub top: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub placements: Vec<Placement>,
}

/// Flow blocks top to bottom, starting a new page whenever the next block
/// would cross the bottom margin. A block taller than the frame gets a page
/// of its own and overflows it. There is always at least one page.
pub fn paginate(heights: &[f32], geometry: &PageGeometry) -> Vec<Page> {
    let bottom = geometry.height - geometry.margin;
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut cursor = geometry.margin;

    for (block, &height) in heights.iter().enumerate() {
        if cursor + height > bottom + EPSILON && !current.placements.is_empty() {
            pages.push(std::mem::take(&mut current));
            cursor = geometry.margin;
        }
        current.placements.push(Placement { block, top: cursor });
        cursor += height;
    }

    pages.push(current);
    pages
}
