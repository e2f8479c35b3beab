//! Header row detection and flexible field lookup

use calamine::Data;
use std::collections::HashMap;

/// Canonical output fields and the header labels accepted for each,
/// in priority order.
pub const SKU_ALIASES: &[&str] = &["sku", "stok_kodu"];
pub const NAME_ALIASES: &[&str] = &["name", "ürün adı", "urun_adi"];
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "açıklama"];
pub const PRICE_ALIASES: &[&str] = &["price", "fiyat"];

/// Lookup from normalized header label to 1-based column index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    columns: HashMap<String, u32>,
}

impl HeaderMap {
    /// Build the map from the cells of row 1, left to right.
    ///
    /// Textual labels are trimmed and lower-cased; anything else (numbers,
    /// blanks, empty strings) gets a synthetic `col<N>` key. The first
    /// occurrence of a repeated label wins.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a Data>>,
    {
        let mut columns = HashMap::new();
        for (idx, cell) in cells.into_iter().enumerate() {
            let column = idx as u32 + 1;
            let key = match cell {
                Some(Data::String(s)) if !s.trim().is_empty() => s.trim().to_lowercase(),
                _ => synthetic_key(column),
            };
            columns.entry(key).or_insert(column);
        }
        Self { columns }
    }

    pub fn column(&self, key: &str) -> Option<u32> {
        self.columns.get(key).copied()
    }

    /// Columns of every alias present in the header, in alias priority order
    pub fn resolve(&self, aliases: &[&str]) -> Vec<u32> {
        aliases.iter().filter_map(|alias| self.column(alias)).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn synthetic_key(column: u32) -> String {
    format!("col{}", column)
}

/// Text form of a cell, or `None` when the cell counts as empty
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        other => Some(other.to_string()),
    }
}

/// Numbers read from a sheet are floats even when they hold identifiers;
/// integral values print without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Outcome of coercing a price cell
#[derive(Debug, Clone, PartialEq)]
pub enum PriceCell {
    Missing,
    Value(f64),
    /// Raw text that could not be read as a number
    Unparseable(String),
}

impl PriceCell {
    pub fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => PriceCell::Missing,
            Data::Float(f) if f.is_finite() => PriceCell::Value(*f),
            Data::Int(i) => PriceCell::Value(*i as f64),
            Data::String(s) if s.trim().is_empty() => PriceCell::Missing,
            Data::String(s) => match s.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => PriceCell::Value(value),
                _ => PriceCell::Unparseable(s.clone()),
            },
            other => PriceCell::Unparseable(other.to_string()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            PriceCell::Value(v) => Some(*v),
            _ => None,
        }
    }
}
