//! CSV catalog import parsing.
//!
//! The first line is a header and is always skipped. Columns are
//! `Name, Description, SKU, Price, Category`, split on plain commas.

use crate::domain::product::ProductDraft;

/// Name used when an imported row has a blank name column.
pub const IMPORTED_NAME: &str = "Imported Product";
/// Category used when an imported row has no category column.
pub const IMPORTED_CATEGORY: &str = "Imported";

/// Errors raised while parsing an import payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogImportError {
    /// No data rows survived parsing.
    #[error("the import contained no product rows")]
    NoRows,
}

/// Parse CSV text into product drafts.
///
/// Blank lines and rows with fewer than two columns are skipped. An
/// unparseable, negative or non-finite price becomes `0`.
///
/// # Examples
/// ```
/// use moderaflow::domain::parse_catalog_csv;
///
/// let drafts = parse_catalog_csv("Name,Description,SKU,Price,Category\nMug,Big,M1,4.5,Kitchen\n")
///     .expect("one row");
/// assert_eq!(drafts.len(), 1);
/// assert_eq!(drafts[0].price(), 4.5);
/// ```
pub fn parse_catalog_csv(text: &str) -> Result<Vec<ProductDraft>, CatalogImportError> {
    let drafts: Vec<ProductDraft> = text
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_row)
        .collect();
    if drafts.is_empty() {
        return Err(CatalogImportError::NoRows);
    }
    Ok(drafts)
}

fn parse_row(line: &str) -> Option<ProductDraft> {
    let cols: Vec<&str> = line.split(',').map(str::trim).collect();
    if cols.len() < 2 {
        return None;
    }
    let column = |idx: usize| cols.get(idx).copied().unwrap_or_default();
    let name = match column(0) {
        "" => IMPORTED_NAME,
        other => other,
    };
    let category = match column(4) {
        "" => IMPORTED_CATEGORY,
        other => other,
    };
    let price = column(3)
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .unwrap_or(0.0);
    ProductDraft::try_new(name, column(1), column(2), price, category).ok()
}
