//! Win/place (単勝・複勝) odds HTML parser
//!
//! The JRA page shows both categories in one `table.tanpuku`:
//! - `td.num`: horse number
//! - `td.odds_tan`: win odds
//! - `td.odds_fuku`: place odds range, lower bound in `span.min`

use super::ScraperError;
use crate::models::OddsMap;
use scraper::{ElementRef, Html, Selector};

/// Place odds cell selectors, most common first
const PLACE_CELL_SELECTORS: [&str; 5] = [
    "td.odds_fuku",
    "td.odds_fukusho",
    "td.odds_fuku1",
    "td.odds_fuku2",
    "td.odds_fuku3",
];

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::ParseError(e.to_string()))
}

/// Rows of the win/place table
fn table_rows<'a>(document: &'a Html) -> Result<Vec<ElementRef<'a>>, ScraperError> {
    let table_selector = selector("table.tanpuku")?;
    let row_selector = selector("tbody tr")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ScraperError::ParseError("Could not find table.tanpuku".to_string()))?;

    Ok(table.select(&row_selector).collect())
}

/// Parse win (単勝) odds
///
/// Returns a map of horse number -> odds. Horses without numeric odds
/// (scratched, cancelled) are left out.
pub fn parse_tansho_odds(html: &str) -> Result<OddsMap, ScraperError> {
    let document = Html::parse_document(html);
    let num_selector = selector("td.num")?;
    let odds_selector = selector("td.odds_tan")?;

    let mut odds = OddsMap::new();
    for row in table_rows(&document)? {
        let Some(horse) = row.select(&num_selector).next().and_then(horse_number) else {
            tracing::debug!("Row without td.num");
            continue;
        };
        let Some(cell) = row.select(&odds_selector).next() else {
            tracing::debug!("Row for horse {} without td.odds_tan", horse);
            continue;
        };
        if let Some(value) = parse_odds_text(&cell.text().collect::<String>()) {
            odds.insert(horse.to_string(), value);
        }
    }

    tracing::info!("Parsed {} win odds", odds.len());
    Ok(odds)
}

/// Parse place (複勝) odds, keeping the lower bound of each range
pub fn parse_fukusho_odds(html: &str) -> Result<OddsMap, ScraperError> {
    let document = Html::parse_document(html);
    let num_selector = selector("td.num")?;
    let min_selector = selector("span.min")?;
    let td_selector = selector("td")?;
    let place_selectors = PLACE_CELL_SELECTORS
        .iter()
        .map(|css| selector(css))
        .collect::<Result<Vec<_>, _>>()?;

    let mut odds = OddsMap::new();
    for row in table_rows(&document)? {
        let Some(horse) = row.select(&num_selector).next().and_then(horse_number) else {
            tracing::warn!("Row without td.num");
            continue;
        };

        let cells: Vec<ElementRef> = row.select(&td_selector).collect();
        let place_cell = place_selectors
            .iter()
            .find_map(|sel| row.select(sel).next())
            .or_else(|| cells.iter().copied().find(|td| has_class_containing(td, "fuku")))
            .or_else(|| cell_after_win_odds(&cells));

        let Some(cell) = place_cell else {
            tracing::warn!("No place odds cell for horse {}", horse);
            continue;
        };
        let Some(min) = cell.select(&min_selector).next() else {
            tracing::warn!("No span.min in place odds for horse {}", horse);
            continue;
        };

        let text = min.text().collect::<String>();
        match parse_odds_text(&text) {
            Some(value) => {
                odds.insert(horse.to_string(), value);
            }
            None => tracing::warn!("Unreadable place odds {:?} for horse {}", text.trim(), horse),
        }
    }

    tracing::info!("Parsed {} place odds", odds.len());
    Ok(odds)
}

/// The cell right after `td.odds_tan`, unless it is another win odds cell
fn cell_after_win_odds<'a>(cells: &[ElementRef<'a>]) -> Option<ElementRef<'a>> {
    let idx = cells.iter().position(|td| has_class_containing(td, "odds_tan"))?;
    cells
        .get(idx + 1)
        .copied()
        .filter(|td| !has_class_containing(td, "odds_tan"))
}

fn has_class_containing(element: &ElementRef, needle: &str) -> bool {
    element
        .value()
        .classes()
        .any(|c| c.to_lowercase().contains(needle))
}

/// Horse number from a cell's text
pub(super) fn horse_number(element: ElementRef) -> Option<u32> {
    element.text().collect::<String>().trim().parse().ok()
}

/// Parse odds text such as "1,234.5"; `None` for "取消", "-", empty
///
/// Odds must be finite and non-negative.
pub(super) fn parse_odds_text(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|odds| odds.is_finite() && *odds >= 0.0)
}
