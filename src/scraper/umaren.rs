//! Quinella (馬連) odds HTML parser

use super::tanpuku::{horse_number, parse_odds_text};
use super::ScraperError;
use crate::models::OddsMap;
use scraper::{Html, Selector};

/// Parse quinella odds from HTML
///
/// The page lists one small table per first horse:
/// - `ul.umaren_list > li`: one block per first horse
/// - `caption`: first horse number
/// - `tbody tr`: `th` second horse, `td` odds
///
/// Returns a map of "01,05" -> odds (both horse numbers zero-padded).
pub fn parse_umaren_odds(html: &str) -> Result<OddsMap, ScraperError> {
    let document = Html::parse_document(html);

    let list_selector =
        Selector::parse("ul.umaren_list").map_err(|e| ScraperError::ParseError(e.to_string()))?;
    let item_selector = Selector::parse("li").map_err(|e| ScraperError::ParseError(e.to_string()))?;
    let caption_selector =
        Selector::parse("caption").map_err(|e| ScraperError::ParseError(e.to_string()))?;
    let tr_selector =
        Selector::parse("tbody tr").map_err(|e| ScraperError::ParseError(e.to_string()))?;
    let th_selector = Selector::parse("th").map_err(|e| ScraperError::ParseError(e.to_string()))?;
    let td_selector = Selector::parse("td").map_err(|e| ScraperError::ParseError(e.to_string()))?;

    let lists: Vec<_> = document.select(&list_selector).collect();
    if lists.is_empty() {
        return Err(ScraperError::ParseError(
            "Could not find ul.umaren_list".to_string(),
        ));
    }

    let mut odds = OddsMap::new();
    for list in lists {
        for item in list.select(&item_selector) {
            let Some(first) = item.select(&caption_selector).next().and_then(horse_number) else {
                tracing::debug!("Quinella block without caption");
                continue;
            };

            for row in item.select(&tr_selector) {
                let Some(second) = row.select(&th_selector).next().and_then(horse_number) else {
                    continue;
                };
                let Some(cell) = row.select(&td_selector).next() else {
                    continue;
                };
                if let Some(value) = parse_odds_text(&cell.text().collect::<String>()) {
                    odds.insert(format!("{:02},{:02}", first, second), value);
                }
            }
        }
    }

    tracing::info!("Parsed {} quinella odds", odds.len());
    Ok(odds)
}
