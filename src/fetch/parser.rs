//! Extracts the day's dishes from the campus menu page
//!
//! The page holds a `<table class="table">` whose first body row has one
//! cell per meal: breakfast, lunch and dinner, in that order.

use scraper::{ElementRef, Html, Selector};

use crate::menu::MenuData;

/// Parses the menu page, returning `None` if the menu table isn't there.
pub fn parse_menu_page(html: &str) -> Option<MenuData> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table.table > tbody > tr").expect("invalid selector");
    let cell_selector = Selector::parse("td").expect("invalid selector");

    let row = document.select(&row_selector).next()?;
    let mut cells = row.select(&cell_selector).map(cell_dishes);

    Some(MenuData {
        breakfast: cells.next()?,
        lunch: cells.next()?,
        dinner: cells.next()?,
    })
}

/// Collects the dish names inside one meal cell.
///
/// Each text node is one dish, with runs of whitespace collapsed. A node
/// opening with a lone `"` starts a long name that swallows the following
/// nodes until one ends with `"`.
fn cell_dishes(cell: ElementRef<'_>) -> Vec<String> {
    let mut dishes: Vec<String> = Vec::new();
    let mut in_long_name = false;

    for node in cell.text() {
        let mut text = node.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }

        if in_long_name {
            if text.ends_with('"') {
                text.pop();
                in_long_name = false;
            }
            match dishes.last_mut() {
                Some(last) => {
                    last.push(' ');
                    last.push_str(&text);
                }
                None => dishes.push(text),
            }
        } else {
            if text.starts_with('"') && text.matches('"').count() == 1 {
                text.remove(0);
                in_long_name = true;
            }
            dishes.push(text);
        }
    }

    dishes.into_iter().map(|d| d.trim().to_string()).collect()
}
