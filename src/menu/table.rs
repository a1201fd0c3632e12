//! Three-column terminal table for a day's menu
//!
//! Column widths are measured in terminal cells, so Hangul and other
//! East Asian wide characters count as two. When the natural widths don't
//! fit in the requested total, the widest columns are capped and their
//! dishes wrapped onto extra lines.

use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Meal, MenuData};

/// Renders `menu` for `date` as a bordered table no wider than roughly `max_length` cells.
pub fn render_table(menu: &MenuData, date: NaiveDate, max_length: usize) -> String {
    let natural: Vec<usize> = Meal::all()
        .iter()
        .map(|meal| column_width(meal.title(), menu.dishes(*meal)))
        .collect();
    let cap = column_cap(&natural, max_length);

    let mut widths = Vec::with_capacity(3);
    let mut columns = Vec::with_capacity(3);
    for (meal, width) in Meal::all().iter().zip(&natural) {
        // Never cut into the column title
        let limit = cap.max(meal.title().width());
        columns.push(wrap_dishes(menu.dishes(*meal), limit));
        widths.push((*width).min(limit));
    }

    let separator = separator_line(&widths);
    let mut out = format!("Date: {}\n", date.format("%Y-%m-%d"));
    out.push_str(&separator);
    let titles: Vec<&str> = Meal::all().iter().map(|m| m.title()).collect();
    out.push_str(&table_row(&titles, &widths));
    out.push_str(&separator);

    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..rows {
        let cells: Vec<&str> = columns
            .iter()
            .map(|column| column.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        out.push_str(&table_row(&cells, &widths));
    }
    out.push_str(&separator);
    out
}

fn column_width(title: &str, dishes: &[String]) -> usize {
    dishes
        .iter()
        .map(|d| d.width())
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or(0)
}

/// Largest width any single column may take so the three fit in `max_length`.
///
/// The narrowest column is left alone when possible; otherwise the budget is
/// shared between the columns that don't fit.
fn column_cap(widths: &[usize], max_length: usize) -> usize {
    let total: usize = widths.iter().sum();
    if total <= max_length {
        return max_length;
    }

    let mut sorted = widths.to_vec();
    sorted.sort_unstable();
    let (narrowest, middle) = (sorted[0], sorted[1]);

    if narrowest * 3 > max_length {
        max_length / 3
    } else if narrowest + 2 * middle > max_length {
        (max_length - narrowest) / 2
    } else {
        max_length - narrowest - middle
    }
}

/// Splits each dish into pieces at most `limit` cells wide.
fn wrap_dishes(dishes: &[String], limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for dish in dishes {
        let mut line = String::new();
        let mut width = 0;
        for ch in dish.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if width + ch_width > limit && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0;
            }
            line.push(ch);
            width += ch_width;
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn table_row(cells: &[&str], widths: &[usize]) -> String {
    let mut row = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        row.push(' ');
        row.push_str(&pad(cell, *width));
        row.push_str(" |");
    }
    row.push('\n');
    row
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}
