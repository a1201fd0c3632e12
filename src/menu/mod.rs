//! Menu data for a single day and its cache text encoding
//!
//! The fetcher turns the campus web page into [`MenuData`] and stores it as
//! plain text: one `[meal]` header per section followed by one dish per line.
//! The cache never looks inside this text; only the display side decodes it.

pub mod table;

use chrono::NaiveDate;

pub use table::render_table;

/// Formats cached or fetched menu text for the terminal.
///
/// Sectioned text becomes a table; anything else is printed under the date as is.
pub fn render_menu_text(text: &str, date: NaiveDate, max_length: usize) -> String {
    match MenuData::from_text(text) {
        Some(menu) => render_table(&menu, date, max_length),
        None => format!("Date: {}\n{}\n", date.format("%Y-%m-%d"), text.trim_end()),
    }
}

/// Dishes served at each meal of one day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuData {
    pub breakfast: Vec<String>,
    pub lunch: Vec<String>,
    pub dinner: Vec<String>,
}

/// One of the three daily meals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub fn all() -> &'static [Meal] {
        &[Meal::Breakfast, Meal::Lunch, Meal::Dinner]
    }

    /// Section header used in the cache text
    fn key(&self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }

    /// Column title used in the rendered table
    pub fn title(&self) -> &'static str {
        match self {
            Meal::Breakfast => "BREAKFAST",
            Meal::Lunch => "LUNCH",
            Meal::Dinner => "DINNER",
        }
    }

    fn from_header(line: &str) -> Option<Meal> {
        let key = line.strip_prefix('[')?.strip_suffix(']')?;
        Meal::all().iter().copied().find(|m| m.key() == key)
    }
}

impl MenuData {
    pub fn dishes(&self, meal: Meal) -> &[String] {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
            Meal::Dinner => &self.dinner,
        }
    }

    fn dishes_mut(&mut self, meal: Meal) -> &mut Vec<String> {
        match meal {
            Meal::Breakfast => &mut self.breakfast,
            Meal::Lunch => &mut self.lunch,
            Meal::Dinner => &mut self.dinner,
        }
    }

    /// True when no meal lists any dish
    pub fn is_empty(&self) -> bool {
        Meal::all().iter().all(|m| self.dishes(*m).is_empty())
    }

    /// Encodes the menu as sectioned text for caching.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for meal in Meal::all() {
            text.push('[');
            text.push_str(meal.key());
            text.push_str("]\n");
            for dish in self.dishes(*meal) {
                text.push_str(dish);
                text.push('\n');
            }
        }
        text
    }

    /// Decodes text produced by [`MenuData::to_text`].
    ///
    /// Returns `None` if the text contains no meal section at all, which is
    /// how foreign text (e.g. from another fetcher) is told apart.
    pub fn from_text(text: &str) -> Option<MenuData> {
        let mut menu = MenuData::default();
        let mut current = None;

        for line in text.lines() {
            let line = line.trim();
            if let Some(meal) = Meal::from_header(line) {
                current = Some(meal);
                continue;
            }
            if line.is_empty() {
                continue;
            }
            if let Some(meal) = current {
                menu.dishes_mut(meal).push(line.to_string());
            }
        }

        current.map(|_| menu)
    }
}
