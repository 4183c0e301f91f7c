//! Human-readable rendering of a game as text.
//!
//! Face-down cards are shown as "XX" and face-up cards with their
//! `short_str()` rank/suit code ("A♥", "10♠"). The layout mirrors a table:
//! foundations and stock/waste on top, the seven columns underneath.

use crate::card::Card;
use crate::game::GameState;
use crate::tableau::{Tableau, NUM_COLS};

/// Format a single card for display, either face-up or face-down.
pub fn format_card_visible(card: Card) -> String {
    if card.face_up {
        card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Render only the foundation row, showing each pile's top card.
///
///   - Empty foundation: `[  ]`
///   - Non-empty: e.g. `[A♥]`, `[7♣]`
pub fn render_foundations(tab: &Tableau) -> String {
    let mut s = String::from("Foundations: ");
    for pile in &tab.foundations {
        match pile.top() {
            None => s.push_str("[  ] "),
            Some(card) => s.push_str(&format!("[{}] ", card.short_str())),
        }
    }
    s.trim_end().to_string()
}

/// Render the stock (count only) and waste (top card and count) on one line.
pub fn render_stock_and_waste(tab: &Tableau) -> String {
    let stock = if tab.stock.is_empty() {
        "Stock: [empty]".to_string()
    } else {
        format!("Stock: [{} cards]", tab.stock.len())
    };

    let waste = match tab.waste.top() {
        None => "Waste: [empty]".to_string(),
        Some(top) => format!("Waste: [{}] ({} cards)", top.short_str(), tab.waste.len()),
    };

    format!("{stock}    {waste}")
}

/// Render all tableau columns as a multi-line string.
///
/// Columns are top-justified: the first card dealt to every column shares
/// the first row, and the playable card of each column is its lowest row.
pub fn render_columns(tab: &Tableau) -> String {
    let mut s = String::from("Columns:\n      ");
    for col_idx in 0..NUM_COLS {
        s.push_str(&format!(" C{}  ", col_idx + 1));
    }
    s.push('\n');

    let max_height = tab.columns.iter().map(|c| c.len()).max().unwrap_or(0);

    for row in 0..max_height {
        s.push_str("      ");
        for col in &tab.columns {
            match col.cards().get(row) {
                None => s.push_str("     "),
                Some(&card) => s.push_str(&format!("{:>4} ", format_card_visible(card))),
            }
        }
        s.push('\n');
    }

    s
}

/// Render a full tableau (foundations, stock/waste, and columns).
pub fn render_tableau(tab: &Tableau) -> String {
    format!(
        "{}\n{}\n\n{}",
        render_foundations(tab),
        render_stock_and_waste(tab),
        render_columns(tab)
    )
}

/// Render the board plus the move counter.
pub fn render_game(game: &GameState) -> String {
    format!("Moves: {}\n{}", game.move_count(), render_tableau(game.tableau()))
}

/// The message shown once all foundations are complete.
pub fn win_message(game: &GameState) -> String {
    format!("Congratulations! You won in {} moves!", game.move_count())
}
