//! Screen layout calculations
//!
//! Splits the terminal into the search line, the roster table, and the
//! status bar, and provides helpers for centering dialogs.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed regions for the main screen
pub struct AppLayout {
    /// Search box at the top
    pub search: Rect,
    /// Roster table filling the middle
    pub main: Rect,
    /// Single-line status bar at the bottom
    pub status_bar: Rect,
}

impl AppLayout {
    /// Compute the layout for the given terminal area
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            search: chunks[0],
            main: chunks[1],
            status_bar: chunks[2],
        }
    }
}

/// Centered rectangle taking a percentage of the available area
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Centered rectangle with a fixed size, clamped to the available area
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout_regions() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.search.height, 3);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.main.height, 20);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect_fixed(60, 20, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }

    #[test]
    fn test_centered_rect_fixed_centers() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect_fixed(40, 10, area);
        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 7);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);
    }
}
