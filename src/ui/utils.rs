use ratatui::layout::{Constraint, Direction, Layout, Rect};

const MIN_POPUP_WIDTH: u16 = 30;
const MIN_POPUP_HEIGHT: u16 = 8;

/// Centered rectangle taking the given percentages of `r`, never smaller
/// than a usable dialog when `r` allows it
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let middle = popup_layout.get(1).copied().unwrap_or(r);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(middle);
    let mut result = horizontal.get(1).copied().unwrap_or(middle);

    if result.width < MIN_POPUP_WIDTH && r.width >= MIN_POPUP_WIDTH {
        result.width = MIN_POPUP_WIDTH;
        result.x = r.x + (r.width - result.width) / 2;
    }
    if result.height < MIN_POPUP_HEIGHT && r.height >= MIN_POPUP_HEIGHT {
        result.height = MIN_POPUP_HEIGHT;
        result.y = r.y + (r.height - result.height) / 2;
    }
    result
}

/// The area inside a one-cell border
#[must_use]
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_respects_minimum() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(10, 10, area);
        assert_eq!(popup.width, MIN_POPUP_WIDTH);
        assert_eq!(popup.height, MIN_POPUP_HEIGHT);
        assert_eq!(popup.x, 35);
    }

    #[test]
    fn test_inner_and_contains() {
        let area = Rect::new(2, 3, 10, 5);
        assert_eq!(inner(area), Rect::new(3, 4, 8, 3));
        assert!(contains(area, 2, 3));
        assert!(!contains(area, 12, 3));
    }
}
