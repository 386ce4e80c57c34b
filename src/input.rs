//! Click/tap plumbing: registered hit regions and pixel-to-cell conversion.
//!
//! The render pass registers a rectangular target for everything tappable;
//! the mouse handler converts browser pixel coordinates to a terminal cell
//! and hit-tests it. Targets are generic over the action type so the game
//! dispatches typed intents instead of raw coordinates.

use ratzilla::ratatui::layout::Rect;

/// A tappable region paired with the action it triggers.
#[derive(Debug, Clone)]
pub struct ClickTarget<A> {
    pub rect: Rect,
    pub action: A,
}

/// Shared between the render loop (which registers targets every frame) and
/// the mouse handler (which hit-tests against the latest frame's targets).
pub struct ClickState<A> {
    pub targets: Vec<ClickTarget<A>>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl<A: Copy> ClickState<A> {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_target(&mut self, rect: Rect, action: A) {
        self.targets.push(ClickTarget { rect, action });
    }

    /// Register a full-width row target inside `area`. Rows outside the area
    /// are ignored, so callers can register list rows without bounds math.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action: A) {
        if row >= area.y && row < area.y + area.height {
            self.add_target(Rect::new(area.x, row, area.width, 1), action);
        }
    }

    /// Register targets for a horizontal tab bar from the padded label
    /// widths. Each target covers its label plus half of each adjacent
    /// separator; the first and last tabs extend to the area edges so the
    /// whole bar is tappable with no dead gaps.
    pub fn add_tab_targets(
        &mut self,
        tab_widths: &[(u16, A)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = tab_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut starts: Vec<u16> = Vec::with_capacity(n);
        let mut cursor: u16 = 0;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        for i in 0..n {
            let (_, action) = tab_widths[i];

            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + tab_widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };

            let right = if i == n - 1 {
                total_width
            } else {
                let cur_end = starts[i] + tab_widths[i].0;
                cur_end + (starts[i + 1] - cur_end) / 2
            };

            let w = right.saturating_sub(left);
            if w > 0 {
                self.add_target(Rect::new(x + left, y, w, height), action);
            }
        }
    }

    /// Hit-test a terminal cell. Later-registered targets sit on top and win
    /// when regions overlap, matching the paint order of the frame.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<A> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action)
            } else {
                None
            }
        })
    }
}

/// Convert a pixel Y (relative to the grid container's top edge) to a
/// terminal row. `None` when outside the grid or the grid is degenerate.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    if row >= terminal_rows {
        return None;
    }
    Some(row)
}

/// Convert a pixel X (relative to the grid container's left edge) to a
/// terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols {
        return None;
    }
    Some(col)
}
