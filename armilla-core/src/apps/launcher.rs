//! Application launcher view.

use crate::app::{AppError, Application, Capabilities};
use crate::event::{Event, EventMask};
use crate::manager::SystemApi;

/// Screen edge in pixels; the panel is square.
const SCREEN_PX: i16 = 240;

/// Grid geometry of the launcher page.
const GRID_COLS: i16 = 2;
const GRID_ROWS: i16 = 3;

/// Full-screen grid of launcher ring entries.
///
/// A tap on a grid cell asks the system to launch the ring entry at
/// that index; out-of-range cells are ignored by the manager.
pub struct LauncherView {
    _reserved: (),
}

impl LauncherView {
    pub fn new() -> Self {
        Self { _reserved: () }
    }

    fn cell_index(x: i16, y: i16) -> Option<usize> {
        if !(0..SCREEN_PX).contains(&x) || !(0..SCREEN_PX).contains(&y) {
            return None;
        }
        let col = x / (SCREEN_PX / GRID_COLS);
        let row = y / (SCREEN_PX / GRID_ROWS);
        Some((row * GRID_COLS + col) as usize)
    }
}

impl Default for LauncherView {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for LauncherView {
    fn name(&self) -> &'static str {
        "Launcher"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TOUCH
    }

    fn foreground(&mut self, sys: &mut SystemApi) -> Result<(), AppError> {
        sys.request_event(EventMask::TOUCH);
        Ok(())
    }

    fn touch(&mut self, sys: &mut SystemApi, event: Event) -> Result<(), AppError> {
        if let Some(index) = Self::cell_index(event.x, event.y) {
            sys.launch(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_covers_grid() {
        assert_eq!(LauncherView::cell_index(0, 0), Some(0));
        assert_eq!(LauncherView::cell_index(119, 79), Some(0));
        assert_eq!(LauncherView::cell_index(120, 0), Some(1));
        assert_eq!(LauncherView::cell_index(0, 80), Some(2));
        assert_eq!(LauncherView::cell_index(239, 239), Some(5));
    }

    #[test]
    fn test_cell_index_rejects_out_of_bounds() {
        assert_eq!(LauncherView::cell_index(-1, 0), None);
        assert_eq!(LauncherView::cell_index(0, 240), None);
    }

    #[test]
    fn test_tap_requests_launch() {
        let mut view = LauncherView::new();
        let mut sys = SystemApi::new();
        view.touch(&mut sys, Event::new(crate::event::EventKind::Touch, 130, 90))
            .unwrap();
        // Column 1, row 1.
        assert_eq!(sys.pending_launch(), Some(3));
    }
}
