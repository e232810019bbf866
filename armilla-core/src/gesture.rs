//! Touch gesture classification
//!
//! Reduces the ordered sample sequence of one contact session to a tap
//! or a single dominant swipe direction. Sessions that do not reduce to
//! exactly one directional stroke are dropped.

use heapless::Vec;

use crate::event::{Event, EventKind};

/// Maximum samples buffered per contact session. The touch controller
/// reports at well under 100 Hz, so this covers multi-second drags.
pub const MAX_SAMPLES: usize = 64;

/// Minimum squared travel before a segment counts as a stroke.
/// Anything shorter is contact jitter.
const MIN_STROKE_SQ: i32 = 30 * 30;

/// Upper bound on distinct strokes worth tracking; more than one
/// already disqualifies the session.
const MAX_STROKES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stroke {
    Up,
    Down,
    Left,
    Right,
}

impl Stroke {
    fn event_kind(self) -> EventKind {
        match self {
            Stroke::Up => EventKind::Up,
            Stroke::Down => EventKind::Down,
            Stroke::Left => EventKind::Left,
            Stroke::Right => EventKind::Right,
        }
    }
}

/// Classifier for one single-contact touch session.
#[derive(Default)]
pub struct GestureClassifier {
    points: Vec<(i16, i16), MAX_SAMPLES>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample while exactly one contact is active. Once the
    /// buffer is full further samples are dropped; a drag that long has
    /// already left the classifiable range.
    pub fn add_sample(&mut self, x: i16, y: i16) {
        let _ = self.points.push((x, y));
    }

    /// Classify the buffered session and clear the buffer.
    ///
    /// The buffer is cleared unconditionally, whether or not a
    /// classification is produced.
    pub fn end_session(&mut self) -> Option<Event> {
        let result = self.classify();
        self.points.clear();
        result
    }

    fn classify(&self) -> Option<Event> {
        let (last_x, last_y) = *self.points.last()?;

        if self.points.len() == 1 {
            return Some(Event::new(EventKind::Touch, last_x, last_y));
        }

        let strokes = self.strokes()?;
        if strokes.len() == 1 {
            return Some(Event::new(strokes[0].event_kind(), last_x, last_y));
        }
        None
    }

    /// Reduce the path to its stroke sequence: per-segment dominant
    /// axis beyond the jitter threshold, with runs collapsed.
    fn strokes(&self) -> Option<Vec<Stroke, MAX_STROKES>> {
        let mut strokes: Vec<Stroke, MAX_STROKES> = Vec::new();
        let (mut ax, mut ay) = self.points[0];

        for &(x, y) in self.points.iter().skip(1) {
            let dx = i32::from(x) - i32::from(ax);
            let dy = i32::from(y) - i32::from(ay);
            if dx * dx + dy * dy < MIN_STROKE_SQ {
                continue;
            }

            let stroke = if dx.abs() >= dy.abs() {
                if dx > 0 {
                    Stroke::Right
                } else {
                    Stroke::Left
                }
            } else if dy > 0 {
                Stroke::Down
            } else {
                Stroke::Up
            };

            if strokes.last() != Some(&stroke) && strokes.push(stroke).is_err() {
                // Too many direction changes to ever be a single swipe.
                return None;
            }
            ax = x;
            ay = y;
        }

        Some(strokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(points: &[(i16, i16)]) -> Option<Event> {
        let mut g = GestureClassifier::new();
        for &(x, y) in points {
            g.add_sample(x, y);
        }
        g.end_session()
    }

    #[test]
    fn test_empty_session_yields_nothing() {
        assert_eq!(classify(&[]), None);
    }

    #[test]
    fn test_single_sample_is_a_tap() {
        let ev = classify(&[(0, 0)]).unwrap();
        assert_eq!(ev.kind, EventKind::Touch);
        assert_eq!((ev.x, ev.y), (0, 0));
    }

    #[test]
    fn test_left_to_right_path_is_right() {
        let ev = classify(&[(10, 120), (60, 122), (110, 119), (200, 120)]).unwrap();
        assert_eq!(ev.kind, EventKind::Right);
        assert_eq!((ev.x, ev.y), (200, 120));
    }

    #[test]
    fn test_top_to_bottom_path_is_down() {
        let ev = classify(&[(120, 10), (121, 80), (120, 200)]).unwrap();
        assert_eq!(ev.kind, EventKind::Down);
    }

    #[test]
    fn test_l_shaped_path_is_dropped() {
        assert_eq!(classify(&[(10, 10), (200, 10), (200, 200)]), None);
    }

    #[test]
    fn test_subthreshold_wiggle_is_dropped() {
        // Multi-sample, but never travels a full stroke.
        assert_eq!(classify(&[(100, 100), (104, 102), (101, 99)]), None);
    }

    #[test]
    fn test_buffer_cleared_after_every_session() {
        let mut g = GestureClassifier::new();
        g.add_sample(0, 0);
        g.add_sample(100, 0);
        assert!(g.end_session().is_some());
        // The previous session must not leak into the next one.
        assert_eq!(g.end_session(), None);
    }

    proptest! {
        #[test]
        fn prop_monotonic_rightward_drag_is_right(
            steps in proptest::collection::vec(40i16..120, 2..10),
            y in 0i16..240,
        ) {
            let mut x = 0i16;
            let mut points = std::vec::Vec::new();
            points.push((x, y));
            for step in steps {
                x = x.saturating_add(step);
                points.push((x, y));
            }
            let ev = classify(&points).unwrap();
            prop_assert_eq!(ev.kind, EventKind::Right);
        }
    }
}
