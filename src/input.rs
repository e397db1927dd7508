//! Pointer events and viewport coordinate conversion.

use glam::Vec2;

/// Screen rectangle the puzzle is drawn into, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// A viewport anchored at the client origin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Converts a client position to normalized device coordinates
    /// (`-1..=1`, y up).
    pub fn to_ndc(&self, client: Vec2) -> Vec2 {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        Vec2::new(
            (client.x - self.left) / width * 2.0 - 1.0,
            -((client.y - self.top) / height) * 2.0 + 1.0,
        )
    }

    /// Inverse of [`Viewport::to_ndc`].
    pub fn to_client(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.left + (ndc.x + 1.0) / 2.0 * self.width,
            self.top + (1.0 - ndc.y) / 2.0 * self.height,
        )
    }
}

/// Stage of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Mouse down or touch start.
    Down,
    /// Mouse move or touch move.
    Move,
    /// Mouse up or touch end.
    Up,
}

/// A raw pointer event in client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Mouse {
        phase: PointerPhase,
        client: Vec2,
    },
    Touch {
        phase: PointerPhase,
        /// Touches that changed in this event. Only the first is used.
        changed_touches: Vec<Vec2>,
    },
}

impl PointerEvent {
    pub fn phase(&self) -> PointerPhase {
        match self {
            PointerEvent::Mouse { phase, .. } | PointerEvent::Touch { phase, .. } => *phase,
        }
    }

    /// Client position of the event, or `None` for a touch event with no
    /// changed touches.
    pub fn client_position(&self) -> Option<Vec2> {
        match self {
            PointerEvent::Mouse { client, .. } => Some(*client),
            PointerEvent::Touch {
                changed_touches, ..
            } => changed_touches.first().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_corners_map_to_ndc_corners() {
        let viewport = Viewport {
            left: 10.0,
            top: 20.0,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(viewport.to_ndc(Vec2::new(10.0, 20.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(810.0, 620.0)), Vec2::new(1.0, -1.0));
        assert_eq!(viewport.to_ndc(Vec2::new(410.0, 320.0)), Vec2::ZERO);
        assert_eq!(viewport.to_client(Vec2::new(-1.0, 1.0)), Vec2::new(10.0, 20.0));
        assert_eq!(viewport.to_client(Vec2::new(0.5, -0.5)), Vec2::new(610.0, 470.0));
    }

    #[test]
    fn test_touch_uses_first_changed_touch() {
        let event = PointerEvent::Touch {
            phase: PointerPhase::Move,
            changed_touches: vec![Vec2::new(5.0, 6.0), Vec2::new(7.0, 8.0)],
        };
        assert_eq!(event.client_position(), Some(Vec2::new(5.0, 6.0)));
        assert_eq!(event.phase(), PointerPhase::Move);

        let empty = PointerEvent::Touch {
            phase: PointerPhase::Up,
            changed_touches: vec![],
        };
        assert_eq!(empty.client_position(), None);
    }
}
