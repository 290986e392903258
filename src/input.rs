//! Pointer Input
//!
//! Host-independent pointer events. The window layer translates winit mouse
//! events into these and hands them to the canvas.

use bitflags::bitflags;

use crate::geometry::Point;

/// A single pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button, pen tip
    Primary,
    Secondary,
    Middle,
}

bitflags! {
    /// Set of pointer buttons currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

impl From<PointerButton> for Buttons {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => Buttons::PRIMARY,
            PointerButton::Secondary => Buttons::SECONDARY,
            PointerButton::Middle => Buttons::MIDDLE,
        }
    }
}

/// Type of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    /// A button was pressed
    Down(PointerButton),
    /// The pointer moved; carries every button held during the move
    Move(Buttons),
    /// A button was released
    Up(PointerButton),
}

/// A pointer event in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Position in canvas space (pixels from top-left)
    pub position: Point,
    pub event_type: PointerEventType,
}

impl PointerEvent {
    pub fn down(position: Point, button: PointerButton) -> Self {
        Self {
            position,
            event_type: PointerEventType::Down(button),
        }
    }

    pub fn moved(position: Point, buttons: Buttons) -> Self {
        Self {
            position,
            event_type: PointerEventType::Move(buttons),
        }
    }

    pub fn up(position: Point, button: PointerButton) -> Self {
        Self {
            position,
            event_type: PointerEventType::Up(button),
        }
    }
}

/// Tracks which buttons are held between events
#[derive(Debug, Default)]
pub struct ButtonTracker {
    held: Buttons,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: PointerButton) {
        self.held.insert(button.into());
    }

    pub fn release(&mut self, button: PointerButton) {
        self.held.remove(button.into());
    }

    pub fn held(&self) -> Buttons {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tracker_follows_press_and_release() {
        let mut tracker = ButtonTracker::new();
        tracker.press(PointerButton::Primary);
        tracker.press(PointerButton::Middle);
        assert_eq!(tracker.held(), Buttons::PRIMARY | Buttons::MIDDLE);

        tracker.release(PointerButton::Primary);
        assert_eq!(tracker.held(), Buttons::MIDDLE);
        assert!(!tracker.held().contains(Buttons::PRIMARY));
    }

    #[test]
    fn test_event_constructors() {
        let p = Point::new(3, 4);
        assert_eq!(
            PointerEvent::moved(p, Buttons::PRIMARY).event_type,
            PointerEventType::Move(Buttons::PRIMARY)
        );
        assert_eq!(
            PointerEvent::up(p, PointerButton::Secondary).event_type,
            PointerEventType::Up(PointerButton::Secondary)
        );
    }
}
