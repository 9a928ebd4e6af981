use winit::event::{ElementState, VirtualKeyCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Handled,
    Exit,
    Ignored,
}

/// Held-key state for the ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
}

impl Controls {
    pub fn handle_key(&mut self, key: VirtualKeyCode, state: ElementState) -> KeyAction {
        let pressed = state == ElementState::Pressed;
        match key {
            VirtualKeyCode::A | VirtualKeyCode::Left => self.turn_left = pressed,
            VirtualKeyCode::F | VirtualKeyCode::Right => self.turn_right = pressed,
            VirtualKeyCode::D | VirtualKeyCode::Up => self.thrust = pressed,
            VirtualKeyCode::Escape if pressed => return KeyAction::Exit,
            _ => return KeyAction::Ignored,
        }
        KeyAction::Handled
    }

    pub fn turn(&self) -> Turn {
        match (self.turn_left, self.turn_right) {
            (true, false) => Turn::Left,
            (false, true) => Turn::Right,
            _ => Turn::None,
        }
    }
}
