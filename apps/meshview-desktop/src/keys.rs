use meshview_common::MoveDirection;
use winit::keyboard::KeyCode;

/// Physical key bound to each camera movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

impl KeyBindings {
    pub fn key_for(&self, direction: MoveDirection) -> KeyCode {
        match direction {
            MoveDirection::Forward => self.forward,
            MoveDirection::Backward => self.backward,
            MoveDirection::Left => self.left,
            MoveDirection::Right => self.right,
            MoveDirection::Up => self.up,
            MoveDirection::Down => self.down,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::KeyQ,
            down: KeyCode::KeyE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_wasd_qe() {
        let keys = KeyBindings::default();
        let bound: Vec<KeyCode> = MoveDirection::ALL.iter().map(|&d| keys.key_for(d)).collect();
        assert_eq!(
            bound,
            vec![
                KeyCode::KeyW,
                KeyCode::KeyS,
                KeyCode::KeyA,
                KeyCode::KeyD,
                KeyCode::KeyQ,
                KeyCode::KeyE,
            ]
        );
    }
}
