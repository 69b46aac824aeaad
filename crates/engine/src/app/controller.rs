use crate::physics::Message;

use super::entity::{Direction, State};
use super::input::{InputAction, InputSnapshot};

/// Priority order when several movement keys are held.
const MOVE_BINDINGS: [(InputAction, Direction); 4] = [
    (InputAction::MoveLeft, Direction::Left),
    (InputAction::MoveRight, Direction::Right),
    (InputAction::MoveUp, Direction::Up),
    (InputAction::MoveDown, Direction::Down),
];

/// Translates tick input into player messages.
///
/// State and direction are only re-sent when they change.
#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    last_state: Option<State>,
    last_direction: Option<Direction>,
}

impl PlayerController {
    pub fn messages_for(&mut self, input: &InputSnapshot) -> Vec<Message> {
        let mut messages = Vec::new();
        let held = MOVE_BINDINGS
            .iter()
            .find(|(action, _)| input.is_down(*action))
            .map(|(_, direction)| *direction);

        let state = if held.is_some() {
            State::Walking
        } else {
            State::Idle
        };
        if self.last_state != Some(state) {
            self.last_state = Some(state);
            messages.push(Message::SetState(state));
        }
        if let Some(direction) = held {
            if self.last_direction != Some(direction) {
                self.last_direction = Some(direction);
                messages.push(Message::SetDirection(direction));
            }
        }

        if input.left_click_pressed() {
            if let Some(cursor) = input.cursor_position_px() {
                messages.push(Message::BeginSelection(cursor));
            }
        }
        messages
    }
}
