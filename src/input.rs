use crate::model::{ItemKind, Scene};
use crate::render::Layout;
use crate::session::PlayerAction;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub(crate) enum InputEvent {
    Key(KeyCode),
    MouseDown(u16, u16),
    MouseDrag(u16, u16),
    MouseUp,
}

pub(crate) fn collect_input_nonblocking(
    max_frame_time: Duration,
) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(InputEvent::Key(k.code));
                }
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    out.push(InputEvent::MouseDown(column, row));
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    out.push(InputEvent::MouseDrag(column, row));
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    out.push(InputEvent::MouseUp);
                }
                _ => {}
            },
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_action(scene: &Scene, pet_pos: (i32, i32), key: KeyCode) -> Option<PlayerAction> {
    // Global
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(PlayerAction::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') => return Some(PlayerAction::HelpToggle),
        _ => {}
    }

    match scene {
        Scene::Playing => match key {
            KeyCode::Char('1') => Some(PlayerAction::Select(ItemKind::Apple)),
            KeyCode::Char('2') => Some(PlayerAction::Select(ItemKind::Candy)),
            KeyCode::Char('3') => Some(PlayerAction::Select(ItemKind::Toy)),
            KeyCode::Char('4') | KeyCode::Char('r') | KeyCode::Char('R') => {
                Some(PlayerAction::Rotate)
            }
            KeyCode::Enter => Some(PlayerAction::PlaceAt(pet_pos.0, pet_pos.1)),
            KeyCode::Left => Some(PlayerAction::DragPet(pet_pos.0 - 1, pet_pos.1)),
            KeyCode::Right => Some(PlayerAction::DragPet(pet_pos.0 + 1, pet_pos.1)),
            KeyCode::Up => Some(PlayerAction::DragPet(pet_pos.0, pet_pos.1 - 1)),
            KeyCode::Down => Some(PlayerAction::DragPet(pet_pos.0, pet_pos.1 + 1)),
            KeyCode::Esc => Some(PlayerAction::CancelSelection),
            _ => None,
        },
        Scene::Help => match key {
            KeyCode::Esc => Some(PlayerAction::Back),
            _ => None,
        },
        Scene::GameOver => match key {
            KeyCode::Char('n') | KeyCode::Char('N') => Some(PlayerAction::NewGame),
            _ => None,
        },
    }
}

/// Pointer grab state: a press on the pet starts a drag, release ends it.
/// Presses elsewhere route to the button bar or place the selection in the
/// yard, as in the source's pointer handlers.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PointerState {
    dragging_pet: bool,
}

impl PointerState {
    pub(crate) fn mouse_action(
        &mut self,
        scene: &Scene,
        layout: &Layout,
        pet_pos: (i32, i32),
        ev: InputEvent,
    ) -> Option<PlayerAction> {
        if !matches!(scene, Scene::Playing) {
            self.dragging_pet = false;
            return None;
        }
        match ev {
            InputEvent::MouseDown(col, row) => {
                if let Some(item) = layout.hit_button(col, row) {
                    return if item.is_placeable() {
                        Some(PlayerAction::Select(item))
                    } else {
                        Some(PlayerAction::Rotate)
                    };
                }
                let (x, y) = (col as i32, row as i32);
                if layout.hit_pet(pet_pos, x, y) {
                    self.dragging_pet = true;
                    return None;
                }
                if layout.in_yard(x, y) {
                    return Some(PlayerAction::PlaceAt(x, y));
                }
                None
            }
            InputEvent::MouseDrag(col, row) => {
                if !self.dragging_pet {
                    return None;
                }
                let (x, y) = layout.clamp_to_yard(col as i32, row as i32);
                Some(PlayerAction::DragPet(x, y))
            }
            InputEvent::MouseUp => {
                self.dragging_pet = false;
                None
            }
            InputEvent::Key(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(80, 24)
    }

    #[test]
    fn test_number_keys_select_items() {
        let a = map_key_to_action(&Scene::Playing, (10, 5), KeyCode::Char('1'));
        assert!(matches!(a, Some(PlayerAction::Select(ItemKind::Apple))));
        let a = map_key_to_action(&Scene::Playing, (10, 5), KeyCode::Char('4'));
        assert!(matches!(a, Some(PlayerAction::Rotate)));
    }

    #[test]
    fn test_enter_places_at_pet_position() {
        let a = map_key_to_action(&Scene::Playing, (33, 7), KeyCode::Enter);
        assert!(matches!(a, Some(PlayerAction::PlaceAt(33, 7))));
    }

    #[test]
    fn test_game_over_scene_only_restarts_or_quits() {
        assert!(map_key_to_action(&Scene::GameOver, (10, 5), KeyCode::Char('1')).is_none());
        assert!(matches!(
            map_key_to_action(&Scene::GameOver, (10, 5), KeyCode::Char('n')),
            Some(PlayerAction::NewGame)
        ));
        assert!(matches!(
            map_key_to_action(&Scene::GameOver, (10, 5), KeyCode::Char('q')),
            Some(PlayerAction::Quit)
        ));
    }

    #[test]
    fn test_click_on_rotate_button_rotates() {
        let layout = layout();
        let mut ptr = PointerState::default();
        let spans = layout.button_spans();
        let (item, x0, _) = spans[3];
        assert_eq!(item, ItemKind::Rotate);

        let a = ptr.mouse_action(
            &Scene::Playing,
            &layout,
            (10, 5),
            InputEvent::MouseDown(x0, layout.button_y()),
        );
        assert!(matches!(a, Some(PlayerAction::Rotate)));
    }

    #[test]
    fn test_click_in_yard_places() {
        let layout = layout();
        let mut ptr = PointerState::default();
        let a = ptr.mouse_action(
            &Scene::Playing,
            &layout,
            (60, 10),
            InputEvent::MouseDown(20, 8),
        );
        assert!(matches!(a, Some(PlayerAction::PlaceAt(20, 8))));
    }

    #[test]
    fn test_drag_requires_a_grab_on_the_pet() {
        let layout = layout();
        let mut ptr = PointerState::default();

        // drag without a prior press on the pet does nothing
        let a = ptr.mouse_action(
            &Scene::Playing,
            &layout,
            (40, 10),
            InputEvent::MouseDrag(25, 9),
        );
        assert!(a.is_none());

        // press on the pet, then drag, then release
        let a = ptr.mouse_action(
            &Scene::Playing,
            &layout,
            (40, 10),
            InputEvent::MouseDown(40, 10),
        );
        assert!(a.is_none());
        let a = ptr.mouse_action(
            &Scene::Playing,
            &layout,
            (40, 10),
            InputEvent::MouseDrag(25, 9),
        );
        assert!(matches!(a, Some(PlayerAction::DragPet(25, 9))));

        ptr.mouse_action(&Scene::Playing, &layout, (25, 9), InputEvent::MouseUp);
        let a = ptr.mouse_action(
            &Scene::Playing,
            &layout,
            (25, 9),
            InputEvent::MouseDrag(30, 9),
        );
        assert!(a.is_none());
    }

    #[test]
    fn test_mouse_ignored_outside_playing_scene() {
        let layout = layout();
        let mut ptr = PointerState::default();
        let a = ptr.mouse_action(
            &Scene::GameOver,
            &layout,
            (40, 10),
            InputEvent::MouseDown(20, 8),
        );
        assert!(a.is_none());
    }
}
