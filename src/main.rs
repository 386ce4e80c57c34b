mod game;
mod input;
mod time;

use std::{cell::RefCell, io, rc::Rc};

use game::render;
use game::{App, Intent, KeyInput};
use input::{pixel_x_to_col, pixel_y_to_row, ClickState};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::{GameClock, TICKS_PER_SEC};

#[cfg(target_arch = "wasm32")]
fn backing_store() -> game::save::LocalStorage {
    game::save::LocalStorage
}

#[cfg(not(target_arch = "wasm32"))]
fn backing_store() -> game::save::MemoryStore {
    game::save::MemoryStore::new()
}

/// Convert a browser mouse position to a terminal cell by querying the grid
/// container's bounding rect.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cols: u16, rows: u16) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let app = Rc::new(RefCell::new(App::new(backing_store())));
    let click_state: Rc<RefCell<ClickState<Intent>>> = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) =
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, cs.terminal_cols, cs.terminal_rows)
            else {
                return;
            };
            let intent = cs.hit_test(col, row);
            drop(cs);

            if let Some(intent) = intent {
                app.borrow_mut().apply(intent);
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => KeyInput::Char(c),
                KeyCode::Enter => KeyInput::Enter,
                KeyCode::Backspace => KeyInput::Backspace,
                KeyCode::Esc => KeyInput::Esc,
                _ => return,
            };
            app.borrow_mut().handle_key(key);
        }
    });

    // The session's only clock. It is moved into the draw closure, so a
    // second passive-income clock cannot be started.
    let mut clock = GameClock::new(TICKS_PER_SEC);
    terminal.draw_web({
        let app = app.clone();
        let click_state = click_state.clone();
        move |f| {
            let ticks = clock.update(js_sys::Date::now());
            if ticks > 0 {
                let mut a = app.borrow_mut();
                for _ in 0..ticks {
                    a.engine.apply_tick();
                }
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let a = app.borrow();
            render::render(&a, f, size, &click_state);
        }
    });

    Ok(())
}
