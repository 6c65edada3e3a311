//! Keyboard dispatch for the three input surfaces.

use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{Controller, NoticeKind, UiMode};

impl Controller {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            UiMode::Edit => self.handle_edit_key(key),
            UiMode::OpenPrompt => self.handle_prompt_key(key),
            UiMode::ExamplePicker => self.handle_picker_key(key),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q' | 'Q') => self.should_quit = true,
                KeyCode::Char('a' | 'A') => self.analyze(),
                KeyCode::Enter => self.execute(),
                KeyCode::Char('s' | 'S') => self.save(),
                // Bound with and without shift: most terminals do not
                // report SHIFT alongside CONTROL for letters.
                KeyCode::Char('f' | 'F') => self.format_document(),
                KeyCode::Char('/') => self.document.toggle_comment(),
                KeyCode::Char('o' | 'O') => {
                    self.prompt_input.clear();
                    self.mode = UiMode::OpenPrompt;
                }
                KeyCode::Char('p' | 'P') => {
                    self.picker_index = 0;
                    self.mode = UiMode::ExamplePicker;
                }
                KeyCode::Char('l' | 'L') => self.request_clear(),
                KeyCode::Char('c' | 'C') => self.copy_selection(false),
                KeyCode::Char('x' | 'X') => self.copy_selection(true),
                KeyCode::Char('v' | 'V') => self.paste_clipboard(),
                KeyCode::Left => self.document.move_word_left(shift),
                KeyCode::Right => self.document.move_word_right(shift),
                _ => {}
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char('a' | 'A') = key.code {
                self.document.select_all();
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.document.insert_indent(),
            KeyCode::BackTab => self.document.remove_indent(),
            KeyCode::Enter => self.document.handle_newline(),
            KeyCode::Backspace => self.document.backspace(),
            KeyCode::Delete => self.document.delete_forward(),
            KeyCode::Left => self.document.move_left(shift),
            KeyCode::Right => self.document.move_right(shift),
            KeyCode::Up => self.document.move_up(shift),
            KeyCode::Down => self.document.move_down(shift),
            KeyCode::Home => self.document.move_home(shift),
            KeyCode::End => self.document.move_end(shift),
            KeyCode::Esc => self.document.clear_selection(),
            KeyCode::Char(c) => {
                if !self.document.auto_pair(c) {
                    self.document.insert_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.prompt_input.clear();
                self.mode = UiMode::Edit;
            }
            KeyCode::Enter => self.submit_open(),
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.prompt_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = UiMode::Edit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker_index = self.picker_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.picker_index + 1 < self.store.len() {
                    self.picker_index += 1;
                }
            }
            KeyCode::Enter => self.load_selected_example(),
            _ => {}
        }
    }

    fn copy_selection(&mut self, cut: bool) {
        let Some(text) = self.document.selected_text().map(str::to_string) else {
            return;
        };
        match Clipboard::new().and_then(|mut c| c.set_text(text)) {
            Ok(()) => {
                if cut {
                    self.document.insert_str("");
                    self.notice("Cortado al portapapeles", NoticeKind::Info);
                } else {
                    self.notice("Copiado al portapapeles", NoticeKind::Info);
                }
            }
            Err(e) => self.notice(
                format!("Portapapeles no disponible: {e}"),
                NoticeKind::Error,
            ),
        }
    }

    fn paste_clipboard(&mut self) {
        match Clipboard::new().and_then(|mut c| c.get_text()) {
            Ok(text) => self.document.insert_str(&text),
            Err(e) => self.notice(
                format!("Portapapeles no disponible: {e}"),
                NoticeKind::Error,
            ),
        }
    }
}
