use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::{
    dom::ElementId,
    field::InputKind,
    session::Session,
};

use super::{
    focus::{self, FocusStop, StopKind},
    input::{self, KeyCommand},
    options::UiOptions,
    status::StatusLine,
    terminal::FormScreen,
    view::{self, ViewContext},
};

const HELP_TEXT: &str = "Tab/Shift+Tab move • Enter open/close • Esc close • Space check • ←/→ choose • Ctrl+Q quit";

pub(crate) struct App {
    session: Session,
    options: UiOptions,
    status: StatusLine,
    cursor: Option<usize>,
    option_cursor: usize,
    should_quit: bool,
}

impl App {
    pub fn new(mut session: Session, options: UiOptions) -> Self {
        session.document_mut().take_events();
        let mut app = Self {
            session,
            options,
            status: StatusLine::new(),
            cursor: None,
            option_cursor: 0,
            should_quit: false,
        };
        app.sync_cursor();
        app
    }

    pub fn run(mut self) -> Result<Session> {
        let mut screen = FormScreen::enter(&self.options.title)?;
        while !self.should_quit {
            screen.render(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => screen.resize(width, height)?,
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        drop(screen);
        Ok(self.session)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let stops = focus::focus_stops(&self.session);
        view::draw(
            frame,
            ViewContext {
                session: &self.session,
                focused: self.current(&stops).map(|stop| stop.element),
                option_cursor: self.option_cursor,
                title: &self.options.title,
                status_message: self.status.message(),
                help: self.options.show_help.then_some(HELP_TEXT),
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match input::classify(&key) {
            KeyCommand::Quit => self.quit(),
            KeyCommand::NextStop => self.move_focus(1),
            KeyCommand::PrevStop => self.move_focus(-1),
            KeyCommand::Activate => self.activate(),
            KeyCommand::Dismiss => self.dismiss(),
            KeyCommand::Cycle(delta) => self.cycle_option(delta),
            KeyCommand::Type(' ') if self.focused_is_choice() => self.toggle_choice(),
            KeyCommand::Type(ch) => self.edit_text(|value| value.push(ch)),
            KeyCommand::Backspace => self.edit_text(|value| {
                value.pop();
            }),
            KeyCommand::None => {}
        }
        self.refresh_status();
    }

    fn current<'a>(&self, stops: &'a [FocusStop]) -> Option<&'a FocusStop> {
        self.cursor.and_then(|cursor| stops.get(cursor))
    }

    fn current_stop(&self) -> Option<FocusStop> {
        let stops = focus::focus_stops(&self.session);
        self.current(&stops).cloned()
    }

    fn move_focus(&mut self, delta: isize) {
        let stops = focus::focus_stops(&self.session);
        if stops.is_empty() {
            return;
        }
        let len = stops.len() as isize;
        let next = match self.cursor {
            Some(cursor) => (cursor as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        } as usize;
        let target = stops[next].element;
        self.cursor = Some(next);
        self.option_cursor = 0;
        self.session.focus(target);
        self.sync_cursor();
    }

    /// Realigns the cursor with the document's focused element after the stop list changed.
    fn sync_cursor(&mut self) {
        let stops = focus::focus_stops(&self.session);
        let doc = self.session.document();
        let Some(active) = doc.active_element() else {
            self.cursor = self.cursor.filter(|cursor| *cursor < stops.len());
            return;
        };
        let position = stops
            .iter()
            .position(|stop| stop.element == active)
            .or_else(|| stops.iter().position(|stop| doc.contains(active, stop.element)));
        if let Some(position) = position {
            if self.cursor != Some(position) {
                self.option_cursor = 0;
            }
            self.cursor = Some(position);
            let element = stops[position].element;
            if element != active {
                self.session.focus(element);
            }
        } else {
            self.cursor = self.cursor.filter(|cursor| *cursor < stops.len());
        }
    }

    fn activate(&mut self) {
        let Some(stop) = self.current_stop() else {
            self.move_focus(1);
            return;
        };
        match stop.kind {
            StopKind::Label => {
                self.session.click(stop.element);
            }
            StopKind::Field | StopKind::Input(_) => {
                if let Err(err) = self.session.toggle(&stop.field, None) {
                    self.status.set_raw(err.to_string());
                }
                self.park_if_closed(&stop.field);
            }
        }
        self.sync_cursor();
    }

    fn dismiss(&mut self) {
        let Some(stop) = self.current_stop() else {
            self.status.ready();
            return;
        };
        let opened = self
            .session
            .registry()
            .field(&stop.field)
            .is_some_and(|field| field.is_opened());
        if !opened {
            self.status.ready();
            return;
        }
        if let Err(err) = self.session.close(&stop.field) {
            self.status.set_raw(err.to_string());
        }
        self.park_if_closed(&stop.field);
        self.sync_cursor();
    }

    /// Moves focus onto a closed field's label without dispatching focus events.
    fn park_if_closed(&mut self, identifier: &str) {
        let resting = self
            .session
            .registry()
            .field(identifier)
            .filter(|field| !field.is_opened())
            .map(focus::resting_element);
        if let Some(resting) = resting {
            self.session.document_mut().focus(resting);
        }
    }

    fn focused_input(&self) -> Option<(ElementId, InputKind)> {
        let stop = self.current_stop()?;
        match stop.kind {
            StopKind::Input(kind) => Some((stop.element, kind)),
            StopKind::Label | StopKind::Field => None,
        }
    }

    fn focused_is_choice(&self) -> bool {
        matches!(
            self.focused_input(),
            Some((_, InputKind::Checkbox | InputKind::Radio | InputKind::Select { .. }))
        )
    }

    fn toggle_choice(&mut self) {
        let Some((element, kind)) = self.focused_input() else {
            return;
        };
        let doc = self.session.document_mut();
        match kind {
            InputKind::Checkbox => {
                let checked = doc.get(element).is_some_and(|node| node.is_checked());
                doc.set_checked(element, !checked);
            }
            InputKind::Radio => doc.set_checked(element, true),
            InputKind::Select { multiple: true } => {
                let options = doc.options_of(element);
                let Some(value) = options
                    .get(self.option_cursor)
                    .and_then(|option| doc.get(*option))
                    .map(|node| node.option_value().to_string())
                else {
                    return;
                };
                let mut selected = doc.selected_values(element);
                if let Some(index) = selected.iter().position(|entry| *entry == value) {
                    selected.remove(index);
                } else {
                    selected.push(value);
                }
                doc.set_selected(element, selected.as_slice());
            }
            InputKind::Select { multiple: false } => self.cycle_option(1),
            _ => return,
        }
        self.note_edit(element);
    }

    fn cycle_option(&mut self, delta: i32) {
        let Some((element, InputKind::Select { multiple })) = self.focused_input() else {
            return;
        };
        let doc = self.session.document_mut();
        let options = doc.options_of(element);
        if options.is_empty() {
            return;
        }
        let len = options.len() as i64;
        if multiple {
            self.option_cursor =
                (self.option_cursor as i64 + i64::from(delta)).rem_euclid(len) as usize;
            return;
        }
        let values: Vec<String> = options
            .iter()
            .filter_map(|option| doc.get(*option))
            .map(|node| node.option_value().to_string())
            .collect();
        let current = doc
            .selected_values(element)
            .first()
            .and_then(|selected| values.iter().position(|value| value == selected))
            .unwrap_or(0) as i64;
        let next = (current + i64::from(delta)).rem_euclid(len) as usize;
        doc.set_selected(element, &values[next..=next]);
        self.note_edit(element);
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        let Some((element, InputKind::Text | InputKind::TextArea)) = self.focused_input() else {
            return;
        };
        let doc = self.session.document_mut();
        let mut value = doc
            .get(element)
            .map(|node| node.value().to_string())
            .unwrap_or_default();
        edit(&mut value);
        doc.set_value(element, value);
        self.note_edit(element);
    }

    fn note_edit(&mut self, element: ElementId) {
        let doc = self.session.document();
        let name = doc
            .get(element)
            .and_then(|node| node.attribute("name").or(node.html_id()))
            .unwrap_or("input")
            .to_string();
        self.status.value_updated(&name);
    }

    /// Reports the latest field event and drops the rest of the journal.
    fn refresh_status(&mut self) {
        if let Some(last) = self.session.document_mut().take_events().pop() {
            self.status.field_event(&last.event);
        }
    }

    fn quit(&mut self) {
        if self.options.close_on_quit {
            self.session.blur();
        }
        self.should_quit = true;
    }
}
