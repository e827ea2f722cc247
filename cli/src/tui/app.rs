use ratatui::widgets::{ListState, TableState};
use parklog_core::{
    AggregationEngine, Clock, Config, Error, FileRecordStore, SystemClock, TimeslotEntry, VisitorSessionRecorder,
};

pub enum InputMode {
    Normal,
    Counting,
}

#[derive(Clone, Copy, PartialEq)]
pub enum Focus {
    Attractions,
    Timeslots,
}

pub enum StatusKind {
    Info,
    Error,
}

pub struct App<'a> {
    pub recorder: VisitorSessionRecorder<'a, FileRecordStore, SystemClock>,
    engine: AggregationEngine<'a, FileRecordStore>,
    pub attractions: Vec<String>,
    pub attraction_state: ListState,
    pub slot_state: TableState,
    pub focus: Focus,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<(StatusKind, String)>,
    /// Visitors already committed today for the selected attraction.
    pub committed_today: u64,
}

impl<'a> App<'a> {
    pub fn new(store: &'a FileRecordStore, config: &Config) -> App<'a> {
        let recorder = VisitorSessionRecorder::new(store, SystemClock).with_slot_minutes(config.slot_minutes);
        let mut attraction_state = ListState::default();
        if !config.attractions.is_empty() {
            attraction_state.select(Some(0));
        }
        App {
            recorder,
            engine: AggregationEngine::new(store),
            attractions: config.attractions.clone(),
            attraction_state,
            slot_state: TableState::default(),
            focus: Focus::Attractions,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
            committed_today: 0,
        }
    }

    pub fn timeslots(&self) -> &[TimeslotEntry] {
        self.recorder.timeslots()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Attractions => Focus::Timeslots,
            Focus::Timeslots => Focus::Attractions,
        };
    }

    pub fn next(&mut self) {
        self.move_selection(1);
    }

    pub fn previous(&mut self) {
        self.move_selection(-1);
    }

    fn move_selection(&mut self, delta: i32) {
        match self.focus {
            Focus::Attractions => {
                let len = self.attractions.len();
                step(&mut SelectProxy::List(&mut self.attraction_state), len, delta)
            }
            Focus::Timeslots => {
                let len = self.timeslots().len();
                step(&mut SelectProxy::Table(&mut self.slot_state), len, delta)
            }
        }
    }

    /// Starts a draft for the highlighted attraction. A draft in progress keeps its slots.
    pub fn select_attraction(&mut self) {
        let Some(name) = self
            .attraction_state
            .selected()
            .and_then(|i| self.attractions.get(i))
            .cloned()
        else {
            return;
        };

        if self.recorder.attraction().is_some_and(|a| a != name) && !self.timeslots().is_empty() {
            self.set_error("Save or clear the current draft before switching attraction");
            return;
        }

        match self.recorder.select_attraction(&name) {
            Ok(()) => {
                self.refresh_committed();
                self.set_info(format!("Recording visitors for {}", name));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn delete_slot(&mut self) {
        let Some(i) = self.slot_state.selected() else {
            self.set_error("No timeslot selected");
            return;
        };
        match self.recorder.remove_timeslot(i) {
            Ok(removed) => {
                let len = self.timeslots().len();
                if len == 0 {
                    self.slot_state.select(None);
                } else if i >= len {
                    self.slot_state.select(Some(len - 1));
                }
                self.set_info(format!("Removed {} visitors ({})", removed.count, removed.start_time));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn save(&mut self) {
        match self.recorder.commit() {
            Ok(session) => {
                let name = session.attraction.clone();
                self.slot_state.select(None);
                self.committed_today = self
                    .engine
                    .query_daily(&name, session.date)
                    .ok()
                    .flatten()
                    .map(|c| c.count)
                    .unwrap_or(session.total_visitors);
                self.set_info(format!(
                    "Saved {} visitors for {} ({} today)",
                    session.total_visitors, name, self.committed_today
                ));
            }
            Err(e) if e.is_recoverable() => self.set_error(e.to_string()),
            Err(e) => self.set_error(format!("Nothing was saved, the draft is kept (press s to retry): {}", e)),
        }
    }

    pub fn clear_draft(&mut self) {
        self.recorder.reset();
        self.slot_state.select(None);
        self.committed_today = 0;
        self.set_info("Draft cleared");
    }

    fn refresh_committed(&mut self) {
        self.committed_today = match self.recorder.attraction() {
            Some(name) => self
                .engine
                .query_daily(name, SystemClock.today())
                .ok()
                .flatten()
                .map(|c| c.count)
                .unwrap_or(0),
            None => 0,
        };
    }

    fn set_info(&mut self, msg: impl Into<String>) {
        self.status = Some((StatusKind::Info, msg.into()));
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.status = Some((StatusKind::Error, msg.into()));
    }

    pub fn enter_count_mode(&mut self) {
        if self.recorder.attraction().is_none() {
            self.set_error(Error::InvalidInput("Select an attraction first".into()).to_string());
            return;
        }
        self.input_mode = InputMode::Counting;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_count(&mut self) {
        let parsed = self.input.trim().parse::<i64>();
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();

        let count = match parsed {
            Ok(n) => n,
            Err(_) => {
                self.set_error("Visitor count must be a whole number");
                return;
            }
        };

        match self.recorder.add_timeslot(count).map(|s| (s.count, s.start_time.clone())) {
            Ok((added, start)) => {
                let msg = format!("Added {} visitors at {}", added, start);
                let len = self.timeslots().len();
                self.slot_state.select(Some(len - 1));
                self.set_info(msg);
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }
}

enum SelectProxy<'s> {
    List(&'s mut ListState),
    Table(&'s mut TableState),
}

impl SelectProxy<'_> {
    fn selected(&self) -> Option<usize> {
        match self {
            SelectProxy::List(s) => s.selected(),
            SelectProxy::Table(s) => s.selected(),
        }
    }

    fn select(&mut self, i: Option<usize>) {
        match self {
            SelectProxy::List(s) => s.select(i),
            SelectProxy::Table(s) => s.select(i),
        }
    }
}

/// Moves the selection by `delta`, wrapping at both ends.
fn step(state: &mut SelectProxy<'_>, len: usize, delta: i32) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if delta > 0 => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}
