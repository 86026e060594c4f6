use crate::config::Config;
use crate::db::Database;
use crate::error::{HourcastError, Result};
use crate::logic::{current_theme, select_current, Declined, ForecastService, ForecastSnapshot, TaskChange};
use crate::models::settings::{
    allow_unsuitable_tasks, set_allow_unsuitable_tasks, set_dark_mode, set_default_location,
};
use crate::models::{HourRecord, Insights, Location, RawForecast, Settings, SlotId, ThemeTag, Tier};
use chrono::{DateTime, Local, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Forecast,
    Settings,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Forecast),
            's' | 'S' => Some(Screen::Settings),
            _ => None,
        }
    }
}

/// Which tiers the hour list shows. Unsuitable hours start hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierFilter {
    pub good: bool,
    pub bad: bool,
    pub unsuitable: bool,
}

impl Default for TierFilter {
    fn default() -> Self {
        Self {
            good: true,
            bad: true,
            unsuitable: false,
        }
    }
}

impl TierFilter {
    pub fn shows(&self, tier: Tier) -> bool {
        match tier {
            Tier::Good => self.good,
            Tier::Bad => self.bad,
            Tier::Unsuitable => self.unsuitable,
        }
    }

    pub fn toggle(&mut self, tier: Tier) {
        match tier {
            Tier::Good => self.good = !self.good,
            Tier::Bad => self.bad = !self.bad,
            Tier::Unsuitable => self.unsuitable = !self.unsuitable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastFocus {
    Hours,
    Tasks,
    Draft,
}

impl ForecastFocus {
    pub fn next(&self) -> Self {
        match self {
            ForecastFocus::Hours => ForecastFocus::Tasks,
            ForecastFocus::Tasks => ForecastFocus::Draft,
            ForecastFocus::Draft => ForecastFocus::Hours,
        }
    }
}

pub struct ForecastState {
    /// Index into the filtered hour list
    pub selected_index: usize,
    pub task_index: usize,
    pub focus: ForecastFocus,
    pub filter: TierFilter,
}

impl ForecastState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            task_index: 0,
            focus: ForecastFocus::Hours,
            filter: TierFilter::default(),
        }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
            self.task_index = 0;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.task_index = 0;
        }
    }

    pub fn next_task(&mut self, max: usize) {
        if max > 0 && self.task_index < max - 1 {
            self.task_index += 1;
        }
    }

    pub fn prev_task(&mut self) {
        if self.task_index > 0 {
            self.task_index -= 1;
        }
    }

    fn clamp_hours(&mut self, visible: usize) {
        self.selected_index = self.selected_index.min(visible.saturating_sub(1));
    }

    fn clamp_tasks(&mut self, tasks: usize) {
        self.task_index = self.task_index.min(tasks.saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    AllowUnsuitable,
    DarkMode,
    LocationName,
    Latitude,
    Longitude,
}

impl SettingsField {
    pub fn all() -> &'static [SettingsField] {
        &[
            SettingsField::AllowUnsuitable,
            SettingsField::DarkMode,
            SettingsField::LocationName,
            SettingsField::Latitude,
            SettingsField::Longitude,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::AllowUnsuitable => "Allow Tasks In Unsuitable Hours",
            SettingsField::DarkMode => "Dark Mode",
            SettingsField::LocationName => "Default Location Name",
            SettingsField::Latitude => "Latitude",
            SettingsField::Longitude => "Longitude",
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self, SettingsField::AllowUnsuitable | SettingsField::DarkMode)
    }

    pub fn next(&self) -> Self {
        match self {
            SettingsField::AllowUnsuitable => SettingsField::DarkMode,
            SettingsField::DarkMode => SettingsField::LocationName,
            SettingsField::LocationName => SettingsField::Latitude,
            SettingsField::Latitude => SettingsField::Longitude,
            SettingsField::Longitude => SettingsField::AllowUnsuitable,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SettingsField::AllowUnsuitable => SettingsField::Longitude,
            SettingsField::DarkMode => SettingsField::AllowUnsuitable,
            SettingsField::LocationName => SettingsField::DarkMode,
            SettingsField::Latitude => SettingsField::LocationName,
            SettingsField::Longitude => SettingsField::Latitude,
        }
    }
}

/// Location fields as typed, validated only on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDraft {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

impl LocationDraft {
    fn from_location(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            latitude: location.latitude.to_string(),
            longitude: location.longitude.to_string(),
        }
    }

    pub fn field(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::LocationName => &self.name,
            SettingsField::Latitude => &self.latitude,
            SettingsField::Longitude => &self.longitude,
            _ => "",
        }
    }

    fn set_field(&mut self, field: SettingsField, value: String) {
        match field {
            SettingsField::LocationName => self.name = value,
            SettingsField::Latitude => self.latitude = value,
            SettingsField::Longitude => self.longitude = value,
            _ => {}
        }
    }
}

pub struct SettingsState {
    pub focused_field: SettingsField,
    pub editing: bool,
    pub edit_buffer: String,
    pub location: LocationDraft,
}

impl SettingsState {
    pub fn new(location: &Location) -> Self {
        Self {
            focused_field: SettingsField::AllowUnsuitable,
            editing: false,
            edit_buffer: String::new(),
            location: LocationDraft::from_location(location),
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    pub fn start_editing(&mut self) {
        if self.focused_field.is_toggle() {
            return;
        }
        self.editing = true;
        self.edit_buffer = self.location.field(self.focused_field).to_string();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) {
        self.editing = false;
        let value = std::mem::take(&mut self.edit_buffer);
        self.location.set_field(self.focused_field, value);
    }
}

/// Result of one background fetch, tagged with the request that started it.
pub struct FetchOutcome {
    pub generation: u64,
    pub location: Location,
    pub result: Result<RawForecast>,
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub service: ForecastService<Database>,

    // Data
    pub location: Location,
    pub records: Vec<HourRecord>,
    pub insights: Insights,
    pub fetched_at: Option<DateTime<Local>>,
    pub blocking_error: Option<String>,
    pub settings: Settings,

    // Screen states
    pub forecast_state: ForecastState,
    pub settings_state: SettingsState,

    // UI state
    pub status_message: Option<String>,
    pub refreshing: bool,
    pub needs_refresh: bool,
    generation: u64,
}

impl App {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let settings = Settings::load(&db, config.tasks.allow_unsuitable);

        let location = match &settings.default_location {
            Some(location) => location.clone(),
            None => config.location.to_location()?,
        };

        Ok(Self {
            screen: Screen::Forecast,
            should_quit: false,
            settings_state: SettingsState::new(&location),
            config,
            service: ForecastService::new(db),
            location,
            records: Vec::new(),
            insights: Insights::default(),
            fetched_at: None,
            blocking_error: None,
            settings,
            forecast_state: ForecastState::new(),
            status_message: None,
            refreshing: false,
            needs_refresh: true,
            generation: 0,
        })
    }

    pub fn db(&self) -> &Database {
        self.service.tasks().store()
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.set_status("Refreshing forecast...");
    }

    /// True while keystrokes go to a text field rather than to commands.
    pub fn is_editing(&self) -> bool {
        match self.screen {
            Screen::Forecast => self.forecast_state.focus == ForecastFocus::Draft,
            Screen::Settings => self.settings_state.editing,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new fetch request. Returns its generation and target, or
    /// `None` when the location is invalid and no fetch should happen.
    pub fn start_refresh(&mut self) -> Option<(u64, Location)> {
        self.needs_refresh = false;
        self.generation += 1;

        if let Err(e) = self.location.validate() {
            self.fail(e);
            return None;
        }

        self.refreshing = true;
        Some((self.generation, self.location.clone()))
    }

    /// Normalize a finished fetch. Outcomes of superseded requests are dropped.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                generation = outcome.generation,
                latest = self.generation,
                "Discarding stale forecast"
            );
            return false;
        }

        let snapshot = outcome.result.and_then(|raw| {
            self.service
                .build_snapshot(outcome.generation, outcome.location, &raw)
        });
        self.apply_snapshot(outcome.generation, snapshot)
    }

    pub fn apply_snapshot(&mut self, generation: u64, result: Result<ForecastSnapshot>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "Discarding stale forecast");
            return false;
        }
        self.refreshing = false;

        match result {
            Ok(snapshot) => {
                self.records = snapshot.records;
                self.insights = snapshot.insights;
                self.fetched_at = Some(snapshot.fetched_at);
                self.blocking_error = None;
                self.clamp_selection();
                let message = format!("Forecast updated for {}", snapshot.location.name);
                self.set_status(&message);
            }
            Err(e) => self.fail(e),
        }
        true
    }

    fn fail(&mut self, error: HourcastError) {
        self.refreshing = false;
        if error.is_blocking() {
            tracing::warn!("Forecast unavailable: {}", error);
            self.records.clear();
            self.insights = Insights::default();
            self.fetched_at = None;
            self.blocking_error = Some(error.to_string());
            self.clamp_selection();
        } else {
            tracing::warn!("Refresh failed: {}", error);
            self.set_status(&format!("Refresh failed: {}", error));
        }
    }

    /// Records passing the tier filter, in forecast order.
    pub fn visible_records(&self) -> Vec<&HourRecord> {
        self.records
            .iter()
            .filter(|r| self.forecast_state.filter.shows(r.tier))
            .collect()
    }

    pub fn selected_record(&self) -> Option<&HourRecord> {
        self.visible_records()
            .get(self.forecast_state.selected_index)
            .copied()
    }

    fn selected_slot(&self) -> Option<SlotId> {
        self.selected_record().map(|r| r.slot_id.clone())
    }

    pub fn current_record_at(&self, now: NaiveDateTime) -> Option<&HourRecord> {
        select_current(&self.records, now)
    }

    pub fn current_record(&self) -> Option<&HourRecord> {
        self.current_record_at(Local::now().naive_local())
    }

    pub fn theme(&self) -> ThemeTag {
        current_theme(self.current_record())
    }

    /// Override flag as stored right now.
    pub fn allow_unsuitable(&self) -> bool {
        allow_unsuitable_tasks(self.db(), self.config.tasks.allow_unsuitable)
    }

    pub fn toggle_tier(&mut self, tier: Tier) {
        self.forecast_state.filter.toggle(tier);
        self.clamp_selection();
    }

    pub fn push_draft_char(&mut self, c: char) {
        if let Some(slot) = self.selected_slot() {
            let mut draft = self.draft_text(&slot);
            draft.push(c);
            self.service.tasks().set_draft(&mut self.records, &slot, &draft);
        }
    }

    pub fn pop_draft_char(&mut self) {
        if let Some(slot) = self.selected_slot() {
            let mut draft = self.draft_text(&slot);
            draft.pop();
            self.service.tasks().set_draft(&mut self.records, &slot, &draft);
        }
    }

    fn draft_text(&self, slot: &SlotId) -> String {
        self.records
            .iter()
            .find(|r| &r.slot_id == slot)
            .map(|r| r.pending_input.clone())
            .unwrap_or_default()
    }

    /// Submit the selected hour's draft as a new task.
    pub fn submit_draft(&mut self) {
        let Some(slot) = self.selected_slot() else {
            return;
        };
        let text = self.draft_text(&slot);
        let allow = self.allow_unsuitable();

        match self
            .service
            .tasks()
            .add_task(&mut self.records, &slot, &text, allow)
        {
            Ok(TaskChange::Applied) => {
                self.insights = self.service.reevaluate(&self.records);
                self.set_status("Task added");
            }
            Ok(TaskChange::Unchanged(Declined::UnsuitableHour)) => {
                self.set_status("Tasks are disabled for unsuitable hours (see Settings)");
            }
            Ok(TaskChange::Unchanged(_)) => {}
            Err(e) => {
                tracing::warn!("Failed to save task: {}", e);
                self.set_status(&format!("Failed to save task: {}", e));
            }
        }
    }

    pub fn delete_selected_task(&mut self) {
        let Some(slot) = self.selected_slot() else {
            return;
        };
        let index = self.forecast_state.task_index;

        match self
            .service
            .tasks()
            .delete_task(&mut self.records, &slot, index)
        {
            Ok(TaskChange::Applied) => {
                self.insights = self.service.reevaluate(&self.records);
                self.clamp_selection();
                self.set_status("Task deleted");
            }
            Ok(TaskChange::Unchanged(_)) => {}
            Err(e) => {
                tracing::warn!("Failed to delete task: {}", e);
                self.set_status(&format!("Failed to delete task: {}", e));
            }
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_records().len();
        self.forecast_state.clamp_hours(visible);
        let tasks = self.selected_record().map(|r| r.tasks.len()).unwrap_or(0);
        self.forecast_state.clamp_tasks(tasks);
    }

    pub fn toggle_allow_unsuitable(&mut self) -> Result<()> {
        let allow = !self.allow_unsuitable();
        set_allow_unsuitable_tasks(self.db(), allow)?;
        self.settings.allow_unsuitable_tasks = allow;
        Ok(())
    }

    pub fn toggle_dark_mode(&mut self) -> Result<()> {
        let dark = !self.settings.dark_mode;
        set_dark_mode(self.db(), dark)?;
        self.settings.dark_mode = dark;
        Ok(())
    }

    /// Validate the edited location fields, persist them as the default and
    /// refetch for the new place.
    pub fn save_location(&mut self) -> Result<()> {
        let draft = &self.settings_state.location;
        let location = Location::parse(&draft.name, &draft.latitude, &draft.longitude)?;

        set_default_location(self.db(), Some(&location))?;
        self.settings.default_location = Some(location.clone());
        self.location = location;
        self.request_refresh();
        Ok(())
    }
}
