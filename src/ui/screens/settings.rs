use crate::app::{LocationDraft, SettingsField};
use crate::models::Settings;
use crate::ui::components::{InputWidget, ToggleWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct SettingsScreen<'a> {
    pub settings: &'a Settings,
    pub allow_unsuitable: bool,
    pub location: &'a LocationDraft,
    pub focused_field: SettingsField,
    pub editing: bool,
    pub edit_buffer: &'a str,
    pub status_message: Option<&'a str>,
}

impl<'a> SettingsScreen<'a> {
    pub fn new(settings: &'a Settings, location: &'a LocationDraft) -> Self {
        Self {
            settings,
            allow_unsuitable: settings.allow_unsuitable_tasks,
            location,
            focused_field: SettingsField::AllowUnsuitable,
            editing: false,
            edit_buffer: "",
            status_message: None,
        }
    }

    /// Override flag as currently stored, which may differ from the loaded settings.
    pub fn with_allow_unsuitable(mut self, allow: bool) -> Self {
        self.allow_unsuitable = allow;
        self
    }

    pub fn with_focus(mut self, field: SettingsField) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, editing: bool, buffer: &'a str) -> Self {
        self.editing = editing;
        self.edit_buffer = buffer;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for SettingsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::page(self.settings.dark_mode));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Title
                Constraint::Min(17),    // Form (5 fields * 3 lines + borders)
                Constraint::Length(4),  // Help
                Constraint::Length(1),  // Status
                Constraint::Length(1),  // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Settings", Theme::title()),
            Span::styled(" - Preferences", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_form(chunks[1], buf);
        self.render_help(chunks[2], buf);

        if let Some(msg) = self.status_message {
            let style = if msg.starts_with("Invalid") || msg.contains("failed") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Edit/Toggle ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Cancel/Back ", Theme::nav_label()),
            Span::styled("[Ctrl+S]", Theme::nav_key()),
            Span::styled("Save Location", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl SettingsScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Preferences")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let constraints: Vec<Constraint> = SettingsField::all()
            .iter()
            .map(|_| Constraint::Length(3))
            .collect();

        let field_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in SettingsField::all().iter().enumerate() {
            let is_focused = *field == self.focused_field;

            match field {
                SettingsField::AllowUnsuitable => {
                    ToggleWidget::new(field.label(), self.allow_unsuitable)
                        .focused(is_focused)
                        .render(field_areas[i], buf);
                }
                SettingsField::DarkMode => {
                    ToggleWidget::new(field.label(), self.settings.dark_mode)
                        .focused(is_focused)
                        .render(field_areas[i], buf);
                }
                _ => {
                    let value = if is_focused && self.editing {
                        self.edit_buffer
                    } else {
                        self.location.field(*field)
                    };
                    InputWidget::new(field.label(), value)
                        .focused(is_focused && self.editing)
                        .render(field_areas[i], buf);
                }
            }
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = match self.focused_field {
            SettingsField::AllowUnsuitable => {
                "Allow adding tasks to hours with thunderstorms or extreme temperatures"
            }
            SettingsField::DarkMode => "Use a dark page background",
            SettingsField::LocationName => "Display name for the default location",
            SettingsField::Latitude => "Decimal degrees between -90 and 90",
            SettingsField::Longitude => "Decimal degrees between -180 and 180",
        };

        Paragraph::new(Span::styled(help_text, Theme::dim())).render(inner, buf);
    }
}
