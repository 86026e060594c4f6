use crate::app::{ForecastFocus, TierFilter};
use crate::models::{HourRecord, InsightItem, Insights, Location, ThemeTag, Tier};
use crate::ui::components::InputWidget;
use crate::ui::Theme;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct ForecastScreen<'a> {
    pub location: &'a Location,
    pub hours: &'a [&'a HourRecord],
    pub insights: &'a Insights,
    pub current: Option<&'a HourRecord>,
    pub theme: ThemeTag,
    pub fetched_at: Option<DateTime<Local>>,
    pub blocking_error: Option<&'a str>,
    pub status_message: Option<&'a str>,
    pub selected_index: usize,
    pub task_index: usize,
    pub focus: ForecastFocus,
    pub filter: TierFilter,
    pub allow_unsuitable: bool,
    pub dark_mode: bool,
    pub refreshing: bool,
}

impl<'a> ForecastScreen<'a> {
    pub fn new(location: &'a Location, hours: &'a [&'a HourRecord], insights: &'a Insights) -> Self {
        Self {
            location,
            hours,
            insights,
            current: None,
            theme: ThemeTag::Default,
            fetched_at: None,
            blocking_error: None,
            status_message: None,
            selected_index: 0,
            task_index: 0,
            focus: ForecastFocus::Hours,
            filter: TierFilter::default(),
            allow_unsuitable: false,
            dark_mode: false,
            refreshing: false,
        }
    }

    pub fn with_current(mut self, current: Option<&'a HourRecord>, theme: ThemeTag) -> Self {
        self.current = current;
        self.theme = theme;
        self
    }

    pub fn with_selection(mut self, index: usize, task_index: usize, focus: ForecastFocus) -> Self {
        self.selected_index = index;
        self.task_index = task_index;
        self.focus = focus;
        self
    }

    pub fn with_filter(mut self, filter: TierFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_status(
        mut self,
        fetched_at: Option<DateTime<Local>>,
        blocking_error: Option<&'a str>,
        status_message: Option<&'a str>,
        refreshing: bool,
    ) -> Self {
        self.fetched_at = fetched_at;
        self.blocking_error = blocking_error;
        self.status_message = status_message;
        self.refreshing = refreshing;
        self
    }

    pub fn with_preferences(mut self, allow_unsuitable: bool, dark_mode: bool) -> Self {
        self.allow_unsuitable = allow_unsuitable;
        self.dark_mode = dark_mode;
        self
    }

    fn selected(&self) -> Option<&'a HourRecord> {
        self.hours.get(self.selected_index).copied()
    }
}

impl Widget for ForecastScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::page(self.dark_mode));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(1), // Tier filters
                Constraint::Min(8),    // Hours, tasks, insights
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_filters(chunks[1], buf);

        if let Some(error) = self.blocking_error {
            self.render_blocking(error, chunks[2], buf);
        } else {
            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(35),
                    Constraint::Percentage(30),
                    Constraint::Percentage(35),
                ])
                .split(chunks[2]);

            self.render_hours(content[0], buf);
            self.render_tasks(content[1], buf);
            self.render_insights(content[2], buf);
        }

        self.render_status_message(chunks[3], buf);
        self.render_nav(chunks[4], buf);
    }
}

impl ForecastScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let accent = Style::default()
            .fg(Theme::page_accent(self.theme))
            .add_modifier(Modifier::BOLD);

        let block = Block::default()
            .title(Span::styled(format!("Hourcast - {}", self.location), accent))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let mut spans = match self.current {
            Some(current) => vec![
                Span::styled("Now: ", Theme::dim()),
                Span::styled(
                    format!(
                        "{} {} {} ",
                        current.time_label(),
                        current.icon.symbol(),
                        current.display_temp()
                    ),
                    Theme::tier(current.tier),
                ),
                Span::styled(format!("[{}]", self.theme), accent),
            ],
            None => vec![Span::styled("No current hour", Theme::dim())],
        };

        let updated = if self.refreshing {
            "refreshing...".to_string()
        } else {
            self.fetched_at
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string())
        };
        spans.push(Span::styled(format!("  Updated: {}", updated), Theme::dim()));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }

    fn render_filters(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled("Show: ", Theme::dim())];
        for (tier, key) in Tier::all().iter().zip(["g", "b", "u"]) {
            let mark = if self.filter.shows(*tier) { "[x]" } else { "[ ]" };
            spans.push(Span::styled(format!("[{}]", key), Theme::nav_key()));
            spans.push(Span::styled(
                format!("{} {}  ", mark, tier.label()),
                Theme::tier(*tier),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_blocking(&self, error: &str, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Forecast unavailable", Theme::error()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::ERROR));

        let lines = vec![
            Line::from(Span::styled(error, Theme::error())),
            Line::from(""),
            Line::from(Span::styled(
                "Press [r] to retry or [s] to change the location.",
                Theme::dim(),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_hours(&self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focus == ForecastFocus::Hours {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let block = Block::default()
            .title(Span::styled("Hours", Theme::header()))
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        if self.hours.is_empty() {
            let message = if self.refreshing {
                "Loading forecast..."
            } else {
                "No hours match the filters"
            };
            Paragraph::new(Span::styled(message, Theme::dim())).render(inner, buf);
            return;
        }

        // Keep the selection in view
        let height = inner.height as usize;
        let offset = self.selected_index.saturating_sub(height.saturating_sub(1));

        let items: Vec<ListItem> = self
            .hours
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, record)| {
                let is_current = self
                    .current
                    .is_some_and(|c| c.slot_id == record.slot_id);
                let marker = if is_current { "▶ " } else { "  " };
                let task_count = if record.tasks.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", record.tasks.len())
                };

                let line = Line::from(vec![
                    Span::styled(marker, Theme::highlight()),
                    Span::styled(record.time_label(), Theme::normal()),
                    Span::raw(format!(" {} ", record.icon.symbol())),
                    Span::styled(
                        format!("{:>4} ", record.display_temp()),
                        Style::default().fg(Theme::temp_color(record.temperature_f)),
                    ),
                    Span::styled(record.condition_label, Theme::tier(record.tier)),
                    Span::styled(task_count, Theme::dim()),
                ]);

                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_tasks(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let border_style = if self.focus == ForecastFocus::Tasks {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let selected = self.selected();
        let title = selected
            .map(|r| format!("Tasks {}", r.time_label()))
            .unwrap_or_else(|| "Tasks".to_string());

        let block = Block::default()
            .title(Span::styled(title, Theme::header()))
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(chunks[0]);
        block.render(chunks[0], buf);

        let Some(record) = selected else {
            Paragraph::new(Span::styled("Select an hour", Theme::dim())).render(inner, buf);
            return;
        };

        if record.tasks.is_empty() {
            Paragraph::new(Span::styled("No tasks for this hour", Theme::dim()))
                .render(inner, buf);
        } else {
            let items: Vec<ListItem> = record
                .tasks
                .iter()
                .enumerate()
                .map(|(i, task)| {
                    let style = if self.focus == ForecastFocus::Tasks && i == self.task_index {
                        Theme::selected()
                    } else {
                        Theme::normal()
                    };
                    ListItem::new(Line::from(format!("• {}", task))).style(style)
                })
                .collect();
            List::new(items).render(inner, buf);
        }

        let accepts = record.accepts_new_tasks(self.allow_unsuitable);
        InputWidget::new("New task", &record.pending_input)
            .placeholder(if accepts {
                "Press Tab to type"
            } else {
                "Tasks disabled for unsuitable hours"
            })
            .disabled(!accepts)
            .focused(self.focus == ForecastFocus::Draft)
            .render(chunks[1], buf);
    }

    fn render_insights(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        render_insight_list(
            "Task Windows",
            &self.insights.recommendations,
            "No good task windows",
            chunks[0],
            buf,
        );
        render_insight_list(
            "Alerts",
            &self.insights.anomalies,
            "No alerts",
            chunks[1],
            buf,
        );
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            let style = if msg.contains("failed") || msg.contains("disabled") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = if self.focus == ForecastFocus::Draft {
            Line::from(vec![
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Add task ", Theme::nav_label()),
                Span::styled("[Esc]", Theme::nav_key()),
                Span::styled("Stop typing", Theme::nav_label()),
            ])
        } else {
            Line::from(vec![
                Span::styled("[↑↓]", Theme::nav_key()),
                Span::styled("Navigate ", Theme::nav_label()),
                Span::styled("[Tab]", Theme::nav_key()),
                Span::styled("Focus ", Theme::nav_label()),
                Span::styled("[d]", Theme::nav_key()),
                Span::styled("Delete task ", Theme::nav_label()),
                Span::styled("[s]", Theme::nav_key()),
                Span::styled("Settings ", Theme::nav_label()),
                Span::styled("[r]", Theme::nav_key()),
                Span::styled("Refresh ", Theme::nav_label()),
                Span::styled("[q]", Theme::nav_key()),
                Span::styled("Quit", Theme::nav_label()),
            ])
        };

        Paragraph::new(nav).render(area, buf);
    }
}

fn render_insight_list(title: &str, items: &[InsightItem], empty: &str, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(Span::styled(title, Theme::header()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    block.render(area, buf);

    if items.is_empty() {
        Paragraph::new(Span::styled(empty, Theme::dim())).render(inner, buf);
        return;
    }

    let items: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let style = Style::default().fg(item.kind.color());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", item.kind.symbol()), style),
                Span::styled(item.message.as_str(), Theme::normal()),
            ]))
        })
        .collect();

    List::new(items).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{normalize, InsightEngine};
    use crate::models::RawForecast;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_hours_and_insights() {
        let location = Location::new("Philadelphia", 39.95, -75.16).unwrap();
        let raw = RawForecast::from_series(
            &["2024-01-01T09:00", "2024-01-01T10:00"],
            &[64.0, 42.0],
            &[0, 61],
        );
        let records = normalize(&raw, &location, |_| Vec::new()).unwrap();
        let insights = InsightEngine::new().evaluate(&records);
        let hours: Vec<&HourRecord> = records.iter().collect();

        let area = Rect::new(0, 0, 160, 24);
        let mut buf = Buffer::empty(area);
        ForecastScreen::new(&location, &hours, &insights)
            .with_current(hours.first().copied(), ThemeTag::Clear)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Hourcast - Philadelphia"));
        assert!(text.contains("09:00"));
        assert!(text.contains("Good Conditions"));
        assert!(text.contains("10:00 swing"));
    }

    #[test]
    fn blocking_error_replaces_content() {
        let location = Location::new("Philadelphia", 39.95, -75.16).unwrap();
        let insights = Insights::default();
        let hours: Vec<&HourRecord> = Vec::new();

        let area = Rect::new(0, 0, 100, 16);
        let mut buf = Buffer::empty(area);
        ForecastScreen::new(&location, &hours, &insights)
            .with_status(None, Some("Forecast fetch failed: timeout"), None, false)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Forecast unavailable"));
        assert!(text.contains("timeout"));
        assert!(!text.contains("Task Windows"));
    }
}
