/// Main dashboard screen

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::core::{ServiceRecord, ServiceRegistry, ServiceStatus};
use crate::screens::{status_label, status_tone, strings, Locale, Tone};
use crate::utils::{format_age, service_def, FEATURES, NAV_ITEMS, PLATFORM_NAME};

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Danger => Color::Red,
        Tone::Warning => Color::Yellow,
    }
}

pub struct Dashboard {
    services: ServiceRegistry,
    locale: Locale,
    target_host: String,
}

impl Dashboard {
    pub fn new(locale: Locale, target_host: impl Into<String>) -> Self {
        Self {
            services: ServiceRegistry::default(),
            locale,
            target_host: target_host.into(),
        }
    }

    pub fn update_services(&mut self, services: ServiceRegistry) {
        self.services = services;
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn toggle_locale(&mut self) {
        self.locale = match self.locale {
            Locale::En => Locale::Es,
            Locale::Es => Locale::En,
        };
    }

    pub fn render(&self, frame: &mut Frame, status_message: Option<&str>, show_help: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(frame.size());

        frame.render_widget(self.render_header(), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(0)])
            .split(chunks[1]);

        frame.render_widget(self.render_sidebar(), body[0]);
        self.render_main(frame, body[1]);

        let footer_text = match status_message {
            Some(status) => status.to_string(),
            None => "[r]efresh | [l]anguage | [?] Help | [q]uit".to_string(),
        };
        let footer = Paragraph::new(footer_text)
            .alignment(Alignment::Center)
            .style(if status_message.is_some() {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);

        if show_help {
            self.render_help(frame);
        }
    }

    fn render_header(&self) -> Paragraph<'_> {
        let text = strings(self.locale);
        let online = self.services.count(ServiceStatus::Online);
        let total = self.services.len();

        let summary_color = if online == total {
            Color::Green
        } else if self.services.count(ServiceStatus::Offline) > 0 {
            Color::Red
        } else {
            Color::Yellow
        };

        let title_line = Line::from(vec![Span::styled(
            text.title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )]);
        let subtitle_line = Line::from(vec![
            Span::styled(text.subtitle, Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(
                format!("{}/{} {}", online, total, text.online_summary),
                Style::default().fg(summary_color).add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(vec![title_line, subtitle_line])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_sidebar(&self) -> List<'_> {
        let items: Vec<ListItem> = NAV_ITEMS
            .iter()
            .enumerate()
            .map(|(i, (en, es))| {
                let label = match self.locale {
                    Locale::En => *en,
                    Locale::Es => *es,
                };
                // Only the dashboard is reachable from here
                let style = if i == 0 {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(Span::styled(format!(" {} ", label), style)))
            })
            .collect();

        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", PLATFORM_NAME)),
        )
    }

    fn render_main(&self, frame: &mut Frame, area: Rect) {
        let text = strings(self.locale);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(14), Constraint::Min(0)])
            .split(area);

        let grid_block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", text.services));
        let grid_area = grid_block.inner(chunks[0]);
        frame.render_widget(grid_block, chunks[0]);
        self.render_cards(frame, grid_area);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        frame.render_widget(self.render_features(), bottom[0]);
        frame.render_widget(self.render_docs(), bottom[1]);
    }

    /// Two cards per row
    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let records = self.services.records();
        let row_count = records.len().div_ceil(2).max(1);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
            .split(area);

        for (row_index, pair) in records.chunks(2).enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[row_index]);

            for (col_index, record) in pair.iter().enumerate() {
                frame.render_widget(self.render_card(record), cols[col_index]);
            }
        }
    }

    fn render_card(&self, record: &ServiceRecord) -> Paragraph<'_> {
        let text = strings(self.locale);
        let color = tone_color(status_tone(record.status));

        let age = format_age(record.last_checked, Utc::now())
            .unwrap_or_else(|| text.never.to_string());
        let latency = record
            .response_time_ms
            .map(|ms| format!(" ({} ms)", ms))
            .unwrap_or_default();

        let description = match (self.locale, service_def(&record.key)) {
            (Locale::Es, Some(def)) => def.description_es.to_string(),
            _ => record.description.clone(),
        };

        let lines = vec![
            Line::from(Span::styled(
                description,
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(
                    status_label(record.status, self.locale),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("{}: {}", text.port, record.port),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(Span::styled(
                format!("{}: {}{}", text.last_check, age, latency),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    format!(" {} ", record.name),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
    }

    fn render_features(&self) -> Paragraph<'_> {
        let text = strings(self.locale);
        let lines: Vec<Line> = FEATURES
            .iter()
            .map(|(title, en, es)| {
                let detail = match self.locale {
                    Locale::En => *en,
                    Locale::Es => *es,
                };
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", title),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(detail),
                ])
            })
            .collect();

        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", text.features)),
        )
    }

    fn render_docs(&self) -> Paragraph<'_> {
        let text = strings(self.locale);
        let mut lines = vec![
            Line::from(Span::styled(text.api_docs_hint, Style::default().fg(Color::Gray))),
            Line::from(""),
        ];

        for record in self.services.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<20}", record.name), Style::default().fg(Color::White)),
                Span::styled(
                    record.docs_url(&self.target_host),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }

        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", text.api_docs)),
        )
    }

    fn render_help(&self, frame: &mut Frame) {
        let area = frame.size();
        let popup_width = area.width.min(60);
        let popup_height = area.height.min(12);
        let popup_area = Rect {
            x: (area.width.saturating_sub(popup_width)) / 2,
            y: (area.height.saturating_sub(popup_height)) / 2,
            width: popup_width,
            height: popup_height,
        };

        let help_text = vec![
            Line::from(Span::styled(
                "Timón Pet Store - Keyboard Shortcuts",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("  [r]            Check all services now"),
            Line::from("  [l]            Switch language (EN/ES)"),
            Line::from("  [?] / [F1]     Toggle this help screen"),
            Line::from("  [Esc]          Close help"),
            Line::from("  [q]            Quit application"),
            Line::from(""),
            Line::from(Span::styled(
                "Services are re-checked automatically on a fixed interval.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let help = Paragraph::new(help_text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Help "),
            );

        frame.render_widget(Clear, popup_area);
        frame.render_widget(help, popup_area);
    }
}
