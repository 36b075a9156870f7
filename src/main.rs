// src/main.rs
use std::collections::HashMap;
use std::time::Duration;

use clap::Parser;
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column, Row, Space};
use iced::{executor, window, Application, Command, Element, Length, Settings, Subscription, Theme};
use log::info;

use sheet_viewer::config::{Args, ViewerConfig};
use sheet_viewer::grid::{self, GridView};
use sheet_viewer::{
    CloudHandler, Effect, FetchCoordinator, FetchError, FetchTicket, Phase, SpreadsheetId,
    TabularPayload,
};

mod ui;

use ui::{container_style, footer_button_style, Styles, DARK_THEME, LIGHT_THEME};

const ROW_HEADER_WIDTH: f32 = 60.0;
const CELL_WIDTH: f32 = 140.0;

pub fn main() -> iced::Result {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ViewerConfig::from(Args::parse());
    info!("using spreadsheet service at {}", config.base_url);

    SheetViewer::run(Settings {
        window: window::Settings {
            size: (1024, 768),
            resizable: true,
            ..Default::default()
        },
        ..Settings::with_flags(config)
    })
}

struct SheetViewer {
    coordinator: FetchCoordinator,
    source: CloudHandler,
    is_dark_mode: bool,
    refresh_interval: Option<Duration>,
    id_input: String,
    // Cell edits stay in the widget; they never reach the coordinator or the service.
    pending_edits: HashMap<(usize, usize), String>,
}

#[derive(Debug, Clone)]
enum Message {
    IdentifierInput(String),
    SubmitIdentifier,
    FetchResolved(FetchTicket, Result<TabularPayload, FetchError>),
    Retry,
    Refresh,
    CheckForUpdates,
    CellEdited(usize, usize, String),
    ToggleTheme,
}

impl Application for SheetViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ViewerConfig;

    fn new(config: ViewerConfig) -> (Self, Command<Message>) {
        let mut viewer = SheetViewer {
            coordinator: FetchCoordinator::new(),
            source: config.cloud_handler(),
            is_dark_mode: config.dark_mode,
            refresh_interval: config.refresh_interval,
            id_input: String::new(),
            pending_edits: HashMap::new(),
        };

        let command = match config.spreadsheet {
            Some(id) => {
                viewer.id_input = id.to_string();
                let ticket = viewer.coordinator.on_identifier_change(id);
                viewer.fetch(ticket)
            }
            None => Command::none(),
        };

        (viewer, command)
    }

    fn title(&self) -> String {
        match self.coordinator.current_id() {
            Some(id) => format!("Sheet Viewer v{} - {}", env!("CARGO_PKG_VERSION"), id),
            None => format!("Sheet Viewer v{}", env!("CARGO_PKG_VERSION")),
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::IdentifierInput(value) => {
                self.id_input = value;
                Command::none()
            }

            Message::SubmitIdentifier => {
                let raw = self.id_input.trim();
                if raw.is_empty() {
                    return Command::none();
                }
                let ticket = self.coordinator.on_identifier_change(SpreadsheetId::from(raw));
                self.fetch(ticket)
            }

            Message::FetchResolved(ticket, result) => {
                if self.coordinator.on_fetch_resolved(ticket, result) == Effect::Render {
                    self.pending_edits.clear();
                }
                Command::none()
            }

            Message::Retry => {
                let ticket = self.coordinator.retry();
                self.fetch(ticket)
            }

            Message::Refresh | Message::CheckForUpdates => {
                let ticket = self.coordinator.refresh();
                self.fetch(ticket)
            }

            Message::CellEdited(row, column, value) => {
                self.pending_edits.insert((row, column), value);
                Command::none()
            }

            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        match self.refresh_interval {
            Some(interval) => iced::time::every(interval).map(|_| Message::CheckForUpdates),
            None => Subscription::none(),
        }
    }

    fn theme(&self) -> Theme {
        if self.is_dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn view(&self) -> Element<Message> {
        let styles = self.styles();

        let toolbar = row![
            text_input("Spreadsheet id", &self.id_input)
                .on_input(Message::IdentifierInput)
                .on_submit(Message::SubmitIdentifier)
                .padding(8)
                .width(Length::Fixed(300.0)),
            button(text("Open").size(16))
                .on_press(Message::SubmitIdentifier)
                .padding(8),
            Space::with_width(Length::Fill),
        ]
        .spacing(10)
        .padding(10);

        let grid = grid::render(self.coordinator.payload());
        let content: Element<Message> = if grid.row_count() > 0 {
            self.render_table(&grid, styles)
        } else {
            let message = match self.coordinator.phase() {
                Phase::Idle => "No spreadsheet selected. Enter an id above.".to_string(),
                Phase::Fetching(id) => format!("Loading spreadsheet {}...", id),
                Phase::Loaded(id) => format!("Spreadsheet {} has no rows.", id),
                Phase::Errored(id, _) => format!("Spreadsheet {} could not be loaded.", id),
            };
            container(
                text(message)
                    .size(24)
                    .style(styles.muted_fg)
                    .horizontal_alignment(Horizontal::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into()
        };

        let main_content = column![toolbar, content, self.footer(styles)];

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(container_style(styles.bg))
            .into()
    }
}

impl SheetViewer {
    fn styles(&self) -> &'static Styles {
        if self.is_dark_mode {
            &*DARK_THEME
        } else {
            &*LIGHT_THEME
        }
    }

    fn fetch(&self, ticket: Option<FetchTicket>) -> Command<Message> {
        match ticket {
            Some(ticket) => {
                let source = self.source.clone();
                Command::perform(
                    async move {
                        let result = source.fetch_data(&ticket.id).await;
                        (ticket, result)
                    },
                    |(ticket, result)| Message::FetchResolved(ticket, result),
                )
            }
            None => Command::none(),
        }
    }

    fn render_table<'a>(&'a self, grid: &GridView<'_>, styles: &Styles) -> Element<'a, Message> {
        let header_cell = |label: String, width: f32| -> Element<'a, Message> {
            container(text(label).size(16).style(styles.header_fg))
                .width(Length::Fixed(width))
                .padding(5)
                .style(container_style(styles.header_bg))
                .into()
        };

        let mut header_row = vec![header_cell(String::new(), ROW_HEADER_WIDTH)];
        header_row.extend(
            grid.column_headers
                .iter()
                .map(|label| header_cell(label.clone(), CELL_WIDTH)),
        );

        let rows: Vec<Element<'a, Message>> = (0..grid.row_count())
            .map(|r| {
                let mut cells = vec![header_cell(grid.row_headers[r].clone(), ROW_HEADER_WIDTH)];
                cells.extend((0..grid.column_count()).map(|c| {
                    let value = self
                        .pending_edits
                        .get(&(r, c))
                        .cloned()
                        .unwrap_or_else(|| grid.display_text(r, c));
                    text_input("", &value)
                        .on_input(move |edited| Message::CellEdited(r, c, edited))
                        .size(16)
                        .padding(5)
                        .width(Length::Fixed(CELL_WIDTH))
                        .into()
                }));
                Row::with_children(cells).spacing(1).into()
            })
            .collect();

        let table = Column::new()
            .push(Row::with_children(header_row).spacing(1))
            .push(Column::with_children(rows).spacing(1))
            .spacing(1);

        scrollable(table).height(Length::Fill).into()
    }

    fn footer(&self, styles: &Styles) -> Element<Message> {
        let (status, is_error) = self.status_line();

        let mut footer = Row::new()
            .push(
                text(status)
                    .size(14)
                    .style(if is_error { styles.error_fg } else { styles.footer_fg }),
            )
            .push(Space::with_width(Length::Fill));

        if let Some(updated) = self.coordinator.last_updated() {
            footer = footer
                .push(
                    text(format!("Updated {}", updated.format("%H:%M:%S")))
                        .size(14)
                        .style(styles.footer_fg),
                )
                .push(Space::with_width(Length::Fixed(10.0)));
        }

        if self.coordinator.error().is_some() {
            footer = footer
                .push(
                    button(text("Retry").size(16))
                        .on_press(Message::Retry)
                        .style(footer_button_style(styles)),
                )
                .push(Space::with_width(Length::Fixed(10.0)));
        }

        let mut refresh = button(text("Refresh").size(16)).style(footer_button_style(styles));
        if matches!(self.coordinator.phase(), Phase::Loaded(_)) {
            refresh = refresh.on_press(Message::Refresh);
        }

        let footer = footer
            .push(refresh)
            .push(Space::with_width(Length::Fixed(10.0)))
            .push(
                button(text("Theme").size(16))
                    .on_press(Message::ToggleTheme)
                    .style(footer_button_style(styles)),
            )
            .spacing(5)
            .padding(10)
            .width(Length::Fill);

        container(footer)
            .width(Length::Fill)
            .style(container_style(styles.footer_bg))
            .into()
    }

    fn status_line(&self) -> (String, bool) {
        let stale_note = match (self.coordinator.loaded_from(), self.coordinator.current_id()) {
            (Some(shown), Some(current)) if shown != current => format!(" (showing {})", shown),
            _ => String::new(),
        };

        match self.coordinator.phase() {
            Phase::Idle => ("Idle".to_string(), false),
            Phase::Fetching(id) => (format!("Loading {}{}", id, stale_note), false),
            Phase::Loaded(id) => (
                format!("Spreadsheet {}: {} rows", id, self.coordinator.payload().row_count()),
                false,
            ),
            Phase::Errored(id, err) => (format!("Failed to load {}: {}{}", id, err, stale_note), true),
        }
    }
}
