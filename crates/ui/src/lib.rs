//! Terminal interface for the virtual library catalog.

use std::future::Future;
use std::io::{self, Stdout};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vlib_application::{
    Catalog, CatalogEvent, CatalogService, OpenPlan, SearchControl, ViewState, books_folder,
    convert_and_open, load, plan_open, remove, run_search, sync_folder, toggle_read,
};
use vlib_core::Book;

mod opener;

pub use opener::{Navigator, SystemNavigator};

const ACCENT: Color = Color::Yellow;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct Ui<S> {
    catalog: Catalog,
    search: SearchControl,
    search_panel: SearchPanel,
    sync_panel: SyncPanel,
    confirm: Option<ConvertPrompt>,
    alert: Option<String>,
    notice: Option<String>,
    service: Arc<S>,
    runtime: Handle,
    navigator: Box<dyn Navigator>,
    events_tx: mpsc::UnboundedSender<Vec<CatalogEvent>>,
    events_rx: mpsc::UnboundedReceiver<Vec<CatalogEvent>>,
    in_flight: usize,
    tick: usize,
}

impl<S: CatalogService + 'static> Ui<S> {
    pub fn new(service: Arc<S>, runtime: Handle, navigator: Box<dyn Navigator>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            catalog: Catalog::new(),
            search: SearchControl::default(),
            search_panel: SearchPanel::default(),
            sync_panel: SyncPanel::default(),
            confirm: None,
            alert: None,
            notice: None,
            service,
            runtime,
            navigator,
            events_tx,
            events_rx,
            in_flight: 0,
            tick: 0,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut terminal = setup_terminal()?;
        terminal.clear().ok();
        self.reload();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        let restore_result = restore_terminal(&mut terminal);
        self.navigator.finish();

        match (result, restore_result) {
            (Ok(Ok(())), Ok(())) => Ok(()),
            (Ok(Err(err)), _) => Err(err),
            (Ok(Ok(())), Err(err)) => Err(err),
            (Err(panic), Ok(())) => Err(anyhow::anyhow!(panic_to_string(panic))),
            (Err(panic), Err(err)) => Err(anyhow::anyhow!(
                "{}\n(additionally failed to restore terminal: {err})",
                panic_to_string(panic)
            )),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(100);
        let mut needs_redraw = true;

        loop {
            if self.drain_events() {
                needs_redraw = true;
            }

            if needs_redraw || self.in_flight > 0 {
                terminal.draw(|frame| self.draw(frame.area(), frame))?;
                needs_redraw = false;
            }

            if !event::poll(tick_rate)? {
                self.tick = self.tick.wrapping_add(1);
                continue;
            }

            match event::read()? {
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }

                    needs_redraw = true;
                    if self.handle_key(key).is_break() {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn spawn<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = Vec<CatalogEvent>> + Send + 'static,
    {
        let events_tx = self.events_tx.clone();
        let work = self.runtime.spawn(task(Arc::clone(&self.service)));
        self.in_flight += 1;
        self.runtime.spawn(async move {
            // A failed task still reports back so `in_flight` drains.
            let events = work.await.unwrap_or_else(|err| {
                tracing::error!(error = %err, "background task failed");
                Vec::new()
            });
            // The receiver only goes away when the UI is gone.
            let _ = events_tx.send(events);
        });
    }

    fn drain_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(events) = self.events_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            for event in events {
                self.apply_event(event);
            }
            changed = true;
        }
        changed
    }

    fn apply_event(&mut self, event: CatalogEvent) {
        let Some(event) = self.catalog.apply(event) else {
            return;
        };

        match event {
            CatalogEvent::Navigate(url) => self.navigate(&url),
            CatalogEvent::OpenFailed(message) => {
                self.alert = Some(message);
            }
            CatalogEvent::Synced(summary) => {
                self.sync_panel.open = false;
                self.sync_panel.busy = false;
                self.sync_panel.error = None;
                self.notice = Some(format!(
                    "{} ({} found)",
                    summary.message, summary.total_books_found
                ));
            }
            CatalogEvent::SyncFailed(message) => {
                self.sync_panel.busy = false;
                if !self.sync_panel.open {
                    self.notice = Some(format!("Sync failed: {message}"));
                }
                self.sync_panel.error = Some(message);
            }
            CatalogEvent::FolderResolved(folder) => {
                if self.sync_panel.input.trim().is_empty() {
                    self.sync_panel.input = folder;
                }
            }
            CatalogEvent::Loaded(_) | CatalogEvent::Searched(_) => {}
        }
    }

    fn reload(&mut self) {
        self.catalog.begin_load();
        self.spawn(|service| async move { vec![load(&*service).await] });
    }

    fn navigate(&mut self, url: &str) {
        match self.navigator.navigate(url) {
            Ok(()) => self.notice = Some(format!("Opened {url}")),
            Err(err) => {
                tracing::warn!(url, error = %err, "navigation failed");
                self.alert = Some(format!("Cannot open book: {err:#}"));
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ControlFlow<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ControlFlow::Break(());
        }

        if self.alert.is_some() {
            self.handle_alert_key(key);
            ControlFlow::Continue(())
        } else if self.confirm.is_some() {
            self.handle_confirm_key(key);
            ControlFlow::Continue(())
        } else if self.sync_panel.open {
            self.handle_sync_panel_key(key);
            ControlFlow::Continue(())
        } else if self.search_panel.focused {
            self.handle_search_key(key);
            ControlFlow::Continue(())
        } else {
            self.handle_main_key(key)
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> ControlFlow<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return ControlFlow::Break(()),
            KeyCode::Down | KeyCode::Char('j') => self.catalog.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.catalog.select_prev(),
            KeyCode::Char('/') => {
                self.search_panel.focused = true;
            }
            KeyCode::Char('c') => self.clear_search(),
            KeyCode::Char('r') => {
                if self.catalog.can_refresh() {
                    self.notice = None;
                    self.reload();
                } else {
                    self.notice = Some("Clear the search (c) to refresh".to_string());
                }
            }
            KeyCode::Enter | KeyCode::Char('o') => self.open_selected(),
            KeyCode::Char('m') => {
                if let Some(book) = self.catalog.selected_book().cloned() {
                    self.spawn(move |service| async move {
                        toggle_read(&*service, &book).await.into_iter().collect::<Vec<_>>()
                    });
                }
            }
            KeyCode::Char('d') => {
                if let Some(book) = self.catalog.selected_book().cloned() {
                    self.spawn(move |service| async move {
                        remove(&*service, &book).await.into_iter().collect::<Vec<_>>()
                    });
                }
            }
            KeyCode::Char('f') => self.open_sync_panel(),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn clear_search(&mut self) {
        let outcome = self.search.clear();
        self.catalog.apply_search(outcome);
    }

    fn open_selected(&mut self) {
        let Some(book) = self.catalog.selected_book().cloned() else {
            return;
        };

        match plan_open(&*self.service, &book) {
            OpenPlan::Navigate(url) => self.navigate(&url),
            OpenPlan::ConfirmConvert(book) => {
                self.confirm = Some(ConvertPrompt { book });
            }
        }
    }

    fn open_sync_panel(&mut self) {
        self.sync_panel.open = true;
        self.sync_panel.error = None;
        if self.sync_panel.input.trim().is_empty() {
            self.spawn(|service| async move {
                books_folder(&*service)
                    .await
                    .into_iter()
                    .collect::<Vec<_>>()
            });
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('u') {
                self.clear_search();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.search_panel.focused = false;
            }
            KeyCode::Enter => {
                if let Some(query) = self.search.submit() {
                    self.search_panel.focused = false;
                    self.spawn(move |service| async move {
                        run_search(&*service, &query).await.into_iter().collect::<Vec<_>>()
                    });
                }
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Char(ch) => self.search.insert_char(ch),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(prompt) = self.confirm.take() {
                    self.notice = Some(format!("Converting {}...", prompt.book.title));
                    let book = prompt.book;
                    self.spawn(move |service| async move {
                        vec![convert_and_open(&*service, &book).await]
                    });
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm = None;
            }
            _ => {}
        }
    }

    fn handle_alert_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            self.alert = None;
        }
    }

    fn handle_sync_panel_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && let KeyCode::Char('u') = key.code
        {
            self.sync_panel.input.clear();
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.sync_panel.open = false;
                self.sync_panel.error = None;
                if self.sync_panel.busy {
                    self.notice = Some("Sync continues in the background".to_string());
                }
            }
            KeyCode::Enter => {
                if self.sync_panel.busy {
                    self.sync_panel.error = Some("A sync is already running".to_string());
                    return;
                }
                let folder = self.sync_panel.input.trim().to_string();
                if folder.is_empty() {
                    self.sync_panel.error = Some("Enter a folder path".to_string());
                    return;
                }
                self.sync_panel.busy = true;
                self.sync_panel.error = None;
                self.spawn(move |service| async move { sync_folder(&*service, &folder).await });
            }
            KeyCode::Backspace => {
                self.sync_panel.input.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.sync_panel.input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn spinner(&self) -> &'static str {
        SPINNER[self.tick % SPINNER.len()]
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let mut status = vec![Span::raw(format!(
            "My Library ({} books)",
            self.catalog.displayed_books.len()
        ))];
        if self.catalog.is_searching {
            status.push(Span::styled(
                "  [search results]",
                Style::default().fg(ACCENT),
            ));
        }
        if self.in_flight > 0 {
            status.push(Span::raw(format!("  {}", self.spinner())));
        }
        if let Some(notice) = &self.notice {
            status.push(Span::styled(
                format!("  {notice}"),
                Style::default().fg(Color::Gray),
            ));
        }

        vec![
            Line::from(Span::styled(
                "Virtual Library",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(status),
        ]
    }

    fn footer_lines(&self) -> Vec<Line<'static>> {
        let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));

        if self.search_panel.focused {
            return vec![Line::from(vec![
                key("Enter"),
                Span::raw(" search  "),
                key("Ctrl+u"),
                Span::raw(" clear  "),
                key("Esc"),
                Span::raw(" back"),
            ])];
        }

        let mut first = vec![
            key("Esc"),
            Span::raw(" quit  "),
            key("↑/↓"),
            Span::raw(" move  "),
            key("/"),
            Span::raw(" search  "),
            key("c"),
            Span::raw(" clear  "),
        ];
        if self.catalog.can_refresh() {
            first.push(key("r"));
            first.push(Span::raw(" refresh  "));
        }
        first.push(key("f"));
        first.push(Span::raw(" sync folder"));

        vec![
            Line::from(first),
            Line::from(vec![
                key("o"),
                Span::raw(" open  "),
                key("m"),
                Span::raw(" mark read/unread  "),
                key("d"),
                Span::raw(" delete"),
            ]),
        ]
    }

    fn draw(&self, area: Rect, frame: &mut ratatui::Frame) {
        frame.render_widget(Clear, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Paragraph::new(Text::from(self.header_lines()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, layout[0]);

        self.draw_search_box(frame, layout[1]);

        match &self.catalog.view_state {
            ViewState::Loading => {
                let loading = Paragraph::new(format!("Loading books... {}", self.spinner()))
                    .block(Block::default().borders(Borders::ALL).title("Library"));
                frame.render_widget(loading, layout[2]);
            }
            ViewState::Error(message) => {
                let lines = vec![
                    Line::styled(
                        format!("Error: {message}"),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::raw(""),
                    Line::raw("Press r to retry."),
                ];
                let error = Paragraph::new(Text::from(lines))
                    .block(Block::default().borders(Borders::ALL).title("Library"))
                    .wrap(Wrap { trim: true });
                frame.render_widget(error, layout[2]);
            }
            ViewState::Ready => {
                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(layout[2]);
                self.draw_library(frame, body[0]);
                frame.render_widget(self.draw_details(), body[1]);
            }
        }

        let footer = Paragraph::new(Text::from(self.footer_lines()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, layout[3]);

        if self.sync_panel.open {
            self.draw_sync_panel(area, frame);
        }
        if let Some(prompt) = &self.confirm {
            draw_dialog(
                frame,
                area,
                "Convert",
                vec![
                    Line::raw(format!("\"{}\" is not a PDF.", prompt.book.title)),
                    Line::raw("Convert to PDF?"),
                    Line::raw(""),
                    Line::raw("y/Enter convert   n/Esc cancel"),
                ],
                Color::Reset,
            );
        }
        if let Some(message) = &self.alert {
            draw_dialog(
                frame,
                area,
                "Error",
                vec![
                    Line::raw(message.clone()),
                    Line::raw(""),
                    Line::raw("Enter dismiss"),
                ],
                Color::Red,
            );
        }
    }

    fn draw_search_box(&self, frame: &mut ratatui::Frame, area: Rect) {
        let border_style = if self.search_panel.focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        };
        let content = if self.search_panel.focused {
            Line::from(vec![
                Span::raw(self.search.query().to_string()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        } else if self.search.query().is_empty() {
            Line::styled(
                "Search books by title... (press /)",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Line::raw(self.search.query().to_string())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search");
        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    fn draw_library(&self, frame: &mut ratatui::Frame, area: Rect) {
        let title = if self.catalog.is_searching {
            format!(
                "Library ({}/{} matches)",
                self.catalog.displayed_books.len(),
                self.catalog.all_books.len()
            )
        } else {
            "Library".to_string()
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.catalog.displayed_books.is_empty() {
            let mut lines = vec![Line::raw(if self.catalog.is_searching {
                "No books match your search."
            } else {
                "No books in the library."
            })];
            lines.push(Line::raw(""));
            if self.catalog.is_searching {
                lines.push(Line::raw("Tip: press c to show all books."));
            } else {
                lines.push(Line::raw("Tip: press f to sync a folder."));
            }
            let paragraph = Paragraph::new(Text::from(lines))
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let max_title_width = (area.width as usize).saturating_sub(20).max(8);
        let items: Vec<ListItem> = self
            .catalog
            .displayed_books
            .iter()
            .map(|book| ListItem::new(book_row(book, max_title_width)))
            .collect();

        let highlight_style = Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD);

        let list = List::new(items)
            .block(block)
            .highlight_style(highlight_style)
            .highlight_symbol("> ")
            .highlight_spacing(HighlightSpacing::Always);

        let mut state = ListState::default();
        state.select(Some(self.catalog.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_details(&self) -> Paragraph<'static> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();

        if let Some(book) = self.catalog.selected_book() {
            lines.push(Line::from(vec![
                Span::styled("Title: ", bold),
                Span::raw(book.title.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Format: ", bold),
                Span::raw(book.extension.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Status: ", bold),
                read_badge(book),
            ]));
            if let Some(added_at) = &book.added_at {
                lines.push(Line::from(vec![
                    Span::styled("Added: ", bold),
                    Span::raw(added_at.clone()),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("Path: ", bold),
                Span::raw(book.path.clone()),
            ]));
            lines.push(Line::raw(""));

            let open_hint = if book.is_directly_viewable() {
                "open in browser"
            } else {
                "convert to PDF and open"
            };
            let read_hint = if book.read {
                "mark as unread"
            } else {
                "mark as read"
            };
            lines.push(Line::from(vec![
                Span::styled("o ", bold),
                Span::raw(open_hint),
            ]));
            lines.push(Line::from(vec![
                Span::styled("m ", bold),
                Span::raw(read_hint),
            ]));
            lines.push(Line::from(vec![
                Span::styled("d ", bold),
                Span::raw("delete"),
            ]));
        } else {
            lines.push(Line::raw("No selection."));
        }

        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .wrap(Wrap { trim: true })
    }

    fn draw_sync_panel(&self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title(Span::styled(
            "Sync Folder",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Folder: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(self.sync_panel.input.clone()),
                Span::styled("_", Style::default().fg(ACCENT)),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" sync  "),
                Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel  "),
                Span::styled("Ctrl+U", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" clear"),
            ]),
        ];

        if self.sync_panel.busy {
            lines.push(Line::raw(""));
            lines.push(Line::raw(format!("Syncing... {}", self.spinner())));
        }
        if let Some(err) = &self.sync_panel.error {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                err.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }

        let body = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        frame.render_widget(body, inner);
    }
}

#[derive(Debug, Clone, Default)]
struct SearchPanel {
    focused: bool,
}

#[derive(Debug, Clone, Default)]
struct SyncPanel {
    open: bool,
    busy: bool,
    input: String,
    error: Option<String>,
}

#[derive(Debug, Clone)]
struct ConvertPrompt {
    book: Book,
}

fn book_row(book: &Book, max_title_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::raw(fit_width(&book.title, max_title_width)),
        Span::raw("  "),
        Span::styled(book.extension.clone(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        read_badge(book),
    ])
}

fn read_badge(book: &Book) -> Span<'static> {
    let color = if book.read { Color::Green } else { Color::Gray };
    Span::styled(
        book.read_label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Truncates to `max_width` display columns, marking the cut with an ellipsis.
fn fit_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn draw_dialog(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &'static str,
    lines: Vec<Line<'static>>,
    border: Color,
) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
