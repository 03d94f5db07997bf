//! Interactive terminal viewer.
//!
//! The terminal is one of the surfaces driving [`Dispatcher`]: the rendered
//! page supplies the geometry (in lines), [`TerminalViewport`] receives the
//! navigator's smooth-scroll requests and animates them between input polls.
//! Every animation frame and every manual scroll is a scroll event.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    DefaultTerminal, Frame,
};

use crate::content::Portfolio;
use crate::nav::{
    ClassList, Dispatcher, Navigation, ScrollBehavior, SectionId, Viewport, SECTION_ORDER,
};
use crate::render::{render_page, Palette, RenderedPage};

/// Length of a smooth scroll.
const SCROLL_DURATION: Duration = Duration::from_millis(300);

/// Poll interval while an animation is running.
const FRAME: Duration = Duration::from_millis(16);

const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 6;

// ---------------------------------------------------------------------------
// Smooth scrolling
// ---------------------------------------------------------------------------

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A running scroll animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl SmoothScroll {
    pub fn new(from: f64, to: f64, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    /// Position at `now`, and whether the animation has finished.
    pub fn position_at(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (self.to - self.from) * ease_in_out(t), false)
    }
}

/// Scroll position of the content pane, in lines.
#[derive(Debug, Clone, Default)]
pub struct TerminalViewport {
    offset: f64,
    max_offset: f64,
    animation: Option<SmoothScroll>,
}

impl TerminalViewport {
    /// Current first visible line.
    pub fn line(&self) -> usize {
        self.offset.round() as usize
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Update the scroll limit after a layout or resize.
    pub fn set_max(&mut self, max_line: usize) {
        self.max_offset = max_line as f64;
        self.offset = self.offset.min(self.max_offset);
        if let Some(anim) = &mut self.animation {
            anim.to = anim.to.min(self.max_offset);
        }
    }

    /// Move by `delta` lines, cancelling any animation.
    pub fn scroll_by(&mut self, delta: isize) {
        let line = self.line() as isize + delta;
        self.scroll_to(line.max(0) as f64, ScrollBehavior::Instant);
    }

    /// Advance the animation to `now`. Returns whether the offset moved.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let (pos, done) = anim.position_at(now);
        if done {
            self.animation = None;
        }
        let moved = pos != self.offset;
        self.offset = pos;
        moved
    }
}

impl Viewport for TerminalViewport {
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = top.clamp(0.0, self.max_offset);
        match behavior {
            ScrollBehavior::Instant => {
                self.animation = None;
                self.offset = top;
            }
            // A new request replaces whatever is running, starting from the
            // current intermediate position.
            ScrollBehavior::Smooth => {
                self.animation = Some(SmoothScroll::new(
                    self.offset,
                    top,
                    Instant::now(),
                    SCROLL_DURATION,
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

/// State for the help/shortcuts overlay.
struct HelpState {
    /// Current filter string for narrowing displayed shortcuts.
    filter: String,
    /// Scroll offset within the overlay.
    scroll_offset: usize,
}

struct ShortcutEntry {
    key: &'static str,
    description: &'static str,
}

struct ShortcutCategory {
    name: &'static str,
    entries: Vec<ShortcutEntry>,
}

fn shortcut_categories() -> Vec<ShortcutCategory> {
    let entry = |key, description| ShortcutEntry { key, description };
    vec![
        ShortcutCategory {
            name: "Scrolling",
            entries: vec![
                entry("j / \u{2193}", "Scroll down one line"),
                entry("k / \u{2191}", "Scroll up one line"),
                entry("Ctrl-d / PgDn", "Scroll down half page"),
                entry("Ctrl-u / PgUp", "Scroll up half page"),
                entry("g / Home", "Jump to top"),
                entry("G / End", "Jump to bottom"),
            ],
        },
        ShortcutCategory {
            name: "Sections",
            entries: vec![
                entry("1 \u{2013} 6", "Go to About \u{2026} Contact"),
                entry("n", "Next section"),
                entry("p", "Previous section"),
                entry("m", "Open section menu"),
            ],
        },
        ShortcutCategory {
            name: "Links",
            entries: vec![
                entry("Tab", "Next link"),
                entry("Shift-Tab", "Previous link"),
                entry("Enter", "Open focused link"),
            ],
        },
        ShortcutCategory {
            name: "General",
            entries: vec![
                entry("t", "Toggle dark theme"),
                entry("?", "Toggle this help"),
                entry("Esc", "Clear link focus"),
                entry("q", "Quit"),
            ],
        },
    ]
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// All viewer state, independent of the terminal backend.
pub struct App {
    portfolio: Portfolio,
    dispatcher: Dispatcher,
    root: ClassList,
    page: RenderedPage,
    viewport: TerminalViewport,
    width: u16,
    /// Rows available to the content pane.
    height: usize,
    focused_link: Option<usize>,
    /// Selected row of the section menu.
    menu_selected: usize,
    help: Option<HelpState>,
    notice: Option<String>,
}

/// Rows left for content after the nav bar and the status bar.
fn content_rows(height: u16) -> usize {
    height.saturating_sub(2) as usize
}

impl App {
    pub fn new(portfolio: Portfolio, width: u16, height: u16) -> Self {
        let mut dispatcher = Dispatcher::new(portfolio.site.terminal_probe_lines as f64);
        let mut root = ClassList::default();
        if portfolio.site.default_theme.is_dark() {
            dispatcher.toggle_theme(&mut root);
        }
        let page = render_page(&portfolio, Palette::for_root(&root), width as usize);
        let mut app = Self {
            portfolio,
            dispatcher,
            root,
            page,
            viewport: TerminalViewport::default(),
            width,
            height: content_rows(height),
            focused_link: None,
            menu_selected: 0,
            help: None,
            notice: None,
        };
        app.viewport.set_max(app.max_scroll());
        app
    }

    pub fn palette(&self) -> Palette {
        Palette::for_root(&self.root)
    }

    fn max_scroll(&self) -> usize {
        self.page.total_lines().saturating_sub(self.height)
    }

    /// Lay the page out again for the current width and theme.
    fn relayout(&mut self) {
        self.page = render_page(&self.portfolio, self.palette(), self.width as usize);
        if self.focused_link.is_some_and(|i| i >= self.page.links.len()) {
            self.focused_link = None;
        }
        self.viewport.set_max(self.max_scroll());
        self.sync_active();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let height = content_rows(height);
        if width == self.width && height == self.height {
            return;
        }
        let relayout = width != self.width;
        self.width = width;
        self.height = height;
        if relayout {
            self.relayout();
        } else {
            self.viewport.set_max(self.max_scroll());
            self.sync_active();
        }
    }

    /// Feed the current offset to the tracker.
    fn sync_active(&mut self) {
        self.dispatcher.on_scroll(self.viewport.offset(), &self.page);
    }

    /// Advance a running smooth scroll. Returns whether anything moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let moved = self.viewport.advance(now);
        if moved {
            self.sync_active();
        }
        moved
    }

    fn scroll_by(&mut self, delta: isize) {
        self.viewport.scroll_by(delta);
        self.focused_link = None;
        self.sync_active();
    }

    fn jump(&mut self, line: usize) {
        self.viewport.scroll_to(line as f64, ScrollBehavior::Instant);
        self.focused_link = None;
        self.sync_active();
    }

    fn navigate(&mut self, target: SectionId) {
        let outcome = self
            .dispatcher
            .on_navigate(target.as_str(), &self.page, &mut self.viewport);
        self.focused_link = None;
        self.notice = match outcome {
            Navigation::Scrolling { .. } => None,
            Navigation::Missing => Some(format!("{} is not on this page", target.label())),
        };
    }

    fn rendered_ids(&self) -> Vec<SectionId> {
        self.page.rendered_ids().collect()
    }

    /// Rendered section after (or before) the active one.
    fn neighbour(&self, forward: bool) -> Option<SectionId> {
        let active = self.dispatcher.active();
        let ids = self.rendered_ids();
        if forward {
            ids.into_iter().find(|id| *id > active)
        } else {
            ids.into_iter().rev().find(|id| *id < active)
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.dispatcher.toggle_theme(&mut self.root);
        tracing::debug!(?theme, "theme toggled");
        self.relayout();
    }

    fn open_menu(&mut self) {
        if self.dispatcher.toggle_menu() {
            let active = self.dispatcher.active();
            self.menu_selected = self
                .rendered_ids()
                .iter()
                .position(|id| *id == active)
                .unwrap_or(0);
            self.focused_link = None;
        }
    }

    /// Bring line into view if it is outside the content pane.
    fn reveal(&mut self, line: usize) {
        let top = self.viewport.line();
        if line < top || line >= top + self.height {
            let top = line.saturating_sub(self.height / 3);
            self.viewport.scroll_to(top as f64, ScrollBehavior::Instant);
            self.sync_active();
        }
    }

    fn focus_link(&mut self, forward: bool) {
        let num_links = self.page.links.len();
        if num_links == 0 {
            return;
        }
        let top = self.viewport.line();
        let idx = match (self.focused_link, forward) {
            (Some(idx), true) => (idx + 1) % num_links,
            (Some(0), false) => num_links - 1,
            (Some(idx), false) => idx - 1,
            (None, true) => self
                .page
                .links
                .iter()
                .position(|l| l.rendered_line() >= top)
                .unwrap_or(0),
            (None, false) => {
                let visible_end = top + self.height;
                self.page
                    .links
                    .iter()
                    .rposition(|l| l.rendered_line() < visible_end)
                    .unwrap_or(num_links - 1)
            }
        };
        self.focused_link = Some(idx);
        let line = self.page.links[idx].rendered_line();
        self.reveal(line);
    }

    fn open_focused_link(&mut self) {
        let Some(link) = self.focused_link.and_then(|i| self.page.links.get(i)) else {
            return;
        };
        if is_external_url(&link.url) {
            tracing::info!(url = %link.url, "opening link");
            open_url_in_browser(&link.url);
            self.notice = None;
        } else {
            self.notice = Some(format!("{} is served by `folio serve`", link.url));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Quit;
        }

        if let Some(help) = &mut self.help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.help = None,
                KeyCode::Backspace => {
                    help.filter.pop();
                    help.scroll_offset = 0;
                }
                KeyCode::Down => help.scroll_offset = help.scroll_offset.saturating_add(1),
                KeyCode::Up => help.scroll_offset = help.scroll_offset.saturating_sub(1),
                KeyCode::Char(c) => {
                    help.filter.push(c);
                    help.scroll_offset = 0;
                }
                _ => {}
            }
            return Flow::Continue;
        }

        if self.dispatcher.state().menu_open {
            let ids = self.rendered_ids();
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.menu_selected = (self.menu_selected + 1).min(ids.len().saturating_sub(1));
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.menu_selected = self.menu_selected.saturating_sub(1);
                }
                KeyCode::Enter => {
                    if let Some(id) = ids.get(self.menu_selected) {
                        self.navigate(*id);
                    } else {
                        self.dispatcher.close_menu();
                    }
                }
                KeyCode::Char(c @ '1'..='6') => self.navigate(section_for_digit(c)),
                KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                    self.dispatcher.close_menu();
                }
                _ => {}
            }
            return Flow::Continue;
        }

        let half = (self.height / 2).max(1) as isize;
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_by(half)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_by(-half)
            }
            KeyCode::PageDown => self.scroll_by(half),
            KeyCode::PageUp => self.scroll_by(-half),
            KeyCode::Char('g') | KeyCode::Home => self.jump(0),
            KeyCode::Char('G') | KeyCode::End => self.jump(self.max_scroll()),
            KeyCode::Char(c @ '1'..='6') => self.navigate(section_for_digit(c)),
            KeyCode::Char('n') => {
                if let Some(id) = self.neighbour(true) {
                    self.navigate(id);
                }
            }
            KeyCode::Char('p') => {
                if let Some(id) = self.neighbour(false) {
                    self.navigate(id);
                }
            }
            KeyCode::Char('m') => self.open_menu(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Tab => self.focus_link(true),
            KeyCode::BackTab => self.focus_link(false),
            KeyCode::Enter => self.open_focused_link(),
            KeyCode::Char('?') => {
                self.help = Some(HelpState {
                    filter: String::new(),
                    scroll_offset: 0,
                });
                self.focused_link = None;
            }
            KeyCode::Esc => {
                self.focused_link = None;
                self.notice = None;
            }
            _ => {}
        }
        Flow::Continue
    }
}

fn section_for_digit(c: char) -> SectionId {
    let idx = c.to_digit(10).map(|d| d as usize).unwrap_or(1);
    SECTION_ORDER[idx.clamp(1, SECTION_ORDER.len()) - 1]
}

/// Check if a URL should be handed to the system browser.
fn is_external_url(url: &str) -> bool {
    url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
}

/// Open an external URL in the system browser.
fn open_url_in_browser(url: &str) {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let spawned = std::process::Command::new(program)
        .arg(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
    if let Err(e) = spawned {
        tracing::warn!(program, error = %e, "cannot launch browser");
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the viewer until the user quits.
pub fn run_viewer(portfolio: Portfolio) -> io::Result<()> {
    ratatui::run(|terminal| run(terminal, portfolio))
}

fn run(terminal: &mut DefaultTerminal, portfolio: Portfolio) -> io::Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(portfolio, size.width, size.height);
    tracing::info!(
        sections = app.page.sections.len(),
        lines = app.page.total_lines(),
        "viewer started"
    );

    loop {
        terminal.draw(|frame| ui(frame, &app))?;

        // Block on input unless an animation needs the next frame.
        let ready = if app.viewport.is_animating() {
            event::poll(FRAME)?
        } else {
            true
        };
        if ready {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key) == Flow::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        let size = terminal.size()?;
        app.resize(size.width, size.height);
        app.tick(Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = app.palette();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = "Terminal too small";
        let msg_len = msg.len() as u16;
        let x = area.x + area.width.saturating_sub(msg_len) / 2;
        let y = area.y + area.height / 2;
        let w = msg_len.min(area.width);
        if w > 0 && area.height > 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    msg,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Rect::new(x, y, w, 1),
            );
        }
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);
    let content = chunks[1];
    let scroll = app.viewport.line();

    frame.render_widget(nav_bar(app, palette, area.width as usize), chunks[0]);

    let widget = Paragraph::new(app.page.text.clone())
        .style(palette.base())
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, content);

    if let Some(link) = app.focused_link.and_then(|i| app.page.links.get(i)) {
        let focused_style = Style::default()
            .fg(Color::White)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD);
        for seg in &link.segments {
            let rel_line = seg.rendered_line as isize - scroll as isize;
            if rel_line < 0 || rel_line as usize >= content.height as usize {
                continue;
            }
            let row = content.y + rel_line as u16;
            for col in seg.column_start..seg.column_end {
                let pos = Position::new(content.x + col as u16, row);
                if let Some(cell) = frame.buffer_mut().cell_mut(pos) {
                    cell.set_style(focused_style);
                }
            }
        }
    }

    if app.dispatcher.state().menu_open {
        render_menu(frame, app, palette, content);
    }

    if let Some(help) = &app.help {
        render_help(frame, help, palette, content);
    }

    frame.render_widget(status_bar(app, palette, content.height as usize), chunks[2]);
}

/// One-line navigation bar. Falls back to a compact form when the entries
/// do not fit, the way the page collapses into a drawer on narrow screens.
fn nav_bar(app: &App, palette: Palette, width: usize) -> Paragraph<'static> {
    let bar = Style::default().fg(palette.fg).bg(palette.tag_bg);
    let active = app.dispatcher.active();
    let active_style = bar
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let theme_marker = if app.dispatcher.state().theme.is_dark() {
        " \u{263E} "
    } else {
        " \u{2600} "
    };

    let brand = format!(" {} ", app.portfolio.profile.initials());
    let mut spans = vec![Span::styled(
        brand.clone(),
        bar.fg(palette.accent_alt).add_modifier(Modifier::BOLD),
    )];

    let entries: Vec<SectionId> = app.rendered_ids();
    let full_width: usize = brand.chars().count()
        + entries.iter().map(|id| id.label().len() + 2).sum::<usize>()
        + theme_marker.chars().count();

    if full_width <= width {
        for id in entries {
            let style = if id == active { active_style } else { bar };
            spans.push(Span::styled(format!(" {} ", id.label()), style));
        }
    } else {
        spans.push(Span::styled(format!(" {} ", active.label()), active_style));
        spans.push(Span::styled(" \u{2261} m ", bar.fg(palette.muted)));
    }
    spans.push(Span::styled(theme_marker, bar));

    Paragraph::new(Line::from(spans)).style(bar)
}

fn status_bar(app: &App, palette: Palette, viewport_height: usize) -> Paragraph<'static> {
    let total_lines = app.page.total_lines();
    let scroll = app.viewport.line();
    let position = if total_lines == 0 {
        "Empty".to_owned()
    } else if total_lines <= viewport_height {
        "All".to_owned()
    } else if scroll == 0 {
        "Top".to_owned()
    } else if scroll >= total_lines.saturating_sub(viewport_height) {
        "Bot".to_owned()
    } else {
        format!("{}%", (scroll * 100) / total_lines)
    };

    let section = format!("  \u{00A7} {}", app.dispatcher.active().title());

    let link_info = app
        .focused_link
        .and_then(|i| app.page.links.get(i))
        .map(|l| format!("  -> {}", l.url))
        .unwrap_or_default();

    let notice = app
        .notice
        .as_deref()
        .map(|n| format!("  [{n}]"))
        .unwrap_or_default();

    let status = format!(
        " Line {}/{} | {}{}{}{}",
        scroll + 1,
        total_lines,
        position,
        section,
        link_info,
        notice,
    );
    let style = Style::default().fg(palette.bg).bg(palette.fg);
    Paragraph::new(Span::styled(status, style)).style(style)
}

/// Section drawer anchored to the right edge of the content pane.
fn render_menu(frame: &mut Frame, app: &App, palette: Palette, area: Rect) {
    let ids = app.rendered_ids();
    let width = 28.min(area.width);
    let height = (ids.len() as u16 + 2).min(area.height);
    let popup = Rect::new(area.x + area.width - width, area.y, width, height);

    frame.render_widget(Clear, popup);

    let active = app.dispatcher.active();
    let lines: Vec<Line<'static>> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let marker = if *id == active { "\u{2022}" } else { " " };
            let mut style = palette.base();
            if i == app.menu_selected {
                style = Style::default()
                    .fg(Color::White)
                    .bg(palette.accent)
                    .add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(
                format!("{marker} {} {} {:<18}", id.index() + 1, id.icon(), id.label()),
                style,
            ))
        })
        .collect();

    let block = Block::bordered()
        .title(" Sections ")
        .style(palette.base().fg(palette.accent));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Compute a centered rectangle within `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width * percent_x / 100).max(30).min(area.width);
    let height = (area.height * percent_y / 100).max(5).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Filterable list of shortcuts.
fn render_help(frame: &mut Frame, help: &HelpState, palette: Palette, viewport_area: Rect) {
    let popup = centered_rect(60, 70, viewport_area);
    frame.render_widget(Clear, popup);

    let filter_lower = help.filter.to_lowercase();
    let mut lines: Vec<Line<'static>> = Vec::new();

    let filter_display = if help.filter.is_empty() {
        " Type to filter...".to_owned()
    } else {
        format!(" {}\u{2502}", help.filter)
    };
    lines.push(Line::from(Span::styled(
        filter_display,
        palette.base().fg(palette.accent_alt),
    )));
    lines.push(Line::from(""));

    let mut any_match = false;
    for cat in shortcut_categories() {
        let filtered: Vec<&ShortcutEntry> = cat
            .entries
            .iter()
            .filter(|e| {
                filter_lower.is_empty()
                    || e.key.to_lowercase().contains(&filter_lower)
                    || e.description.to_lowercase().contains(&filter_lower)
                    || cat.name.to_lowercase().contains(&filter_lower)
            })
            .collect();
        if filtered.is_empty() {
            continue;
        }
        any_match = true;

        lines.push(Line::from(Span::styled(
            format!(" {}", cat.name),
            palette.heading(),
        )));
        for entry in filtered {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {:16}", entry.key),
                    palette.title().fg(palette.accent_alt),
                ),
                Span::styled(entry.description.to_owned(), palette.base()),
            ]));
        }
        lines.push(Line::from(""));
    }

    if !any_match {
        lines.push(Line::from(Span::styled(
            " No matching shortcuts",
            palette.muted(),
        )));
    }

    let title = if help.filter.is_empty() {
        " Help \u{2014} ? to close "
    } else {
        " Help \u{2014} Esc to close "
    };
    let block = Block::bordered().title(title).style(palette.base());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((help.scroll_offset as u16, 0));
    frame.render_widget(paragraph, popup);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
