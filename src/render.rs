//! Terminal layout of the portfolio.
//!
//! Lays a [`Portfolio`] out into styled ratatui [`Text`], word-wrapped to the
//! viewport width. While laying out it records where every section starts
//! and how tall it is; [`RenderedPage`] exposes those extents as the
//! terminal's [`Geometry`]. Any change of width or palette requires a fresh
//! layout, which in turn moves the section extents.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use crate::content::Portfolio;
use crate::nav::{ClassList, Extent, Geometry, SectionId, DARK_CLASS, SECTION_ORDER};
use crate::parse::{self, Run};

/// Width of the proficiency bars, in cells.
const BAR_WIDTH: usize = 20;
const MIN_BAR_WIDTH: usize = 8;

/// Left margin for section bodies.
const INDENT: usize = 2;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub tag_fg: Color,
    pub tag_bg: Color,
    pub bar_empty: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(255, 255, 255),
            fg: Color::Rgb(17, 24, 39),
            muted: Color::Rgb(75, 85, 99),
            accent: Color::Rgb(37, 99, 235),
            accent_alt: Color::Rgb(147, 51, 234),
            tag_fg: Color::Rgb(31, 41, 55),
            tag_bg: Color::Rgb(229, 231, 235),
            bar_empty: Color::Rgb(209, 213, 219),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(17, 24, 39),
            fg: Color::Rgb(243, 244, 246),
            muted: Color::Rgb(156, 163, 175),
            accent: Color::Rgb(96, 165, 250),
            accent_alt: Color::Rgb(192, 132, 252),
            tag_fg: Color::Rgb(243, 244, 246),
            tag_bg: Color::Rgb(55, 65, 81),
            bar_empty: Color::Rgb(55, 65, 81),
        }
    }

    /// Palette selected by the root style classes, the same way the
    /// stylesheet keys off `html.dark`.
    pub fn for_root(root: &ClassList) -> Self {
        if root.contains(DARK_CLASS) {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn heading(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    pub fn link(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::UNDERLINED)
    }

    pub fn tag(&self) -> Style {
        Style::default().fg(self.tag_fg).bg(self.tag_bg)
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where a section landed in the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPosition {
    pub id: SectionId,
    /// 0-based first line.
    pub top: usize,
    /// Number of lines, including the trailing separator.
    pub height: usize,
}

/// One line's worth of a link: 0-based line, `[column_start, column_end)`
/// in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSegment {
    pub rendered_line: usize,
    pub column_start: usize,
    pub column_end: usize,
}

/// A focusable link. Links that wrap have one segment per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPosition {
    pub url: String,
    pub segments: Vec<LinkSegment>,
}

impl LinkPosition {
    pub fn rendered_line(&self) -> usize {
        self.segments.first().map(|s| s.rendered_line).unwrap_or(0)
    }
}

/// A laid-out portfolio.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub text: Text<'static>,
    pub sections: Vec<SectionPosition>,
    pub links: Vec<LinkPosition>,
    /// Width the page was laid out for.
    pub width: usize,
}

impl RenderedPage {
    pub fn total_lines(&self) -> usize {
        self.text.lines.len()
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionPosition> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Rendered sections in declaration order.
    pub fn rendered_ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        SECTION_ORDER
            .iter()
            .copied()
            .filter(|id| self.section(*id).is_some())
    }
}

impl Geometry for RenderedPage {
    fn extent_of(&self, id: SectionId) -> Option<Extent> {
        self.section(id)
            .map(|s| Extent::new(s.top as f64, s.height as f64))
    }
}

// ---------------------------------------------------------------------------
// Layout builder
// ---------------------------------------------------------------------------

/// A word-wrappable piece of text.
struct Piece {
    text: String,
    style: Style,
    link: Option<String>,
}

impl Piece {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }
}

struct PageBuilder {
    lines: Vec<Line<'static>>,
    links: Vec<LinkPosition>,
    sections: Vec<SectionPosition>,
    width: usize,
    palette: Palette,
}

impl PageBuilder {
    fn new(width: usize, palette: Palette) -> Self {
        Self {
            lines: Vec::new(),
            links: Vec::new(),
            sections: Vec::new(),
            width: width.max(INDENT + 8),
            palette,
        }
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn line(&mut self, spans: Vec<Span<'static>>) {
        self.lines.push(Line::from(spans));
    }

    fn text(&mut self, indent: usize, text: impl Into<String>, style: Style) {
        let lead = vec![Span::raw(" ".repeat(indent))];
        self.wrap(indent, lead, vec![Piece::new(text, style)]);
    }

    /// `icon` followed by `pieces`; continuation lines hang under the text.
    fn icon_line(&mut self, indent: usize, icon: &str, icon_style: Style, pieces: Vec<Piece>) {
        let lead = vec![
            Span::raw(" ".repeat(indent)),
            Span::styled(format!("{icon} "), icon_style),
        ];
        self.wrap(indent + 2, lead, pieces);
    }

    fn section_heading(&mut self, id: SectionId) {
        let style = self.palette.heading();
        self.icon_line(0, id.icon(), style, vec![Piece::new(id.title(), style)]);
        let title_width = id.title().chars().count() + 2;
        let underline = "\u{2500}".repeat(title_width.min(self.width));
        self.line(vec![Span::styled(underline, self.palette.muted())]);
        self.blank();
    }

    /// Record the extent of a section laid out since line `top`.
    fn close_section(&mut self, id: SectionId, top: usize) {
        self.sections.push(SectionPosition {
            id,
            top,
            height: self.lines.len() - top,
        });
    }

    fn pieces_from_runs(&self, runs: &[Run], base: Style) -> Vec<Piece> {
        runs.iter()
            .map(|run| {
                let mut style = if run.link.is_some() {
                    self.palette.link()
                } else {
                    base
                };
                if run.emphasis.strong {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if run.emphasis.italic {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                if run.emphasis.strike {
                    style = style.add_modifier(Modifier::CROSSED_OUT);
                }
                if run.emphasis.code {
                    style = style.fg(self.palette.accent_alt);
                }
                Piece {
                    text: run.text.clone(),
                    style,
                    link: run.link.clone(),
                }
            })
            .collect()
    }

    /// Inline markdown, wrapped at `indent`.
    fn markdown(&mut self, indent: usize, source: &str) {
        let runs = parse::parse_inline(source);
        let pieces = self.pieces_from_runs(&runs, self.palette.base());
        self.wrap(indent, vec![Span::raw(" ".repeat(indent))], pieces);
    }

    /// Bullet line with inline markdown; continuation lines hang under the
    /// text.
    fn bullet(&mut self, indent: usize, source: &str) {
        let runs = parse::parse_inline(source);
        let pieces = self.pieces_from_runs(&runs, self.palette.base());
        let lead = vec![
            Span::raw(" ".repeat(indent)),
            Span::styled("\u{2022} ", self.palette.base().fg(self.palette.accent)),
        ];
        self.wrap(indent + 2, lead, pieces);
    }

    fn tags(&mut self, indent: usize, tags: &[String]) {
        let style = self.palette.tag();
        let mut pieces = Vec::with_capacity(tags.len() * 2);
        for tag in tags {
            if !pieces.is_empty() {
                pieces.push(Piece {
                    text: " ".to_owned(),
                    style: self.palette.base(),
                    link: None,
                });
            }
            // Non-breaking spaces keep multi-word tags on one line.
            pieces.push(Piece {
                text: format!("\u{a0}{}\u{a0}", tag.replace(' ', "\u{a0}")),
                style,
                link: None,
            });
        }
        self.wrap(indent, vec![Span::raw(" ".repeat(indent))], pieces);
    }

    fn link_line(&mut self, indent: usize, label: &str, url: &str) {
        let piece = Piece {
            text: label.to_owned(),
            style: self.palette.link(),
            link: Some(url.to_owned()),
        };
        self.wrap(indent, vec![Span::raw(" ".repeat(indent))], vec![piece]);
    }

    /// Greedy word wrap. `lead` starts the first line; later lines are padded
    /// to `indent`. A word wider than the line is split at the margin.
    fn wrap(&mut self, indent: usize, lead: Vec<Span<'static>>, pieces: Vec<Piece>) {
        let mut col: usize = lead.iter().map(|s| s.content.chars().count()).sum();
        let mut spans = lead;
        let mut has_word = false;
        let mut pending_space: Option<Style> = None;
        // Index into `self.links` of the link each piece belongs to.
        let mut prev_link: Option<(String, usize)> = None;

        for piece in pieces {
            let link_idx = match (&piece.link, &prev_link) {
                (Some(url), Some((prev_url, idx))) if url == prev_url => Some(*idx),
                (Some(url), _) => {
                    self.links.push(LinkPosition {
                        url: url.clone(),
                        segments: Vec::new(),
                    });
                    Some(self.links.len() - 1)
                }
                (None, _) => None,
            };
            prev_link = piece.link.clone().zip(link_idx);

            for token in split_words(&piece.text) {
                let Some(word) = token else {
                    if has_word {
                        pending_space = Some(piece.style);
                    }
                    continue;
                };
                let word_len = word.chars().count();
                let space = usize::from(pending_space.is_some());
                if has_word && col + space + word_len > self.width {
                    self.lines.push(Line::from(std::mem::take(&mut spans)));
                    spans.push(Span::raw(" ".repeat(indent)));
                    col = indent;
                    pending_space = None;
                }
                if let Some(style) = pending_space.take() {
                    spans.push(Span::styled(" ", style));
                    col += 1;
                }

                let mut rest = word;
                loop {
                    let room = self.width.saturating_sub(col).max(1);
                    let (chunk, tail) = split_at_chars(rest, room);
                    let start = col;
                    spans.push(Span::styled(chunk.to_owned(), piece.style));
                    col += chunk.chars().count();
                    has_word = true;

                    if let Some(idx) = link_idx {
                        let line = self.lines.len();
                        let segments = &mut self.links[idx].segments;
                        match segments.last_mut() {
                            Some(seg) if seg.rendered_line == line => seg.column_end = col,
                            _ => segments.push(LinkSegment {
                                rendered_line: line,
                                column_start: start,
                                column_end: col,
                            }),
                        }
                    }

                    if tail.is_empty() {
                        break;
                    }
                    self.lines.push(Line::from(std::mem::take(&mut spans)));
                    spans.push(Span::raw(" ".repeat(indent)));
                    col = indent;
                    rest = tail;
                }
            }
        }

        if has_word {
            self.lines.push(Line::from(spans));
        }
    }

    fn finish(self) -> RenderedPage {
        RenderedPage {
            text: Text::from(self.lines),
            sections: self.sections,
            links: self.links,
            width: self.width,
        }
    }
}

/// Split on ASCII whitespace, yielding `Some(word)` for words and `None` for
/// each whitespace run.
fn split_words(text: &str) -> Vec<Option<&str>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_space = false;
    for (i, c) in text.char_indices() {
        let is_space = c == ' ' || c == '\n' || c == '\t';
        if is_space {
            if let Some(s) = start.take() {
                out.push(Some(&text[s..i]));
            }
            if !in_space {
                out.push(None);
                in_space = true;
            }
        } else {
            in_space = false;
            if start.is_none() {
                start = Some(i);
            }
        }
    }
    if let Some(s) = start {
        out.push(Some(&text[s..]));
    }
    out
}

/// Split after `n` chars.
fn split_at_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((i, _)) => s.split_at(i),
        None => (s, ""),
    }
}

/// `████░░░░` bar for a 0–100 percentage.
pub fn proficiency_bar(percent: u8, width: usize) -> (String, String) {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    ("\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Lay out the whole portfolio for a viewport `width` cells wide.
pub fn render_page(portfolio: &Portfolio, palette: Palette, width: usize) -> RenderedPage {
    let mut b = PageBuilder::new(width, palette);

    for id in SECTION_ORDER {
        if !portfolio.has_section(id) {
            continue;
        }
        let top = b.lines.len();
        match id {
            SectionId::About => render_about(&mut b, portfolio),
            SectionId::Education => render_education(&mut b, portfolio),
            SectionId::Projects => render_projects(&mut b, portfolio),
            SectionId::Skills => render_skills(&mut b, portfolio),
            SectionId::Achievements => render_achievements(&mut b, portfolio),
            SectionId::Contact => render_contact(&mut b, portfolio),
        }
        b.blank();
        b.close_section(id, top);
    }

    if !portfolio.site.footer.is_empty() {
        let rule = "\u{2500}".repeat(b.width.min(40));
        b.text(0, rule, palette.muted());
        b.text(INDENT, portfolio.site.footer.clone(), palette.muted());
    }

    b.finish()
}

fn render_about(b: &mut PageBuilder, p: &Portfolio) {
    let profile = &p.profile;
    let badge = Style::default()
        .fg(Color::White)
        .bg(b.palette.accent_alt)
        .add_modifier(Modifier::BOLD);
    let badge = Span::styled(format!(" {} ", profile.initials()), badge);
    let hang = badge.content.chars().count() + 1;
    let name = Piece::new(profile.name.clone(), b.palette.title().fg(b.palette.accent));
    b.wrap(hang, vec![badge, Span::raw(" ")], vec![name]);
    if !profile.headline.is_empty() {
        b.text(INDENT, profile.headline.clone(), b.palette.muted());
    }
    b.blank();

    if !profile.summary.is_empty() {
        b.markdown(INDENT, &profile.summary);
        b.blank();
    }

    let icon = b.palette.base().fg(b.palette.accent);
    for (glyph, value) in [
        ("\u{260E}", &profile.phone),
        ("\u{2709}", &profile.email),
        ("\u{2302}", &profile.location),
    ] {
        if !value.is_empty() {
            let value = Piece::new(value.clone(), b.palette.base());
            b.icon_line(INDENT, glyph, icon, vec![value]);
        }
    }

    if !profile.socials.is_empty() {
        b.blank();
        for social in &profile.socials {
            b.link_line(INDENT, &social.label, &social.url);
        }
    }
}

fn render_education(b: &mut PageBuilder, p: &Portfolio) {
    b.section_heading(SectionId::Education);
    for (i, edu) in p.education.iter().enumerate() {
        if i > 0 {
            b.blank();
        }
        let degree = Piece::new(edu.degree.clone(), b.palette.title());
        b.icon_line(
            INDENT,
            SectionId::Education.icon(),
            b.palette.heading(),
            vec![degree],
        );
        b.text(INDENT + 2, edu.institution.clone(), b.palette.base());
        b.text(INDENT + 2, edu.period.clone(), b.palette.muted());
        if let Some(field) = edu.field.as_deref().filter(|f| !f.is_empty()) {
            b.text(INDENT + 2, field.to_owned(), b.palette.base());
        }
    }
}

fn render_projects(b: &mut PageBuilder, p: &Portfolio) {
    b.section_heading(SectionId::Projects);
    for (i, project) in p.projects.iter().enumerate() {
        if i > 0 {
            b.blank();
        }
        let mut title = vec![Piece::new(project.title.clone(), b.palette.title())];
        if !project.date.is_empty() {
            // NBSP keeps the dot with the date.
            title.push(Piece::new(
                format!(" \u{00B7}\u{a0}{}", project.date),
                b.palette.muted(),
            ));
        }
        b.icon_line(
            INDENT,
            SectionId::Projects.icon(),
            b.palette.heading(),
            title,
        );
        if !project.stack.is_empty() {
            b.tags(INDENT + 2, &project.stack);
        }
        for point in &project.description {
            b.bullet(INDENT + 2, point);
        }
    }
}

fn render_skills(b: &mut PageBuilder, p: &Portfolio) {
    b.section_heading(SectionId::Skills);
    let skills = &p.skills;

    for group in &skills.groups {
        b.text(INDENT, group.category.clone(), b.palette.heading());
        b.tags(INDENT + 2, &group.items);
        b.blank();
    }

    if !skills.levels.is_empty() {
        b.text(INDENT, "Proficiency", b.palette.heading());
        let name_width = skills
            .levels
            .iter()
            .map(|l| l.name.chars().count())
            .max()
            .unwrap_or(0);
        // " 100%" after the bar.
        const PERCENT_WIDTH: usize = 5;
        let inline_bar = b
            .width
            .saturating_sub(INDENT + 2 + name_width + 2 + PERCENT_WIDTH)
            .min(BAR_WIDTH);
        // Too narrow for name and bar side by side: the bar goes under the name.
        let stacked = inline_bar < MIN_BAR_WIDTH;
        let bar_width = if stacked {
            b.width
                .saturating_sub(INDENT + 4 + PERCENT_WIDTH)
                .clamp(1, BAR_WIDTH)
        } else {
            inline_bar
        };
        for level in &skills.levels {
            let (filled, empty) = proficiency_bar(level.percent, bar_width);
            let mut row = if stacked {
                b.text(INDENT + 2, level.name.clone(), b.palette.base());
                vec![Span::raw(" ".repeat(INDENT + 4))]
            } else {
                vec![
                    Span::raw(" ".repeat(INDENT + 2)),
                    Span::styled(
                        format!("{:width$}  ", level.name, width = name_width),
                        b.palette.base(),
                    ),
                ]
            };
            row.extend([
                Span::styled(filled, b.palette.base().fg(b.palette.accent)),
                Span::styled(empty, b.palette.base().fg(b.palette.bar_empty)),
                Span::styled(format!(" {:>3}%", level.percent), b.palette.muted()),
            ]);
            b.line(row);
        }
        b.blank();
    }

    if !skills.strengths.is_empty() {
        b.text(INDENT, "Additional Skills & Strengths", b.palette.heading());
        for strength in &skills.strengths {
            b.bullet(INDENT + 2, strength);
        }
    }
}

fn render_achievements(b: &mut PageBuilder, p: &Portfolio) {
    b.section_heading(SectionId::Achievements);
    for (i, achievement) in p.achievements.iter().enumerate() {
        if i > 0 {
            b.blank();
        }
        let title = Piece::new(achievement.title.clone(), b.palette.title());
        b.icon_line(
            INDENT,
            SectionId::Achievements.icon(),
            b.palette.base().fg(Color::Rgb(202, 138, 4)),
            vec![title],
        );
        let byline = achievement.byline();
        if !byline.is_empty() {
            b.text(INDENT + 2, byline, b.palette.muted());
        }
        if !achievement.description.is_empty() {
            b.markdown(INDENT + 2, &achievement.description);
        }
    }
}

fn render_contact(b: &mut PageBuilder, p: &Portfolio) {
    b.section_heading(SectionId::Contact);
    let contact = &p.contact;
    let heading = contact.heading.as_deref().unwrap_or("Let's Connect");
    b.text(INDENT, heading.to_owned(), b.palette.heading());
    if !contact.blurb.is_empty() {
        b.markdown(INDENT, &contact.blurb);
    }
    b.blank();

    let icon = b.palette.base().fg(b.palette.accent);
    let address = p.contact_address().to_owned();
    for (glyph, value) in [
        ("\u{2709}", p.profile.email.clone()),
        ("\u{260E}", p.profile.phone.clone()),
        ("\u{2302}", address),
    ] {
        if !value.is_empty() {
            let value = Piece::new(value, b.palette.base());
            b.icon_line(INDENT, glyph, icon, vec![value]);
        }
    }

    if let Some(resume) = &contact.resume {
        b.blank();
        b.link_line(INDENT, "\u{2913} Download Resume", resume);
    }

    if !p.profile.socials.is_empty() || !contact.actions.is_empty() {
        b.blank();
    }
    for social in &p.profile.socials {
        b.link_line(INDENT, &social.label, &social.url);
    }
    for action in &contact.actions {
        b.link_line(INDENT, &action.label, &action.href);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
