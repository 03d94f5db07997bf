//! Section tracking and navigation.
//!
//! The page is a fixed, ordered list of sections. Two pieces of state drive
//! everything interactive:
//!
//! - the **active section**, recomputed on every scroll event from the
//!   section extents and the probe point `scroll + probe_offset`;
//! - the **navigator**, which asks a [`Viewport`] to smooth-scroll to a
//!   section and unconditionally closes the menu drawer.
//!
//! Layout geometry is never owned here. Every surface (terminal, browser
//! tests) passes a [`Geometry`] in per event, so the containment logic stays
//! a pure function of `(extents, scroll, prior)`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Distance below the viewport top at which section containment is probed.
pub const DEFAULT_PROBE_OFFSET: f64 = 100.0;

/// Root style class applied while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A named region of the single-page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    About,
    Education,
    Projects,
    Skills,
    Achievements,
    Contact,
}

/// Declaration order of the page sections. Containment ties resolve to the
/// earliest entry.
pub const SECTION_ORDER: [SectionId; 6] = [
    SectionId::About,
    SectionId::Education,
    SectionId::Projects,
    SectionId::Skills,
    SectionId::Achievements,
    SectionId::Contact,
];

impl SectionId {
    /// Element identifier used in markup and navigation requests.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::About => "about",
            SectionId::Education => "education",
            SectionId::Projects => "projects",
            SectionId::Skills => "skills",
            SectionId::Achievements => "achievements",
            SectionId::Contact => "contact",
        }
    }

    /// Short label shown in the navigation bar.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::About => "About",
            SectionId::Education => "Education",
            SectionId::Projects => "Projects",
            SectionId::Skills => "Skills",
            SectionId::Achievements => "Achievements",
            SectionId::Contact => "Contact",
        }
    }

    /// Heading shown at the top of the section body.
    pub fn title(self) -> &'static str {
        match self {
            SectionId::About => "About",
            SectionId::Education => "Education",
            SectionId::Projects => "Projects",
            SectionId::Skills => "Skills",
            SectionId::Achievements => "Achievements & Certifications",
            SectionId::Contact => "Get In Touch",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SectionId::About => "\u{25C9}",
            SectionId::Education => "\u{270E}",
            SectionId::Projects => "\u{2318}",
            SectionId::Skills => "\u{2726}",
            SectionId::Achievements => "\u{2605}",
            SectionId::Contact => "\u{2709}",
        }
    }

    /// Position of this section in [`SECTION_ORDER`].
    pub fn index(self) -> usize {
        SECTION_ORDER
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name one of the page sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SECTION_ORDER
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Vertical extent of a rendered section: the half-open interval
/// `[top, top + height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub top: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn contains(&self, point: f64) -> bool {
        point >= self.top && point < self.top + self.height
    }
}

/// Source of section extents for the current layout.
///
/// `None` means the section is not rendered right now; callers skip it.
pub trait Geometry {
    fn extent_of(&self, id: SectionId) -> Option<Extent>;
}

impl<F> Geometry for F
where
    F: Fn(SectionId) -> Option<Extent>,
{
    fn extent_of(&self, id: SectionId) -> Option<Extent> {
        self(id)
    }
}

/// Return the first section, in declaration order, whose extent contains
/// `probe`. Sections without an extent are skipped.
pub fn locate<G: Geometry + ?Sized>(geometry: &G, probe: f64) -> Option<SectionId> {
    SECTION_ORDER.iter().copied().find(|id| {
        geometry
            .extent_of(*id)
            .is_some_and(|extent| extent.contains(probe))
    })
}

/// Active section after a scroll to `scroll`: the containing section at the
/// probe point, or `prior` when nothing contains it.
pub fn next_active<G: Geometry + ?Sized>(
    geometry: &G,
    scroll: f64,
    probe_offset: f64,
    prior: SectionId,
) -> SectionId {
    locate(geometry, scroll + probe_offset).unwrap_or(prior)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Style classes on the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: BTreeSet<String>,
}

impl ClassList {
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Add `name` if absent, remove it if present. Returns whether the class
    /// is present afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.classes.remove(name) {
            false
        } else {
            self.classes.insert(name.to_owned());
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Page state and dispatcher
// ---------------------------------------------------------------------------

/// In-memory UI state of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub active: SectionId,
    pub menu_open: bool,
    pub theme: Theme,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            active: SectionId::About,
            menu_open: false,
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Receiver of programmatic scroll requests.
///
/// Implementations may animate; the caller never waits for completion.
pub trait Viewport {
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Navigation {
    /// A smooth scroll towards `top` was requested.
    Scrolling { target: SectionId, top: f64 },
    /// The target is unknown or not rendered; nothing was scrolled.
    Missing,
}

/// Owns the page state and routes scroll, navigation and toggle events to
/// it. Geometry is supplied by the caller on each event.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    state: PageState,
    probe_offset: f64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_OFFSET)
    }
}

impl Dispatcher {
    pub fn new(probe_offset: f64) -> Self {
        Self {
            state: PageState::default(),
            probe_offset,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn active(&self) -> SectionId {
        self.state.active
    }

    /// Recompute the active section for a viewport scrolled to `offset`.
    ///
    /// Returns the new section when it changed.
    pub fn on_scroll<G: Geometry + ?Sized>(
        &mut self,
        offset: f64,
        geometry: &G,
    ) -> Option<SectionId> {
        let prior = self.state.active;
        let next = next_active(geometry, offset, self.probe_offset, prior);
        if next == prior {
            return None;
        }
        tracing::debug!(from = %prior, to = %next, offset, "active section changed");
        self.state.active = next;
        Some(next)
    }

    /// Smooth-scroll to the section named by `target` and close the menu.
    ///
    /// The menu closes even when the target is unknown or not rendered.
    /// The active section is left for the next scroll event to update.
    pub fn on_navigate<G, V>(&mut self, target: &str, geometry: &G, viewport: &mut V) -> Navigation
    where
        G: Geometry + ?Sized,
        V: Viewport + ?Sized,
    {
        let outcome = match target.parse::<SectionId>() {
            Ok(id) => match geometry.extent_of(id) {
                Some(extent) => {
                    viewport.scroll_to(extent.top, ScrollBehavior::Smooth);
                    Navigation::Scrolling {
                        target: id,
                        top: extent.top,
                    }
                }
                None => Navigation::Missing,
            },
            Err(_) => Navigation::Missing,
        };
        self.state.menu_open = false;
        tracing::debug!(section = target, ?outcome, "navigate");
        outcome
    }

    pub fn toggle_theme(&mut self, root: &mut ClassList) -> Theme {
        self.state.theme = self.state.theme.toggled();
        root.toggle(DARK_CLASS);
        self.state.theme
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.state.menu_open = !self.state.menu_open;
        self.state.menu_open
    }

    pub fn close_menu(&mut self) {
        self.state.menu_open = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-table geometry for tests.
    struct Table(Vec<(SectionId, Extent)>);

    impl Geometry for Table {
        fn extent_of(&self, id: SectionId) -> Option<Extent> {
            self.0.iter().find(|(s, _)| *s == id).map(|(_, e)| *e)
        }
    }

    /// Six stacked sections, each 500 units tall, starting at 0.
    fn stacked() -> Table {
        Table(
            SECTION_ORDER
                .iter()
                .enumerate()
                .map(|(i, id)| (*id, Extent::new(i as f64 * 500.0, 500.0)))
                .collect(),
        )
    }

    #[derive(Default)]
    struct RecordingViewport {
        requests: Vec<(f64, ScrollBehavior)>,
    }

    impl Viewport for RecordingViewport {
        fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
            self.requests.push((top, behavior));
        }
    }

    #[test]
    fn initial_active_is_about() {
        let d = Dispatcher::default();
        assert_eq!(d.active(), SectionId::About);
        assert!(!d.state().menu_open);
        assert_eq!(d.state().theme, Theme::Light);
    }

    #[test]
    fn section_ids_round_trip_through_strings() {
        for id in SECTION_ORDER {
            assert_eq!(id.as_str().parse::<SectionId>().unwrap(), id);
        }
        assert!("footer".parse::<SectionId>().is_err());
        assert!("About".parse::<SectionId>().is_err());
    }

    #[test]
    fn extent_is_half_open() {
        let e = Extent::new(100.0, 50.0);
        assert!(!e.contains(99.9));
        assert!(e.contains(100.0));
        assert!(e.contains(149.9));
        assert!(!e.contains(150.0));
    }

    #[test]
    fn zero_height_never_contains() {
        let e = Extent::new(10.0, 0.0);
        assert!(!e.contains(10.0));
    }

    #[test]
    fn scroll_selects_containing_section() {
        let geometry = stacked();
        let mut d = Dispatcher::default();
        // probe = 1000 + 100 = 1100 → projects [1000, 1500)
        assert_eq!(d.on_scroll(1000.0, &geometry), Some(SectionId::Projects));
        assert_eq!(d.active(), SectionId::Projects);
        // probe = 2399 + 100 = 2499 → achievements [2000, 2500)
        d.on_scroll(2399.0, &geometry);
        assert_eq!(d.active(), SectionId::Achievements);
        // probe = 2400 + 100 = 2500 → contact [2500, 3000)
        d.on_scroll(2400.0, &geometry);
        assert_eq!(d.active(), SectionId::Contact);
    }

    #[test]
    fn probe_offset_shifts_boundary() {
        let geometry = stacked();
        let mut d = Dispatcher::default();
        // probe = 399 + 100 = 499 → still about
        assert_eq!(d.on_scroll(399.0, &geometry), None);
        assert_eq!(d.active(), SectionId::About);
        // probe = 400 + 100 = 500 → education
        assert_eq!(d.on_scroll(400.0, &geometry), Some(SectionId::Education));
    }

    #[test]
    fn every_offset_matches_unique_container() {
        let geometry = stacked();
        let mut d = Dispatcher::new(0.0);
        for step in 0..60 {
            let offset = step as f64 * 50.0;
            d.on_scroll(offset, &geometry);
            let expected = SECTION_ORDER[(offset / 500.0) as usize];
            assert_eq!(d.active(), expected, "offset {offset}");
        }
    }

    #[test]
    fn overlapping_extents_prefer_earliest_section() {
        let geometry = Table(vec![
            (SectionId::Contact, Extent::new(0.0, 1000.0)),
            (SectionId::Skills, Extent::new(200.0, 300.0)),
            (SectionId::Projects, Extent::new(250.0, 100.0)),
        ]);
        assert_eq!(locate(&geometry, 300.0), Some(SectionId::Projects));
        assert_eq!(locate(&geometry, 400.0), Some(SectionId::Skills));
        assert_eq!(locate(&geometry, 600.0), Some(SectionId::Contact));
    }

    #[test]
    fn unmatched_probe_keeps_previous_section() {
        let geometry = stacked();
        let mut d = Dispatcher::default();
        d.on_scroll(1000.0, &geometry);
        assert_eq!(d.active(), SectionId::Projects);

        // probe = 5000 + 100, past every extent
        assert_eq!(d.on_scroll(5000.0, &geometry), None);
        assert_eq!(d.active(), SectionId::Projects);
    }

    #[test]
    fn gap_between_sections_keeps_previous_section() {
        let geometry = Table(vec![
            (SectionId::About, Extent::new(0.0, 100.0)),
            (SectionId::Education, Extent::new(300.0, 100.0)),
        ]);
        let mut d = Dispatcher::new(0.0);
        d.on_scroll(50.0, &geometry);
        assert_eq!(d.active(), SectionId::About);
        d.on_scroll(200.0, &geometry);
        assert_eq!(d.active(), SectionId::About);
        d.on_scroll(300.0, &geometry);
        assert_eq!(d.active(), SectionId::Education);
    }

    #[test]
    fn unrendered_sections_are_skipped() {
        let geometry = |id: SectionId| match id {
            SectionId::About => Some(Extent::new(0.0, 400.0)),
            SectionId::Contact => Some(Extent::new(400.0, 400.0)),
            _ => None,
        };
        let mut d = Dispatcher::default();
        d.on_scroll(350.0, &geometry);
        assert_eq!(d.active(), SectionId::Contact);
    }

    #[test]
    fn closure_geometry_with_nothing_rendered_is_a_no_op() {
        let geometry = |_: SectionId| -> Option<Extent> { None };
        let mut d = Dispatcher::default();
        assert_eq!(d.on_scroll(1234.0, &geometry), None);
        assert_eq!(d.active(), SectionId::About);
    }

    #[test]
    fn navigate_requests_smooth_scroll_to_section_top() {
        let geometry = stacked();
        let mut viewport = RecordingViewport::default();
        let mut d = Dispatcher::default();

        let outcome = d.on_navigate("skills", &geometry, &mut viewport);
        assert_eq!(
            outcome,
            Navigation::Scrolling {
                target: SectionId::Skills,
                top: 1500.0
            }
        );
        assert_eq!(viewport.requests, vec![(1500.0, ScrollBehavior::Smooth)]);
        // The active section follows the scroll events, not the request.
        assert_eq!(d.active(), SectionId::About);
    }

    #[test]
    fn navigate_closes_menu_when_target_exists() {
        let geometry = stacked();
        let mut viewport = RecordingViewport::default();
        let mut d = Dispatcher::default();
        assert!(d.toggle_menu());
        d.on_navigate("contact", &geometry, &mut viewport);
        assert!(!d.state().menu_open);
    }

    #[test]
    fn navigate_closes_menu_when_target_is_missing() {
        let geometry = |_: SectionId| -> Option<Extent> { None };
        let mut viewport = RecordingViewport::default();
        let mut d = Dispatcher::default();
        d.toggle_menu();

        let outcome = d.on_navigate("projects", &geometry, &mut viewport);
        assert_eq!(outcome, Navigation::Missing);
        assert!(!d.state().menu_open);
        assert!(viewport.requests.is_empty());
    }

    #[test]
    fn navigate_to_unknown_identifier_is_a_no_op() {
        let geometry = stacked();
        let mut viewport = RecordingViewport::default();
        let mut d = Dispatcher::default();
        d.on_scroll(1000.0, &geometry);
        d.toggle_menu();

        let outcome = d.on_navigate("blog", &geometry, &mut viewport);
        assert_eq!(outcome, Navigation::Missing);
        assert!(viewport.requests.is_empty());
        assert_eq!(d.active(), SectionId::Projects);
        assert!(!d.state().menu_open);
    }

    #[test]
    fn theme_toggle_twice_restores_theme_and_classes() {
        let mut d = Dispatcher::default();
        let mut root = ClassList::default();
        let before = root.clone();

        assert_eq!(d.toggle_theme(&mut root), Theme::Dark);
        assert!(root.contains(DARK_CLASS));

        assert_eq!(d.toggle_theme(&mut root), Theme::Light);
        assert!(!root.contains(DARK_CLASS));
        assert_eq!(root, before);
    }

    #[test]
    fn class_toggle_preserves_unrelated_classes() {
        let mut root = ClassList::default();
        root.toggle("smooth");
        root.toggle(DARK_CLASS);
        root.toggle(DARK_CLASS);
        assert!(root.contains("smooth"));
        assert!(!root.contains(DARK_CLASS));
    }

    #[test]
    fn menu_toggle_flips() {
        let mut d = Dispatcher::default();
        assert!(d.toggle_menu());
        assert!(!d.toggle_menu());
        d.toggle_menu();
        d.close_menu();
        assert!(!d.state().menu_open);
    }

    #[test]
    fn section_index_matches_order() {
        for (i, id) in SECTION_ORDER.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }
}
