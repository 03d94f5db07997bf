//! Portfolio content model.
//!
//! Content lives in a YAML file (or the built-in sample compiled into the
//! binary). It is opaque display data: nothing here feeds the section
//! tracker except [`Portfolio::has_section`], which decides whether a section
//! is rendered at all.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::nav::{SectionId, Theme, DEFAULT_PROBE_OFFSET};

/// Sample content used when no content file is given.
pub const DEFAULT_CONTENT: &str = include_str!("assets/portfolio.yml");

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Page-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub title: String,
    pub description: String,
    pub footer: String,
    pub default_theme: Theme,
    /// Probe distance below the viewport top, in CSS pixels.
    pub probe_offset: f64,
    /// Probe distance below the viewport top, in terminal lines.
    pub terminal_probe_lines: usize,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_owned(),
            description: String::new(),
            footer: String::new(),
            default_theme: Theme::Light,
            probe_offset: DEFAULT_PROBE_OFFSET,
            terminal_probe_lines: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    #[serde(default)]
    pub headline: String,
    /// Inline markdown.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

impl Profile {
    /// Explicit initials, or the first letter of the first two words of the
    /// name.
    pub fn initials(&self) -> String {
        if let Some(initials) = &self.initials {
            return initials.clone();
        }
        self.name
            .split_whitespace()
            .take(2)
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub date: String,
    /// Bullet lines, inline markdown.
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Self-assessed proficiency shown as a bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub name: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub groups: Vec<SkillGroup>,
    pub levels: Vec<SkillLevel>,
    pub strengths: Vec<String>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.levels.is_empty() && self.strengths.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl Achievement {
    /// `issuer • date`, omitting whichever part is empty.
    pub fn byline(&self) -> String {
        match (self.issuer.is_empty(), self.date.is_empty()) {
            (false, false) => format!("{} \u{2022} {}", self.issuer, self.date),
            (false, true) => self.issuer.clone(),
            (true, false) => self.date.clone(),
            (true, true) => String::new(),
        }
    }
}

/// A one-click contact shortcut (mail, call, chat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Inline markdown.
    pub blurb: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Root-relative path of a downloadable resume, served from the public
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    pub actions: Vec<QuickAction>,
}

/// The complete portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub site: Site,
    pub profile: Profile,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub contact: Contact,
}

impl Portfolio {
    /// Whether `id` produces any markup. About and contact always render;
    /// the rest only when they have entries.
    pub fn has_section(&self, id: SectionId) -> bool {
        match id {
            SectionId::About | SectionId::Contact => true,
            SectionId::Education => !self.education.is_empty(),
            SectionId::Projects => !self.projects.is_empty(),
            SectionId::Skills => !self.skills.is_empty(),
            SectionId::Achievements => !self.achievements.is_empty(),
        }
    }

    /// Address shown in the contact section, falling back to the profile
    /// location.
    pub fn contact_address(&self) -> &str {
        self.contact
            .address
            .as_deref()
            .unwrap_or(&self.profile.location)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.profile.name.trim().is_empty() {
            return Err(ContentError::invalid("profile.name", "must not be empty"));
        }
        if self.profile.email.trim().is_empty() {
            return Err(ContentError::invalid("profile.email", "must not be empty"));
        }
        if !self.site.probe_offset.is_finite() || self.site.probe_offset < 0.0 {
            return Err(ContentError::invalid(
                "site.probe_offset",
                "must be a non-negative number",
            ));
        }
        for (i, social) in self.profile.socials.iter().enumerate() {
            if social.url.trim().is_empty() {
                return Err(ContentError::invalid(
                    format!("profile.socials[{i}].url"),
                    "must not be empty",
                ));
            }
        }
        for (i, level) in self.skills.levels.iter().enumerate() {
            if level.percent > 100 {
                return Err(ContentError::invalid(
                    format!("skills.levels[{i}].percent"),
                    format!("{} is above 100", level.percent),
                ));
            }
        }
        for (i, action) in self.contact.actions.iter().enumerate() {
            if action.href.trim().is_empty() {
                return Err(ContentError::invalid(
                    format!("contact.actions[{i}].href"),
                    "must not be empty",
                ));
            }
        }
        if let Some(resume) = &self.contact.resume {
            if !resume.starts_with('/') {
                return Err(ContentError::invalid(
                    "contact.resume",
                    format!("'{resume}' must be a root-relative path"),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse and validate content from a YAML string. `origin` is only used in
/// error messages.
pub fn parse(source: &str, origin: &Path) -> Result<Portfolio, ContentError> {
    let portfolio: Portfolio =
        serde_yml::from_str(source).map_err(|source| ContentError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    portfolio.validate()?;
    Ok(portfolio)
}

/// The built-in sample portfolio.
pub fn builtin() -> Portfolio {
    // The embedded sample is covered by `builtin_content_is_valid`.
    parse(DEFAULT_CONTENT, Path::new("<builtin>"))
        .unwrap_or_else(|e| panic!("embedded portfolio content is invalid: {e}"))
}

/// Load content from `path`, or the built-in sample when `path` is `None`.
pub fn load(path: Option<&Path>) -> Result<Portfolio, ContentError> {
    let Some(path) = path else {
        return Ok(builtin());
    };
    let source = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let portfolio = parse(&source, path)?;
    tracing::debug!(path = %path.display(), "content loaded");
    Ok(portfolio)
}

/// Async variant of [`load`] for request handlers.
pub async fn load_async(path: Option<&Path>) -> Result<Portfolio, ContentError> {
    let Some(path) = path else {
        return Ok(builtin());
    };
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse(&source, path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
