//! HTML rendering for the browser surface.
//!
//! Builds the whole single-page document from a [`Portfolio`]: a fixed nav
//! bar (desktop entries, mobile drawer, theme and menu toggles), the sections
//! in their fixed order, and a footer. Markdown fields go through comrak with
//! raw HTML disabled; everything else is escaped here.
//!
//! The page script finds the sections through a JSON manifest embedded in
//! the document, so the section order and probe offset are defined once, on
//! the Rust side.

use comrak::{markdown_to_html, Options};
use serde::Serialize;

use crate::content::Portfolio;
use crate::nav::{SectionId, DARK_CLASS, SECTION_ORDER};

/// Element id of the embedded section manifest.
pub const MANIFEST_ID: &str = "folio-sections";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Data handed to the page script.
#[derive(Debug, Serialize)]
pub struct PageManifest {
    /// Every section id in fixed order, rendered or not.
    pub sections: [SectionId; 6],
    /// Probe distance below the viewport top, in CSS pixels.
    pub probe_offset: f64,
    /// Section highlighted before the first scroll event.
    pub active: SectionId,
}

impl PageManifest {
    pub fn for_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            sections: SECTION_ORDER,
            probe_offset: portfolio.site.probe_offset,
            active: SectionId::About,
        }
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// comrak options: a few GFM extensions, raw HTML stripped.
fn make_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.render.unsafe_ = false;
    options
}

/// Render block markdown (paragraphs).
fn markdown_block(source: &str) -> String {
    markdown_to_html(source, &make_options())
}

/// Render markdown for use inside an inline element: a lone paragraph is
/// unwrapped.
fn markdown_inline(source: &str) -> String {
    let html = markdown_block(source);
    let trimmed = html.trim_end();
    if let Some(inner) = trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
    {
        if !inner.contains("<p>") {
            return inner.to_owned();
        }
    }
    html
}

/// Minimal HTML entity escaping for text content and attribute values.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped `href` value. Script-bearing schemes are replaced with `#`.
fn safe_href(url: &str) -> String {
    // Browsers drop tabs and newlines anywhere in a URL and trim leading
    // control characters and spaces before reading the scheme.
    let scheme: String = url
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .skip_while(|c| c.is_ascii_control() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|s| scheme.starts_with(s))
    {
        return "#".to_owned();
    }
    html_escape(url)
}

/// `tel:` URI for a display phone number: keeps digits and a leading `+`.
fn tel_href(phone: &str) -> String {
    let mut out = String::from("tel:");
    for (i, c) in phone.trim().chars().enumerate() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            out.push(c);
        }
    }
    out
}

/// Link to an external page, opened in a new tab.
fn external_link(class: &str, url: &str, label: &str) -> String {
    format!(
        "<a class=\"{class}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        safe_href(url),
        html_escape(label)
    )
}

fn section_title(id: SectionId) -> String {
    format!(
        "<h2 class=\"section-title\"><span class=\"section-icon\" aria-hidden=\"true\">{}</span>{}</h2>\n",
        id.icon(),
        html_escape(id.title())
    )
}

fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"tags\">");
    for tag in tags {
        html.push_str(&format!("<li class=\"tag\">{}</li>", html_escape(tag)));
    }
    html.push_str("</ul>\n");
    html
}

/// Phone, email and address rows shared by about and contact.
fn contact_rows(phone: &str, email: &str, place: &str) -> String {
    let mut html = String::from("<ul class=\"contact-list\">\n");
    if !phone.is_empty() {
        html.push_str(&format!(
            "<li><span class=\"icon\" aria-hidden=\"true\">\u{260E}</span><a href=\"{}\">{}</a></li>\n",
            html_escape(&tel_href(phone)),
            html_escape(phone)
        ));
    }
    if !email.is_empty() {
        html.push_str(&format!(
            "<li><span class=\"icon\" aria-hidden=\"true\">\u{2709}</span><a href=\"mailto:{}\">{}</a></li>\n",
            html_escape(email),
            html_escape(email)
        ));
    }
    if !place.is_empty() {
        html.push_str(&format!(
            "<li><span class=\"icon\" aria-hidden=\"true\">\u{2302}</span>{}</li>\n",
            html_escape(place)
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn socials(portfolio: &Portfolio) -> String {
    if portfolio.profile.socials.is_empty() {
        return String::new();
    }
    let mut html = String::from("<div class=\"socials\">");
    for social in &portfolio.profile.socials {
        html.push_str(&external_link("social", &social.url, &social.label));
    }
    html.push_str("</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn about_html(p: &Portfolio) -> String {
    let profile = &p.profile;
    let mut html = format!(
        "<div class=\"container about\">\n\
<div class=\"avatar\" aria-hidden=\"true\">{}</div>\n\
<div class=\"about-text\">\n\
<h1 class=\"name\">{}</h1>\n",
        html_escape(&profile.initials()),
        html_escape(&profile.name)
    );
    if !profile.headline.is_empty() {
        html.push_str(&format!(
            "<p class=\"headline\">{}</p>\n",
            html_escape(&profile.headline)
        ));
    }
    if !profile.summary.is_empty() {
        html.push_str(&format!(
            "<div class=\"summary\">{}</div>\n",
            markdown_block(&profile.summary)
        ));
    }
    html.push_str(&contact_rows(
        &profile.phone,
        &profile.email,
        &profile.location,
    ));
    html.push_str(&socials(p));
    html.push_str("</div>\n</div>\n");
    html
}

fn education_html(p: &Portfolio) -> String {
    let mut html = section_title(SectionId::Education);
    html.push_str("<div class=\"timeline\">\n");
    for edu in &p.education {
        html.push_str(&format!(
            "<article class=\"card\">\n<h3>{}</h3>\n<p class=\"institution\">{}</p>\n<p class=\"period\">{}</p>\n",
            html_escape(&edu.degree),
            html_escape(&edu.institution),
            html_escape(&edu.period)
        ));
        if let Some(field) = edu.field.as_deref().filter(|f| !f.is_empty()) {
            html.push_str(&format!("<p class=\"field\">{}</p>\n", html_escape(field)));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</div>\n");
    html
}

fn projects_html(p: &Portfolio) -> String {
    let mut html = section_title(SectionId::Projects);
    html.push_str("<div class=\"card-grid\">\n");
    for project in &p.projects {
        html.push_str(&format!(
            "<article class=\"card project\">\n<div class=\"card-head\"><h3>{}</h3><span class=\"date\">{}</span></div>\n",
            html_escape(&project.title),
            html_escape(&project.date)
        ));
        html.push_str(&tag_list(&project.stack));
        if !project.description.is_empty() {
            html.push_str("<ul class=\"bullets\">\n");
            for point in &project.description {
                html.push_str(&format!("<li>{}</li>\n", markdown_inline(point)));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</article>\n");
    }
    html.push_str("</div>\n");
    html
}

fn skills_html(p: &Portfolio) -> String {
    let skills = &p.skills;
    let mut html = section_title(SectionId::Skills);

    if !skills.groups.is_empty() {
        html.push_str("<div class=\"card-grid\">\n");
        for group in &skills.groups {
            html.push_str(&format!(
                "<article class=\"card skill-group\">\n<h3>{}</h3>\n{}</article>\n",
                html_escape(&group.category),
                tag_list(&group.items)
            ));
        }
        html.push_str("</div>\n");
    }

    if !skills.levels.is_empty() {
        html.push_str("<div class=\"card levels\">\n<h3>Proficiency</h3>\n");
        for level in &skills.levels {
            let name = html_escape(&level.name);
            let percent = level.percent.min(100);
            html.push_str(&format!(
                "<div class=\"level\">\n\
<div class=\"level-head\"><span>{name}</span><span>{percent}%</span></div>\n\
<div class=\"bar\" role=\"progressbar\" aria-label=\"{name}\" aria-valuemin=\"0\" aria-valuemax=\"100\" aria-valuenow=\"{percent}\">\
<div class=\"bar-fill\" style=\"width:{percent}%\"></div></div>\n\
</div>\n"
            ));
        }
        html.push_str("</div>\n");
    }

    if !skills.strengths.is_empty() {
        html.push_str("<div class=\"card strengths\">\n<h3>Additional Skills &amp; Strengths</h3>\n<ul class=\"bullets\">\n");
        for strength in &skills.strengths {
            html.push_str(&format!("<li>{}</li>\n", markdown_inline(strength)));
        }
        html.push_str("</ul>\n</div>\n");
    }
    html
}

fn achievements_html(p: &Portfolio) -> String {
    let mut html = section_title(SectionId::Achievements);
    html.push_str("<div class=\"card-grid\">\n");
    for achievement in &p.achievements {
        html.push_str(&format!(
            "<article class=\"card achievement\">\n<h3>{}</h3>\n",
            html_escape(&achievement.title)
        ));
        let byline = achievement.byline();
        if !byline.is_empty() {
            html.push_str(&format!(
                "<p class=\"byline\">{}</p>\n",
                html_escape(&byline)
            ));
        }
        if !achievement.description.is_empty() {
            html.push_str(&format!(
                "<p class=\"description\">{}</p>\n",
                markdown_inline(&achievement.description)
            ));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</div>\n");
    html
}

fn contact_html(p: &Portfolio) -> String {
    let contact = &p.contact;
    let mut html = section_title(SectionId::Contact);
    html.push_str("<div class=\"card contact\">\n");
    html.push_str(&format!(
        "<h3>{}</h3>\n",
        html_escape(contact.heading.as_deref().unwrap_or("Let's Connect"))
    ));
    if !contact.blurb.is_empty() {
        html.push_str(&format!(
            "<div class=\"blurb\">{}</div>\n",
            markdown_block(&contact.blurb)
        ));
    }
    html.push_str(&contact_rows(
        &p.profile.phone,
        &p.profile.email,
        p.contact_address(),
    ));

    if contact.resume.is_some() || !contact.actions.is_empty() {
        html.push_str("<div class=\"quick-actions\">\n");
        if let Some(resume) = &contact.resume {
            html.push_str(&format!(
                "<a class=\"button primary\" href=\"{}\" download>Download Resume</a>\n",
                safe_href(resume)
            ));
        }
        for action in &contact.actions {
            html.push_str(&format!(
                "<a class=\"button\" href=\"{}\">{}</a>\n",
                safe_href(&action.href),
                html_escape(&action.label)
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str(&socials(p));
    html.push_str("</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Nav entries for the rendered sections. `class` is the per-link class;
/// the about entry starts out active.
fn nav_links(portfolio: &Portfolio, class: &str) -> String {
    let mut html = String::new();
    for id in SECTION_ORDER {
        if !portfolio.has_section(id) {
            continue;
        }
        let active = if id == SectionId::About { " active" } else { "" };
        html.push_str(&format!(
            "<a class=\"{class}{active}\" href=\"#{id}\" data-nav=\"{id}\">{}</a>\n",
            html_escape(id.label())
        ));
    }
    html
}

/// Manifest JSON, safe to embed in a `<script>` element.
fn manifest_json(portfolio: &Portfolio) -> String {
    let manifest = PageManifest::for_portfolio(portfolio);
    match serde_json::to_string(&manifest) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            tracing::warn!(error = %e, "cannot serialize section manifest");
            "{}".to_owned()
        }
    }
}

/// Build the complete HTML document for `portfolio`.
pub fn build_page(portfolio: &Portfolio) -> String {
    let site = &portfolio.site;
    let title = html_escape(&site.title);
    let description = html_escape(&site.description);
    let html_class = if site.default_theme.is_dark() {
        format!(" class=\"{DARK_CLASS}\"")
    } else {
        String::new()
    };
    let brand = html_escape(&portfolio.profile.initials());
    let desktop_links = nav_links(portfolio, "nav-link");
    let mobile_links = nav_links(portfolio, "mobile-link");

    let mut sections = String::new();
    for id in SECTION_ORDER {
        if !portfolio.has_section(id) {
            continue;
        }
        let body = match id {
            SectionId::About => about_html(portfolio),
            SectionId::Education => education_html(portfolio),
            SectionId::Projects => projects_html(portfolio),
            SectionId::Skills => skills_html(portfolio),
            SectionId::Achievements => achievements_html(portfolio),
            SectionId::Contact => contact_html(portfolio),
        };
        sections.push_str(&format!(
            "<section id=\"{id}\" class=\"section section-{id}\">\n{body}</section>\n"
        ));
    }

    let footer = if site.footer.is_empty() {
        String::new()
    } else {
        format!(
            "<footer class=\"site-footer\"><p>{}</p></footer>\n",
            html_escape(&site.footer)
        )
    };
    let manifest = manifest_json(portfolio);

    const ICON_MOON: &str = r#"<svg class="icon-moon" xmlns="http://www.w3.org/2000/svg" width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"/></svg>"#;
    const ICON_SUN: &str = r#"<svg class="icon-sun" xmlns="http://www.w3.org/2000/svg" width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><circle cx="12" cy="12" r="5"/><line x1="12" y1="1" x2="12" y2="3"/><line x1="12" y1="21" x2="12" y2="23"/><line x1="4.22" y1="4.22" x2="5.64" y2="5.64"/><line x1="18.36" y1="18.36" x2="19.78" y2="19.78"/><line x1="1" y1="12" x2="3" y2="12"/><line x1="21" y1="12" x2="23" y2="12"/><line x1="4.22" y1="19.78" x2="5.64" y2="18.36"/><line x1="18.36" y1="5.64" x2="19.78" y2="4.22"/></svg>"#;
    const ICON_MENU: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" aria-hidden="true"><line x1="3" y1="6" x2="21" y2="6"/><line x1="3" y1="12" x2="21" y2="12"/><line x1="3" y1="18" x2="21" y2="18"/></svg>"#;

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\"{html_class}>\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n\
<meta name=\"description\" content=\"{description}\">\n\
<link rel=\"stylesheet\" href=\"assets/folio.css\">\n\
</head>\n\
<body>\n\
<nav class=\"site-nav\">\n\
<div class=\"nav-inner\">\n\
<a class=\"brand\" href=\"#about\" data-nav=\"about\">{brand}</a>\n\
<div class=\"nav-links\">\n\
{desktop_links}</div>\n\
<div class=\"nav-actions\">\n\
<button id=\"theme-toggle\" class=\"icon-button\" type=\"button\" aria-label=\"Toggle dark mode\">{ICON_MOON}{ICON_SUN}</button>\n\
<button id=\"menu-toggle\" class=\"icon-button menu-toggle\" type=\"button\" aria-label=\"Toggle menu\" aria-controls=\"mobile-menu\" aria-expanded=\"false\">{ICON_MENU}</button>\n\
</div>\n\
</div>\n\
<div id=\"mobile-menu\" class=\"mobile-menu\" hidden>\n\
{mobile_links}</div>\n\
</nav>\n\
<main>\n\
{sections}</main>\n\
{footer}\
<script id=\"{MANIFEST_ID}\" type=\"application/json\">{manifest}</script>\n\
<script src=\"assets/folio.js\"></script>\n\
</body>\n\
</html>\n"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::nav::Theme;

    fn minimal() -> Portfolio {
        content::parse(
            "profile:\n  name: Sam Lee\n  email: sam@example.com\n",
            std::path::Path::new("t.yml"),
        )
        .unwrap()
    }

    fn extract_manifest(page: &str) -> serde_json::Value {
        let open = format!("<script id=\"{MANIFEST_ID}\" type=\"application/json\">");
        let start = page.find(&open).unwrap() + open.len();
        let end = start + page[start..].find("</script>").unwrap();
        serde_json::from_str(&page[start..end]).unwrap()
    }

    #[test]
    fn sections_emitted_in_fixed_order() {
        let page = build_page(&content::builtin());
        let positions: Vec<usize> = SECTION_ORDER
            .iter()
            .map(|id| page.find(&format!("<section id=\"{id}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn empty_sections_are_omitted() {
        let page = build_page(&minimal());
        assert!(page.contains("<section id=\"about\""));
        assert!(page.contains("<section id=\"contact\""));
        assert!(!page.contains("<section id=\"projects\""));
        assert!(!page.contains("data-nav=\"projects\""));
    }

    #[test]
    fn about_starts_active() {
        let page = build_page(&content::builtin());
        assert!(page.contains("<a class=\"nav-link active\" href=\"#about\" data-nav=\"about\">"));
        assert!(page.contains(
            "<a class=\"mobile-link active\" href=\"#about\" data-nav=\"about\">"
        ));
        assert_eq!(page.matches("nav-link active").count(), 1);
    }

    #[test]
    fn nav_has_toggles_and_hidden_drawer() {
        let page = build_page(&content::builtin());
        assert!(page.contains("id=\"theme-toggle\""));
        assert!(page.contains("id=\"menu-toggle\""));
        assert!(page.contains("<div id=\"mobile-menu\" class=\"mobile-menu\" hidden>"));
    }

    #[test]
    fn manifest_lists_order_and_probe() {
        let page = build_page(&content::builtin());
        let manifest = extract_manifest(&page);
        assert_eq!(
            manifest["sections"],
            serde_json::json!([
                "about",
                "education",
                "projects",
                "skills",
                "achievements",
                "contact"
            ])
        );
        assert_eq!(manifest["probe_offset"], serde_json::json!(100.0));
        assert_eq!(manifest["active"], "about");
    }

    #[test]
    fn text_is_escaped() {
        let mut p = minimal();
        p.profile.name = "<Sam & Co>".into();
        p.site.description = "a \"quoted\" site".into();
        let page = build_page(&p);
        assert!(page.contains("&lt;Sam &amp; Co&gt;"));
        assert!(page.contains("content=\"a &quot;quoted&quot; site\""));
        assert!(!page.contains("<Sam & Co>"));
    }

    #[test]
    fn markdown_summary_rendered() {
        let mut p = minimal();
        p.profile.summary = "Loves **Rust**".into();
        let page = build_page(&p);
        assert!(page.contains("<strong>Rust</strong>"));
    }

    #[test]
    fn raw_html_in_markdown_is_dropped() {
        let mut p = minimal();
        p.profile.summary = "hi <script>alert(1)</script>".into();
        let page = build_page(&p);
        assert!(!page.contains("<script>alert(1)"));
    }

    #[test]
    fn inline_markdown_unwraps_paragraph() {
        assert_eq!(markdown_inline("a *b*"), "a <em>b</em>");
        assert!(markdown_inline("one\n\ntwo").contains("<p>"));
    }

    #[test]
    fn dark_default_sets_root_class() {
        let mut p = minimal();
        assert!(build_page(&p).contains("<html lang=\"en\">"));
        p.site.default_theme = Theme::Dark;
        assert!(build_page(&p).contains("<html lang=\"en\" class=\"dark\">"));
    }

    #[test]
    fn resume_and_actions_rendered() {
        let page = build_page(&content::builtin());
        assert!(page.contains("href=\"/resume.pdf\" download>Download Resume</a>"));
        assert!(page.contains("href=\"mailto:alex.morgan@example.com\">Send Email</a>"));
    }

    #[test]
    fn skill_bars_carry_percent() {
        let page = build_page(&content::builtin());
        assert!(page.contains("aria-valuenow=\"90\""));
        assert!(page.contains("style=\"width:90%\""));
    }

    #[test]
    fn script_urls_are_neutralised() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href(" JavaScript:x"), "#");
        assert_eq!(safe_href("java\tscript:alert(1)"), "#");
        assert_eq!(safe_href("java\nscript:alert(1)"), "#");
        assert_eq!(safe_href("jav\r\nascript:alert(1)"), "#");
        assert_eq!(safe_href("\u{1}\u{1f}javascript:alert(1)"), "#");
        assert_eq!(safe_href("\u{0}  vb\tscript:x"), "#");
        assert_eq!(safe_href("DA\nTA:text/html,x"), "#");
        assert_eq!(safe_href("/resume.pdf"), "/resume.pdf");
        assert_eq!(safe_href("https://a.example/?q=1&r=2"), "https://a.example/?q=1&amp;r=2");
    }

    #[test]
    fn tel_href_keeps_digits() {
        assert_eq!(tel_href("+1 555 0100"), "tel:+15550100");
        assert_eq!(tel_href("(555) 010-0"), "tel:5550100");
    }

    #[test]
    fn footer_and_meta() {
        let page = build_page(&content::builtin());
        assert!(page.contains("<title>Alex Morgan · Portfolio</title>"));
        assert!(page.contains("<footer class=\"site-footer\">"));
        assert!(page.contains("<script src=\"assets/folio.js\"></script>"));
    }
}
