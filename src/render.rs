/*============================================================
  Bundlescope
  Module: bundlescope::render
  ------------------------------------------------------------
  Purpose:
    Server-side HTML for the search page in each view state,
    including the results card.

  Security / Safety Notes:
    Every user- or upstream-supplied string is escaped. Lookup
    error messages are never rendered.

  Dependencies:
    html-escape for text and attribute escaping.

  Revision History:
    2026-10-16  Authored page renderer.
============================================================*/

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::BundlescopeConfig;
use crate::format::{format_size, yes_no, Impact};
use crate::package_info::PackageBundleInfo;
use crate::search::{SearchSession, SearchState};

const ERROR_HINT: &str =
    "This could be due to an invalid package name or network issues. Please try again.";

/// Bases for the outbound links on the results card.
#[derive(Debug, Clone)]
pub struct Links {
    pub registry_base: String,
    pub report_base: String,
}

impl Links {
    pub fn from_config(config: &BundlescopeConfig) -> Self {
        Self {
            registry_base: config.links.registry_base.trim_end_matches('/').to_string(),
            report_base: config.upstream.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn registry_page(&self, info: &PackageBundleInfo) -> String {
        format!("{}/package/{}", self.registry_base, info.name)
    }

    pub fn size_report(&self, info: &PackageBundleInfo) -> String {
        format!("{}/package/{}@{}", self.report_base, info.name, info.version)
    }
}

const PAGE_TAIL: &str = "</main>\n</body>\n</html>\n";

/// Render the whole page for the session's current state.
pub fn page(session: &SearchSession, links: &Links) -> String {
    let mut html = page_head();
    state_sections(&mut html, session, links);
    html.push_str(PAGE_TAIL);
    html
}

/// First chunk of a streamed lookup: the page head plus the loading form and
/// card, wrapped so the settled chunk can hide them.
pub fn loading_prefix(session: &SearchSession, links: &Links) -> String {
    let mut html = page_head();
    html.push_str("<div id=\"pending\">\n");
    state_sections(&mut html, session, links);
    html.push_str("</div>\n");
    html
}

/// Closing chunk of a streamed lookup: hides the loading section and renders
/// the settled state.
pub fn settled_suffix(session: &SearchSession, links: &Links) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<style>#pending{display:none}</style>\n");
    state_sections(&mut html, session, links);
    html.push_str(PAGE_TAIL);
    html
}

fn page_head() -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        "<title>NPM Bundle Size Analyzer</title>\n",
        "</head>\n<body>\n<main class=\"container\">\n",
        "<header>\n<h1>NPM Bundle Size Analyzer</h1>\n",
        "<p class=\"muted\">Analyze the real impact of npm packages on your application ",
        "bundle size, not just the unpacked size listed on npm.</p>\n</header>\n",
    ));
    html
}

fn state_sections(html: &mut String, session: &SearchSession, links: &Links) {
    search_form(html, session);
    match session.state() {
        SearchState::Idle => {}
        SearchState::Loading { package } => loading_card(html, package),
        SearchState::Error { .. } => error_card(html),
        SearchState::Results(info) => results_card(html, info, links),
    }
}

fn search_form(html: &mut String, session: &SearchSession) {
    let loading = session.is_loading();
    let _ = write!(
        html,
        concat!(
            "<section class=\"card\">\n",
            "<h2>Check Package Bundle Size</h2>\n",
            "<p class=\"muted\">Enter an npm package name to see its impact on your bundle</p>\n",
            "<form method=\"get\" action=\"/\">\n",
            "<input type=\"text\" name=\"package\" value=\"{value}\" ",
            "placeholder=\"Package name (e.g., react, lodash, @mui/material)\">\n",
            "<button type=\"submit\"{disabled}>{label}</button>\n",
            "</form>\n</section>\n",
        ),
        value = encode_double_quoted_attribute(session.input()),
        disabled = if loading { " disabled" } else { "" },
        label = if loading { "Analyzing..." } else { "Analyze" },
    );
}

fn loading_card(html: &mut String, package: &str) {
    let _ = writeln!(
        html,
        "<section class=\"card loading\" aria-busy=\"true\">\n<p class=\"muted\">Analyzing {}</p>",
        encode_text(package),
    );
    html.push_str(concat!(
        "<div class=\"skeleton skeleton-title\"></div>\n",
        "<div class=\"skeleton skeleton-subtitle\"></div>\n",
        "<div class=\"skeleton skeleton-block\"></div>\n",
        "<div class=\"skeleton skeleton-block\"></div>\n",
        "</section>\n",
    ));
}

fn error_card(html: &mut String) {
    let _ = write!(
        html,
        "<section class=\"card error\">\n<h2>Error</h2>\n<p class=\"muted\">{ERROR_HINT}</p>\n</section>\n"
    );
}

fn results_card(html: &mut String, info: &PackageBundleInfo, links: &Links) {
    let impact = Impact::classify(info.size);

    let _ = write!(
        html,
        "<section class=\"card results\">\n<header>\n<h2>{name} <span class=\"version\">v{version}</span></h2>\n",
        name = encode_text(&info.name),
        version = encode_text(&info.version),
    );
    if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(html, "<p class=\"description\">{}</p>", encode_text(description));
    }
    let _ = write!(
        html,
        "<span class=\"badge impact-{color}\">{impact} impact</span>\n</header>\n",
        color = impact.color(),
    );

    let _ = write!(
        html,
        concat!(
            "<div class=\"sizes\">\n",
            "<div><h3>Minified Size</h3><p class=\"figure\">{size}</p>",
            "<p class=\"muted\">Size after minification, before gzipping</p></div>\n",
            "<div><h3>Minified + Gzipped</h3><p class=\"figure\">{gzip}</p>",
            "<p class=\"muted\">Size after minification and gzip compression</p></div>\n",
            "</div>\n<hr>\n",
            "<div class=\"facts\">\n",
            "<div><h3>Dependencies</h3><p>{deps}</p></div>\n",
            "<div><h3>ES Module</h3><p>{esm}</p></div>\n",
            "<div><h3>Side Effects</h3><p>{side_effects}</p></div>\n",
            "</div>\n",
        ),
        size = format_size(info.size),
        gzip = format_size(info.gzip),
        deps = info.dependency_count,
        esm = yes_no(info.has_js_module),
        side_effects = yes_no(info.has_side_effects),
    );

    html.push_str("<footer>\n");
    external_link(html, &links.registry_page(info), "NPM");
    if let Some(repository) = info.repository.as_deref().filter(|url| is_web_url(url)) {
        external_link(html, repository, "Repository");
    }
    external_link(html, &links.size_report(info), "Full Report");
    html.push_str("</footer>\n</section>\n");
}

/// Only `http(s)` targets become links; anything else (`javascript:`,
/// `ssh://`) is dropped.
fn is_web_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("https://") || url.starts_with("http://")
}

fn external_link(html: &mut String, href: &str, label: &str) {
    let _ = writeln!(
        html,
        "<a class=\"button\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{label}</a>",
        encode_double_quoted_attribute(href),
    );
}
