//! Markdown descriptions to HTML that is safe to inline in the page

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Render untrusted markdown. Raw HTML is escaped as text and script-capable
/// link targets are blanked.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralise(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralise(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn neutralise(dest: CowStr<'_>) -> CowStr<'_> {
    if is_unsafe_url(&dest) {
        CowStr::Borrowed("")
    } else {
        dest
    }
}

/// Whether a link target would run script when followed. Browsers ignore
/// whitespace and control characters inside the scheme, so those are stripped first.
pub(crate) fn is_unsafe_url(url: &str) -> bool {
    let normalised = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalised.starts_with(scheme))
}
