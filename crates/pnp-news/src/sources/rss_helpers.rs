//! Shared RSS/Atom feed parsing and HTML stripping helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::FeedEntry;
use crate::error::NewsError;

/// Parse an RSS or Atom document into [`FeedEntry`]s.
///
/// Reads `<item>` (RSS) and `<entry>` (Atom) elements, pulling title, link,
/// description/summary, the publication date (`pubDate`/`published`, else
/// `updated`) and the `<source>` label. HTML in descriptions is stripped.
/// Entries with neither title nor link are skipped.
pub(crate) fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut draft = Draft::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = tag_name(&e);
                if name == "item" || name == "entry" {
                    in_entry = true;
                    draft = Draft::default();
                } else if in_entry && name == "link" {
                    draft.take_href(&e);
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                if in_entry && tag_name(&e) == "link" {
                    draft.take_href(&e);
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if (name == "item" || name == "entry") && in_entry {
                    in_entry = false;
                    if let Some(entry) = std::mem::take(&mut draft).finish() {
                        entries.push(entry);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    draft.set_field(&current_tag, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    draft.set_field(&current_tag, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(NewsError::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    std::str::from_utf8(e.name().as_ref())
        .unwrap_or("")
        .to_string()
}

#[derive(Debug, Default)]
struct Draft {
    title: String,
    link: String,
    summary: String,
    published: String,
    updated: String,
    source: String,
}

impl Draft {
    fn set_field(&mut self, tag: &str, text: &str) {
        match tag {
            "title" => self.title.push_str(text),
            "link" if self.link.is_empty() => self.link = text.trim().to_string(),
            "description" | "summary" | "content" => {
                if !self.summary.is_empty() {
                    self.summary.push(' ');
                }
                self.summary.push_str(&strip_html(text));
            }
            "pubDate" | "published" => self.published = text.trim().to_string(),
            "updated" => self.updated = text.trim().to_string(),
            "source" => self.source.push_str(text),
            _ => {}
        }
    }

    /// Atom carries the link in `href`; prefer `rel="alternate"` or no `rel`.
    fn take_href(&mut self, e: &BytesStart<'_>) {
        let rel = e
            .try_get_attribute("rel")
            .ok()
            .flatten()
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()));
        if rel.as_deref().is_some_and(|r| r != "alternate") {
            return;
        }
        if let Some(href) = e
            .try_get_attribute("href")
            .ok()
            .flatten()
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
        {
            if self.link.is_empty() {
                self.link = href;
            }
        }
    }

    fn finish(self) -> Option<FeedEntry> {
        let title = self.title.trim().to_string();
        if title.is_empty() && self.link.is_empty() {
            return None;
        }
        let published = parse_feed_date(&self.published).or_else(|| parse_feed_date(&self.updated));
        let source = Some(self.source.trim().to_string()).filter(|s| !s.is_empty());
        Some(FeedEntry {
            title,
            link: self.link,
            summary: self.summary,
            published,
            source,
        })
    }
}

/// Best-effort date parse: RFC 2822, RFC 3339, then plain `YYYY-MM-DD[ HH:MM:SS]` as UTC.
pub(crate) fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
