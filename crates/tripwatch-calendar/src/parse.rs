//! Calendar page parser.
//!
//! Pipeline:
//!   raw markup
//!     └─ html::parse_document()  → tree
//!          └─ find_all("cite")    → Vec<Block>
//!               └─ fold over blocks, carrying the current month header
//!                    → Vec<RawCandidate>

use std::sync::LazyLock;

use regex::Regex;

use crate::html::{self, Element, Node};

/// Adjacent text that carries the participant triple all on its own, e.g.
/// `" (3/5/12) "`.
static SIBLING_PARTICIPANTS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*\([0-9]+/[0-9]+/[0-9]+\)\s*$")
    .expect("sibling participants pattern is valid")
});

/// One trip link as found on the page, before any normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
  /// The link's own text.
  pub title_text:        String,
  /// The text node right after the link, if it is exactly a participant
  /// triple; empty otherwise.
  pub participants_text: String,
  /// Text of the most recent month header block; empty if none was seen.
  pub month_name:        String,
  /// The link's `href`.
  pub source_url:        String,
  /// Raw text of whatever node follows the link (text or element). Used by
  /// the normaliser when a parenthetical is split across nodes.
  pub sibling_text:      Option<String>,
}

// ─── Blocks ──────────────────────────────────────────────────────────────────

/// A citation block is either a month header (no links) or a group of trip
/// links belonging to the last header seen.
enum Block<'a> {
  Header(String),
  Group(Vec<(&'a Element, Option<&'a Node>)>),
}

impl<'a> Block<'a> {
  fn classify(cite: &'a Element) -> Self {
    let mut links = Vec::new();
    cite.find_all_with_next("a", &mut links);
    if links.is_empty() {
      Self::Header(cite.text())
    } else {
      Self::Group(links)
    }
  }
}

fn candidate(anchor: &Element, next: Option<&Node>, month: &str) -> RawCandidate {
  let participants_text = match next {
    Some(Node::Text(text)) if SIBLING_PARTICIPANTS.is_match(text) => text.clone(),
    _ => String::new(),
  };
  let sibling_text = next.map(Node::text).filter(|text| !text.is_empty());

  RawCandidate {
    title_text: anchor.text(),
    participants_text,
    month_name: month.to_owned(),
    source_url: anchor.href.clone().unwrap_or_default(),
    sibling_text,
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Parse the calendar page into trip link candidates, in document order.
///
/// Pure: the same markup always yields the same list.
pub fn parse_calendar(markup: &str) -> Vec<RawCandidate> {
  let document = html::parse_document(markup);
  let mut citations = Vec::new();
  document.find_all("cite", &mut citations);

  let (_, candidates) = citations.into_iter().map(Block::classify).fold(
    (String::new(), Vec::new()),
    |(month, mut out), block| match block {
      Block::Header(text) => (text, out),
      Block::Group(links) => {
        out.extend(
          links
            .into_iter()
            .map(|(anchor, next)| candidate(anchor, next, &month)),
        );
        (month, out)
      }
    },
  );

  tracing::debug!(candidates = candidates.len(), "parsed calendar markup");
  candidates
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_then_group_tags_links_with_month() {
    let page = r#"
      <cite>Июнь</cite>
      <cite><a href="https://vk.com/x">Алтай (2/5/12)</a></cite>
    "#;
    let candidates = parse_calendar(page);
    assert_eq!(candidates, vec![RawCandidate {
      title_text:        "Алтай (2/5/12)".into(),
      participants_text: String::new(),
      month_name:        "Июнь".into(),
      source_url:        "https://vk.com/x".into(),
      sibling_text:      None,
    }]);
  }

  #[test]
  fn group_without_header_has_empty_month() {
    let page = r#"<cite><a href="/a">A (1/2/3)</a></cite><cite>Июль</cite>"#;
    let candidates = parse_calendar(page);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].month_name, "");
  }

  #[test]
  fn later_header_replaces_earlier() {
    let page = r#"
      <cite>Июнь</cite><cite><a href="/a">A</a> (1/2/3)</cite>
      <cite>Июль</cite><cite><a href="/b">B</a> (4/5/6)<a href="/c">C</a> (7/8/9)</cite>
    "#;
    let months: Vec<_> = parse_calendar(page)
      .into_iter()
      .map(|c| (c.title_text, c.month_name))
      .collect();
    assert_eq!(months, vec![
      ("A".to_string(), "Июнь".to_string()),
      ("B".to_string(), "Июль".to_string()),
      ("C".to_string(), "Июль".to_string()),
    ]);
  }

  #[test]
  fn exact_triple_sibling_becomes_participants_text() {
    let page = r#"<cite>Май</cite><cite><a href="/a">Эльбрус</a> (3/4/10) </cite>"#;
    let c = &parse_calendar(page)[0];
    assert_eq!(c.participants_text, " (3/4/10) ");
    assert_eq!(c.sibling_text.as_deref(), Some(" (3/4/10) "));
  }

  #[test]
  fn non_triple_sibling_is_kept_only_as_raw_text() {
    let page = r#"<cite>Май</cite><cite><a href="/a">Эльбрус (3/4/</a>10), сбор</cite>"#;
    let c = &parse_calendar(page)[0];
    assert_eq!(c.participants_text, "");
    assert_eq!(c.sibling_text.as_deref(), Some("10), сбор"));
  }

  #[test]
  fn element_sibling_is_not_participants_text() {
    let page = r#"<cite>Май</cite><cite><a href="/a">Эльбрус</a><b>(3/4/10)</b></cite>"#;
    let c = &parse_calendar(page)[0];
    assert_eq!(c.participants_text, "");
    assert_eq!(c.sibling_text.as_deref(), Some("(3/4/10)"));
  }

  #[test]
  fn nested_links_inside_group_are_found() {
    let page = r#"<cite>Март</cite><cite><p><strong><a href="/a">A (1/1/1)</a></strong></p><br><a href="/b">B (2/2/2)</a></cite>"#;
    let titles: Vec<_> = parse_calendar(page).into_iter().map(|c| c.title_text).collect();
    assert_eq!(titles, ["A (1/1/1)", "B (2/2/2)"]);
  }

  #[test]
  fn content_outside_citations_is_ignored() {
    let page = r#"<p><a href="/nav">Меню (1/2/3)</a></p><cite>Март</cite>"#;
    assert!(parse_calendar(page).is_empty());
  }

  #[test]
  fn parsing_is_deterministic() {
    let page = r#"<cite>Июнь</cite><cite><a href="/a">A (1/2/3)</a><a href="/b">B</a> (4/5/6)</cite>"#;
    assert_eq!(parse_calendar(page), parse_calendar(page));
  }
}
