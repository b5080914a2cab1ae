//! A lenient HTML tree builder on top of `quick-xml`.
//!
//! Real pages are not well-formed XML, so the reader runs with end-name checks
//! disabled and the builder repairs what it sees:
//!
//! - HTML void elements (`<br>`, `<img>`, …) never open a scope;
//! - an end tag closes the nearest open element of the same name, and is
//!   dropped if there is none;
//! - elements still open at end of input are closed implicitly;
//! - `<script>` and `<style>` bodies are removed before reading.
//!
//! Only what the calendar parser needs is kept: element names, the `href` of
//! anchors, and decoded text.

use std::sync::LazyLock;

use quick_xml::{
  Reader,
  escape::{resolve_html5_entity, unescape_with},
  events::{BytesStart, Event},
};
use regex::Regex;

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
  "param", "source", "track", "wbr",
];

/// Longest `&name;` reference worth trying to resolve.
const MAX_ENTITY_LEN: usize = 32;

static RAW_TEXT_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>")
    .expect("raw-text element pattern is valid")
});

// ─── Tree ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
  Element(Element),
  Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
  /// Lower-cased tag name; `#document` for the root.
  pub name:     String,
  /// Only recorded for `<a>` elements.
  pub href:     Option<String>,
  pub children: Vec<Node>,
}

impl Node {
  /// The concatenated text content of this node.
  pub fn text(&self) -> String {
    match self {
      Self::Text(text) => text.clone(),
      Self::Element(element) => element.text(),
    }
  }
}

impl Element {
  fn new(name: String, href: Option<String>) -> Self {
    Self { name, href, children: Vec::new() }
  }

  pub fn text(&self) -> String {
    let mut out = String::new();
    self.push_text(&mut out);
    out
  }

  fn push_text(&self, out: &mut String) {
    for child in &self.children {
      match child {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => element.push_text(out),
      }
    }
  }

  /// Every descendant element named `name`, in document order. Matching
  /// elements are not searched for further matches inside themselves.
  pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
    for child in &self.children {
      if let Node::Element(element) = child {
        if element.name == name {
          out.push(element);
        } else {
          element.find_all(name, out);
        }
      }
    }
  }

  /// Every descendant element named `name` in document order, each paired
  /// with the sibling node that immediately follows it.
  pub fn find_all_with_next<'a>(
    &'a self,
    name: &str,
    out: &mut Vec<(&'a Element, Option<&'a Node>)>,
  ) {
    for (idx, child) in self.children.iter().enumerate() {
      if let Node::Element(element) = child {
        if element.name == name {
          out.push((element, self.children.get(idx + 1)));
        }
        element.find_all_with_next(name, out);
      }
    }
  }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Parse `markup` into a tree rooted at a synthetic `#document` element.
///
/// Never fails: if the reader gives up part-way, everything read up to that
/// point is returned.
pub(crate) fn parse_document(markup: &str) -> Element {
  let cleaned = RAW_TEXT_ELEMENTS.replace_all(markup, "");
  let mut reader = Reader::from_str(&cleaned);
  let config = reader.config_mut();
  config.check_end_names = false;
  config.allow_unmatched_ends = true;

  let mut stack = vec![Element::new("#document".to_owned(), None)];

  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e)) => {
        let element = open_element(e);
        if VOID_ELEMENTS.contains(&element.name.as_str()) {
          push_child(&mut stack, Node::Element(element));
        } else {
          stack.push(element);
        }
      }
      Ok(Event::Empty(ref e)) => {
        push_child(&mut stack, Node::Element(open_element(e)));
      }
      Ok(Event::End(ref e)) => {
        close_element(&mut stack, &tag_name(e.name().as_ref()));
      }
      Ok(Event::Text(ref e)) => {
        let raw = String::from_utf8_lossy(e);
        push_child(&mut stack, Node::Text(decode_entities(&raw)));
      }
      Ok(Event::CData(ref e)) => {
        push_child(&mut stack, Node::Text(String::from_utf8_lossy(e).into_owned()));
      }
      Ok(Event::Eof) => break,
      Err(e) => {
        tracing::warn!(
          position = reader.error_position(),
          error = %e,
          "markup reader stopped early; using the partial document"
        );
        break;
      }
      // Comments, doctype, processing instructions.
      Ok(_) => {}
    }
  }

  while stack.len() > 1 {
    if let Some(element) = stack.pop() {
      push_child(&mut stack, Node::Element(element));
    }
  }
  stack.pop().unwrap_or_else(|| Element::new("#document".to_owned(), None))
}

fn open_element(start: &BytesStart<'_>) -> Element {
  let name = tag_name(start.name().as_ref());
  let href = (name == "a").then(|| href_of(start)).flatten();
  Element::new(name, href)
}

fn tag_name(raw: &[u8]) -> String {
  String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn href_of(start: &BytesStart<'_>) -> Option<String> {
  start
    .html_attributes()
    .filter_map(Result::ok)
    .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(b"href"))
    .map(|attr| decode_entities(&String::from_utf8_lossy(&attr.value)))
}

fn push_child(stack: &mut [Element], node: Node) {
  if let Some(parent) = stack.last_mut() {
    parent.children.push(node);
  }
}

/// Close the innermost open element named `name`, implicitly closing anything
/// opened inside it. The root is never closed.
fn close_element(stack: &mut Vec<Element>, name: &str) {
  let Some(depth) = stack.iter().skip(1).rposition(|el| el.name == name) else {
    return;
  };
  let target = depth + 1;
  while stack.len() > target {
    if let Some(element) = stack.pop() {
      push_child(stack, Node::Element(element));
    }
  }
}

/// Decode named and numeric character references. References that do not
/// resolve (including a bare `&`) are kept literally.
fn decode_entities(raw: &str) -> String {
  if !raw.contains('&') {
    return raw.to_owned();
  }

  let mut out = String::with_capacity(raw.len());
  let mut rest = raw;
  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    let tail = &rest[amp..];
    let decoded = tail
      .find(';')
      .filter(|&end| end <= MAX_ENTITY_LEN)
      .and_then(|end| {
        unescape_with(&tail[..=end], resolve_html5_entity)
          .ok()
          .map(|text| (text, end + 1))
      });
    match decoded {
      Some((text, consumed)) => {
        out.push_str(&text);
        rest = &tail[consumed..];
      }
      None => {
        out.push('&');
        rest = &tail[1..];
      }
    }
  }
  out.push_str(rest);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn texts(root: &Element, name: &str) -> Vec<String> {
    let mut found = Vec::new();
    root.find_all(name, &mut found);
    found.into_iter().map(Element::text).collect()
  }

  #[test]
  fn void_elements_do_not_swallow_siblings() {
    let doc = parse_document("<p>one<br>two<img src=x></p><p>three</p>");
    assert_eq!(texts(&doc, "p"), ["onetwo", "three"]);
  }

  #[test]
  fn unmatched_end_tags_are_ignored() {
    let doc = parse_document("<div>a</span>b</div>");
    assert_eq!(texts(&doc, "div"), ["ab"]);
  }

  #[test]
  fn end_tag_closes_inner_unclosed_elements() {
    let doc = parse_document("<cite><b>bold</cite><cite>next</cite>");
    assert_eq!(texts(&doc, "cite"), ["bold", "next"]);
  }

  #[test]
  fn unclosed_elements_are_closed_at_eof() {
    let doc = parse_document("<cite><a href=\"u\">link");
    assert_eq!(texts(&doc, "cite"), ["link"]);
  }

  #[test]
  fn tag_names_are_case_insensitive() {
    let doc = parse_document("<CITE>Июнь</Cite>");
    assert_eq!(texts(&doc, "cite"), ["Июнь"]);
  }

  #[test]
  fn scripts_and_styles_are_dropped() {
    let doc = parse_document(
      "<script>if (a < b) { x = '</div>'; }</script><style>p{}</style><cite>ok</cite>",
    );
    assert_eq!(texts(&doc, "cite"), ["ok"]);
    assert_eq!(doc.text(), "ok");
  }

  #[test]
  fn entities_are_decoded_in_text_and_href() {
    let doc = parse_document(
      "<a href=\"/away.php?to=1&amp;cc_key=\">Tom &amp; Jerry&nbsp;&#40;1/2/3&#41; & co</a>",
    );
    let mut anchors = Vec::new();
    doc.find_all("a", &mut anchors);
    assert_eq!(anchors[0].href.as_deref(), Some("/away.php?to=1&cc_key="));
    assert_eq!(anchors[0].text(), "Tom & Jerry\u{a0}(1/2/3) & co");
  }

  #[test]
  fn unknown_entities_stay_literal() {
    assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
    assert_eq!(decode_entities("x &y &amp; z"), "x &y & z");
  }

  #[test]
  fn next_sibling_pairs_follow_document_order() {
    let doc = parse_document("<cite><a>A</a> (1/2/3)<br><a>B</a></cite>");
    let mut links = Vec::new();
    doc.find_all_with_next("a", &mut links);
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].1, Some(&Node::Text(" (1/2/3)".to_owned())));
    assert!(links[1].1.is_none());
  }
}
