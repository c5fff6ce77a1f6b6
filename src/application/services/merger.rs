//! Gloss merging into the target tree
//!
//! Mutation is confined to the target database. A gloss is replaced or
//! created, never duplicated: at most one gloss element per language tag
//! per sense. Timestamps are only re-stamped on an actual text change.

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

use crate::domain::xml::{Element, XmlNode};
use crate::domain::{LexicalDatabase, SenseView};

/// Separator between joined candidate texts, language-agnostic.
pub const GLOSS_SEPARATOR: &str = "; ";

/// Attribute stamped on mutated senses and their owning entries.
const DATE_MODIFIED: &str = "dateModified";

/// Write the joined candidate text into the sense's gloss for `lang`.
///
/// An existing gloss in `lang` has its text replaced; otherwise a new gloss
/// element is appended after the last existing gloss (at the end of the
/// sense when it has none). Empty candidates leave the sense untouched.
/// Returns whether the gloss text actually changed.
pub fn apply_gloss(sense: &mut Element, lang: &str, candidates: &[String]) -> bool {
    if candidates.is_empty() {
        return false;
    }
    let joined = candidates.iter().join(GLOSS_SEPARATOR);

    let mut existing_idx = None;
    let mut last_gloss_idx = None;
    for (i, node) in sense.children.iter().enumerate() {
        if let XmlNode::Element(el) = node {
            if el.name == "gloss" {
                last_gloss_idx = Some(i);
                if existing_idx.is_none() && el.attr("lang") == Some(lang) {
                    existing_idx = Some(i);
                }
            }
        }
    }

    match existing_idx {
        Some(i) => {
            let XmlNode::Element(gloss) = &mut sense.children[i] else {
                return false;
            };
            let current = gloss.first_child("text").and_then(|t| t.text());
            if current == Some(joined.as_str()) {
                return false;
            }
            let has_text = gloss.child_elements().any(|el| el.name == "text");
            if has_text {
                if let Some(text_el) = gloss.child_elements_mut().find(|el| el.name == "text") {
                    text_el.set_text(&joined);
                }
            } else {
                let mut text_el = Element::new("text");
                text_el.set_text(&joined);
                gloss.children.push(XmlNode::Element(text_el));
            }
            true
        }
        None => {
            let insert_at = last_gloss_idx.map(|i| i + 1).unwrap_or(sense.children.len());
            sense
                .children
                .insert(insert_at, XmlNode::Element(new_gloss(lang, &joined)));
            true
        }
    }
}

/// Apply all correlated candidates to the target tree, stamping the
/// `dateModified` attribute of every changed sense and its owning entry.
/// Identifiers with no candidates are absent from the map and skipped, so
/// existing glosses are never erased. Returns the number of changed senses.
pub fn merge_candidates(
    db: &mut LexicalDatabase,
    xref_type: &str,
    lang: &str,
    candidates: &BTreeMap<String, Vec<String>>,
    stamp: &str,
) -> usize {
    let mut updated = 0;
    for node in db.document_mut().root.children.iter_mut() {
        let XmlNode::Element(entry) = node else {
            continue;
        };
        if entry.name != "entry" {
            continue;
        }
        let mut entry_changed = false;
        for child in entry.children.iter_mut() {
            let XmlNode::Element(sense) = child else {
                continue;
            };
            if sense.name != "sense" {
                continue;
            }
            let id = SenseView::new(&*sense)
                .cross_reference(xref_type)
                .map(ToOwned::to_owned);
            let Some(id) = id else {
                continue;
            };
            let Some(texts) = candidates.get(&id) else {
                continue;
            };
            if apply_gloss(sense, lang, texts) {
                sense.set_attr(DATE_MODIFIED, stamp);
                entry_changed = true;
                updated += 1;
            }
        }
        if entry_changed {
            entry.set_attr(DATE_MODIFIED, stamp);
        }
    }
    debug!("merger: {} senses updated", updated);
    updated
}

fn new_gloss(lang: &str, text: &str) -> Element {
    let mut gloss = Element::new("gloss");
    gloss.set_attr("lang", lang);
    let mut text_el = Element::new("text");
    text_el.set_text(text);
    gloss.children.push(XmlNode::Element(text_el));
    gloss
}

/// Current wall-clock time in the stamp format the consuming lexicon tool
/// expects: ISO-8601 UTC, second precision, literal `Z` suffix.
pub fn current_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
