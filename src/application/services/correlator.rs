//! Sense correlation across two lexicon exports
//!
//! Cross-reference ids are opaque strings; equality is exact match.
//! Candidate text is deduplicated and returned lexicographically sorted so
//! the merged gloss text is deterministic regardless of source entry order,
//! which is what makes repeated runs idempotent.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::CandidateLocation;
use crate::domain::LexicalDatabase;

/// Distinct cross-reference values of the given field type, anywhere in the
/// database. Order-independent; used only as a work list.
pub fn find_cross_reference_ids(db: &LexicalDatabase, xref_type: &str) -> BTreeSet<String> {
    let fields = db
        .document()
        .root
        .collect_descendants(&|el| el.name == "field" && el.attr("type") == Some(xref_type));

    let mut ids = BTreeSet::new();
    for field in fields {
        let value = field
            .first_child("form")
            .and_then(|f| f.first_child("text"))
            .and_then(|t| t.text());
        if let Some(value) = value {
            ids.insert(value.to_string());
        }
    }
    debug!(
        "correlator: {} distinct \"{}\" ids in {}",
        ids.len(),
        xref_type,
        db.path().display()
    );
    ids
}

/// Candidate gloss text for one cross-reference id: for every sense whose
/// field of `xref_type` equals `xref_id`, the requested locations are read
/// in `lang` where present. Deduplicated, lexicographically sorted.
pub fn collect_candidate_text(
    db: &LexicalDatabase,
    xref_id: &str,
    xref_type: &str,
    lang: &str,
    locations: &[CandidateLocation],
) -> Vec<String> {
    let mut texts = BTreeSet::new();
    for entry in db.entries() {
        for sense in entry.senses() {
            if sense.cross_reference(xref_type) != Some(xref_id) {
                continue;
            }
            for location in locations {
                let text = match location {
                    CandidateLocation::Headword => entry.headword(lang),
                    CandidateLocation::Gloss => sense.gloss(lang),
                };
                if let Some(text) = text {
                    if !text.is_empty() {
                        texts.insert(text.to_string());
                    }
                }
            }
        }
    }
    texts.into_iter().collect()
}
