//! Codepoint assignment
//!
//! Pinned glyphs keep their codepoint. Everything else is numbered upward
//! from the start codepoint in manifest order, skipping pinned codepoints and
//! surrogates.

use crate::data::manifest::{GlyphRecord, IconSource, ManifestError};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

pub fn assign_codepoints(
    sources: &[IconSource],
    start: u32,
) -> Result<Vec<GlyphRecord>, ManifestError> {
    let mut names: HashMap<&str, &PathBuf> = HashMap::new();
    for source in sources {
        if let Some(first) = names.insert(&source.name, &source.path) {
            return Err(ManifestError::DuplicateName {
                name: source.name.clone(),
                first: first.clone(),
                second: source.path.clone(),
            });
        }
    }

    let mut pinned: HashMap<char, &PathBuf> = HashMap::new();
    for source in sources {
        if let Some(codepoint) = source.codepoint {
            if let Some(first) = pinned.insert(codepoint, &source.path) {
                return Err(ManifestError::DuplicateCodepoint {
                    codepoint: codepoint as u32,
                    first: first.clone(),
                    second: source.path.clone(),
                });
            }
        }
    }
    let taken: HashSet<char> = pinned.into_keys().collect();

    let mut next = start;
    let mut records = Vec::with_capacity(sources.len());
    for source in sources {
        let codepoint = match source.codepoint {
            Some(codepoint) => codepoint,
            None => {
                let codepoint = next_free(&mut next, &taken)?;
                next += 1;
                codepoint
            }
        };
        records.push(GlyphRecord {
            name: source.name.clone(),
            codepoint,
            source: source.path.clone(),
        });
    }

    Ok(records)
}

fn next_free(cursor: &mut u32, taken: &HashSet<char>) -> Result<char, ManifestError> {
    loop {
        match char::from_u32(*cursor) {
            Some(codepoint) if !taken.contains(&codepoint) => return Ok(codepoint),
            _ if *cursor >= char::MAX as u32 => return Err(ManifestError::CodepointsExhausted),
            _ => *cursor += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, codepoint: Option<char>) -> IconSource {
        IconSource {
            name: name.to_string(),
            codepoint,
            path: PathBuf::from(format!("{name}.svg")),
        }
    }

    #[test]
    fn test_sequential_assignment() {
        let records =
            assign_codepoints(&[source("home", None), source("star", None)], 0xEA01).unwrap();
        assert_eq!(records[0].codepoint, '\u{EA01}');
        assert_eq!(records[1].codepoint, '\u{EA02}');
        assert_eq!(records[1].name, "star");
    }

    #[test]
    fn test_pinned_codepoints_are_skipped() {
        let records = assign_codepoints(
            &[
                source("alpha", None),
                source("beta", Some('\u{EA02}')),
                source("gamma", None),
            ],
            0xEA01,
        )
        .unwrap();
        let codepoints: Vec<char> = records.iter().map(|r| r.codepoint).collect();
        assert_eq!(codepoints, vec!['\u{EA01}', '\u{EA02}', '\u{EA03}']);
    }

    #[test]
    fn test_surrogates_are_skipped() {
        let records = assign_codepoints(&[source("a", None), source("b", None)], 0xD7FF).unwrap();
        assert_eq!(records[0].codepoint, '\u{D7FF}');
        assert_eq!(records[1].codepoint, '\u{E000}');
    }

    #[test]
    fn test_duplicate_names() {
        let mut second = source("star", None);
        second.path = PathBuf::from("other/star.svg");
        let err = assign_codepoints(&[source("star", None), second], 0xEA01).unwrap_err();
        assert_eq!(
            err,
            ManifestError::DuplicateName {
                name: "star".to_string(),
                first: PathBuf::from("star.svg"),
                second: PathBuf::from("other/star.svg"),
            }
        );
    }

    #[test]
    fn test_duplicate_pinned_codepoints() {
        let err = assign_codepoints(
            &[source("a", Some('\u{E001}')), source("b", Some('\u{E001}'))],
            0xEA01,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::DuplicateCodepoint { codepoint: 0xE001, .. }
        ));
    }

    #[test]
    fn test_exhaustion() {
        let err = assign_codepoints(&[source("a", None), source("b", None)], 0x10FFFF).unwrap_err();
        assert_eq!(err, ManifestError::CodepointsExhausted);
    }
}
