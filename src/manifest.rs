/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// celebdl - the batch downloader for curated video lists
// - manifest.rs file -

use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;

// Lines starting with this are URLs, everything else is a title.
const URL_PREFIX: &str = "https";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read the manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("record {0} has no title line")]
    MissingTitle(usize),

    #[error("record {0} has no URL line")]
    MissingUrl(usize),
}

// One title + URL pair. Either half may be missing in a sloppy manifest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    pub index: usize,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl Record {
    pub fn title(&self) -> Result<&str, ManifestError> {
        self.title
            .as_deref()
            .ok_or(ManifestError::MissingTitle(self.index))
    }

    pub fn url(&self) -> Result<&str, ManifestError> {
        self.url.as_deref().ok_or(ManifestError::MissingUrl(self.index))
    }
}

// Records keyed by their position in the manifest.
pub type Manifest = BTreeMap<usize, Record>;

pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_manifest(&raw))
}

// Splits the manifest into records.
//
// A URL line closes the current record; a title line sets the title of
// the record that the next URL line will close. Blank lines and lines
// starting with `#` are ignored.
pub fn parse_manifest(raw: &str) -> Manifest {
    let mut records = Manifest::new();
    let mut count = 0;

    for line in raw.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record = records.entry(count).or_insert_with(|| Record {
            index: count,
            ..Record::default()
        });

        if line.starts_with(URL_PREFIX) {
            record.url = Some(line.to_string());
            count += 1;
        } else {
            record.title = Some(line.to_string());
        }
    }

    records
}
