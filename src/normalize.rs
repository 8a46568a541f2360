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
// - normalize.rs file -

use anyhow::{bail, Context, Result};
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use crate::definitions::Transcoder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub from: PathBuf,
    pub to: PathBuf,
    // false if the transcoder returned but left no output behind.
    pub removed_original: bool,
}

// Converts every file directly inside `save_dir` whose extension is not
// exactly `target_ext` into a sibling with that extension.
//
// The original is deleted once the sibling exists. A failed conversion, or
// a sibling that is already there, ends the pass right there; later files
// are left alone.
pub fn normalize_dir(
    save_dir: &Path,
    target_ext: &str,
    transcoder: &dyn Transcoder,
) -> Result<Vec<Conversion>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(save_dir)
        .with_context(|| format!("could not list {}", save_dir.display()))?
    {
        // Follows symlinks, so a linked video is converted like any other.
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut conversions = Vec::new();
    for from in files {
        if from.extension() == Some(OsStr::new(target_ext)) {
            continue;
        }

        let to = from.with_extension(target_ext);
        if to.exists() {
            // Two sources with the same stem, or a leftover from an earlier run.
            bail!(
                "not converting {}: {} already exists",
                from.display(),
                to.display()
            );
        }
        tracing::info!("converting: {} -> {}", from.display(), to.display());

        transcoder
            .convert(&from, &to)
            .with_context(|| format!("could not convert {}", from.display()))?;

        // Only get rid of the evidence if there is something to replace it.
        let removed_original = to.exists();
        if removed_original {
            fs::remove_file(&from)
                .with_context(|| format!("could not remove {}", from.display()))?;
        } else {
            tracing::warn!(
                "{} produced no {}, keeping the original",
                from.display(),
                to.display()
            );
        }

        conversions.push(Conversion {
            from,
            to,
            removed_original,
        });
    }

    Ok(conversions)
}
