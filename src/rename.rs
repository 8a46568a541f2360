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
// - rename.rs file -

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::definitions::{CompletedDownload, PostProcessor};

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("no file name is known for {0}")]
    UnknownUrl(String),

    #[error("could not move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

// Moves every finished download into the save directory, named after the
// manifest title of the URL it was requested for.
pub struct MoveAndRename<'a> {
    save_dir: &'a Path,
    names: &'a HashMap<String, String>,
}

impl<'a> MoveAndRename<'a> {
    pub fn new(save_dir: &'a Path, names: &'a HashMap<String, String>) -> Self {
        MoveAndRename { save_dir, names }
    }

    // Where <info> ends up: the looked-up name plus the tool's extension.
    pub fn destination(&self, info: &CompletedDownload) -> Result<PathBuf, RenameError> {
        let base = self
            .names
            .get(&info.webpage_url)
            .ok_or_else(|| RenameError::UnknownUrl(info.webpage_url.clone()))?;

        let extension = info
            .filepath
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        Ok(self.save_dir.join(format!("{}{}", base, extension)))
    }
}

impl PostProcessor for MoveAndRename<'_> {
    fn run(&mut self, info: &CompletedDownload) -> Result<PathBuf, RenameError> {
        let target = self.destination(info)?;

        move_file(&info.filepath, &target).map_err(|source| RenameError::Move {
            from: info.filepath.clone(),
            to: target.clone(),
            source,
        })?;

        tracing::debug!("moved {} -> {}", info.filepath.display(), target.display());
        Ok(target)
    }
}

// rename(2) does not cross file systems (the scratch directory is usually
// on tmpfs), so fall back to copying. Existing targets are overwritten.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to)?;
    fs::remove_file(from)
}
