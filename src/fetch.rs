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
// - fetch.rs file -

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::definitions::{CompletedDownload, FetchError, PostProcessor, Retriever};
use crate::manifest::Manifest;
use crate::rename::{MoveAndRename, RenameError};
use crate::title;

#[derive(Debug, Default)]
pub struct FetchReport {
    pub attempted: usize,
    // Files that made it into the save directory during this run.
    pub saved: Vec<PathBuf>,
    // (final name, URL) of every download that failed.
    pub failed: Vec<(String, String)>,
}

// Remembers where the hook put things.
struct Recording<'a> {
    inner: MoveAndRename<'a>,
    saved: &'a mut Vec<PathBuf>,
}

impl PostProcessor for Recording<'_> {
    fn run(&mut self, info: &CompletedDownload) -> Result<PathBuf, RenameError> {
        let target = self.inner.run(info)?;
        self.saved.push(target.clone());
        Ok(target)
    }
}

// Downloads every record of `manifest` in order and moves the results into
// `save_dir`.
//
// A failed download is logged and skipped. Everything else (a record
// without title or URL, a title without label, a file the hook cannot
// place, a missing retrieval tool) ends the run.
pub fn fetch_all(
    manifest: &Manifest,
    prefix: &str,
    save_dir: &Path,
    retriever: &dyn Retriever,
) -> Result<FetchReport> {
    let mut report = FetchReport::default();
    // URL -> final file name, read by the hook. Later duplicates win.
    let mut names: HashMap<String, String> = HashMap::new();

    let pb = ProgressBar::new(manifest.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len}",
        )?
        .progress_chars("#>-"),
    );

    for record in manifest.values() {
        let title = title::final_name(prefix, record.title()?)
            .with_context(|| format!("record {} has an unusable title", record.index))?;
        let url = record.url()?;

        names.insert(url.to_string(), title.clone());
        report.attempted += 1;
        pb.suspend(|| tracing::debug!("fetching {} as \"{}\"", url, title));

        let mut hook = Recording {
            inner: MoveAndRename::new(save_dir, &names),
            saved: &mut report.saved,
        };

        match retriever.download(url, &mut hook) {
            Ok(()) => {}
            Err(e @ FetchError::Download { .. }) => {
                pb.suspend(|| {
                    tracing::warn!("error downloading: {} {}", title, url);
                    tracing::debug!("{}", e);
                });
                report.failed.push((title, url.to_string()));
            }
            Err(e) => {
                pb.abandon();
                return Err(e).with_context(|| format!("while fetching {}", url));
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(report)
}
