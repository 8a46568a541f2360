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
// - definitions.rs file -

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rename::RenameError;

// What the retrieval tool tells us about a file it has finished.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletedDownload {
    // The URL that was requested (not the media URL).
    pub webpage_url: String,
    // Where the tool left the file.
    pub filepath: PathBuf,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("download of {url} failed (exit code {code:?})")]
    Download { url: String, code: Option<i32> },

    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("post-processing failed")]
    PostProcess(#[from] RenameError),

    #[error("could not read the output of the retrieval tool")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

// Called once per file the retrieval tool completes.
pub trait PostProcessor {
    // returns the final location of the file.
    fn run(&mut self, info: &CompletedDownload) -> Result<PathBuf, RenameError>;
}

// Define the public interface for retrieval tools:
pub trait Retriever {
    // downloads <url>, handing every completed file to <hook>.
    // Already archived URLs complete without calling <hook>.
    fn download(&self, url: &str, hook: &mut dyn PostProcessor) -> Result<(), FetchError>;
}

// Define the public interface for transcoders:
pub trait Transcoder {
    // converts <input> into <output>, the container following from the extension.
    fn convert(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}
