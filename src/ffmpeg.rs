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
// - ffmpeg.rs file -

use std::path::Path;
use std::process::Command;

use crate::definitions::{ToolError, Transcoder};

// It makes very little sense to link ffmpeg statically with celebdl.
// Just use the system's one (or inform the user if there isn't one).

pub struct Ffmpeg {
    pub binary: String,
}

impl Ffmpeg {
    pub fn command(&self, inputfile: &Path, outputfile: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        // No -y: an existing output makes ffmpeg fail instead of clobbering it.
        cmd.arg("-nostdin")
            .arg("-loglevel")
            .arg("fatal") // Only talk when it's over.
            .arg("-i")
            .arg(inputfile)
            .arg(outputfile);
        cmd
    }
}

impl Transcoder for Ffmpeg {
    fn convert(&self, inputfile: &Path, outputfile: &Path) -> Result<(), ToolError> {
        let output = self
            .command(inputfile, outputfile)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::NonZeroExit {
                program: self.binary.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
