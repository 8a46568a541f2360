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
// - download.rs file -

use std::{
    io::{BufRead, BufReader, Read},
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::definitions::{CompletedDownload, FetchError, PostProcessor, Retriever};

// Marks our own lines in yt-dlp's output.
const DONE_MARKER: &str = "CELEBDL_DONE|";

// Printed by yt-dlp after the file has reached its final place in the
// scratch directory, once per file.
const DONE_TEMPLATE: &str = "after_move:CELEBDL_DONE|%(.{webpage_url,filepath})j";

// Downloading is left to yt-dlp. It knows far more sites than we ever will.
pub struct YtDlp {
    pub binary: String,
    // Scratch directory for the raw downloads.
    pub temp_dir: PathBuf,
    // yt-dlp's own ledger of finished downloads.
    pub archive: PathBuf,
}

impl YtDlp {
    pub fn command(&self, url: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-P")
            .arg(format!("home:{}", self.temp_dir.display()))
            .arg("--download-archive")
            .arg(&self.archive)
            .arg("--no-simulate")
            .arg("--no-progress")
            .arg("--print")
            .arg(DONE_TEMPLATE)
            .arg(url);
        cmd
    }
}

// Picks our completion lines out of yt-dlp's standard output.
pub fn parse_done_line(line: &str) -> Option<CompletedDownload> {
    let json = line.trim_end().strip_prefix(DONE_MARKER)?;
    match serde_json::from_str(json) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::debug!("ignoring unreadable completion line {:?}: {}", line, e);
            None
        }
    }
}

// Hands every completion line on <stdout> to <hook>, as it arrives.
fn feed_hook(stdout: impl Read, hook: &mut dyn PostProcessor) -> Result<(), FetchError> {
    for line in BufReader::new(stdout).lines() {
        if let Some(info) = parse_done_line(&line?) {
            hook.run(&info)?;
        }
    }
    Ok(())
}

impl Retriever for YtDlp {
    fn download(&self, url: &str, hook: &mut dyn PostProcessor) -> Result<(), FetchError> {
        tracing::debug!("running {} for {}", self.binary, url);

        let mut child = self
            .command(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| FetchError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if let Some(stdout) = child.stdout.take() {
            if let Err(e) = feed_hook(stdout, hook) {
                // Don't leave yt-dlp running behind our back.
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(FetchError::Download {
                url: url.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::RenameError;
    use std::{ffi::OsStr, fs, path::Path};

    fn ytdlp() -> YtDlp {
        YtDlp {
            binary: "yt-dlp".to_string(),
            temp_dir: PathBuf::from("/dev/shm/ytdlp-temp"),
            archive: PathBuf::from("/srv/archive/ytdl_archive.txt"),
        }
    }

    #[test]
    fn command_uses_scratch_dir_and_archive() {
        let cmd = ytdlp().command("https://example.com/watch?v=1");
        let args: Vec<&OsStr> = cmd.get_args().collect();

        assert_eq!(cmd.get_program(), "yt-dlp");
        assert_eq!(args[0], "-P");
        assert_eq!(args[1], "home:/dev/shm/ytdlp-temp");
        assert_eq!(args[2], "--download-archive");
        assert_eq!(args[3], "/srv/archive/ytdl_archive.txt");
        assert!(args.contains(&OsStr::new(DONE_TEMPLATE)));
        assert_eq!(args.last().copied(), Some(OsStr::new("https://example.com/watch?v=1")));
    }

    #[test]
    fn done_lines_are_parsed() {
        let line = r#"CELEBDL_DONE|{"webpage_url": "https://example.com/a", "filepath": "/dev/shm/ytdlp-temp/A | B [a].webm"}"#;
        assert_eq!(
            parse_done_line(line),
            Some(CompletedDownload {
                webpage_url: "https://example.com/a".to_string(),
                filepath: PathBuf::from("/dev/shm/ytdlp-temp/A | B [a].webm"),
            })
        );
    }

    // Stands in for yt-dlp: a shell script at a fresh path.
    #[cfg(unix)]
    fn fake_ytdlp(dir: &Path, body: &str) -> YtDlp {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("yt-dlp");
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        YtDlp {
            binary: script.display().to_string(),
            temp_dir: dir.join("scratch"),
            archive: dir.join("archive.txt"),
        }
    }

    // Records what it was given and hands back a fixed error, if any.
    #[derive(Default)]
    struct RecordingHook {
        seen: Vec<CompletedDownload>,
        fail: bool,
    }

    impl PostProcessor for RecordingHook {
        fn run(&mut self, info: &CompletedDownload) -> Result<PathBuf, RenameError> {
            self.seen.push(info.clone());
            if self.fail {
                return Err(RenameError::UnknownUrl(info.webpage_url.clone()));
            }
            Ok(info.filepath.clone())
        }
    }

    #[cfg(unix)]
    #[test]
    fn completion_lines_reach_the_hook() {
        let dir = tempfile::tempdir().unwrap();
        let args = dir.path().join("args.txt");
        let ytdlp = fake_ytdlp(
            dir.path(),
            &format!(
                "echo \"$@\" > '{}'\n\
                 echo '[download] Destination: raw.webm'\n\
                 echo 'CELEBDL_DONE|{{\"webpage_url\": \"https://example.com/a\", \"filepath\": \"/tmp/raw.webm\"}}'\n\
                 exit 0",
                args.display()
            ),
        );
        let mut hook = RecordingHook::default();

        ytdlp.download("https://example.com/a", &mut hook).unwrap();

        assert_eq!(
            hook.seen,
            vec![CompletedDownload {
                webpage_url: "https://example.com/a".to_string(),
                filepath: PathBuf::from("/tmp/raw.webm"),
            }]
        );
        let passed = fs::read_to_string(&args).unwrap();
        assert!(passed.contains("--download-archive"));
        assert!(passed.trim_end().ends_with("https://example.com/a"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake_ytdlp(dir.path(), "echo 'ERROR: Video unavailable' >&2\nexit 1");
        let mut hook = RecordingHook::default();

        let result = ytdlp.download("https://example.com/gone", &mut hook);

        assert!(matches!(
            result,
            Err(FetchError::Download { url, code: Some(1) }) if url == "https://example.com/gone"
        ));
        assert!(hook.seen.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn hook_failure_stops_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake_ytdlp(
            dir.path(),
            "echo 'CELEBDL_DONE|{\"webpage_url\": \"https://example.com/moved\", \"filepath\": \"/tmp/raw.webm\"}'\n\
             exec sleep 30",
        );
        let mut hook = RecordingHook {
            fail: true,
            ..Default::default()
        };

        let result = ytdlp.download("https://example.com/a", &mut hook);

        assert!(matches!(
            result,
            Err(FetchError::PostProcess(RenameError::UnknownUrl(url))) if url == "https://example.com/moved"
        ));
        assert_eq!(hook.seen.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_output_stops_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake_ytdlp(dir.path(), "printf '\\377\\n'\nexec sleep 30");
        let mut hook = RecordingHook::default();

        let result = ytdlp.download("https://example.com/a", &mut hook);

        assert!(matches!(result, Err(FetchError::Io(_))));
        assert!(hook.seen.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn missing_tool_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = YtDlp {
            binary: dir.path().join("nope").display().to_string(),
            ..fake_ytdlp(dir.path(), "exit 0")
        };

        let result = ytdlp.download("https://example.com/a", &mut RecordingHook::default());
        assert!(matches!(result, Err(FetchError::Spawn { .. })));
    }

    #[test]
    fn other_lines_are_ignored() {
        assert_eq!(parse_done_line("[download] Destination: foo.webm"), None);
        assert_eq!(parse_done_line("CELEBDL_DONE|not json"), None);
        assert_eq!(parse_done_line(""), None);
    }
}
