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
// - config.rs file -

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// Settings loaded from `~/.config/celebdl/config.toml`.
//
// Every key is optional; missing ones take the defaults below. Relative
// paths are resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // The list of titles and URLs.
    pub manifest: PathBuf,
    // Scratch directory for raw downloads. tmpfs is a good place.
    pub temp_dir: PathBuf,
    // Where the renamed files end up.
    pub save_dir: PathBuf,
    // yt-dlp's download archive; URLs listed there are skipped.
    pub archive: PathBuf,
    // Put in front of every file name.
    pub name_prefix: String,
    // Container everything is converted to (without the dot).
    pub target_extension: String,
    pub ytdlp_binary: String,
    pub ffmpeg_binary: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("urls.txt"),
            temp_dir: PathBuf::from("/dev/shm/ytdlp-temp"),
            save_dir: PathBuf::from("celeb"),
            archive: PathBuf::from("ytdl_archive.txt"),
            name_prefix: "Celebrity Jeopardy! - ".to_string(),
            target_extension: "mp4".to_string(),
            ytdlp_binary: "yt-dlp".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("celebdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

// Load the settings from `path`, writing the defaults there first if the
// file does not exist yet.
pub fn load_or_init(path: &Path) -> Result<Settings> {
    if !path.exists() {
        let defaults = Settings::default();
        let toml = toml::to_string_pretty(&defaults)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("could not write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(defaults);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(settings)
}
