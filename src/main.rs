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
// - main.rs file -

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::PathBuf};

mod config;
mod definitions;
mod download;
mod fetch;
mod ffmpeg;
mod logging;
mod manifest;
mod normalize;
mod rename;
mod title;

#[derive(Parser)]
#[clap(version, about = "Downloads a hand-titled list of videos and names them properly", long_about = None)]
struct Args {
    #[clap(long, help = "Reads the settings from this file instead of the default one")]
    config: Option<PathBuf>,

    #[clap(long, help = "The list of titles and URLs to download")]
    manifest: Option<PathBuf>,

    #[clap(long = "save-dir", help = "Where the finished files go")]
    savedir: Option<PathBuf>,

    #[clap(long = "temp-dir", help = "Scratch directory for raw downloads")]
    tempdir: Option<PathBuf>,

    #[clap(long, help = "yt-dlp's download archive")]
    archive: Option<PathBuf>,

    #[clap(
        long = "skip-normalize",
        help = "Leaves the downloaded files in whatever container they came in"
    )]
    skipnormalize: bool,

    #[clap(long, short = 'v', help = "Talks more while the list is processed")]
    verbose: bool,
}

fn main() -> Result<()> {
    // Argument parsing:
    let args = Args::parse();
    logging::init(args.verbose);

    let config_path = match args.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let mut settings = config::load_or_init(&config_path)?;

    // The command line beats the config file.
    if let Some(manifest) = args.manifest {
        settings.manifest = manifest;
    }
    if let Some(savedir) = args.savedir {
        settings.save_dir = savedir;
    }
    if let Some(tempdir) = args.tempdir {
        settings.temp_dir = tempdir;
    }
    if let Some(archive) = args.archive {
        settings.archive = archive;
    }

    fs::create_dir_all(&settings.save_dir)
        .with_context(|| format!("could not create {}", settings.save_dir.display()))?;

    let records = manifest::read_manifest(&settings.manifest)?;
    tracing::info!(
        "{} records in {}",
        records.len(),
        settings.manifest.display()
    );

    let ytdlp = download::YtDlp {
        binary: settings.ytdlp_binary.clone(),
        temp_dir: settings.temp_dir.clone(),
        archive: settings.archive.clone(),
    };
    let report = fetch::fetch_all(&records, &settings.name_prefix, &settings.save_dir, &ytdlp)?;

    let mut conversions = Vec::new();
    if !args.skipnormalize {
        let ffmpeg = ffmpeg::Ffmpeg {
            binary: settings.ffmpeg_binary.clone(),
        };
        conversions =
            normalize::normalize_dir(&settings.save_dir, &settings.target_extension, &ffmpeg)?;
    }
    let converted = conversions.iter().filter(|c| c.removed_original).count();

    // Success!
    println!(
        "{} of {} videos downloaded, {} failed, {} converted.",
        report.saved.len(),
        report.attempted,
        report.failed.len(),
        converted
    );
    for (title, url) in &report.failed {
        println!("  failed: {} ({})", title, url);
    }
    for conversion in conversions.iter().filter(|c| !c.removed_original) {
        println!(
            "  not converted: {} (no {})",
            conversion.from.display(),
            conversion.to.display()
        );
    }

    Ok(())
}
