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
// - title.rs file -

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

// Separates the label ("1/2/23", "Special", ...) from the actual title.
const LABEL_SEPARATOR: &str = ": ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("\"{0}\" has no \": \" between label and title")]
    MissingSeparator(String),
}

fn date_regex() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| {
        Regex::new(r"\A[0-9]{1,2}/[0-9]{1,2}/[0-9]{1,2}").expect("date pattern is valid")
    })
}

// Finds a leading mm/dd/yy date and returns it as mm-dd-yy, or "" without one.
// Whether the numbers make up a real date is not checked.
pub fn extract_date_from_title(title: &str) -> String {
    match date_regex().find(title) {
        Some(m) => m.as_str().replace('/', "-"),
        None => "".to_string(),
    }
}

// Returns the part after the label, up to the next separator if there is one.
pub fn extract_just_the_title(x: &str) -> Result<String, TitleError> {
    x.split(LABEL_SEPARATOR)
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| TitleError::MissingSeparator(x.to_string()))
}

// Builds the file base name for a manifest title line.
//
// The date is read from the raw title and appended in parentheses before
// the label is cut off, so `"1/2/23: Weekly Episode"` becomes
// `"<prefix>Weekly Episode (1-2-23)"`. Titles without a date still get
// the (empty) parentheses.
pub fn final_name(prefix: &str, title: &str) -> Result<String, TitleError> {
    let date = extract_date_from_title(title);
    let bare = extract_just_the_title(&format!("{} ({})", title, date))?;
    Ok(format!("{}{}", prefix, bare))
}
