//! Infobox type names and the file names derived from them.

use regex::Regex;
use std::sync::OnceLock;

fn space_runs() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(" +").ok()).as_ref()
}

/// Canonical infobox type used for routing and configuration keys.
///
/// `"Template:Infobox_Actor"` and `"infobox  actor"` both become
/// `"infobox actor"`.
pub fn canonical_infobox_type(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let collapsed = match space_runs() {
        Some(re) => re.replace_all(&lower, " ").into_owned(),
        None => lower,
    };
    collapsed.replace("infobox_", "infobox ").replace("template:", "")
}

/// Infobox type as counted by the statistics pass: first line, lowercased.
pub fn statistics_infobox_type(raw: &str) -> String {
    raw.split('\n').next().unwrap_or_default().to_lowercase()
}

const MAX_FILE_NAME_CHARS: usize = 200;

/// File name of an infobox type's bucket.
pub fn bucket_file_name(infobox_type: &str) -> String {
    let mut name = String::with_capacity(infobox_type.len());
    for c in infobox_type.chars() {
        match c {
            '/' | ':' | '\\' | '<' | '>' | '|' | '?' | '*' | '.' | '\'' | ',' | '\n' | '\t' => {}
            'Ö' => name.push_str("Oe"),
            'Ä' => name.push_str("Ae"),
            'Ü' => name.push_str("Ue"),
            'ö' => name.push_str("oe"),
            'ä' => name.push_str("ae"),
            'ü' => name.push_str("ue"),
            _ => name.push(c),
        }
    }
    name.chars().take(MAX_FILE_NAME_CHARS).collect()
}

/// Stem for the CSV outputs: spaces become underscores.
pub fn output_stem(infobox_type: &str) -> String {
    infobox_type.replace(' ', "_")
}
