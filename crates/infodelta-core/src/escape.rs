//! Value cleaning shared by baseline records and statements.
//!
//! `|` joins the old and new halves of a changed value and `\n` would break
//! the line-oriented CSV output, so both are dropped from every value.
//! Double quotes are doubled here, once; the CSV writer emits record text
//! verbatim inside quotes.

pub fn strip_delimiters(value: &str) -> String {
    value.chars().filter(|c| *c != '|' && *c != '\n').collect()
}

pub fn escape_quotes(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Strip delimiters, then escape quotes.
pub fn clean_value(value: &str) -> String {
    escape_quotes(&strip_delimiters(value))
}
