//! Quote-aware field splitting for the delimited reference files.

/// Splits one line on `delimiter`, treating double-quoted sections as
/// opaque: a delimiter between quotes does not end the field. Quote
/// characters stay part of the field text, matching the source files.
pub(crate) fn split_quoted(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    fields
}
