//! Delimited cell splitting and delimiter escapes

use std::borrow::Cow;

/// Splits a logical record into raw cells.
///
/// A delimiter directly preceded by a backslash is part of the cell and the
/// escape is kept in the cell text; [`unescape_delimiters`] removes it later.
/// A record ending in the delimiter yields a trailing empty sentinel cell, so
/// the cell count is always the number of unescaped delimiters plus one.
///
/// # Examples
///
/// ```
/// use unl2csv::core::unl::split_cells;
///
/// let cells = split_cells("12|Jane\\|Doe|", '|');
/// assert_eq!(cells, vec!["12", "Jane\\|Doe", ""]);
/// ```
pub fn split_cells(line: &str, delimiter: char) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut previous = None;

    for (idx, ch) in line.char_indices() {
        if ch == delimiter && previous != Some('\\') {
            cells.push(&line[start..idx]);
            start = idx + ch.len_utf8();
        }
        previous = Some(ch);
    }
    cells.push(&line[start..]);

    cells
}

/// Removes the backslash in front of every escaped delimiter
pub fn unescape_delimiters(cell: &str, delimiter: char) -> Cow<'_, str> {
    let escaped = format!("\\{delimiter}");
    if cell.contains(&escaped) {
        Cow::Owned(cell.replace(&escaped, &delimiter.to_string()))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Puts a backslash in front of every delimiter; inverse of [`unescape_delimiters`]
/// for cells produced by [`split_cells`]
pub fn escape_delimiters(cell: &str, delimiter: char) -> Cow<'_, str> {
    if cell.contains(delimiter) {
        Cow::Owned(cell.replace(delimiter, &format!("\\{delimiter}")))
    } else {
        Cow::Borrowed(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1|a|", &["1", "a", ""] ; "trailing sentinel")]
    #[test_case("1||", &["1", "", ""] ; "empty cell")]
    #[test_case("", &[""] ; "empty record")]
    #[test_case("a\\|b|c|", &["a\\|b", "c", ""] ; "escaped delimiter kept")]
    #[test_case("a\nb|c|", &["a\nb", "c", ""] ; "embedded newline")]
    #[test_case("|", &["", ""] ; "lone delimiter")]
    #[test_case("Stra\u{df}e|M\u{fc}ller|", &["Stra\u{df}e", "M\u{fc}ller", ""] ; "non ascii")]
    fn test_split_cells(line: &str, expected: &[&str]) {
        assert_eq!(split_cells(line, '|'), expected);
    }

    #[test]
    fn test_split_other_delimiter() {
        assert_eq!(split_cells("a;b\\;c;", ';'), vec!["a", "b\\;c", ""]);
        assert_eq!(split_cells("a|b;", ';'), vec!["a|b", ""]);
    }

    #[test]
    fn test_cell_count_is_delimiters_plus_one() {
        let line = "1|x\\|y|2||";
        let unescaped_delimiters = 4;
        assert_eq!(split_cells(line, '|').len(), unescaped_delimiters + 1);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_delimiters("Jane\\|Doe", '|'), "Jane|Doe");
        assert_eq!(unescape_delimiters("plain", '|'), "plain");
        assert!(matches!(unescape_delimiters("plain", '|'), Cow::Borrowed(_)));
        assert_eq!(unescape_delimiters("C:\\dir", '|'), "C:\\dir");
    }

    #[test]
    fn test_escape_unescape_round_trip() {
        let line = "1|Jane\\|Doe|a\\\\|b|\\|\\||plain|";
        for cell in split_cells(line, '|') {
            let unescaped = unescape_delimiters(cell, '|');
            assert_eq!(escape_delimiters(&unescaped, '|'), cell);
        }
    }
}
