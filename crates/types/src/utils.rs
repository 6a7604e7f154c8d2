//! Utility functions and helpers

/// Split a comma-separated scalar into trimmed, non-empty pieces
pub fn split_list(source: &str) -> Vec<&str> {
    source
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Case-insensitive `true`; anything else is `false`
pub fn parse_bool(source: &str) -> bool {
    source.eq_ignore_ascii_case("true")
}

/// Split a `--key[=value]` token body at the first `=`
pub fn split_assignment(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (body, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list("abc,def,ghi"), vec!["abc", "def", "ghi"]);
        assert_eq!(split_list(" a , ,b,, c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_split_assignment_first_equals() {
        assert_eq!(split_assignment("key=a=b"), ("key", Some("a=b")));
        assert_eq!(split_assignment("key="), ("key", Some("")));
        assert_eq!(split_assignment("flag"), ("flag", None));
    }
}
