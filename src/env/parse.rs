use tracing::warn;

use super::types::EnvironmentConfig;

/// Parse `.env` text into an ordered mapping.
///
/// Blank lines and `#` comments are skipped. Each remaining line is split on
/// the first `=`; key and value are trimmed and one matching pair of enclosing
/// `'` or `"` is removed from the value. A leading `export` keyword and a
/// UTF-8 byte-order mark are accepted.
/// Malformed lines are skipped with a warning that names the line number only.
pub fn parse_env(text: &str) -> EnvironmentConfig {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut env = EnvironmentConfig::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = strip_export(line);

        let Some((key, value)) = line.split_once('=') else {
            warn!(line = idx + 1, "skipping environment line without `=`");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            warn!(line = idx + 1, "skipping environment line with empty key");
            continue;
        }

        env.insert(key, strip_quotes(value.trim()));
    }

    env
}

/// Drop an `export` keyword followed by any ASCII whitespace.
fn strip_export(line: &str) -> &str {
    match line.strip_prefix("export") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_whitespace()) => rest.trim_start(),
        _ => line,
    }
}

/// Remove one matching pair of enclosing quotes, if present.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quoted_value_is_unwrapped() {
        let env = parse_env("PGHOST=\"localhost\"\n");
        assert_eq!(env.get("PGHOST"), Some("localhost"));
    }

    #[test]
    fn unquoted_value_is_kept() {
        let env = parse_env("PGPORT=5432");
        assert_eq!(env.get("PGPORT"), Some("5432"));
    }

    #[test]
    fn commented_assignment_is_ignored() {
        let env = parse_env("# PGUSER=ignored\n");
        assert!(env.is_empty());
    }

    #[test]
    fn blank_and_comment_lines_contribute_nothing() {
        let env = parse_env("\n   \n# header\n\t# indented comment\nPGUSER=postgres\n\n");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("PGUSER"), Some("postgres"));
    }

    #[test]
    fn single_quotes_are_stripped_once() {
        let env = parse_env("PGPASSWORD='\"s3cret\"'");
        assert_eq!(env.get("PGPASSWORD"), Some("\"s3cret\""));
    }

    #[test]
    fn mismatched_quotes_are_left_alone() {
        let env = parse_env("A=\"half'\nB=\"\nC='");
        assert_eq!(env.get("A"), Some("\"half'"));
        assert_eq!(env.get("B"), Some("\""));
        assert_eq!(env.get("C"), Some("'"));
    }

    #[test]
    fn splits_on_first_equals_only() {
        let env = parse_env("PGPASSWORD=a=b==c");
        assert_eq!(env.get("PGPASSWORD"), Some("a=b==c"));
    }

    #[test]
    fn whitespace_around_key_and_value_is_trimmed() {
        let env = parse_env("  PGDATABASE   =   datasus   ");
        assert_eq!(env.get("PGDATABASE"), Some("datasus"));
    }

    #[test]
    fn whitespace_inside_quotes_survives() {
        let env = parse_env("GREETING=\"  hi  \"");
        assert_eq!(env.get("GREETING"), Some("  hi  "));
    }

    #[test]
    fn export_prefix_is_dropped() {
        let env = parse_env("export PGUSER=postgres");
        assert_eq!(env.get("PGUSER"), Some("postgres"));
    }

    #[test]
    fn export_followed_by_tab_is_dropped() {
        let env = parse_env("export\tPGUSER=postgres\nexport   PGPORT=5432");
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["PGUSER", "PGPORT"]);
    }

    #[test]
    fn export_as_a_key_prefix_is_kept() {
        let env = parse_env("exported=1\nexport=2");
        assert_eq!(env.get("exported"), Some("1"));
        assert_eq!(env.get("export"), Some("2"));
    }

    #[test]
    fn bom_prefixed_file_keeps_first_key() {
        let env = parse_env("\u{FEFF}PGUSER=postgres\nPGPORT=5432\n");
        assert_eq!(env.get("PGUSER"), Some("postgres"));
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["PGUSER", "PGPORT"]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let env = parse_env("NOEQUALS\n=value\nPGPORT=5432");
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["PGPORT"]);
    }

    #[test]
    fn empty_value_is_an_entry() {
        let env = parse_env("PGPASSWORD=");
        assert_eq!(env.get("PGPASSWORD"), Some(""));
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let env = parse_env("PGUSER=postgres\r\nPGPORT=\"5432\"\r\n");
        assert_eq!(env.get("PGUSER"), Some("postgres"));
        assert_eq!(env.get("PGPORT"), Some("5432"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "# db\nPGUSER=postgres\nPGHOST=\"localhost\"\nPGPORT=5432\n";
        assert_eq!(parse_env(text), parse_env(text));
    }

    #[test]
    fn order_follows_the_file() {
        let env = parse_env("PGPORT=1\nPGUSER=2\nPGHOST=3");
        assert_eq!(
            env.keys().collect::<Vec<_>>(),
            vec!["PGPORT", "PGUSER", "PGHOST"]
        );
    }
}
