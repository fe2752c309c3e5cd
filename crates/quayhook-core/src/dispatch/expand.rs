use regex::Regex;

/// Expands `template` once per non-overlapping match of `pattern` in
/// `subject` and concatenates the results in match order.
///
/// Placeholders follow the regex crate's replacement syntax: `$1`, `${1}`,
/// `$name`, `${name}` and `$$`. Unknown groups expand to nothing. A template
/// without placeholders is repeated once per match, and zero matches yield an
/// empty result.
///
/// Empty matches advance one character at a time, never splitting a
/// multi-byte character.
pub fn expand(pattern: &Regex, subject: &str, template: &str) -> String {
    let mut out = String::new();
    for captures in pattern.captures_iter(subject) {
        captures.expand(template, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_single_group_single_match() {
        let out = expand(
            &re(r"^refs/tags/v(\d+)$"),
            "refs/tags/v12",
            "echo deploy-$1 && echo done",
        );
        assert_eq!(out, "echo deploy-12 && echo done");
    }

    #[test]
    fn test_braced_and_named_groups() {
        let pattern = re(r"^refs/heads/(?P<branch>[a-z]+)-(\d+)$");
        let out = expand(&pattern, "refs/heads/release-7", "${branch}:${2}/$branch");
        assert_eq!(out, "release:7/release");
    }

    #[test]
    fn test_whole_match_group_zero() {
        let out = expand(&re(r"v\d+"), "tag v3", "[$0]");
        assert_eq!(out, "[v3]");
    }

    #[test]
    fn test_multiple_matches_concatenate_in_order() {
        let out = expand(&re(r"(\d)"), "a1b2c3", "<$1>");
        assert_eq!(out, "<1><2><3>");
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(expand(&re(r"^refs/tags/"), "refs/heads/main", "deploy").is_empty());
    }

    #[test]
    fn test_static_template_repeats_per_match() {
        assert_eq!(expand(&re("o"), "foo", "x"), "xx");
        assert_eq!(expand(&re("^main$"), "main", "deploy"), "deploy");
    }

    #[test]
    fn test_unknown_group_expands_to_empty() {
        let out = expand(&re(r"^v(\d+)$"), "v9", "a${2}b${missing}c$1");
        assert_eq!(out, "abc9");
        // `$2b` names a group called "2b" and swallows the `b`.
        assert_eq!(expand(&re(r"^v(\d+)$"), "v9", "a$2b${missing}c$1"), "ac9");
    }

    #[test]
    fn test_adjacent_word_characters_extend_group_name() {
        // `$1x` names a group called "1x", which does not exist.
        let out = expand(&re(r"^v(\d+)$"), "v9", "$1x ${1}x");
        assert_eq!(out, " 9x");
    }

    #[test]
    fn test_empty_matches_step_over_whole_characters() {
        assert_eq!(expand(&re("x*"), "é", "[$0]"), "[][]");
        assert_eq!(expand(&re("x*"), "aé", "<$0>"), "<><><>");
        assert_eq!(expand(&re(r"(\d)|"), "ü1", "[$1]"), "[][1]");
    }

    #[test]
    fn test_non_ascii_captures_are_kept_intact() {
        let out = expand(&re(r"^refs/heads/(.+)$"), "refs/heads/café", "deploy $1");
        assert_eq!(out, "deploy café");
    }

    #[test]
    fn test_literal_dollar() {
        let out = expand(&re(r"^v(\d+)$"), "v4", "cost $$$1");
        assert_eq!(out, "cost $4");
    }
}
