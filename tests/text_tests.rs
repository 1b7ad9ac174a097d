// Property tests for the text helpers
// Author: kelexine (https://github.com/kelexine)

use hinglish_bridge::utils::text::{
    parse_translated_content, problem_id, sanitize_text, MAX_SANITIZED_CHARS,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn sanitized_text_is_bounded(input in "\\PC{0,4000}") {
        let out = sanitize_text(&input);
        prop_assert!(out.chars().count() <= MAX_SANITIZED_CHARS);
    }

    #[test]
    fn sanitized_text_has_single_spaces(input in "[a-z \\t\\n]{0,500}") {
        let out = sanitize_text(&input);
        prop_assert!(!out.contains("  "));
        prop_assert!(!out.contains('\n'));
        prop_assert!(!out.contains('\t'));
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
    }

    #[test]
    fn slug_wins_over_title(slug in "[a-z0-9]+(-[a-z0-9]+){0,4}", title in ".{0,40}") {
        let url = format!("https://leetcode.com/problems/{}/description/", slug);
        prop_assert_eq!(problem_id(&url, Some(&title)), slug);
    }

    #[test]
    fn slug_without_trailing_slash(slug in "[a-z0-9]+(-[a-z0-9]+){0,4}") {
        let path = format!("/problems/{}", slug);
        prop_assert_eq!(problem_id(&path, None), slug);
    }

    #[test]
    fn plain_output_is_only_trimmed(body in "[a-zA-Z<>/ ]{1,200}") {
        prop_assert_eq!(parse_translated_content(&body), body.trim());
    }
}

#[test]
fn test_title_fallback() {
    assert_eq!(problem_id("/", Some("Two Sum - LeetCode")), "Two Sum");
    assert_eq!(problem_id("/explore/", Some("   ")), "unknown");
}
