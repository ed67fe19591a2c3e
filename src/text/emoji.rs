//! Emoji sequence classification.
//!
//! Two strictness levels are offered. The recognized level only accepts sequences
//! from the RGI ("Recommended for General Interchange") emoji set plus bare emoji
//! codepoints. The tolerant level accepts any run built purely from emoji-eligible
//! codepoints and emoji components, which keeps newer sequences (unknown to the
//! bundled emoji data) together as emoji text.

use unicode_properties::UnicodeEmoji;
use unicode_segmentation::UnicodeSegmentation;

/// Returns `true` if `text` consists entirely of emoji.
///
/// Empty input is never emoji text. See the module docs for the meaning of
/// `recognized_only`.
pub fn is_emoji_sequence(text: &str, recognized_only: bool) -> bool {
    if text.is_empty() {
        return false;
    }

    if recognized_only {
        text.graphemes(true).all(is_recognized_cluster)
    } else {
        text.chars().all(is_emoji_eligible)
    }
}

/// Codepoints allowed in tolerant mode: `Emoji=Yes` or `Emoji_Component=Yes`.
///
/// `is_emoji_component` alone misses components without the Emoji property
/// (ZWJ, VS16, the combining keycap, tag characters).
fn is_emoji_eligible(c: char) -> bool {
    c.is_emoji_char_or_emoji_component()
}

/// An RGI sequence, or a run of bare emoji codepoints with no selectors or joiners.
///
/// Segmentation glues modifiers and regional indicators onto their neighbours even
/// when the pair is not an RGI sequence (e.g. "🍅🏽", "🇦🇦"); those clusters still
/// qualify codepoint by codepoint.
fn is_recognized_cluster(cluster: &str) -> bool {
    emojis::get(cluster).is_some() || cluster.chars().all(|c| c.is_emoji_char())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("hello world")]
    #[case("a❤️")]
    #[case("❤️a")]
    #[case("")]
    fn test_not_emoji(#[case] text: &str) {
        check!(!is_emoji_sequence(text, false));
        check!(!is_emoji_sequence(text, true));
    }

    #[rstest]
    #[case::with_variation_selector("❤️")]
    #[case::without_variation_selector("❤")]
    #[case::skin_tone("👍🏽")]
    #[case::zwj_sequence("❤️\u{200D}🩹")]
    #[case::multiple("❤️👍🏽")]
    #[case::plain("💙")]
    fn test_emoji_in_both_modes(#[case] text: &str) {
        check!(is_emoji_sequence(text, false));
        check!(is_emoji_sequence(text, true));
    }

    #[rstest]
    #[case::keycap("#\u{FE0F}\u{20E3}")]
    #[case::tag_sequence("🏴\u{E0067}\u{E0062}\u{E0073}\u{E0063}\u{E0074}\u{E007F}")]
    #[case::family("👨\u{200D}👩\u{200D}👧")]
    #[case::newer_zwj_sequence("🐦\u{200D}🔥")]
    fn test_components_accepted_in_tolerant_mode(#[case] text: &str) {
        check!(is_emoji_sequence(text, false));
    }

    #[rstest]
    #[case::modifier_on_non_modifier_base("🍅🏽")]
    #[case::unpaired_regional_indicators("🇦🇦")]
    #[case::bare_codepoints("❤💙")]
    fn test_recognized_bare_codepoint_runs(#[case] text: &str) {
        check!(is_emoji_sequence(text, true));
    }

    #[test]
    fn test_unrecognized_combination() {
        let text = ["❤", "\u{FE0F}", "\u{200D}", "🍅"].concat();
        check!(is_emoji_sequence(&text, false));
        check!(!is_emoji_sequence(&text, true));
    }
}
