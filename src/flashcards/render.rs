//! Cloze rendering: turning authored text back into prompt or answer views

use super::cloze::{parse_cloze, ClozeMatch};

/// Placeholder shown in place of a hidden deletion
pub const CLOZE_BLANK: &str = "[...]";

/// Re-serialize `text` with its deletions masked or revealed.
///
/// With masking disabled every deletion shows its word (the full-content
/// view). With masking enabled, deletions whose group is in `mask_indices`
/// become [`CLOZE_BLANK`] and every other deletion shows its word, so the
/// remaining groups act as context rather than extra puzzles.
pub fn render_cloze(text: &str, mask_indices: &[u32], masking_enabled: bool) -> String {
    let matches = parse_cloze(text);
    let mask: &[u32] = if masking_enabled { mask_indices } else { &[] };
    render_matches(text, &matches, mask)
}

/// Render from an already parsed match list.
///
/// `matches` must come from `parse_cloze(text)`.
pub(crate) fn render_matches(text: &str, matches: &[ClozeMatch], mask: &[u32]) -> String {
    let mut rendered = String::with_capacity(text.len());
    let mut cursor = 0;

    for m in matches {
        rendered.push_str(&text[cursor..m.byte_span.start]);
        if mask.contains(&m.index) {
            rendered.push_str(CLOZE_BLANK);
        } else {
            rendered.push_str(&m.word);
        }
        cursor = m.byte_span.end;
    }
    rendered.push_str(&text[cursor..]);

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "El {{c1::perro}} corre en el {{c2::parque}}.";

    #[test]
    fn test_full_reveal() {
        assert_eq!(render_cloze(SENTENCE, &[], false), "El perro corre en el parque.");
        // Mask list is ignored when masking is off
        assert_eq!(render_cloze(SENTENCE, &[1, 2], false), "El perro corre en el parque.");
    }

    #[test]
    fn test_mask_single_group() {
        assert_eq!(render_cloze(SENTENCE, &[1], true), "El [...] corre en el parque.");
        assert_eq!(render_cloze(SENTENCE, &[2], true), "El perro corre en el [...].");
    }

    #[test]
    fn test_empty_mask_equals_full_reveal() {
        assert_eq!(render_cloze(SENTENCE, &[], true), render_cloze(SENTENCE, &[], false));
    }

    #[test]
    fn test_repeated_group_masks_every_occurrence() {
        let rendered = render_cloze("{{c1::Hola}}, {{c1::hola}}!", &[1], true);
        assert_eq!(rendered, "[...], [...]!");
    }

    #[test]
    fn test_literal_text_passes_through() {
        let text = "  {{c1:: a }}\t{{c0::zero}} {{c2::b}\n";
        assert_eq!(render_cloze(text, &[1], true), "  [...]\t{{c0::zero}} {{c2::b}\n");
        assert_eq!(render_cloze(text, &[], false), "   a \t{{c0::zero}} {{c2::b}\n");
    }

    #[test]
    fn test_full_reveal_is_fixed_point() {
        for text in [
            SENTENCE,
            "{{c1::Hola}}, {{c1::hola}}!",
            "no deletions here",
            "",
            "{{c3::tres}} {{c1::uno}} y {{c2::dos}}",
        ] {
            let revealed = render_cloze(text, &[], false);
            assert_eq!(render_cloze(&revealed, &[], false), revealed);
        }
    }

    #[test]
    fn test_mask_exclusivity() {
        let text = "{{c1::a}} {{c2::b}} {{c1::c}} {{c3::d}}";
        let rendered = render_cloze(text, &[1], true);
        assert_eq!(rendered.matches(CLOZE_BLANK).count(), 2);
        assert_eq!(rendered, "[...] b [...] d");
    }
}
