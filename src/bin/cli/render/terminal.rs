use flashdeck_lib::flashcards::render::CLOZE_BLANK;
use flashdeck_lib::flashcards::PracticeCard;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Make the blanks of a cloze prompt stand out
pub fn highlight_blanks(prompt: &str, use_color: bool) -> String {
    if !use_color {
        return prompt.to_string();
    }
    prompt.replace(CLOZE_BLANK, &paint(CLOZE_BLANK, Color::YELLOW, true))
}

/// One-line header: deck, card type and unit
pub fn render_header(card: &PracticeCard, use_color: bool) -> String {
    let deck = card.deck_name.as_deref().unwrap_or("(unknown deck)");
    let header = format!("{} · {} #{}", deck, card.card_type, card.card_index);
    paint(&header, Color::DIM, use_color)
}

/// The question side
pub fn render_prompt(card: &PracticeCard, use_color: bool) -> String {
    paint(&highlight_blanks(&card.prompt, use_color), Color::BOLD, use_color)
}

/// The revealed side: answer, full text when it adds anything, then extra and notes
pub fn render_answer(card: &PracticeCard, use_color: bool) -> String {
    let mut lines = vec![paint(&card.answer, Color::GREEN, use_color)];

    if card.full_content != card.answer {
        lines.push(card.full_content.clone());
    }
    if let Some(extra) = &card.extra {
        lines.push(paint(extra, Color::CYAN, use_color));
    }
    if let Some(notes) = &card.notes {
        lines.push(paint(&format!("Notes: {}", notes), Color::DIM, use_color));
    }

    lines.join("\n")
}
