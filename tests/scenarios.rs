//! End-to-end flows through the public engine API

use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

use flashdeck_lib::flashcards::algorithm::schedule;
use flashdeck_lib::flashcards::cloze::{distinct_indices, parse_cloze};
use flashdeck_lib::flashcards::practice::{materialize, materialize_all, materialize_batch};
use flashdeck_lib::flashcards::render::{render_cloze, CLOZE_BLANK};
use flashdeck_lib::flashcards::review::build_review_record;
use flashdeck_lib::flashcards::{
    CardContent, CardStore, DueRow, Flashcard, FlashcardError, FlashcardStorage, Quality,
};

fn cloze_card(text: &str) -> Flashcard {
    Flashcard::new(
        Uuid::new_v4(),
        CardContent::Cloze {
            cloze_text: text.to_string(),
        },
    )
}

#[test]
fn two_group_sentence() {
    let text = "El {{c1::perro}} corre en el {{c2::parque}}.";
    let matches = parse_cloze(text);
    assert_eq!(matches.len(), 2);
    assert_eq!(distinct_indices(&matches), vec![1, 2]);

    let card = cloze_card(text);
    let first = materialize(&card, 0).unwrap();
    let second = materialize(&card, 1).unwrap();

    assert_eq!(first.prompt, "El [...] corre en el parque.");
    assert_eq!(first.answer, "perro");
    assert_eq!(second.prompt, "El perro corre en el [...].");
    assert_eq!(second.answer, "parque");
    assert_eq!(first.full_content, "El perro corre en el parque.");
    assert_eq!(second.full_content, first.full_content);
}

#[test]
fn repeated_group_is_one_unit() {
    let card = cloze_card("{{c1::Hola}}, {{c1::hola}}!");
    let units = materialize_all(&card);

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].prompt, "[...], [...]!");
    assert_eq!(units[0].prompt.matches(CLOZE_BLANK).count(), 2);
}

#[test]
fn reversed_card_yields_two_units() {
    let card = Flashcard::new(
        Uuid::new_v4(),
        CardContent::BasicReversed {
            front: "perro".to_string(),
            back: "dog".to_string(),
        },
    );
    let units = materialize_all(&card);

    assert_eq!(units.len(), 2);
    assert_eq!((units[0].prompt.as_str(), units[0].answer.as_str()), ("perro", "dog"));
    assert_eq!((units[1].prompt.as_str(), units[1].answer.as_str()), ("dog", "perro"));
}

#[test]
fn scheduling_depends_only_on_quality() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let again_first = schedule(Quality::Again, today);
    let easy_after_again = schedule(Quality::Easy, today);
    let easy_first = schedule(Quality::Easy, today);
    let again_after_easy = schedule(Quality::Again, today);

    assert_eq!(again_first, again_after_easy);
    assert_eq!(easy_after_again, easy_first);
    assert!(again_first.interval_days <= easy_first.interval_days);
}

#[test]
fn out_of_range_unit_is_skipped() {
    let card = cloze_card("El {{c1::perro}} corre en el {{c2::parque}}.");
    assert!(materialize(&card, 5).is_none());
    assert!(materialize_batch(&[DueRow::from_card(&card, 5, None)])
        .unwrap()
        .is_empty());
}

#[test]
fn unit_count_matches_distinct_groups() {
    for text in [
        "",
        "sin huecos",
        "{{c1::a}}",
        "{{c2::a}} {{c2::b}} {{c5::c}}",
        "{{c1::a}} {{c0::b}} {{c3::c}} {{c2::d",
    ] {
        let card = cloze_card(text);
        assert_eq!(card.unit_count(), distinct_indices(&parse_cloze(text)).len());
        assert_eq!(materialize_all(&card).len(), card.unit_count());
        assert!(materialize(&card, card.unit_count()).is_none());
    }
}

#[test]
fn revealed_text_is_stable() {
    let text = "{{c2::Buenos}} {{c1::días}}, {{c3::señor}}.";
    let revealed = render_cloze(text, &[], false);
    assert_eq!(revealed, "Buenos días, señor.");
    assert_eq!(render_cloze(&revealed, &[], false), revealed);
}

#[test]
fn corrupt_row_is_reported() {
    let card = cloze_card("{{c1::uno}}");
    let mut row = DueRow::from_card(&card, 0, None);
    row.card_type = "audio".to_string();

    assert_eq!(
        materialize_batch(&[row]),
        Err(FlashcardError::InvalidCardType("audio".to_string()))
    );
}

#[test]
fn review_session_against_file_store() {
    let temp = TempDir::new().unwrap();
    let storage = FlashcardStorage::new(temp.path().to_path_buf());
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    let deck = storage
        .create_deck("ana", "Español".to_string(), None)
        .unwrap();
    let card = storage
        .create_card(
            deck.id,
            CardContent::Cloze {
                cloze_text: "El {{c1::perro}} corre en el {{c2::parque}}.".to_string(),
            },
            Some("The dog runs in the park.".to_string()),
            None,
        )
        .unwrap();

    let due = materialize_batch(&storage.due_rows("ana", None, today).unwrap()).unwrap();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].deck_name.as_deref(), Some("Español"));
    assert_eq!(due[0].extra.as_deref(), Some("The dog runs in the park."));

    let record = build_review_record(card.id, due[0].card_index, "ana", Quality::Easy, today);
    storage.append_review(&record).unwrap();

    let due = materialize_batch(&storage.due_rows("ana", None, today).unwrap()).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].answer, "parque");
}
