pub mod card;
pub mod cloze;
pub mod deck;
pub mod due;
pub mod review;
pub mod study;
