//! Review recording
//!
//! Packages a graded practice unit into the append-only record the card
//! store persists. Nothing here touches card state or due indices; the
//! store excludes reviewed units from its due query until the record's
//! `next_review_date`.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::algorithm::{schedule_with, IntervalTable};
use super::errors::Result;
use super::models::{Quality, ReviewRecord};

/// Build a review record using the default interval table
pub fn build_review_record(
    card_id: Uuid,
    card_index: usize,
    user_id: &str,
    quality: Quality,
    today: NaiveDate,
) -> ReviewRecord {
    build_review_record_with(&IntervalTable::default(), card_id, card_index, user_id, quality, today)
}

/// Build a review record from an explicit interval table
pub fn build_review_record_with(
    table: &IntervalTable,
    card_id: Uuid,
    card_index: usize,
    user_id: &str,
    quality: Quality,
    today: NaiveDate,
) -> ReviewRecord {
    let schedule = schedule_with(table, quality, today);

    ReviewRecord {
        id: Uuid::new_v4(),
        card_id,
        card_index,
        user_id: user_id.to_string(),
        quality,
        interval_days: schedule.interval_days,
        next_review_date: schedule.next_review_date,
        reviewed_at: Utc::now(),
    }
}

/// Validate a raw quality from the presentation layer, then build the record
pub fn record_review(
    table: &IntervalTable,
    card_id: Uuid,
    card_index: usize,
    user_id: &str,
    quality: i64,
    today: NaiveDate,
) -> Result<ReviewRecord> {
    let quality = Quality::try_from(quality)?;
    Ok(build_review_record_with(table, card_id, card_index, user_id, quality, today))
}
