use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use doctor_cell::models::{AvailabilityDay, DoctorProfileId, SlotStatus};
use doctor_cell::store::AvailabilityStore;
use shared_database::StoreError;

/// Outcome of one compare-and-swap round against an availability day.
enum Flip {
    Done(AvailabilityDay),
    Retry,
}

/// Flips the slot at `index` to `status` with a write conditional on `day.version`.
async fn flip_slot(
    store: &Arc<dyn AvailabilityStore>,
    mut day: AvailabilityDay,
    index: usize,
    status: SlotStatus,
) -> Result<Flip, StoreError> {
    let expected = day.version;
    day.slots[index].status = status;

    match store.save_day(day, Some(expected)).await {
        Ok(saved) => Ok(Flip::Done(saved)),
        Err(StoreError::VersionConflict) => Ok(Flip::Retry),
        Err(e) => Err(e),
    }
}

/// Books the open slot covering `[start, end)`. The whole slot is consumed.
///
/// Version conflicts re-read the day and re-evaluate, up to `max_attempts` rounds;
/// running out of rounds is `StoreError::VersionConflict`.
pub async fn reserve_slot(
    store: &Arc<dyn AvailabilityStore>,
    doctor_id: DoctorProfileId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_attempts: u32,
) -> Result<ReserveOutcome, StoreError> {
    let date = start.date_naive();

    for attempt in 1..=max_attempts.max(1) {
        let Some(day) = store.get_day(doctor_id, date).await? else {
            return Ok(ReserveOutcome::NoDay);
        };
        let Some(index) = day.find_open_covering(start, end) else {
            return Ok(ReserveOutcome::NoOpenSlot);
        };

        match flip_slot(store, day, index, SlotStatus::Booked).await? {
            Flip::Done(saved) => {
                info!(
                    "Booked slot {} for doctor {} on {} (attempt {})",
                    index, doctor_id, date, attempt
                );
                return Ok(ReserveOutcome::Reserved(saved));
            }
            Flip::Retry => {
                warn!(
                    "Availability for doctor {} on {} changed during reservation, attempt {}/{}",
                    doctor_id, date, attempt, max_attempts
                );
            }
        }
    }

    Err(StoreError::VersionConflict)
}

#[derive(Debug)]
pub enum ReserveOutcome {
    Reserved(AvailabilityDay),
    NoDay,
    NoOpenSlot,
}

/// Returns the booked slot covering `[start, end)` to `open`.
///
/// `Ok(false)` means there was nothing to release.
pub async fn release_slot(
    store: &Arc<dyn AvailabilityStore>,
    doctor_id: DoctorProfileId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_attempts: u32,
) -> Result<bool, StoreError> {
    let date = start.date_naive();

    for _ in 0..max_attempts.max(1) {
        let Some(day) = store.get_day(doctor_id, date).await? else {
            return Ok(false);
        };
        let Some(index) = day.find_booked_covering(start, end) else {
            debug!("No booked slot to release for doctor {} at {}", doctor_id, start);
            return Ok(false);
        };

        if let Flip::Done(_) = flip_slot(store, day, index, SlotStatus::Open).await? {
            info!("Reopened slot for doctor {} at {}", doctor_id, start);
            return Ok(true);
        }
    }

    Err(StoreError::VersionConflict)
}
