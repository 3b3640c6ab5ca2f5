use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::models::{
    parse_day_key, AccountId, AvailabilityDay, AvailabilityError, DoctorProfileId, Slot,
    SlotInput, SlotStatus, SubmitAvailabilityRequest,
};
use crate::services::IdentityResolver;
use crate::store::AvailabilityStore;

pub struct AvailabilityService {
    identity: IdentityResolver,
    store: Arc<dyn AvailabilityStore>,
}

impl AvailabilityService {
    pub fn new(identity: IdentityResolver, store: Arc<dyn AvailabilityStore>) -> Self {
        Self { identity, store }
    }

    /// Replaces the doctor's whole slot list for one day.
    ///
    /// Booked slots are re-derived from storage on every write: each one must be
    /// echoed back with its exact range, and no other slot may touch it.
    pub async fn submit_day(
        &self,
        account_id: &AccountId,
        request: SubmitAvailabilityRequest,
    ) -> Result<AvailabilityDay, AvailabilityError> {
        let doctor_id = self
            .identity
            .resolve_profile(account_id)
            .await?
            .ok_or(AvailabilityError::ProfileNotFound)?;

        let date = parse_day_key(&request.date)?;
        let sorted = sort_and_validate(date, &request.slots)?;

        let existing = self.store.get_day(doctor_id, date).await?;
        let slots = protect_booked_slots(sorted, existing.as_ref())?;

        let (day, expected_version) = match existing {
            Some(current) => {
                let version = current.version;
                (AvailabilityDay { slots, ..current }, Some(version))
            }
            None => (AvailabilityDay::new(doctor_id, date, slots), None),
        };

        let saved = self.store.save_day(day, expected_version).await.map_err(|e| {
            warn!("Availability write for doctor {} on {} failed: {}", doctor_id, date, e);
            AvailabilityError::from(e)
        })?;

        info!(
            "Stored {} slots for doctor {} on {} (version {})",
            saved.slots.len(),
            doctor_id,
            date,
            saved.version
        );
        Ok(saved)
    }

    pub async fn get_availability(
        &self,
        doctor_id: DoctorProfileId,
        date: Option<&str>,
    ) -> Result<Vec<AvailabilityDay>, AvailabilityError> {
        let date = date.map(parse_day_key).transpose()?;
        debug!("Fetching availability for doctor {} (date filter: {:?})", doctor_id, date);
        Ok(self.store.list_days(doctor_id, date).await?)
    }
}

/// Checks each slot's range, then sorts by start and rejects overlaps.
/// Returned pairs keep the slot's position in the original payload.
pub fn sort_and_validate(
    date: NaiveDate,
    inputs: &[SlotInput],
) -> Result<Vec<(usize, SlotInput)>, AvailabilityError> {
    if inputs.is_empty() {
        return Err(AvailabilityError::EmptySlots);
    }

    let mut sorted: Vec<(usize, SlotInput)> = inputs.iter().cloned().enumerate().collect();
    sorted.sort_by_key(|(_, slot)| slot.start);

    for (index, slot) in &sorted {
        if slot.end <= slot.start {
            return Err(AvailabilityError::InvalidSlotTimes { index: *index });
        }
        if slot.start.date_naive() != date {
            return Err(AvailabilityError::SlotOutsideDate { index: *index, date });
        }
    }

    for pair in sorted.windows(2) {
        let (previous, next) = (&pair[0].1, &pair[1].1);
        if previous.end > next.start {
            return Err(AvailabilityError::OverlappingSlots {
                first: previous.start,
                second: next.start,
            });
        }
    }

    Ok(sorted)
}

/// Resolves final slot statuses against the day's currently booked slots.
pub fn protect_booked_slots(
    sorted: Vec<(usize, SlotInput)>,
    existing: Option<&AvailabilityDay>,
) -> Result<Vec<Slot>, AvailabilityError> {
    let booked: Vec<&Slot> = existing.map(|day| day.booked_slots().collect()).unwrap_or_default();

    let mut slots = Vec::with_capacity(sorted.len());
    for (index, input) in sorted {
        let candidate = Slot {
            start: input.start,
            end: input.end,
            status: input.status.unwrap_or(SlotStatus::Open),
        };

        if booked.iter().any(|b| b.same_range(&candidate)) {
            slots.push(Slot { status: SlotStatus::Booked, ..candidate });
            continue;
        }

        if let Some(hit) = booked.iter().find(|b| b.overlaps(candidate.start, candidate.end)) {
            return Err(AvailabilityError::BookedSlotConflict { start: hit.start, end: hit.end });
        }

        if candidate.status == SlotStatus::Booked {
            return Err(AvailabilityError::BookedStatusNotAllowed { index });
        }

        slots.push(candidate);
    }

    if let Some(missing) = booked.iter().find(|b| !slots.iter().any(|s| s.same_range(b))) {
        return Err(AvailabilityError::BookedSlotConflict {
            start: missing.start,
            end: missing.end,
        });
    }

    Ok(slots)
}
