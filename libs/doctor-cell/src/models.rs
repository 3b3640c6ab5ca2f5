use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use shared_database::StoreError;

// ==============================================================================
// IDENTIFIERS
// ==============================================================================

/// Id of an authenticated account, as issued by the auth provider (`sub` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        AccountId(value.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of a Doctor Profile. Never interchangeable with the owning `AccountId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorProfileId(pub Uuid);

impl DoctorProfileId {
    pub fn new() -> Self {
        DoctorProfileId(Uuid::new_v4())
    }
}

impl Default for DoctorProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DoctorProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ==============================================================================
// DOCTOR PROFILE
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorProfile {
    pub id: DoctorProfileId,
    pub account_id: AccountId,
    pub specialties: Vec<String>,
    pub experience_years: i32,
    pub credentials: Vec<String>,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitProfileRequest {
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub credentials: Vec<String>,
}

// ==============================================================================
// AVAILABILITY
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Open,
    Booked,
    Blocked,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Open => write!(f, "open"),
            SlotStatus::Booked => write!(f, "booked"),
            SlotStatus::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: SlotStatus,
}

impl Slot {
    pub fn open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, status: SlotStatus::Open }
    }

    /// Half-open interval intersection.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }

    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && self.end >= end
    }

    pub fn same_range(&self, other: &Slot) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// All slots of one doctor on one calendar day. Unique per (doctor, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityDay {
    pub id: Uuid,
    pub doctor_id: DoctorProfileId,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    /// Bumped on every write; conditional writes compare against it.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityDay {
    pub fn new(doctor_id: DoctorProfileId, date: NaiveDate, slots: Vec<Slot>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            date,
            slots,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn booked_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.status == SlotStatus::Booked)
    }

    /// Index of the open slot that fully contains `[start, end)`.
    pub fn find_open_covering(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.status == SlotStatus::Open && slot.covers(start, end))
    }

    pub fn find_booked_covering(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.status == SlotStatus::Booked && slot.covers(start, end))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotInput {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: Option<SlotStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAvailabilityRequest {
    pub date: String,
    #[serde(default)]
    pub slots: Vec<SlotInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

/// Parses a `YYYY-MM-DD` calendar-day key.
pub fn parse_day_key(raw: &str) -> Result<NaiveDate, AvailabilityError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AvailabilityError::InvalidDate(raw.to_string()))
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("No doctor profile exists for this account")]
    ProfileNotFound,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("At least one slot is required")]
    EmptySlots,

    #[error("Slot {index}: end must be after start")]
    InvalidSlotTimes { index: usize },

    #[error("Slot {index}: start must fall on {date}")]
    SlotOutsideDate { index: usize, date: NaiveDate },

    #[error("Slot {index}: slots cannot be marked booked directly")]
    BookedStatusNotAllowed { index: usize },

    #[error("Slots starting at {first} and {second} overlap")]
    OverlappingSlots { first: DateTime<Utc>, second: DateTime<Utc> },

    #[error("Booked slot {start} - {end} must be kept unchanged")]
    BookedSlotConflict { start: DateTime<Utc>, end: DateTime<Utc> },

    #[error("Availability was modified concurrently; reload and retry")]
    ConcurrentModification,

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AvailabilityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict => AvailabilityError::ConcurrentModification,
            other => AvailabilityError::Store(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor profile not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
