//! Penalty window resolution.
//!
//! A penalty is anchored to the single most recent trigger record of a user
//! (certificate end date or absence date). Older records are superseded, never
//! cumulative: an expired old trigger cannot re-block alongside a newer one.
use crate::staff::{Absence, MedicalCertificate};
use crate::types::CalDate;

/// An active-or-expired block span. `release` is the first day the action is
/// allowed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyWindow {
    pub release: CalDate,
}

impl PenaltyWindow {
    pub fn blocks(&self, today: CalDate) -> bool {
        today < self.release
    }
}

/// Resolve the window for a trigger date, if any trigger exists.
pub fn window_from(trigger: Option<CalDate>, penalty_days: u32) -> Option<PenaltyWindow> {
    trigger.map(|date| PenaltyWindow {
        release: date.plus_days(i64::from(penalty_days)),
    })
}

/// Latest certificate end date on record for one user.
pub fn latest_certificate_end(
    certificates: &[MedicalCertificate],
    user_id: &str,
) -> Option<CalDate> {
    certificates
        .iter()
        .filter(|c| c.user_id == user_id)
        .map(|c| c.end)
        .max()
}

/// Latest absence date on record for one user.
pub fn latest_absence(absences: &[Absence], user_id: &str) -> Option<CalDate> {
    absences
        .iter()
        .filter(|a| a.user_id == user_id)
        .map(|a| a.date)
        .max()
}
