//! Substitute candidate filtering for swap requests.
//!
//! The pool is every user sharing the requester's role, minus the requester,
//! minus anyone inside a substitute penalty window.
use crate::penalty;
use crate::settings::SystemSettings;
use crate::staff::{Absence, MedicalCertificate, User};
use crate::types::CalDate;

/// The set of users who may cover the requester's shift today.
pub fn eligible_substitutes<'a>(
    users: &'a [User],
    requester: &User,
    settings: &SystemSettings,
    certificates: &[MedicalCertificate],
    absences: &[Absence],
    today: CalDate,
) -> Vec<&'a User> {
    users
        .iter()
        .filter(|candidate| {
            if candidate.id == requester.id {
                return false;
            }
            if candidate.role != requester.role {
                return false;
            }

            if settings.block_substitute_on_certificate {
                let trigger = penalty::latest_certificate_end(certificates, &candidate.id);
                if let Some(window) =
                    penalty::window_from(trigger, settings.penalty_substitute_certificate_days)
                {
                    if window.blocks(today) {
                        return false;
                    }
                }
            }

            if settings.block_substitute_on_absence {
                let trigger = penalty::latest_absence(absences, &candidate.id);
                if let Some(window) =
                    penalty::window_from(trigger, settings.penalty_substitute_absence_days)
                {
                    if window.blocks(today) {
                        return false;
                    }
                }
            }

            true
        })
        .collect()
}

/// Narrow an already-eligible set by case-insensitive name substring. Search
/// only narrows, it never re-admits an excluded candidate.
pub fn search_by_name<'a>(eligible: &[&'a User], needle: &str) -> Vec<&'a User> {
    if needle.is_empty() {
        return eligible.to_vec();
    }
    let needle = needle.to_lowercase();
    eligible
        .iter()
        .copied()
        .filter(|u| u.name.to_lowercase().contains(&needle))
        .collect()
}
