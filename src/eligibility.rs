//! The eligibility gate: may this request type be submitted right now?
//!
//! Checks run in a fixed order and short-circuit on the first applicable
//! reason, so the caller always surfaces exactly one message. The gate is a
//! pure function of its inputs and is re-run on every input change.
use crate::penalty;
use crate::settings::{SystemSettings, VacationWindow};
use crate::staff::{Absence, MedicalCertificate, User};
use crate::types::{CalDate, RequestType};

/// Why a submission is currently blocked, with the concrete bound or release
/// date for display.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    #[error("leave requests are only accepted between day {start} and day {end} of each month")]
    OutsideWindow { start: u32, end: u32 },
    #[error(
        "vacation requests are closed. The window is open from day {} to day {} for {}/{}",
        .window.start_day, .window.end_day, .window.month, .window.year
    )]
    VacationWindowClosed { window: VacationWindow },
    #[error("swaps are temporarily frozen by the administration until {until}")]
    SwapsFrozen { until: CalDate },
    #[error("{request_type} blocked due to a recent medical certificate, released on {release}")]
    CertificatePenalty {
        request_type: RequestType,
        release: CalDate,
    },
    #[error("{request_type} blocked due to a recent absence, released on {release}")]
    AbsencePenalty {
        request_type: RequestType,
        release: CalDate,
    },
}

/// Evaluate the gate for one candidate submission. `vacation_choice` is the
/// (year, month) the user picked and only matters for `Vacation`. Returns
/// None when the submission may proceed.
pub fn blocking_reason(
    request_type: RequestType,
    today: CalDate,
    vacation_choice: Option<(i32, u32)>,
    requester: &User,
    settings: &SystemSettings,
    certificates: &[MedicalCertificate],
    absences: &[Absence],
) -> Option<BlockReason> {
    let is_swap = request_type.is_swap();

    // 1. Submission window. Swap types are exempt.
    if !is_swap {
        if request_type == RequestType::Vacation {
            let window = settings.vacation_window;
            let chosen_ok = vacation_choice == Some((window.year, window.month));
            let day_ok = (window.start_day..=window.end_day).contains(&today.day());
            if !chosen_ok || !day_ok {
                return Some(BlockReason::VacationWindowClosed { window });
            }
        } else {
            let start = settings.request_window_start;
            let end = settings.request_window_end;
            if !(start..=end).contains(&today.day()) {
                return Some(BlockReason::OutsideWindow { start, end });
            }
        }
    }

    // 2. Global swap freeze.
    if is_swap {
        if let Some(until) = settings.global_swap_freeze_until {
            if today < until {
                return Some(BlockReason::SwapsFrozen { until });
            }
        }
    }

    // 3. Certificate penalty against extra swaps.
    if settings.block_extra_swap_on_certificate && request_type == RequestType::ExtraSwap {
        if let Some(reason) = certificate_penalty(request_type, today, requester, settings, certificates)
        {
            return Some(reason);
        }
    }

    // 4. Certificate penalty against all leave types.
    if settings.block_leaves_on_certificate && !is_swap {
        if let Some(reason) = certificate_penalty(request_type, today, requester, settings, certificates)
        {
            return Some(reason);
        }
    }

    // 5. Absence penalty against regular swaps.
    if settings.block_regular_swap_on_absence && request_type == RequestType::RegularSwap {
        if let Some(reason) = absence_penalty(request_type, today, requester, settings, absences) {
            return Some(reason);
        }
    }

    // 6. Absence penalty against all leave types.
    if settings.block_leaves_on_absence && !is_swap {
        if let Some(reason) = absence_penalty(request_type, today, requester, settings, absences) {
            return Some(reason);
        }
    }

    None
}

fn certificate_penalty(
    request_type: RequestType,
    today: CalDate,
    requester: &User,
    settings: &SystemSettings,
    certificates: &[MedicalCertificate],
) -> Option<BlockReason> {
    let trigger = penalty::latest_certificate_end(certificates, &requester.id);
    let window = penalty::window_from(trigger, settings.penalty_certificate_days)?;
    window.blocks(today).then_some(BlockReason::CertificatePenalty {
        request_type,
        release: window.release,
    })
}

fn absence_penalty(
    request_type: RequestType,
    today: CalDate,
    requester: &User,
    settings: &SystemSettings,
    absences: &[Absence],
) -> Option<BlockReason> {
    let trigger = penalty::latest_absence(absences, &requester.id);
    let window = penalty::window_from(trigger, settings.penalty_absence_days)?;
    window.blocks(today).then_some(BlockReason::AbsencePenalty {
        request_type,
        release: window.release,
    })
}

/// Birthday leave is available during the month immediately preceding the
/// user's birth month (December precedes January). Purely informational, no
/// quota or signature interaction.
pub fn birthday_eligible(user: &User, today: CalDate) -> bool {
    let Some(birth) = user.birth_date else {
        return false;
    };
    let lead_month = if birth.month() == 1 {
        12
    } else {
        birth.month() - 1
    };
    today.month() == lead_month
}
