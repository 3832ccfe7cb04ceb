//! Monthly quota derivation.
//!
//! Usage is always recounted from the live request set rather than kept as a
//! stored counter, so deleting a request returns its quota unit automatically.
use crate::request::LeaveRequest;
use crate::settings::ContractLimits;
use crate::types::{RequestStatus, RequestType};

/// Count one user's non-rejected requests of `request_type` starting in the
/// given month.
pub fn usage_for_month(
    requests: &[LeaveRequest],
    user_id: &str,
    request_type: RequestType,
    year: i32,
    month: u32,
) -> u32 {
    requests
        .iter()
        .filter(|r| r.user_id == user_id)
        .filter(|r| r.status != RequestStatus::Rejected)
        .filter(|r| r.request_type == request_type)
        .filter(|r| r.start_date.year() == year && r.start_date.month() == month)
        .count() as u32
}

/// The monthly ceiling for a request type under a contract's limits. None
/// means the type is unbounded.
pub fn ceiling(limits: &ContractLimits, request_type: RequestType) -> Option<u32> {
    match request_type {
        RequestType::ScaleLeave => Some(limits.max_scale_leaves),
        RequestType::RegularSwap => Some(limits.max_regular_swaps),
        RequestType::ExtraSwap => Some(limits.max_extra_swaps),
        RequestType::ElectiveLeave
        | RequestType::Birthday
        | RequestType::Vacation
        | RequestType::Other => None,
    }
}
