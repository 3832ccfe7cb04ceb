use crate::eligibility::BlockReason;
use crate::types::{CalDate, RequestStatus};

/// Failures raised while assembling or confirming a submission. All are
/// recoverable; nothing is persisted when one is returned.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("{0}")]
    Ineligible(#[from] BlockReason),
    #[error(
        "monthly limit reached for {month}/{year}: already used {used}, selected {selected}, limit {limit}"
    )]
    QuotaExceeded {
        year: i32,
        month: u32,
        used: u32,
        selected: u32,
        limit: u32,
    },
    #[error("all dates of one submission must fall in the same month")]
    CrossMonthBatch,
    #[error("past date {date} is blocked for this request category")]
    RetroactiveDate { date: CalDate },
    #[error("requester has no registered signature image")]
    MissingSignature,
    #[error("a submission needs at least one selected date")]
    EmptyBatch,
}

/// Failures raised by the request state machine. A failed transition leaves
/// the request exactly as it was.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TransitionError {
    #[error("signer has no registered signature image")]
    MissingSignature,
    #[error("a rejection requires a non-empty reason")]
    MissingReason,
    #[error("cannot {action} a request in state {from:?}")]
    InvalidTransition {
        from: RequestStatus,
        action: &'static str,
    },
}
