//! The request entity and its workflow state machine.
//!
//! Swap requests open in `WaitingSubstitute` and need the named peer's
//! signature before reaching the manager queue; everything else opens in
//! `Pending`. `Approved` and `Rejected` are terminal. Every transition
//! validates its preconditions before touching any field, so a failed
//! transition is a true no-op.
use crate::error::{SubmissionError, TransitionError};
use crate::staff::{SignatureData, User};
use crate::types::{CalDate, RequestStatus, RequestType, Role, TimeStamp};
use crate::utils;
use chrono::Utc;

/// Up to three independently populated signature slots. Slots are only ever
/// written by the transition that attaches them, never overwritten.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Default)]
pub struct SignatureSet {
    #[n(0)]
    pub requester: Option<SignatureData>,
    #[n(1)]
    pub substitute: Option<SignatureData>,
    #[n(2)]
    pub manager: Option<SignatureData>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub user_id: String,
    #[n(2)]
    pub user_name: String,
    #[n(3)]
    pub user_role: Role,
    #[n(4)]
    pub request_type: RequestType,
    /// For vacation this is the first day of the requested month.
    #[n(5)]
    pub start_date: CalDate,
    #[n(6)]
    pub description: String,
    #[n(7)]
    pub status: RequestStatus,
    #[n(8)]
    pub created_at: TimeStamp<Utc>,
    /// Name of the peer covering the shift, for swap types.
    #[n(9)]
    pub substitute_name: Option<String>,
    #[n(10)]
    pub admin_note: Option<String>,
    #[n(11)]
    pub signatures: SignatureSet,
}

impl LeaveRequest {
    /// Construct a fresh request. The requester signs at creation, so a user
    /// without a registered signature image cannot create one.
    pub fn create(
        requester: &User,
        request_type: RequestType,
        start_date: CalDate,
        description: &str,
        substitute_name: Option<&str>,
    ) -> anyhow::Result<Self> {
        let now = TimeStamp::new();
        let requester_signature = SignatureData::capture(requester, now.clone())
            .ok_or(SubmissionError::MissingSignature)?;

        let status = if request_type.is_swap() {
            RequestStatus::WaitingSubstitute
        } else {
            RequestStatus::Pending
        };

        Ok(Self {
            id: utils::new_uuid_to_bech32("req")?,
            user_id: requester.id.clone(),
            user_name: requester.name.clone(),
            user_role: requester.role,
            request_type,
            start_date,
            description: description.to_owned(),
            status,
            created_at: now,
            substitute_name: substitute_name.map(str::to_owned),
            admin_note: None,
            signatures: SignatureSet {
                requester: Some(requester_signature),
                substitute: None,
                manager: None,
            },
        })
    }

    /// `WaitingSubstitute -> Pending`: the named substitute accepts and signs.
    pub fn confirm_substitute(
        &mut self,
        signer: &User,
        signed_at: TimeStamp<Utc>,
    ) -> Result<(), TransitionError> {
        if self.status != RequestStatus::WaitingSubstitute {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                action: "confirm substitution on",
            });
        }
        let snapshot =
            SignatureData::capture(signer, signed_at).ok_or(TransitionError::MissingSignature)?;

        self.signatures.substitute = Some(snapshot);
        self.status = RequestStatus::Pending;
        Ok(())
    }

    /// `WaitingSubstitute -> Rejected`: the named substitute declines.
    pub fn decline_substitute(&mut self, reason: &str) -> Result<(), TransitionError> {
        if self.status != RequestStatus::WaitingSubstitute {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                action: "decline substitution on",
            });
        }
        if reason.trim().is_empty() {
            return Err(TransitionError::MissingReason);
        }

        self.admin_note = Some(reason.to_owned());
        self.status = RequestStatus::Rejected;
        Ok(())
    }

    /// `Pending -> Approved`: a manager signs off.
    pub fn approve(
        &mut self,
        approver: &User,
        signed_at: TimeStamp<Utc>,
    ) -> Result<(), TransitionError> {
        if self.status != RequestStatus::Pending {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                action: "approve",
            });
        }
        let snapshot =
            SignatureData::capture(approver, signed_at).ok_or(TransitionError::MissingSignature)?;

        self.signatures.manager = Some(snapshot);
        self.status = RequestStatus::Approved;
        Ok(())
    }

    /// `Pending -> Rejected`: a manager rejects with a mandatory reason.
    pub fn reject(&mut self, reason: &str) -> Result<(), TransitionError> {
        if self.status != RequestStatus::Pending {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                action: "reject",
            });
        }
        if reason.trim().is_empty() {
            return Err(TransitionError::MissingReason);
        }

        self.admin_note = Some(reason.to_owned());
        self.status = RequestStatus::Rejected;
        Ok(())
    }
}
