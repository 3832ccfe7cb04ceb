//! Service layer API for the request workflow.
//!
//! Every operation loads a fresh snapshot from the store, runs the pure rules
//! against it, and persists the intended next state. The store's write is the
//! final arbiter when two sessions race; the service itself holds no state
//! between calls.
use crate::batch::{self, DateBatch};
use crate::eligibility::{self, BlockReason};
use crate::error::SubmissionError;
use crate::request::LeaveRequest;
use crate::settings::SystemSettings;
use crate::staff::{Absence, MedicalCertificate, User};
use crate::store::Store;
use crate::substitute;
use crate::types::{CalDate, RequestStatus, RequestType, TimeStamp};
use std::sync::Arc;
use tracing::{debug, info};

pub struct RosterService {
    store: Store,
}

impl RosterService {
    pub fn new(instance: Arc<sled::Db>) -> anyhow::Result<Self> {
        Ok(Self {
            store: Store::open(instance)?,
        })
    }

    /// Direct read access to the underlying collections.
    pub fn store(&self) -> &Store {
        &self.store
    }

    // --- staff administration ---

    pub fn register_user(&self, user: User) -> anyhow::Result<User> {
        self.store.save_user(&user)?;
        debug!(user = %user.name, "registered user");
        Ok(user)
    }

    /// Store the signature image content-addressed and point the user at it.
    pub fn register_signature(&self, user_id: &str, image: &[u8]) -> anyhow::Result<User> {
        let mut user = self.store.user(user_id)?;
        let digest = self.store.store_blob(image)?;
        user.signature_ref = Some(digest);
        self.store.save_user(&user)?;
        Ok(user)
    }

    pub fn record_absence(&self, user_id: &str, date: CalDate) -> anyhow::Result<Absence> {
        let user = self.store.user(user_id)?;
        let absence = Absence::new(&user, date)?;
        self.store.save_absence(&absence)?;
        info!(user = %user.name, %date, "recorded absence");
        Ok(absence)
    }

    pub fn delete_absence(&self, id: &str) -> anyhow::Result<()> {
        self.store.delete_absence(id)
    }

    pub fn record_certificate(
        &self,
        user_id: &str,
        start: CalDate,
        days: u32,
    ) -> anyhow::Result<MedicalCertificate> {
        let user = self.store.user(user_id)?;
        let certificate = MedicalCertificate::new(&user, start, days)?;
        self.store.save_certificate(&certificate)?;
        info!(user = %user.name, %start, days, "recorded medical certificate");
        Ok(certificate)
    }

    pub fn delete_certificate(&self, id: &str) -> anyhow::Result<()> {
        self.store.delete_certificate(id)
    }

    pub fn save_settings(&self, settings: &SystemSettings) -> anyhow::Result<()> {
        self.store.save_settings(settings)?;
        info!("settings replaced");
        Ok(())
    }

    // --- read side ---

    pub fn requests_for(&self, user_id: &str) -> anyhow::Result<Vec<LeaveRequest>> {
        let mut requests: Vec<_> = self
            .store
            .requests()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        requests.sort_by(|a, b| {
            b.created_at
                .to_datetime_utc()
                .cmp(&a.created_at.to_datetime_utc())
        });
        Ok(requests)
    }

    /// Swap requests waiting on this user's signature as the named substitute.
    pub fn awaiting_substitute(&self, user: &User) -> anyhow::Result<Vec<LeaveRequest>> {
        Ok(self
            .store
            .requests()?
            .into_iter()
            .filter(|r| r.status == RequestStatus::WaitingSubstitute)
            .filter(|r| {
                r.substitute_name
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(&user.name))
            })
            .collect())
    }

    /// Run the eligibility gate against a fresh snapshot. None means the
    /// submission may proceed.
    pub fn check_eligibility(
        &self,
        requester_id: &str,
        request_type: RequestType,
        vacation_choice: Option<(i32, u32)>,
        today: CalDate,
    ) -> anyhow::Result<Option<BlockReason>> {
        let requester = self.store.user(requester_id)?;
        let settings = self.store.settings()?;
        let certificates = self.store.certificates()?;
        let absences = self.store.absences()?;

        Ok(eligibility::blocking_reason(
            request_type,
            today,
            vacation_choice,
            &requester,
            &settings,
            &certificates,
            &absences,
        ))
    }

    pub fn eligible_substitutes_for(
        &self,
        requester_id: &str,
        today: CalDate,
    ) -> anyhow::Result<Vec<User>> {
        let requester = self.store.user(requester_id)?;
        let users = self.store.users()?;
        let settings = self.store.settings()?;
        let certificates = self.store.certificates()?;
        let absences = self.store.absences()?;

        Ok(substitute::eligible_substitutes(
            &users,
            &requester,
            &settings,
            &certificates,
            &absences,
            today,
        )
        .into_iter()
        .cloned()
        .collect())
    }

    pub fn birthday_eligible(&self, user_id: &str, today: CalDate) -> anyhow::Result<bool> {
        let user = self.store.user(user_id)?;
        Ok(eligibility::birthday_eligible(&user, today))
    }

    // --- submission ---

    /// Submit one batch of same-month dates as independent requests. All
    /// creation-time rules are re-checked here against the current snapshot,
    /// whatever the assembling session saw earlier.
    pub fn submit(
        &self,
        requester_id: &str,
        request_type: RequestType,
        dates: &[CalDate],
        description: &str,
        substitute_name: Option<&str>,
        today: CalDate,
    ) -> anyhow::Result<Vec<LeaveRequest>> {
        if request_type == RequestType::Vacation {
            return Err(anyhow::Error::msg(
                "vacation is submitted per month, use submit_vacation",
            ));
        }
        if request_type.is_swap() && substitute_name.is_none() {
            return Err(anyhow::Error::msg(
                "swap submissions must name a covering substitute",
            ));
        }

        let requester = self.store.user(requester_id)?;
        let settings = self.store.settings()?;

        if let Some(reason) = self.check_eligibility(requester_id, request_type, None, today)? {
            return Err(SubmissionError::Ineligible(reason).into());
        }

        let persisted = self.requests_for(requester_id)?;
        let mut batch = DateBatch::new(request_type);
        for date in dates {
            batch.try_add(*date, today, &requester, &persisted, &settings)?;
        }

        let requests = batch.into_requests(&requester, description, substitute_name)?;
        self.store.save_requests(&requests)?;

        info!(
            user = %requester.name,
            %request_type,
            count = requests.len(),
            "submission accepted"
        );
        Ok(requests)
    }

    /// Submit a vacation request for one year-month.
    pub fn submit_vacation(
        &self,
        requester_id: &str,
        year: i32,
        month: u32,
        description: &str,
        today: CalDate,
    ) -> anyhow::Result<LeaveRequest> {
        let requester = self.store.user(requester_id)?;

        if let Some(reason) = self.check_eligibility(
            requester_id,
            RequestType::Vacation,
            Some((year, month)),
            today,
        )? {
            return Err(SubmissionError::Ineligible(reason).into());
        }

        let request = batch::vacation_request(&requester, year, month, description)?;
        self.store.save_request(&request)?;

        info!(user = %requester.name, year, month, "vacation request accepted");
        Ok(request)
    }

    // --- workflow transitions ---

    /// The named substitute accepts and signs a waiting swap.
    pub fn confirm_substitute(
        &self,
        request_id: &str,
        signer_id: &str,
    ) -> anyhow::Result<LeaveRequest> {
        let mut request = self.store.request(request_id)?;
        let signer = self.store.user(signer_id)?;

        // Only the named substitute may sign.
        let expected = request
            .substitute_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("request {} has no named substitute", request.id))?;
        if !expected.eq_ignore_ascii_case(&signer.name) {
            return Err(anyhow::anyhow!(
                "unauthorized substitute. Expected: {}, Got: {}",
                expected,
                signer.name
            ));
        }

        request.confirm_substitute(&signer, TimeStamp::new())?;
        self.store.save_request(&request)?;

        debug!(request = %request.id, signer = %signer.name, "substitute confirmed");
        Ok(request)
    }

    /// The named substitute declines a waiting swap with a reason.
    pub fn decline_substitute(
        &self,
        request_id: &str,
        reason: &str,
    ) -> anyhow::Result<LeaveRequest> {
        let mut request = self.store.request(request_id)?;

        request.decline_substitute(reason)?;
        self.store.save_request(&request)?;

        debug!(request = %request.id, "substitute declined");
        Ok(request)
    }

    /// A manager approves a pending request.
    pub fn approve(&self, request_id: &str, approver_id: &str) -> anyhow::Result<LeaveRequest> {
        let mut request = self.store.request(request_id)?;
        let approver = self.store.user(approver_id)?;

        request.approve(&approver, TimeStamp::new())?;
        self.store.save_request(&request)?;

        info!(request = %request.id, approver = %approver.name, "request approved");
        Ok(request)
    }

    /// A manager rejects a pending request with a reason.
    pub fn reject(&self, request_id: &str, reason: &str) -> anyhow::Result<LeaveRequest> {
        let mut request = self.store.request(request_id)?;

        request.reject(reason)?;
        self.store.save_request(&request)?;

        info!(request = %request.id, "request rejected");
        Ok(request)
    }

    /// Remove a request entirely. Quota is derived from the live set, so the
    /// unit this request consumed becomes available again immediately.
    pub fn delete_request(&self, request_id: &str) -> anyhow::Result<()> {
        self.store.delete_request(request_id)?;
        info!(request = %request_id, "request deleted, quota unit returned");
        Ok(())
    }
}
