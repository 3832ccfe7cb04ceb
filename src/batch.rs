//! Multi-date batch assembly for one submission session.
//!
//! A user accumulates calendar dates one by one; each addition re-checks the
//! retroactive block, the same-month invariant and the projected quota. On
//! confirmation the batch expands into one independent request per date, each
//! consuming its own quota unit. Vacation never goes through a batch: it is
//! always a single request keyed to a year-month.
use crate::error::SubmissionError;
use crate::quota;
use crate::request::LeaveRequest;
use crate::settings::SystemSettings;
use crate::staff::User;
use crate::types::{CalDate, RequestType};

#[derive(Debug, Clone)]
pub struct DateBatch {
    request_type: RequestType,
    dates: Vec<CalDate>,
}

impl DateBatch {
    pub fn new(request_type: RequestType) -> Self {
        Self {
            request_type,
            dates: Vec::new(),
        }
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn dates(&self) -> &[CalDate] {
        &self.dates
    }

    /// Admit one more date, or say why it cannot join the batch. Adding a
    /// date already in the batch is a no-op. `requests` is the requester's
    /// persisted request set, used to project quota usage.
    pub fn try_add(
        &mut self,
        date: CalDate,
        today: CalDate,
        requester: &User,
        requests: &[LeaveRequest],
        settings: &SystemSettings,
    ) -> Result<(), SubmissionError> {
        if self.dates.contains(&date) {
            return Ok(());
        }

        if date < today && settings.blocks_retroactive(self.request_type) {
            return Err(SubmissionError::RetroactiveDate { date });
        }

        if let Some(first) = self.dates.first() {
            if !first.same_month(&date) {
                return Err(SubmissionError::CrossMonthBatch);
            }
        }

        let limits = settings.limits_for(requester.contract);
        if let Some(limit) = quota::ceiling(limits, self.request_type) {
            let used = quota::usage_for_month(
                requests,
                &requester.id,
                self.request_type,
                date.year(),
                date.month(),
            );
            let selected = self.dates.iter().filter(|d| d.same_month(&date)).count() as u32;
            if used + selected + 1 > limit {
                return Err(SubmissionError::QuotaExceeded {
                    year: date.year(),
                    month: date.month(),
                    used,
                    selected,
                    limit,
                });
            }
        }

        self.dates.push(date);
        self.dates.sort();
        Ok(())
    }

    pub fn remove(&mut self, date: CalDate) {
        self.dates.retain(|d| *d != date);
    }

    /// Expand the batch into independent requests, one per date, all sharing
    /// the justification and substitute. Each follows its own lifecycle from
    /// here on.
    pub fn into_requests(
        self,
        requester: &User,
        description: &str,
        substitute_name: Option<&str>,
    ) -> anyhow::Result<Vec<LeaveRequest>> {
        if self.dates.is_empty() {
            return Err(SubmissionError::EmptyBatch.into());
        }
        self.dates
            .into_iter()
            .map(|date| {
                LeaveRequest::create(
                    requester,
                    self.request_type,
                    date,
                    description,
                    substitute_name,
                )
            })
            .collect()
    }
}

/// The vacation path: exactly one request keyed to the first day of the
/// chosen month, regardless of day granularity.
pub fn vacation_request(
    requester: &User,
    year: i32,
    month: u32,
    description: &str,
) -> anyhow::Result<LeaveRequest> {
    let start = CalDate::new(year, month, 1)
        .ok_or_else(|| anyhow::Error::msg(format!("invalid vacation month {month}/{year}")))?;
    LeaveRequest::create(requester, RequestType::Vacation, start, description, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractType, Role};

    fn date(y: i32, m: u32, d: u32) -> CalDate {
        CalDate::new(y, m, d).unwrap()
    }

    fn nurse() -> User {
        User::new("Maria Silva", Role::Nurse, ContractType::Statutory)
            .unwrap()
            .with_signature_ref("sig")
    }

    #[test]
    fn cross_month_dates_are_rejected() {
        let requester = nurse();
        let settings = SystemSettings::default();
        let today = date(2024, 3, 1);

        let mut batch = DateBatch::new(RequestType::ScaleLeave);
        batch
            .try_add(date(2024, 3, 10), today, &requester, &[], &settings)
            .unwrap();

        assert_eq!(
            batch.try_add(date(2024, 4, 2), today, &requester, &[], &settings),
            Err(SubmissionError::CrossMonthBatch)
        );
        assert_eq!(batch.dates().len(), 1);
    }

    #[test]
    fn quota_projection_counts_batch_and_persisted_usage() {
        let requester = nurse();
        let settings = SystemSettings::default(); // statutory: 3 regular swaps
        let today = date(2024, 3, 1);

        let persisted = vec![
            LeaveRequest::create(
                &requester,
                RequestType::RegularSwap,
                date(2024, 3, 4),
                "x",
                None,
            )
            .unwrap(),
            LeaveRequest::create(
                &requester,
                RequestType::RegularSwap,
                date(2024, 3, 5),
                "x",
                None,
            )
            .unwrap(),
        ];

        let mut batch = DateBatch::new(RequestType::RegularSwap);
        batch
            .try_add(date(2024, 3, 12), today, &requester, &persisted, &settings)
            .unwrap();

        // used 2 + selected 1 + this one = 4 > 3
        assert_eq!(
            batch.try_add(date(2024, 3, 13), today, &requester, &persisted, &settings),
            Err(SubmissionError::QuotaExceeded {
                year: 2024,
                month: 3,
                used: 2,
                selected: 1,
                limit: 3,
            })
        );
    }

    #[test]
    fn retroactive_dates_blocked_only_when_toggled() {
        let requester = nurse();
        let today = date(2024, 3, 10);

        let mut settings = SystemSettings::default();
        settings.block_retroactive_leaves = true;
        let mut batch = DateBatch::new(RequestType::ScaleLeave);
        assert_eq!(
            batch.try_add(date(2024, 3, 5), today, &requester, &[], &settings),
            Err(SubmissionError::RetroactiveDate {
                date: date(2024, 3, 5)
            })
        );

        settings.block_retroactive_leaves = false;
        assert!(batch
            .try_add(date(2024, 3, 5), today, &requester, &[], &settings)
            .is_ok());
    }

    #[test]
    fn duplicate_add_is_a_noop() {
        let requester = nurse();
        let settings = SystemSettings::default();
        let today = date(2024, 3, 1);

        let mut batch = DateBatch::new(RequestType::ScaleLeave);
        batch
            .try_add(date(2024, 3, 10), today, &requester, &[], &settings)
            .unwrap();
        batch
            .try_add(date(2024, 3, 10), today, &requester, &[], &settings)
            .unwrap();

        assert_eq!(batch.dates().len(), 1);
    }

    #[test]
    fn batch_expands_into_one_request_per_date() {
        let requester = nurse();
        let settings = SystemSettings::default();
        let today = date(2024, 3, 1);

        let mut batch = DateBatch::new(RequestType::ScaleLeave);
        batch
            .try_add(date(2024, 3, 10), today, &requester, &[], &settings)
            .unwrap();
        batch
            .try_add(date(2024, 3, 12), today, &requester, &[], &settings)
            .unwrap();

        let requests = batch.into_requests(&requester, "rest days", None).unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.request_type == RequestType::ScaleLeave));
        assert_ne!(requests[0].id, requests[1].id);
    }

    #[test]
    fn empty_batch_cannot_be_confirmed() {
        let requester = nurse();
        let batch = DateBatch::new(RequestType::ScaleLeave);
        let err = batch.into_requests(&requester, "x", None).unwrap_err();

        assert_eq!(
            err.downcast_ref::<SubmissionError>(),
            Some(&SubmissionError::EmptyBatch)
        );
    }

    #[test]
    fn vacation_is_one_request_keyed_to_month_start() {
        let requester = nurse();
        let request = vacation_request(&requester, 2024, 7, "annual vacation").unwrap();

        assert_eq!(request.start_date, date(2024, 7, 1));
        assert_eq!(request.request_type, RequestType::Vacation);
    }
}
