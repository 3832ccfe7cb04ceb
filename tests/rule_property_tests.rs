//! Property-based tests for the rule modules.
//!
//! These verify the invariants that must hold regardless of the specific
//! combination of requests, penalty records, settings toggles and dates:
//! quota counting, latest-wins penalty resolution, gate purity, batch
//! month discipline and state machine reachability.

use proptest::prelude::*;
use roster_approval::{
    batch::DateBatch,
    eligibility,
    penalty,
    quota,
    request::LeaveRequest,
    settings::SystemSettings,
    staff::{Absence, User},
    types::{CalDate, ContractType, RequestStatus, RequestType, Role, TimeStamp},
};

fn request_type_strategy() -> impl Strategy<Value = RequestType> {
    prop_oneof![
        Just(RequestType::RegularSwap),
        Just(RequestType::ExtraSwap),
        Just(RequestType::ElectiveLeave),
        Just(RequestType::ScaleLeave),
        Just(RequestType::Birthday),
        Just(RequestType::Vacation),
        Just(RequestType::Other),
    ]
}

fn status_strategy() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::WaitingSubstitute),
        Just(RequestStatus::Pending),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Rejected),
    ]
}

// Day capped at 28 so every generated (year, month, day) triple is valid.
fn date_strategy() -> impl Strategy<Value = CalDate> {
    (2023i32..2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| CalDate::new(y, m, d).unwrap())
}

fn signed_nurse() -> User {
    User::new("Maria Silva", Role::Nurse, ContractType::Statutory)
        .unwrap()
        .with_signature_ref("sig")
}

fn build_request(user: &User, request_type: RequestType, date: CalDate, status: RequestStatus) -> LeaveRequest {
    let mut request = LeaveRequest::create(user, request_type, date, "x", None).unwrap();
    request.status = status;
    request
}

proptest! {
    /// Rejected requests never count toward any month's usage.
    #[test]
    fn quota_never_counts_rejected(
        entries in prop::collection::vec(
            (request_type_strategy(), status_strategy(), date_strategy()),
            0..20,
        ),
        probe_type in request_type_strategy(),
        probe_date in date_strategy(),
    ) {
        let user = signed_nurse();
        let requests: Vec<_> = entries
            .iter()
            .map(|(ty, status, date)| build_request(&user, *ty, *date, *status))
            .collect();

        let counted = quota::usage_for_month(
            &requests,
            &user.id,
            probe_type,
            probe_date.year(),
            probe_date.month(),
        );

        let expected = requests
            .iter()
            .filter(|r| r.status != RequestStatus::Rejected)
            .filter(|r| r.request_type == probe_type)
            .filter(|r| r.start_date.same_month(&probe_date))
            .count() as u32;

        prop_assert_eq!(counted, expected);

        // dropping every rejected request changes nothing
        let live: Vec<_> = requests
            .into_iter()
            .filter(|r| r.status != RequestStatus::Rejected)
            .collect();
        prop_assert_eq!(
            quota::usage_for_month(&live, &user.id, probe_type, probe_date.year(), probe_date.month()),
            counted
        );
    }

    /// Only the single most recent trigger governs a penalty block: the
    /// resolved window equals the window of the max trigger date alone.
    #[test]
    fn penalty_latest_record_wins(
        trigger_dates in prop::collection::vec(date_strategy(), 1..10),
        penalty_days in 0u32..120,
        today in date_strategy(),
    ) {
        let user = signed_nurse();
        let absences: Vec<_> = trigger_dates
            .iter()
            .map(|d| Absence::new(&user, *d).unwrap())
            .collect();

        let latest = *trigger_dates.iter().max().unwrap();
        let resolved = penalty::latest_absence(&absences, &user.id).unwrap();
        prop_assert_eq!(resolved, latest);

        let window = penalty::window_from(Some(resolved), penalty_days).unwrap();
        prop_assert_eq!(window.release, latest.plus_days(i64::from(penalty_days)));

        // an old record alongside never extends the block
        let only_latest = penalty::window_from(Some(latest), penalty_days).unwrap();
        prop_assert_eq!(window.blocks(today), only_latest.blocks(today));
    }

    /// The gate is a pure function: identical inputs give identical results.
    #[test]
    fn gate_is_idempotent(
        request_type in request_type_strategy(),
        today in date_strategy(),
        toggles in prop::array::uniform6(any::<bool>()),
        absence_date in date_strategy(),
    ) {
        let user = signed_nurse();
        let mut settings = SystemSettings::default();
        settings.block_extra_swap_on_certificate = toggles[0];
        settings.block_leaves_on_certificate = toggles[1];
        settings.block_substitute_on_certificate = toggles[2];
        settings.block_regular_swap_on_absence = toggles[3];
        settings.block_leaves_on_absence = toggles[4];
        settings.block_substitute_on_absence = toggles[5];
        let absences = vec![Absence::new(&user, absence_date).unwrap()];

        let first = eligibility::blocking_reason(
            request_type, today, None, &user, &settings, &[], &absences,
        );
        let second = eligibility::blocking_reason(
            request_type, today, None, &user, &settings, &[], &absences,
        );
        prop_assert_eq!(first, second);
    }

    /// Whatever gets admitted into one batch shares a single calendar month.
    #[test]
    fn batch_never_mixes_months(
        candidates in prop::collection::vec(date_strategy(), 1..15),
        request_type in request_type_strategy(),
    ) {
        let user = signed_nurse();
        let mut settings = SystemSettings::default();
        settings.block_retroactive_leaves = false;
        settings.block_retroactive_swaps = false;
        let today = CalDate::new(2023, 1, 1).unwrap();

        let mut batch = DateBatch::new(request_type);
        for date in &candidates {
            let _ = batch.try_add(*date, today, &user, &[], &settings);
        }

        if let Some(first) = batch.dates().first() {
            prop_assert!(batch.dates().iter().all(|d| d.same_month(first)));
        }
    }

    /// Reachability: from WaitingSubstitute only Pending and Rejected are one
    /// step away; from Pending only Approved and Rejected; terminal states
    /// admit nothing. Status and signature slots stay consistent throughout.
    #[test]
    fn state_machine_reachability(
        actions in prop::collection::vec(0u8..4, 1..12),
    ) {
        let requester = signed_nurse();
        let substitute = signed_nurse();
        let manager = signed_nurse();
        let mut request = LeaveRequest::create(
            &requester,
            RequestType::RegularSwap,
            CalDate::new(2024, 3, 20).unwrap(),
            "x",
            Some("Joao Santos"),
        ).unwrap();

        for action in actions {
            let before = request.status;
            let result = match action {
                0 => request.confirm_substitute(&substitute, TimeStamp::new()),
                1 => request.decline_substitute("busy"),
                2 => request.approve(&manager, TimeStamp::new()),
                _ => request.reject("short-staffed"),
            };

            if before.is_terminal() {
                prop_assert!(result.is_err());
                prop_assert_eq!(request.status, before);
            }
            if result.is_ok() {
                match before {
                    RequestStatus::WaitingSubstitute => prop_assert!(matches!(
                        request.status,
                        RequestStatus::Pending | RequestStatus::Rejected
                    )),
                    RequestStatus::Pending => prop_assert!(matches!(
                        request.status,
                        RequestStatus::Approved | RequestStatus::Rejected
                    )),
                    _ => prop_assert!(false, "transition out of a terminal state"),
                }
            }

            // signature consistency per status
            if request.status == RequestStatus::Approved {
                prop_assert!(request.signatures.manager.is_some());
            }
            if request.status == RequestStatus::Pending {
                prop_assert!(request.signatures.substitute.is_some());
            }
            prop_assert!(request.signatures.requester.is_some());
        }
    }
}
