//! Process-wide configuration, loaded once and passed read-only into every
//! rule call. Defaults mirror the unit's deployed configuration.
use crate::types::{CalDate, ContractType, RequestType};

/// Monthly ceilings for the three quota-bearing request types.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractLimits {
    #[n(0)]
    pub max_scale_leaves: u32,
    #[n(1)]
    pub max_regular_swaps: u32,
    #[n(2)]
    pub max_extra_swaps: u32,
}

/// The one window in which vacation requests are accepted: a specific target
/// year/month, open between two days of the current month.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VacationWindow {
    #[n(0)]
    pub year: i32,
    #[n(1)]
    pub month: u32, // 1-12
    #[n(2)]
    pub start_day: u32,
    #[n(3)]
    pub end_day: u32,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct SystemSettings {
    /// Day-of-month bounds for non-swap submissions.
    #[n(0)]
    pub request_window_start: u32,
    #[n(1)]
    pub request_window_end: u32,
    /// If set and in the future, all swap submissions are frozen.
    #[n(2)]
    pub global_swap_freeze_until: Option<CalDate>,

    #[n(3)]
    pub statutory_limits: ContractLimits,
    #[n(4)]
    pub temporary_limits: ContractLimits,

    // Requester penalties triggered by a medical certificate.
    #[n(5)]
    pub block_extra_swap_on_certificate: bool,
    #[n(6)]
    pub block_leaves_on_certificate: bool,
    #[n(7)]
    pub penalty_certificate_days: u32,

    // Substitute penalty triggered by a medical certificate.
    #[n(8)]
    pub block_substitute_on_certificate: bool,
    #[n(9)]
    pub penalty_substitute_certificate_days: u32,

    // Requester penalties triggered by an absence.
    #[n(10)]
    pub block_regular_swap_on_absence: bool,
    #[n(11)]
    pub block_leaves_on_absence: bool,
    #[n(12)]
    pub penalty_absence_days: u32,

    // Substitute penalty triggered by an absence.
    #[n(13)]
    pub block_substitute_on_absence: bool,
    #[n(14)]
    pub penalty_substitute_absence_days: u32,

    #[n(15)]
    pub block_retroactive_swaps: bool,
    #[n(16)]
    pub block_retroactive_leaves: bool,

    #[n(17)]
    pub vacation_window: VacationWindow,
}

impl SystemSettings {
    pub fn limits_for(&self, contract: ContractType) -> &ContractLimits {
        match contract {
            ContractType::Statutory => &self.statutory_limits,
            ContractType::Temporary => &self.temporary_limits,
        }
    }

    /// Whether past dates of this request category are off-limits.
    pub fn blocks_retroactive(&self, request_type: RequestType) -> bool {
        if request_type.is_swap() {
            self.block_retroactive_swaps
        } else {
            self.block_retroactive_leaves
        }
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        let today = CalDate::today();
        Self {
            request_window_start: 1,
            request_window_end: 10,
            global_swap_freeze_until: None,
            statutory_limits: ContractLimits {
                max_scale_leaves: 2,
                max_regular_swaps: 3,
                max_extra_swaps: 10,
            },
            temporary_limits: ContractLimits {
                max_scale_leaves: 2,
                max_regular_swaps: 3,
                max_extra_swaps: 13,
            },
            block_extra_swap_on_certificate: false,
            block_leaves_on_certificate: false,
            penalty_certificate_days: 30,
            block_substitute_on_certificate: false,
            penalty_substitute_certificate_days: 30,
            block_regular_swap_on_absence: false,
            block_leaves_on_absence: false,
            penalty_absence_days: 30,
            block_substitute_on_absence: false,
            penalty_substitute_absence_days: 30,
            block_retroactive_swaps: true,
            block_retroactive_leaves: true,
            vacation_window: VacationWindow {
                year: today.year(),
                month: today.month(),
                start_day: 1,
                end_day: 10,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_encoding() {
        let original = SystemSettings::default();

        let encoding = minicbor::to_vec(&original).unwrap();
        let decode: SystemSettings = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decode);
    }

    #[test]
    fn limits_follow_contract_type() {
        let settings = SystemSettings::default();

        assert_eq!(
            settings.limits_for(ContractType::Statutory).max_extra_swaps,
            10
        );
        assert_eq!(
            settings.limits_for(ContractType::Temporary).max_extra_swaps,
            13
        );
    }
}
