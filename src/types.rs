//! Core calendar types and the closed tag enums shared by every rule
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// A calendar date at day granularity. All rule evaluation happens at this
/// precision, never at instant precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalDate(NaiveDate);

impl CalDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalDate)
    }
    /// The current date in UTC. Rules never call this themselves, the caller
    /// injects "today" so every rule stays a pure function.
    pub fn today() -> Self {
        CalDate(Utc::now().date_naive())
    }
    pub fn year(&self) -> i32 {
        self.0.year()
    }
    pub fn month(&self) -> u32 {
        self.0.month()
    }
    pub fn day(&self) -> u32 {
        self.0.day()
    }
    pub fn plus_days(&self, days: i64) -> Self {
        CalDate(self.0 + chrono::Duration::days(days))
    }
    pub fn same_month(&self, other: &CalDate) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }
    pub fn to_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalDate {
    fn from(value: NaiveDate) -> Self {
        CalDate(value)
    }
}

impl std::fmt::Display for CalDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl<C> minicbor::Encode<C> for CalDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(self.0.num_days_from_ce())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for CalDate {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(CalDate)
            .ok_or(minicbor::decode::Error::message(
                "day count out of range for a calendar date",
            ))
    }
}

/// An instant, used for created-at and signature timestamps only.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(TimeStamp)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[n(0)]
    Admin,
    #[n(1)]
    Manager,
    #[n(2)]
    Nurse,
    #[n(3)]
    NurseTech,
    #[n(4)]
    AdminAssistant,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Nursing Manager",
            Role::Nurse => "Nurse",
            Role::NurseTech => "Nursing Technician",
            Role::AdminAssistant => "Administrative Assistant",
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractType {
    #[n(0)]
    Statutory,
    #[n(1)]
    Temporary,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    #[n(0)]
    RegularSwap,
    #[n(1)]
    ExtraSwap,
    #[n(2)]
    ElectiveLeave,
    #[n(3)]
    ScaleLeave,
    #[n(4)]
    Birthday,
    #[n(5)]
    Vacation,
    #[n(6)]
    Other,
}

impl RequestType {
    /// Swap types need a peer substitute before manager approval and are
    /// exempt from the monthly submission window.
    pub fn is_swap(&self) -> bool {
        matches!(self, RequestType::RegularSwap | RequestType::ExtraSwap)
    }
    pub fn display_name(&self) -> &'static str {
        match self {
            RequestType::RegularSwap => "Regular Swap",
            RequestType::ExtraSwap => "Extra Swap",
            RequestType::ElectiveLeave => "Elective-Day Leave",
            RequestType::ScaleLeave => "Scale Leave",
            RequestType::Birthday => "Birthday Leave",
            RequestType::Vacation => "Vacation",
            RequestType::Other => "Other",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    #[n(0)]
    WaitingSubstitute,
    #[n(1)]
    Pending,
    #[n(2)]
    Approved,
    #[n(3)]
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}
