//! Staff records: users, absences, medical certificates and signature snapshots
use crate::types::{CalDate, ContractType, Role, TimeStamp};
use crate::utils;
use chrono::Utc;

/// An employee of the unit. Mutable through profile edits and administrative
/// balance adjustments only.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct User {
    #[n(0)]
    pub id: String, // uuid7, bech32 encoded with "user_" prefix
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub role: Role,
    #[n(3)]
    pub contract: ContractType,
    /// Content hash of the stored signature image. None until the user has
    /// registered one; transitions requiring a signature fail without it.
    #[n(4)]
    pub signature_ref: Option<String>,
    #[n(5)]
    pub birth_date: Option<CalDate>,
    /// Remaining elective-leave day balance (court-duty style leave).
    #[n(6)]
    pub elective_leave_days: u32,
    /// Professional registry or payroll number, carried into signature
    /// snapshots for the printable document.
    #[n(7)]
    pub registry: Option<String>,
}

impl User {
    pub fn new(name: &str, role: Role, contract: ContractType) -> anyhow::Result<Self> {
        Ok(Self {
            id: utils::new_uuid_to_bech32("user")?,
            name: name.to_owned(),
            role,
            contract,
            signature_ref: None,
            birth_date: None,
            elective_leave_days: 0,
            registry: None,
        })
    }
    pub fn with_birth_date(mut self, date: CalDate) -> Self {
        self.birth_date = Some(date);
        self
    }
    pub fn with_registry(mut self, registry: &str) -> Self {
        self.registry = Some(registry.to_owned());
        self
    }
    pub fn with_elective_leave_days(mut self, days: u32) -> Self {
        self.elective_leave_days = days;
        self
    }
    pub fn with_signature_ref(mut self, image_ref: &str) -> Self {
        self.signature_ref = Some(image_ref.to_owned());
        self
    }
    pub fn has_signature(&self) -> bool {
        self.signature_ref.is_some()
    }
}

/// A single unplanned no-show, entered administratively. Only role: input to
/// the absence penalty rules.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Absence {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub user_id: String,
    #[n(2)]
    pub user_name: String,
    #[n(3)]
    pub date: CalDate,
}

impl Absence {
    pub fn new(user: &User, date: CalDate) -> anyhow::Result<Self> {
        Ok(Self {
            id: utils::new_uuid_to_bech32("abs")?,
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            date,
        })
    }
}

/// A medical leave record. The end date is derived once at construction:
/// start + days - 1, so a one-day certificate ends on its start date.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct MedicalCertificate {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub user_id: String,
    #[n(2)]
    pub user_name: String,
    #[n(3)]
    pub start: CalDate,
    #[n(4)]
    pub days: u32,
    #[n(5)]
    pub end: CalDate,
}

impl MedicalCertificate {
    pub fn new(user: &User, start: CalDate, days: u32) -> anyhow::Result<Self> {
        if days == 0 {
            return Err(anyhow::Error::msg("certificate day count must be at least 1"));
        }
        Ok(Self {
            id: utils::new_uuid_to_bech32("cert")?,
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            start,
            days,
            end: start.plus_days(i64::from(days) - 1),
        })
    }
}

/// Who signed, in which role, with what registry number, when, and with which
/// stored image. Once attached to a request this is immutable history.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct SignatureData {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub role: Role,
    #[n(2)]
    pub registry: String,
    #[n(3)]
    pub signed_at: TimeStamp<Utc>,
    #[n(4)]
    pub image_ref: String,
}

impl SignatureData {
    /// Snapshot the signer at this moment. Returns None when the user has no
    /// registered signature image.
    pub fn capture(signer: &User, signed_at: TimeStamp<Utc>) -> Option<Self> {
        let image_ref = signer.signature_ref.clone()?;
        Some(Self {
            name: signer.name.clone(),
            role: signer.role,
            registry: signer.registry.clone().unwrap_or_default(),
            signed_at,
            image_ref,
        })
    }
}
