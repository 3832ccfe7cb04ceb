//! Sled-backed storage for the roster collections.
//!
//! One keyed tree per collection, records encoded with minicbor. Signature
//! images live in a blob tree keyed by their sha256 digest, so a user record
//! only carries the content hash.
use crate::request::LeaveRequest;
use crate::settings::SystemSettings;
use crate::staff::{Absence, MedicalCertificate, User};
use std::sync::Arc;

const SETTINGS_KEY: &str = "settings";

pub struct Store {
    db: Arc<sled::Db>,
    users: sled::Tree,
    requests: sled::Tree,
    absences: sled::Tree,
    certificates: sled::Tree,
    blobs: sled::Tree,
}

fn encode<T: minicbor::Encode<()>>(value: &T) -> anyhow::Result<Vec<u8>> {
    Ok(minicbor::to_vec(value)?)
}

fn decode_all<T>(tree: &sled::Tree) -> anyhow::Result<Vec<T>>
where
    T: for<'b> minicbor::Decode<'b, ()>,
{
    let mut out = Vec::new();
    for entry in tree.iter() {
        let (_, value) = entry?;
        out.push(minicbor::decode(value.as_ref())?);
    }
    Ok(out)
}

impl Store {
    pub fn open(db: Arc<sled::Db>) -> anyhow::Result<Self> {
        Ok(Self {
            users: db.open_tree("users")?,
            requests: db.open_tree("requests")?,
            absences: db.open_tree("absences")?,
            certificates: db.open_tree("certificates")?,
            blobs: db.open_tree("blobs")?,
            db,
        })
    }

    // --- users ---

    pub fn save_user(&self, user: &User) -> anyhow::Result<()> {
        self.users.insert(user.id.as_bytes(), encode(user)?)?;
        Ok(())
    }

    pub fn user(&self, id: &str) -> anyhow::Result<User> {
        let bytes = self
            .users
            .get(id.as_bytes())?
            .ok_or_else(|| anyhow::anyhow!("no user with id {id}"))?;
        Ok(minicbor::decode(bytes.as_ref())?)
    }

    pub fn users(&self) -> anyhow::Result<Vec<User>> {
        decode_all(&self.users)
    }

    // --- requests ---

    pub fn save_request(&self, request: &LeaveRequest) -> anyhow::Result<()> {
        self.requests
            .insert(request.id.as_bytes(), encode(request)?)?;
        Ok(())
    }

    /// Persist a whole submission in one batch so a multi-date submission is
    /// never half-saved.
    pub fn save_requests(&self, requests: &[LeaveRequest]) -> anyhow::Result<()> {
        let mut batch = sled::Batch::default();
        for request in requests {
            batch.insert(request.id.as_bytes(), encode(request)?);
        }
        self.requests.apply_batch(batch)?;
        Ok(())
    }

    pub fn request(&self, id: &str) -> anyhow::Result<LeaveRequest> {
        let bytes = self
            .requests
            .get(id.as_bytes())?
            .ok_or_else(|| anyhow::anyhow!("no request with id {id}"))?;
        Ok(minicbor::decode(bytes.as_ref())?)
    }

    pub fn requests(&self) -> anyhow::Result<Vec<LeaveRequest>> {
        decode_all(&self.requests)
    }

    pub fn delete_request(&self, id: &str) -> anyhow::Result<()> {
        self.requests.remove(id.as_bytes())?;
        Ok(())
    }

    // --- absences / certificates ---

    pub fn save_absence(&self, absence: &Absence) -> anyhow::Result<()> {
        self.absences
            .insert(absence.id.as_bytes(), encode(absence)?)?;
        Ok(())
    }

    pub fn absences(&self) -> anyhow::Result<Vec<Absence>> {
        decode_all(&self.absences)
    }

    pub fn delete_absence(&self, id: &str) -> anyhow::Result<()> {
        self.absences.remove(id.as_bytes())?;
        Ok(())
    }

    pub fn save_certificate(&self, certificate: &MedicalCertificate) -> anyhow::Result<()> {
        self.certificates
            .insert(certificate.id.as_bytes(), encode(certificate)?)?;
        Ok(())
    }

    pub fn certificates(&self) -> anyhow::Result<Vec<MedicalCertificate>> {
        decode_all(&self.certificates)
    }

    pub fn delete_certificate(&self, id: &str) -> anyhow::Result<()> {
        self.certificates.remove(id.as_bytes())?;
        Ok(())
    }

    // --- blobs ---

    /// Content-addressed insert; returns the sha256 digest used as key.
    pub fn store_blob(&self, bytes: &[u8]) -> anyhow::Result<String> {
        let digest = sha256::digest(bytes);
        self.blobs.insert(digest.as_bytes(), bytes)?;
        Ok(digest)
    }

    pub fn blob(&self, digest: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(digest.as_bytes())?.map(|v| v.to_vec()))
    }

    // --- settings ---

    pub fn settings(&self) -> anyhow::Result<SystemSettings> {
        match self.db.get(SETTINGS_KEY)? {
            Some(bytes) => Ok(minicbor::decode(bytes.as_ref())?),
            None => Ok(SystemSettings::default()),
        }
    }

    pub fn save_settings(&self, settings: &SystemSettings) -> anyhow::Result<()> {
        self.db.insert(SETTINGS_KEY, encode(settings)?)?;
        Ok(())
    }
}
