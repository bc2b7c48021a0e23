//! The access-code registry: sole owner of access-code records.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::AccessError;
use super::code::generate_code;
use crate::models::{AccessCode, CodeKind};
use crate::store::{AccessStore, StoreMode};

/// How many fresh codes `issue` tries before giving up on collisions.
const MAX_ISSUE_ATTEMPTS: usize = 5;

/// Largest number of codes one seeding pass may create per kind.
pub const MAX_SEED_COUNT: usize = 10_000;

/// Per-kind code counts for [`AccessCodeRegistry::seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCounts {
    pub team: usize,
    pub coach: usize,
    pub company: usize,
}

impl SeedCounts {
    pub fn get(&self, kind: CodeKind) -> usize {
        match kind {
            CodeKind::Team => self.team,
            CodeKind::Coach => self.coach,
            CodeKind::Company => self.company,
        }
    }
}

impl Default for SeedCounts {
    /// Bootstrap population: 25 team, 10 coach, 5 company codes.
    fn default() -> Self {
        Self {
            team: 25,
            coach: 10,
            company: 5,
        }
    }
}

/// Codes created by one seeding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub team: Vec<String>,
    pub coach: Vec<String>,
    pub company: Vec<String>,
}

impl SeedReport {
    pub fn codes(&self, kind: CodeKind) -> &[String] {
        match kind {
            CodeKind::Team => &self.team,
            CodeKind::Coach => &self.coach,
            CodeKind::Company => &self.company,
        }
    }

    fn codes_mut(&mut self, kind: CodeKind) -> &mut Vec<String> {
        match kind {
            CodeKind::Team => &mut self.team,
            CodeKind::Coach => &mut self.coach,
            CodeKind::Company => &mut self.company,
        }
    }

    pub fn total(&self) -> usize {
        self.team.len() + self.coach.len() + self.company.len()
    }
}

/// Validates, issues, seeds and revokes role-scoped access codes.
#[derive(Clone)]
pub struct AccessCodeRegistry {
    store: Arc<dyn AccessStore>,
}

impl AccessCodeRegistry {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    /// Backend the registry talks to.
    pub fn mode(&self) -> StoreMode {
        self.store.mode()
    }

    /// The underlying store, shared with the profile linkage of the auth flow.
    pub fn store(&self) -> &Arc<dyn AccessStore> {
        &self.store
    }

    /// Whether `code` exists under `kind` and is active.
    ///
    /// Fails closed: a store error reads as "no such code". `code` is matched
    /// exactly; callers upper-case user input first.
    pub async fn validate(&self, kind: CodeKind, code: &str) -> bool {
        match self.store.find_code(kind, code).await {
            Ok(Some(record)) => record.active,
            Ok(None) => false,
            Err(e) => {
                warn!(%kind, error = %e, "access code lookup failed, treating code as invalid");
                false
            }
        }
    }

    /// Generate, persist and return a new active code under `kind`.
    ///
    /// In fallback mode the code is returned without being persisted.
    pub async fn issue(&self, kind: CodeKind) -> Result<String, AccessError> {
        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let code = generate_code();
            if self.store.find_code(kind, &code).await?.is_some() {
                debug!(%kind, attempt, "generated code already taken, retrying");
                continue;
            }

            let record = AccessCode::issued(kind, code.clone());
            match self
                .store
                .insert_codes(kind, std::slice::from_ref(&record))
                .await
            {
                Ok(()) => {
                    if self.mode().is_persistent() {
                        info!(%kind, code = %code, "issued access code");
                    } else {
                        warn!(%kind, "store not configured, returning unpersisted code");
                    }
                    return Ok(code);
                }
                Err(e) if e.is_conflict() => {
                    debug!(%kind, attempt, "insert collided, retrying");
                }
                Err(e) => {
                    error!(%kind, error = %e, "failed to persist access code");
                    return Err(e.into());
                }
            }
        }
        Err(AccessError::Exhausted {
            kind,
            attempts: MAX_ISSUE_ATTEMPTS,
        })
    }

    /// Bulk-generate codes for every kind in one pass.
    ///
    /// Repeated calls append. Kinds already inserted stay inserted if a later
    /// kind fails.
    pub async fn seed(&self, counts: SeedCounts) -> Result<SeedReport, AccessError> {
        if let Some(kind) = CodeKind::ALL
            .into_iter()
            .find(|k| counts.get(*k) > MAX_SEED_COUNT)
        {
            return Err(AccessError::Invalid(format!(
                "Cannot seed {} {kind} codes; at most {MAX_SEED_COUNT} per kind",
                counts.get(kind)
            )));
        }
        if !self.mode().is_persistent() {
            warn!("store not configured, skipping seed");
            return Err(AccessError::NotConfigured);
        }

        let mut report = SeedReport::default();
        for kind in CodeKind::ALL {
            let wanted = counts.get(kind);
            if wanted == 0 {
                continue;
            }
            let codes = self.insert_fresh_batch(kind, wanted).await?;
            *report.codes_mut(kind) = codes;
        }

        info!(
            team = report.team.len(),
            coach = report.coach.len(),
            company = report.company.len(),
            "seeded access codes"
        );
        Ok(report)
    }

    /// Mark a code inactive. Returns whether it existed.
    pub async fn revoke(&self, kind: CodeKind, code: &str) -> Result<bool, AccessError> {
        if !self.mode().is_persistent() {
            return Err(AccessError::NotConfigured);
        }
        let existed = self.store.set_code_active(kind, code, false).await?;
        if existed {
            info!(%kind, code, "revoked access code");
        }
        Ok(existed)
    }

    /// Generate `n` codes unique within the batch and the store, then insert
    /// them together. A racing insert that collides restarts the batch.
    async fn insert_fresh_batch(
        &self,
        kind: CodeKind,
        n: usize,
    ) -> Result<Vec<String>, AccessError> {
        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let mut seen = HashSet::with_capacity(n);
            let mut records = Vec::with_capacity(n);
            while records.len() < n {
                let code = generate_code();
                if seen.contains(&code) || self.store.find_code(kind, &code).await?.is_some() {
                    continue;
                }
                seen.insert(code.clone());
                records.push(AccessCode::issued(kind, code));
            }

            match self.store.insert_codes(kind, &records).await {
                Ok(()) => return Ok(records.into_iter().map(|r| r.value).collect()),
                Err(e) if e.is_conflict() => {
                    debug!(%kind, attempt, "seed batch collided, regenerating");
                }
                Err(e) => {
                    error!(%kind, error = %e, "failed to seed access codes");
                    return Err(e.into());
                }
            }
        }
        Err(AccessError::Exhausted {
            kind,
            attempts: MAX_ISSUE_ATTEMPTS,
        })
    }
}
