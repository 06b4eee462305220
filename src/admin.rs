use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use log::{error, info, warn};
use serde::Serialize;

use crate::error::DirectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    Locked,
    Unlocked,
}

pub enum Attempt {
    /// Nothing to verify: already unlocked, or the prompt was cancelled.
    Settled(GateState),
    Verify(SecretCheck),
}

/// A pending bcrypt comparison. `run` blocks for the whole hash cost.
pub struct SecretCheck {
    credential: String,
    secret_hash: String,
}

impl SecretCheck {
    pub fn run(self) -> bool {
        verify(&self.credential, &self.secret_hash).unwrap_or_else(|e| {
            error!("Failed to verify admin password: {}", e);
            false
        })
    }
}

/// Admin mode toggle. Decides whether privileged controls are offered; it protects
/// nothing on the store side.
pub struct AdminGate {
    secret_hash: String,
    state: GateState,
}

impl AdminGate {
    pub fn new(secret: &str) -> Result<Self, BcryptError> {
        Self::with_cost(secret, DEFAULT_COST)
    }

    pub fn with_cost(secret: &str, cost: u32) -> Result<Self, BcryptError> {
        Ok(Self {
            secret_hash: hash(secret, cost)?,
            state: GateState::Locked,
        })
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Tries to unlock with `credential`. `None` or an empty string is a cancelled
    /// prompt: the gate stays locked and no error is reported.
    pub fn enter(&mut self, credential: Option<&str>) -> Result<GateState, DirectoryError> {
        match self.attempt(credential) {
            Attempt::Settled(state) => Ok(state),
            Attempt::Verify(check) => self.conclude(check.run()),
        }
    }

    /// First half of `enter`. A returned `SecretCheck` owns everything it needs, so the
    /// gate can be released while the hash is compared.
    pub fn attempt(&self, credential: Option<&str>) -> Attempt {
        if self.is_unlocked() {
            return Attempt::Settled(self.state);
        }
        match credential {
            Some(c) if !c.is_empty() => Attempt::Verify(SecretCheck {
                credential: c.to_string(),
                secret_hash: self.secret_hash.clone(),
            }),
            _ => Attempt::Settled(self.state),
        }
    }

    /// Second half of `enter`, given the outcome of the `SecretCheck`.
    pub fn conclude(&mut self, matched: bool) -> Result<GateState, DirectoryError> {
        if self.is_unlocked() {
            return Ok(self.state);
        }
        if !matched {
            warn!("Rejected admin password");
            return Err(DirectoryError::AuthorizationMismatch);
        }
        info!("Admin mode unlocked");
        self.state = GateState::Unlocked;
        Ok(self.state)
    }

    pub fn exit(&mut self) -> GateState {
        if self.is_unlocked() {
            info!("Admin mode locked");
        }
        self.state = GateState::Locked;
        self.state
    }

    /// Fails with `Locked` unless admin mode is on.
    pub fn require_unlocked(&self) -> Result<(), DirectoryError> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(DirectoryError::Locked)
        }
    }
}
