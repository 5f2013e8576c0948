//! Spend conditions attached to outputs
//!
//! A condition is an opaque predicate over the satisfier argument list.
//! Evaluation is fail-closed: an `Err` from `evaluate` is treated exactly
//! like `Ok(false)`.

use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};
use std::fmt;
use std::sync::Arc;

use crate::encoding::{sha256, write_bytes, write_hash};
use crate::error::{ConsensusError, Result};
use crate::types::{hash_to_bytes, Arg, Hash256};

const COND_ALWAYS: u8 = 0x01;
const COND_SUM_EQUALS: u8 = 0x02;
const COND_HASH_LOCK: u8 = 0x03;
const COND_SIGNATURE: u8 = 0x04;
const COND_FN: u8 = 0x05;

/// Predicate deciding whether a satisfier may spend an output
pub trait SpendCondition: fmt::Debug + Send + Sync {
    /// Evaluate the predicate against the satisfier arguments
    fn evaluate(&self, args: &[Arg]) -> Result<bool>;

    /// Canonical bytes identifying this condition inside a transaction hash
    fn identity(&self) -> Vec<u8>;
}

/// Run a condition, mapping any error to rejection
pub fn condition_accepts(condition: &dyn SpendCondition, args: &[Arg]) -> bool {
    match condition.evaluate(args) {
        Ok(accepted) => accepted,
        Err(e) => {
            log::debug!("spend condition failed closed: {}", e);
            false
        }
    }
}

/// Accepts any satisfier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlwaysSpendable;

impl SpendCondition for AlwaysSpendable {
    fn evaluate(&self, _args: &[Arg]) -> Result<bool> {
        Ok(true)
    }

    fn identity(&self) -> Vec<u8> {
        vec![COND_ALWAYS]
    }
}

/// Accepts when every argument is an integer and they add up to the constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SumEquals(pub i64);

impl SpendCondition for SumEquals {
    fn evaluate(&self, args: &[Arg]) -> Result<bool> {
        if args.is_empty() {
            return Err(ConsensusError::Script("SumEquals needs at least one argument".to_string()));
        }
        let mut total: i64 = 0;
        for (i, arg) in args.iter().enumerate() {
            let value = match arg {
                Arg::Int(value) => *value,
                other => {
                    return Err(ConsensusError::Script(format!(
                        "argument {} is not an integer: {:?}",
                        i, other
                    )))
                }
            };
            total = total
                .checked_add(value)
                .ok_or_else(|| ConsensusError::Script("integer overflow".to_string()))?;
        }
        Ok(total == self.0)
    }

    fn identity(&self) -> Vec<u8> {
        let mut bytes = vec![COND_SUM_EQUALS];
        bytes.extend_from_slice(&self.0.to_le_bytes());
        bytes
    }
}

/// Accepts a single byte-string argument whose SHA-256 equals the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLock(pub Hash256);

impl HashLock {
    pub fn from_preimage(preimage: &[u8]) -> Self {
        Self(sha256(preimage))
    }
}

impl SpendCondition for HashLock {
    fn evaluate(&self, args: &[Arg]) -> Result<bool> {
        match args {
            [Arg::Bytes(preimage)] => Ok(sha256(preimage) == self.0),
            _ => Err(ConsensusError::Script("HashLock expects one byte argument".to_string())),
        }
    }

    fn identity(&self) -> Vec<u8> {
        let mut bytes = vec![COND_HASH_LOCK];
        write_hash(&mut bytes, &self.0);
        bytes
    }
}

/// ECDSA check: args are `[Bytes(message), Bytes(der_signature)]`, the
/// signature must cover `sha256(message)` under the stored public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureCheck(pub PublicKey);

impl SpendCondition for SignatureCheck {
    fn evaluate(&self, args: &[Arg]) -> Result<bool> {
        let (message, signature_bytes) = match args {
            [Arg::Bytes(message), Arg::Bytes(signature)] => (message, signature),
            _ => {
                return Err(ConsensusError::Script(
                    "SignatureCheck expects [message, signature]".to_string(),
                ))
            }
        };
        let signature = Signature::from_der(signature_bytes)
            .map_err(|e| ConsensusError::Script(format!("bad DER signature: {}", e)))?;
        let digest = hash_to_bytes(&sha256(message));
        let message = Message::from_digest_slice(&digest)
            .map_err(|e| ConsensusError::Script(e.to_string()))?;

        let secp = Secp256k1::verification_only();
        Ok(secp.verify_ecdsa(&message, &signature, &self.0).is_ok())
    }

    fn identity(&self) -> Vec<u8> {
        let mut bytes = vec![COND_SIGNATURE];
        bytes.extend_from_slice(&self.0.serialize());
        bytes
    }
}

type Predicate = dyn Fn(&[Arg]) -> Result<bool> + Send + Sync;

/// Caller-supplied predicate; its label is what the transaction hash commits to
#[derive(Clone)]
pub struct FnCondition {
    label: String,
    predicate: Arc<Predicate>,
}

impl FnCondition {
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for FnCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCondition").field("label", &self.label).finish()
    }
}

impl SpendCondition for FnCondition {
    fn evaluate(&self, args: &[Arg]) -> Result<bool> {
        (self.predicate)(args)
    }

    fn identity(&self) -> Vec<u8> {
        let mut bytes = vec![COND_FN];
        write_bytes(&mut bytes, self.label.as_bytes());
        bytes
    }
}
