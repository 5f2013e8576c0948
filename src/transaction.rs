//! Transactions, their inputs and outputs, and the per-transaction rules

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::encoding::{
    encode_varint, sha256, write_args, write_bytes, write_hash, TAG_ABSENT, TAG_PRESENT,
};
use crate::error::{ConsensusError, Result};
use crate::merkle::Hashable;
use crate::script::{condition_accepts, SpendCondition};
use crate::types::*;

/// Spendable value guarded by an optional condition
#[derive(Clone)]
pub struct Output {
    condition: Option<Arc<dyn SpendCondition>>,
    amount: Amount,
}

impl Output {
    /// Output any satisfier may spend
    pub fn unlocked(amount: Amount) -> Self {
        Self {
            condition: None,
            amount,
        }
    }

    pub fn new<C>(condition: C, amount: Amount) -> Self
    where
        C: SpendCondition + 'static,
    {
        Self {
            condition: Some(Arc::new(condition)),
            amount,
        }
    }

    pub fn with_shared_condition(condition: Arc<dyn SpendCondition>, amount: Amount) -> Self {
        Self {
            condition: Some(condition),
            amount,
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn condition(&self) -> Option<&dyn SpendCondition> {
        self.condition.as_deref()
    }

    /// Whether `satisfier` unlocks this output; condition errors reject
    pub fn can_be_spent(&self, satisfier: &[Arg]) -> bool {
        match &self.condition {
            None => true,
            Some(condition) => condition_accepts(condition.as_ref(), satisfier),
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        match &self.condition {
            None => buf.push(TAG_ABSENT),
            Some(condition) => {
                buf.push(TAG_PRESENT);
                write_bytes(buf, &condition.identity());
            }
        }
        buf.extend_from_slice(&self.amount.to_le_bytes());
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("condition", &self.condition)
            .field("amount", &self.amount)
            .finish()
    }
}

/// Reference to a prior output plus the satisfier for its condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub prevout: OutPoint,
    pub satisfier: Vec<Arg>,
}

impl Input {
    pub fn new(prior_tx_hash: Hash256, prior_output_index: u64, satisfier: Vec<Arg>) -> Self {
        Self {
            prevout: OutPoint::new(prior_tx_hash, prior_output_index),
            satisfier,
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        write_hash(buf, &self.prevout.tx_hash);
        buf.extend_from_slice(&encode_varint(self.prevout.index));
        write_args(buf, &self.satisfier);
    }
}

/// Transaction: inputs (absent for a mint), outputs and an opaque payload
///
/// The hash is computed once at construction; a transaction cannot be
/// modified afterwards.
#[derive(Debug, Clone)]
pub struct Transaction {
    inputs: Option<Vec<Input>>,
    outputs: Option<Vec<Output>>,
    payload: Option<Vec<u8>>,
    hash: Hash256,
}

impl Transaction {
    pub fn new(
        inputs: Option<Vec<Input>>,
        outputs: Option<Vec<Output>>,
        payload: Option<Vec<u8>>,
    ) -> Self {
        let hash = calculate_tx_hash(inputs.as_deref(), outputs.as_deref(), payload.as_deref());
        Self {
            inputs,
            outputs,
            payload,
            hash,
        }
    }

    /// Mint transaction: no inputs, new value in `outputs`
    pub fn coinbase(outputs: Vec<Output>, payload: Option<Vec<u8>>) -> Self {
        Self::new(None, Some(outputs), payload)
    }

    pub fn spend(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self::new(Some(inputs), Some(outputs), None)
    }

    pub fn hash(&self) -> Hash256 {
        self.hash
    }

    /// Inputs being spent; empty for a mint
    pub fn inputs(&self) -> &[Input] {
        self.inputs.as_deref().unwrap_or(&[])
    }

    pub fn outputs(&self) -> &[Output] {
        self.outputs.as_deref().unwrap_or(&[])
    }

    pub fn output_at(&self, index: usize) -> Option<&Output> {
        self.outputs().get(index)
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Inputs absent entirely (an empty input list is not a mint)
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_none()
    }

    /// Σ output amounts, `None` on overflow
    pub fn total_output(&self) -> Option<Amount> {
        self.outputs()
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.amount))
    }

    /// CheckMint: no inputs, at least one output, Σ outputs ≤ cap
    pub fn check_mint(&self, max_coins_to_create: Amount) -> Result<()> {
        if !self.is_coinbase() {
            return Err(ConsensusError::Structural(
                "mint transaction must not have inputs".to_string(),
            ));
        }
        if self.outputs().is_empty() {
            return Err(ConsensusError::Structural(
                "mint transaction must create at least one output".to_string(),
            ));
        }
        let minted = self.total_output().ok_or(ConsensusError::MintCap {
            minted: Amount::MAX,
            cap: max_coins_to_create,
        })?;
        if minted > max_coins_to_create {
            return Err(ConsensusError::MintCap {
                minted,
                cap: max_coins_to_create,
            });
        }
        Ok(())
    }

    pub fn validate_mint(&self, max_coins_to_create: Amount) -> bool {
        self.check_mint(max_coins_to_create).is_ok()
    }

    /// CheckTxInputs: 𝒯𝒳 × 𝒰𝒮 → Result<Σ inputs>
    ///
    /// 1. A mint is trivially valid here (cap enforced by the block)
    /// 2. Every input names a distinct entry present in `utxo_set`
    /// 3. Every entry's condition accepts the input's satisfier
    /// 4. Σ inputs ≥ Σ outputs; the difference is burned
    pub fn check_inputs(&self, utxo_set: &UtxoSet) -> Result<Amount> {
        let inputs = match &self.inputs {
            None => return Ok(0),
            Some(inputs) => inputs,
        };

        let mut seen = HashSet::with_capacity(inputs.len());
        let mut total_in: Amount = 0;
        for input in inputs {
            if !seen.insert(input.prevout) {
                return Err(ConsensusError::DoubleSpend(input.prevout));
            }
            let utxo = utxo_set
                .get(&input.prevout)
                .ok_or(ConsensusError::MissingOutput(input.prevout))?;
            if !utxo.can_be_spent(&input.satisfier) {
                return Err(ConsensusError::PredicateRejected(input.prevout));
            }
            total_in = total_in
                .checked_add(utxo.amount)
                .ok_or_else(|| ConsensusError::Structural("input sum overflows".to_string()))?;
        }

        let total_out = self.total_output().ok_or(ConsensusError::Conservation {
            inputs: total_in,
            outputs: Amount::MAX,
        })?;
        if total_in < total_out {
            return Err(ConsensusError::Conservation {
                inputs: total_in,
                outputs: total_out,
            });
        }
        Ok(total_in)
    }

    pub fn validate(&self, utxo_set: &UtxoSet) -> bool {
        match self.check_inputs(utxo_set) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("transaction {:#x} rejected: {}", self.hash, e);
                false
            }
        }
    }
}

impl Hashable for Transaction {
    fn content_hash(&self) -> Hash256 {
        self.hash
    }
}

/// ApplyTransaction: 𝒯𝒳 × 𝒰𝒮 → 𝒰𝒮
///
/// us' = (us \ {i.prevout : i ∈ tx.inputs}) ∪ {(tx.id, i) ↦ tx.outputs[i]}
///
/// Callers validate first; this only rewrites the set.
pub fn apply_transaction(tx: &Transaction, mut utxo_set: UtxoSet) -> UtxoSet {
    for input in tx.inputs() {
        utxo_set.remove(&input.prevout);
    }
    let tx_hash = tx.hash();
    for (i, output) in tx.outputs().iter().enumerate() {
        utxo_set.insert(OutPoint::new(tx_hash, i as u64), output.clone());
    }
    utxo_set
}

/// Hash of the canonical (inputs, outputs, payload) encoding
fn calculate_tx_hash(
    inputs: Option<&[Input]>,
    outputs: Option<&[Output]>,
    payload: Option<&[u8]>,
) -> Hash256 {
    let mut data = Vec::new();

    match inputs {
        None => data.push(TAG_ABSENT),
        Some(inputs) => {
            data.push(TAG_PRESENT);
            data.extend_from_slice(&encode_varint(inputs.len() as u64));
            for input in inputs {
                input.encode(&mut data);
            }
        }
    }

    match outputs {
        None => data.push(TAG_ABSENT),
        Some(outputs) => {
            data.push(TAG_PRESENT);
            data.extend_from_slice(&encode_varint(outputs.len() as u64));
            for output in outputs {
                output.encode(&mut data);
            }
        }
    }

    match payload {
        None => data.push(TAG_ABSENT),
        Some(payload) => {
            data.push(TAG_PRESENT);
            write_bytes(&mut data, payload);
        }
    }

    sha256(&data)
}
