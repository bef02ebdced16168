//! Calldata encoding and return-data decoding for the ledger contract.
//!
//! The contract surface is small enough that the ABI is handled by hand:
//!
//! ```text
//! verifyProof(bytes publicValues, bytes proofBytes)        nonpayable
//! getTopScores() -> Score[]                                 view
//! getPlayerScore(address player) -> Score                   view
//! struct Score { address player; uint256 timestamp;
//!                uint256 blocksDestroyed; uint256 timeElapsed; }
//! ```

use tiny_keccak::{Hasher, Keccak};

use prover_client::ProofData;

use crate::types::{Address, ContractCall, ScoreRecord};

const WORD: usize = 32;

/// Decoding errors for contract return data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("return data truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("uint256 value does not fit in u64")]
    ValueOverflow,

    #[error("invalid array offset or length")]
    InvalidLayout,
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// First four bytes of the keccak256 of the function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn push_u64_word(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&[0u8; 24]);
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_bytes_tail(out: &mut Vec<u8>, data: &[u8]) {
    push_u64_word(out, data.len() as u64);
    out.extend_from_slice(data);
    out.resize(out.len() + (padded_len(data.len()) - data.len()), 0);
}

/// Encode the single `verifyProof(publicValues, proofBytes)` invocation.
pub fn verify_proof_call(contract: Address, proof: &ProofData) -> ContractCall {
    let mut calldata = Vec::with_capacity(
        4 + 4 * WORD + padded_len(proof.public_values.len()) + padded_len(proof.proof_bytes.len()),
    );
    calldata.extend_from_slice(&selector("verifyProof(bytes,bytes)"));

    // Two dynamic arguments: head holds offsets from the start of the
    // argument block, tail holds length-prefixed padded bytes.
    let public_values_offset = 2 * WORD;
    let proof_offset = public_values_offset + WORD + padded_len(proof.public_values.len());
    push_u64_word(&mut calldata, public_values_offset as u64);
    push_u64_word(&mut calldata, proof_offset as u64);
    push_bytes_tail(&mut calldata, &proof.public_values);
    push_bytes_tail(&mut calldata, &proof.proof_bytes);

    ContractCall {
        to: contract,
        calldata,
    }
}

/// Encode `getTopScores()`.
pub fn top_scores_call(contract: Address) -> ContractCall {
    ContractCall {
        to: contract,
        calldata: selector("getTopScores()").to_vec(),
    }
}

/// Encode `getPlayerScore(address)`.
pub fn player_score_call(contract: Address, player: Address) -> ContractCall {
    let mut calldata = Vec::with_capacity(4 + WORD);
    calldata.extend_from_slice(&selector("getPlayerScore(address)"));
    calldata.extend_from_slice(&[0u8; 12]);
    calldata.extend_from_slice(player.as_bytes());
    ContractCall {
        to: contract,
        calldata,
    }
}

fn word_at(data: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD;
    let end = start + WORD;
    if data.len() < end {
        return Err(AbiError::Truncated {
            expected: end,
            actual: data.len(),
        });
    }
    Ok(&data[start..end])
}

fn read_u64(word: &[u8]) -> Result<u64, AbiError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(AbiError::ValueOverflow);
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&word[24..32]);
    Ok(u64::from_be_bytes(raw))
}

fn read_address(word: &[u8]) -> Address {
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&word[12..32]);
    Address(addr)
}

fn decode_score_at(data: &[u8], word_index: usize) -> Result<ScoreRecord, AbiError> {
    Ok(ScoreRecord {
        player: read_address(word_at(data, word_index)?),
        timestamp: read_u64(word_at(data, word_index + 1)?)?,
        blocks_destroyed: read_u64(word_at(data, word_index + 2)?)?,
        time_elapsed: read_u64(word_at(data, word_index + 3)?)?,
    })
}

/// Decode the `Score[]` return of `getTopScores`.
///
/// Layout: one offset word to the array, then the element count, then four
/// static words per score.
pub fn decode_top_scores(data: &[u8]) -> Result<Vec<ScoreRecord>, AbiError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let offset = read_u64(word_at(data, 0)?)? as usize;
    if offset % WORD != 0 {
        return Err(AbiError::InvalidLayout);
    }
    let len_index = offset / WORD;
    let count = read_u64(word_at(data, len_index)?)? as usize;

    // The claimed count comes from untrusted return data; it must fit in the
    // payload before it sizes any allocation.
    let needed = count
        .checked_mul(4)
        .and_then(|words| words.checked_add(len_index + 1))
        .and_then(|words| words.checked_mul(WORD))
        .ok_or(AbiError::InvalidLayout)?;
    if needed > data.len() {
        return Err(AbiError::Truncated {
            expected: needed,
            actual: data.len(),
        });
    }

    let mut scores = Vec::with_capacity(count);
    for i in 0..count {
        scores.push(decode_score_at(data, len_index + 1 + i * 4)?);
    }
    Ok(scores)
}

/// Decode the single `Score` return of `getPlayerScore`.
///
/// The contract returns a zeroed record for players with no score; that maps
/// to `None`.
pub fn decode_player_score(data: &[u8]) -> Result<Option<ScoreRecord>, AbiError> {
    if data.is_empty() {
        return Ok(None);
    }

    let score = decode_score_at(data, 0)?;
    if score.player.is_zero() {
        return Ok(None);
    }
    Ok(Some(score))
}
