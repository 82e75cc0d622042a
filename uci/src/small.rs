//! Small-payload coders (3GPP TS 38.212 §5.3.3.1-§5.3.3.3): A=1 repetition,
//! A=2 simplex, and the 3<=A<=11 Reed-Muller wrapper.

use crate::codec::block;
use crate::types::UciBit;
use crate::UciError;

/// Emit the A=1 modulation-aware placeholder/repetition pattern (3GPP TS
/// 38.212 Table 5.3.3.1-1) until `e` bits are produced; the final symbol's
/// tail truncates if `e` is not a multiple of `qm`.
pub fn encode_a1(payload_bit: u8, e: usize, qm: usize) -> Result<Vec<u8>, UciError> {
    if qm == 0 {
        return Err(UciError::InvalidInput("modulation order Qm must be nonzero".into()));
    }
    let c0 = UciBit::from_payload_bit(payload_bit).as_u8();
    let mut symbol = vec![0u8; qm];
    symbol[0] = c0;
    if qm >= 2 {
        symbol[1] = UciBit::Repetition.as_u8();
    }
    for slot in symbol.iter_mut().skip(2) {
        *slot = UciBit::Placeholder.as_u8();
    }

    let mut out = Vec::with_capacity(e);
    while out.len() < e {
        let remaining = e - out.len();
        let take = remaining.min(qm);
        out.extend_from_slice(&symbol[..take]);
    }
    Ok(out)
}

/// Decode an A=1 codeword: sample one LLR per symbol, correlate, and
/// compare the normalized correlation against `one_bit_threshold`.
pub fn decode_a1(llr: &[i8], qm: usize, one_bit_threshold: f32) -> Result<(u8, bool), UciError> {
    if qm == 0 {
        return Err(UciError::InvalidInput("modulation order Qm must be nonzero".into()));
    }
    let e = llr.len();
    let mut corr = 0f32;
    let mut pwr = 0f32;
    let mut n = 0usize;
    let mut i = 0;
    while i < e {
        let v = llr[i] as f32;
        corr += v;
        pwr += v * v;
        n += 1;
        i += qm;
    }
    let _ = n;
    let norm = qm as f32 * corr / (e as f32 * pwr.sqrt());
    let bit = if corr < 0.0 { 1 } else { 0 };
    // Compared as a magnitude: the sign of `norm` only carries the bit
    // decision above, not confidence, so a confident bit=1 decode must not
    // be judged by a signed comparison against a positive threshold.
    Ok((bit, norm.abs() > one_bit_threshold))
}

/// Per-3-symbol emission tables for A=2 (3GPP TS 38.212 §5.3.3.2). Returns
/// the bit pattern for one group of (c0, c1, c2), modulation-order-dependent.
fn a2_group(c0: u8, c1: u8, c2: u8, qm: usize) -> Vec<u8> {
    let ph = UciBit::Placeholder.as_u8();
    let b = |bit: u8| UciBit::from_payload_bit(bit).as_u8();
    match qm {
        1 | 2 => vec![b(c0), b(c1), b(c2)],
        4 => vec![b(c0), b(c1), ph, ph, b(c2), b(c0), ph, ph, b(c1), b(c2), ph, ph],
        6 => vec![
            b(c0), b(c1), ph, ph, ph, ph,
            b(c2), b(c0), ph, ph, ph, ph,
            b(c1), b(c2), ph, ph, ph, ph,
        ],
        8 => vec![
            b(c0), b(c1), ph, ph, ph, ph, ph, ph,
            b(c2), b(c0), ph, ph, ph, ph, ph, ph,
            b(c1), b(c2), ph, ph, ph, ph, ph, ph,
        ],
        _ => vec![b(c0), b(c1), b(c2)],
    }
}

pub fn encode_a2(payload: &[u8], e: usize, qm: usize) -> Result<Vec<u8>, UciError> {
    if payload.len() < 2 {
        return Err(UciError::InvalidInput("A=2 payload needs exactly 2 bits".into()));
    }
    let c0 = payload[0];
    let c1 = payload[1];
    let c2 = c0 ^ c1;
    let group = a2_group(c0, c1, c2, qm);

    let mut out = Vec::with_capacity(e);
    while out.len() < e {
        let remaining = e - out.len();
        let take = remaining.min(group.len());
        out.extend_from_slice(&group[..take]);
    }
    Ok(out)
}

/// Decode an A=2 codeword: sample the non-placeholder LLRs in emission
/// order into a circular triple and check the parity invariant
/// `c2 == c0 ^ c1` (3GPP TS 38.212 §5.3.3.2, simplex code).
pub fn decode_a2(llr: &[i8], qm: usize) -> Result<(Vec<u8>, bool), UciError> {
    let slot_width = match qm {
        1 | 2 => 1,
        4 | 6 | 8 => qm,
        _ => return Err(UciError::InvalidInput(format!("unsupported Qm {}", qm))),
    };
    let group_len = 3 * slot_width;
    if llr.len() < group_len {
        return Err(UciError::InvalidInput("not enough LLR samples to decode A=2".into()));
    }

    let (mut corr0, mut corr1, mut corr2) = (0f32, 0f32, 0f32);
    let mut g = 0;
    while g + group_len <= llr.len() {
        let slot0 = &llr[g..g + slot_width];
        let slot1 = &llr[g + slot_width..g + 2 * slot_width];
        let slot2 = &llr[g + 2 * slot_width..g + 3 * slot_width];
        if slot_width == 1 {
            corr0 += slot0[0] as f32;
            corr1 += slot1[0] as f32;
            corr2 += slot2[0] as f32;
        } else {
            corr0 += slot0[0] as f32 + slot1[1] as f32;
            corr1 += slot0[1] as f32 + slot2[0] as f32;
            corr2 += slot1[0] as f32 + slot2[1] as f32;
        }
        g += group_len;
    }

    let c0 = if corr0 < 0.0 { 1 } else { 0 };
    let c1 = if corr1 < 0.0 { 1 } else { 0 };
    let c2 = if corr2 < 0.0 { 1 } else { 0 };
    let valid = c2 == (c0 ^ c1);
    Ok((vec![c0, c1], valid))
}

/// 3<=A<=11: delegate to the Reed-Muller (32,11) block code.
pub fn encode_block(payload: &[u8], a: usize, e: usize) -> Result<Vec<u8>, UciError> {
    let codeword = block::encode(payload, a);
    if a == 11 && e <= 16 {
        return Err(UciError::CodecFailure("A=11 with E<=16 cannot be recovered by the Reed-Muller decoder".into()));
    }
    Ok((0..e).map(|i| codeword[i % 32]).collect())
}

pub fn decode_block(llr: &[i8], a: usize, block_code_threshold: f32) -> Result<(Vec<u8>, bool), UciError> {
    let pwr: f32 = llr.iter().map(|&v| (v as f32) * (v as f32)).sum::<f32>() / llr.len() as f32;
    if pwr == 0.0 {
        return Err(UciError::InvalidInput("zero-power LLR input".into()));
    }
    if a == 11 && llr.len() <= 16 {
        return Err(UciError::CodecFailure("A=11 with E<=16 cannot be recovered by the Reed-Muller decoder".into()));
    }
    let (payload, corr) = block::decode(llr, llr.len(), a);
    Ok((payload, corr > block_code_threshold))
}

/// Unified small-payload encoder dispatch for `1 <= A <= 11`.
pub fn encode(payload: &[u8], a: usize, e: usize, qm: usize) -> Result<Vec<u8>, UciError> {
    match a {
        1 => encode_a1(payload[0], e, qm),
        2 => encode_a2(payload, e, qm),
        3..=11 => encode_block(payload, a, e),
        _ => Err(UciError::InvalidInput(format!("A={} out of range for small-payload coder", a))),
    }
}

/// Unified small-payload decoder dispatch for `1 <= A <= 11`.
pub fn decode(
    llr: &[i8],
    a: usize,
    qm: usize,
    block_code_threshold: f32,
    one_bit_threshold: f32,
) -> Result<(Vec<u8>, bool), UciError> {
    match a {
        1 => {
            let (bit, valid) = decode_a1(llr, qm, one_bit_threshold)?;
            Ok((vec![bit], valid))
        }
        2 => decode_a2(llr, qm),
        3..=11 => decode_block(llr, a, block_code_threshold),
        _ => Err(UciError::InvalidInput(format!("A={} out of range for small-payload coder", a))),
    }
}
