//! Large-payload coder: segmentation, CRC attach/strip, and the per-block
//! polar encode/decode/rate-match orchestration (3GPP TS 38.212 §5.3.1,
//! §6.3.1.2.1).

use common::utils::{crc_attach, crc_checksum, CRC11_POLY, CRC6_POLY};
use tracing::debug;

use crate::codec::polar::{self, PolarCode, NMAX_LOG};
use crate::UciError;

/// CRC length `L(A)` (3GPP TS 38.212 §6.3.1.2.1).
pub fn crc_len(a: usize) -> usize {
    if a <= 11 {
        0
    } else if a <= 19 {
        6
    } else {
        11
    }
}

fn crc_poly(l: usize) -> u64 {
    if l == 6 {
        CRC6_POLY
    } else {
        CRC11_POLY
    }
}

/// Segmentation flag (3GPP TS 38.212 §6.3.1.2.1): two code blocks once the
/// payload is large enough that a single polar mother code can no longer
/// cover it.
pub fn is_segmented(a: usize, e: usize) -> bool {
    (a >= 360 && e >= 1088) || a >= 1013
}

struct Segmentation {
    c: usize,
    a_prime: usize,
    l: usize,
    k_r: usize,
    e_r: usize,
}

fn segmentation(a: usize, e: usize) -> Segmentation {
    let c = if is_segmented(a, e) { 2 } else { 1 };
    let a_prime = c * ((a + c - 1) / c);
    let l = crc_len(a);
    let k_r = a_prime / c + l;
    let e_r = e / c;
    Segmentation { c, a_prime, l, k_r, e_r }
}

/// Encode an `A`-bit payload (12 <= A <= 1706) into an `E`-bit rate-matched
/// polar codeword, segmenting into two code blocks when required.
pub fn encode(payload: &[u8], a: usize, e: usize) -> Result<Vec<u8>, UciError> {
    if !(12..=1706).contains(&a) {
        return Err(UciError::InvalidInput(format!("A={} out of range for the polar coder", a)));
    }
    let seg = segmentation(a, e);
    let mut out = Vec::with_capacity(e);

    let mut consumed = 0usize;
    for r in 0..seg.c {
        let prefix_len = if r == 0 { seg.a_prime - a } else { 0 };
        let payload_len = seg.a_prime / seg.c - prefix_len;

        let mut info = vec![0u8; prefix_len];
        info.extend_from_slice(&payload[consumed..consumed + payload_len]);
        consumed += payload_len;

        if seg.l > 0 {
            crc_attach(crc_poly(seg.l), seg.l as u32, &mut info);
        }
        debug_assert_eq!(info.len(), seg.k_r);

        let code = PolarCode::new(seg.k_r, seg.e_r, NMAX_LOG);
        let allocated = polar::chanalloc_tx(&code, &info);
        let encoded = polar::encode(&code, &allocated);
        let rm = polar::rate_match_tx(&code, &encoded);
        out.extend_from_slice(&rm);
    }

    debug!("polar_coder encoded A={} E={} C={}", a, e, seg.c);
    Ok(out)
}

/// Decode an `E`-bit LLR sequence back into an `A`-bit payload.
///
/// Input LLRs use the external "positive -> 0" convention; they are
/// sign-inverted once here before rate-match recovery, because the polar
/// decoder's internal convention is the opposite.
pub fn decode(llr: &[i8], a: usize, e: usize) -> Result<(Vec<u8>, bool), UciError> {
    if !(12..=1706).contains(&a) {
        return Err(UciError::InvalidInput(format!("A={} out of range for the polar coder", a)));
    }
    if llr.len() < e {
        return Err(UciError::InvalidInput(format!("LLR buffer too short: got {}, need {}", llr.len(), e)));
    }
    let seg = segmentation(a, e);

    let inverted: Vec<f32> = llr[..e].iter().map(|&v| -(v as f32)).collect();

    let mut payload = Vec::with_capacity(a);
    let mut decoded_ok = true;

    for r in 0..seg.c {
        let block_llr = &inverted[r * seg.e_r..(r + 1) * seg.e_r];

        let code = PolarCode::new(seg.k_r, seg.e_r, NMAX_LOG);
        let d_llr = polar::rate_match_rx(&code, block_llr);
        let decoded_u = polar::decode(&code, &d_llr);
        let info = polar::chanalloc_rx(&code, &decoded_u);

        let prefix_len = if r == 0 { seg.a_prime - a } else { 0 };
        let payload_len = seg.a_prime / seg.c - prefix_len;
        let info_bits = &info[..payload_len + prefix_len];
        let tail = &info[payload_len + prefix_len..];

        if seg.l > 0 {
            let checksum = crc_checksum(crc_poly(seg.l), seg.l as u32, info_bits);
            let mut tail_value = 0u32;
            for &b in tail {
                tail_value = (tail_value << 1) | b as u32;
            }
            if checksum != tail_value {
                decoded_ok = false;
            }
        }

        payload.extend_from_slice(&info_bits[prefix_len..]);
    }

    debug!("polar_coder decoded A={} E={} C={} ok={}", a, e, seg.c, decoded_ok);
    Ok((payload, decoded_ok))
}
