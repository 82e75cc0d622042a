//! Polar code kernel: parameter derivation, channel allocation, encode,
//! successive-cancellation decode, and rate matching.
//!
//! Generalized from a PDCCH-only polar code (which only accepted an
//! aggregation level). This version accepts an arbitrary `(K, E, n_max)`,
//! as the UCI segmented coder (3GPP TS 38.212 §5.3.1) requires, and adds
//! the decode and rate-match-rx directions the PDCCH path never needed.

use tracing::trace;

/// Maximum supported polar mother code length (log2).
pub const NMAX_LOG: usize = 10;

/// Derived polar code parameters for one (K, E) pair.
pub struct PolarCode {
    /// Mother code length N = 2^n_log.
    n: usize,
    n_log: usize,
    /// Information (+ CRC) bits K.
    k: usize,
    /// Rate-matched output length E.
    e: usize,
    /// True at information-set positions, false at frozen positions.
    frozen_bits: Vec<bool>,
    /// Sub-block interleaver pattern over N positions.
    block_interleaver: Vec<usize>,
}

impl PolarCode {
    /// Resolve polar code parameters for one code block.
    ///
    /// `K_r >= 18` always holds for this codec's payload range (A >= 12),
    /// so the 3GPP parity-check-bit branch (only active for K < 18) is
    /// never exercised and is intentionally not modeled here.
    pub fn new(k: usize, e: usize, n_max_log: usize) -> Self {
        let n_log = Self::calculate_n_log(k, e, n_max_log);
        let n = 1 << n_log;

        let reliability = Self::reliability_sequence(n);
        let frozen_bits = Self::allocate_bits(n, k, &reliability);
        let block_interleaver = Self::block_interleaver(n);

        Self { n, n_log, k, e, frozen_bits, block_interleaver }
    }

    fn calculate_n_log(k: usize, e: usize, n_max_log: usize) -> usize {
        let min_n = k.max(e / 2).max(1);
        for n_log in 5..=n_max_log {
            if (1usize << n_log) >= min_n {
                return n_log;
            }
        }
        n_max_log
    }

    /// Polarization-weight reliability ordering (self-consistent, not the
    /// literal 3GPP Q_N sequence, which is treated as part of the
    /// black-box polar primitive).
    fn reliability_sequence(n: usize) -> Vec<usize> {
        let n_log = n.trailing_zeros() as usize;
        let mut w = vec![0f64; n];
        for j in 0..n {
            w[j] = Self::bit_reversal(j, n_log) as f64;
        }
        for s in 1..=n_log {
            let increment = 1 << (n_log - s);
            for j in 0..increment {
                for t in 0..(1 << (s - 1)) {
                    let idx1 = j + t * 2 * increment;
                    let idx2 = idx1 + increment;
                    let w1 = w[idx1];
                    let w2 = w[idx2];
                    w[idx1] = w1 + w2;
                    w[idx2] = w2;
                }
            }
        }
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| w[a].partial_cmp(&w[b]).unwrap());
        indices
    }

    fn bit_reversal(val: usize, n_bits: usize) -> usize {
        let mut result = 0;
        let mut v = val;
        for _ in 0..n_bits {
            result = (result << 1) | (v & 1);
            v >>= 1;
        }
        result
    }

    fn allocate_bits(n: usize, k: usize, reliability: &[usize]) -> Vec<bool> {
        let mut frozen_bits = vec![false; n];
        for &idx in &reliability[n - k..] {
            frozen_bits[idx] = true;
        }
        frozen_bits
    }

    fn block_interleaver(n: usize) -> Vec<usize> {
        if n < 32 {
            return (0..n).collect();
        }
        let j_max = n / 32;
        let mut pattern = Vec::with_capacity(n);
        for k in 0..n {
            let i = k / j_max;
            let j = k % j_max;
            let k_prime = i + 32 * j;
            if k_prime < n {
                pattern.push(k_prime);
            }
        }
        pattern
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn e(&self) -> usize {
        self.e
    }
}

/// Scatter the K_r-bit info+CRC sequence into the N-bit pre-encode buffer
/// at the information-set positions, frozen positions left at 0.
pub fn chanalloc_tx(code: &PolarCode, info: &[u8]) -> Vec<u8> {
    let mut allocated = vec![0u8; code.n];
    let mut idx = 0;
    for (i, &is_info) in code.frozen_bits.iter().enumerate() {
        if is_info {
            allocated[i] = info[idx];
            idx += 1;
        }
    }
    allocated
}

/// Gather the K_r decoded bits back out of the N-bit decoded buffer's
/// information-set positions (inverse of `chanalloc_tx`).
pub fn chanalloc_rx(code: &PolarCode, decoded: &[u8]) -> Vec<u8> {
    let mut info = Vec::with_capacity(code.k);
    for (i, &is_info) in code.frozen_bits.iter().enumerate() {
        if is_info {
            info.push(decoded[i]);
        }
    }
    info
}

/// Polar-encode an N-bit allocated sequence (x = u * F^(x)n, natural order).
pub fn encode(code: &PolarCode, allocated: &[u8]) -> Vec<u8> {
    let mut out = allocated.to_vec();
    for s in 1..=code.n_log {
        let half_stage = 1 << (s - 1);
        let full_stage = 1 << s;
        for j in (0..code.n).step_by(full_stage) {
            for i in 0..half_stage {
                let u1 = j + i;
                let u2 = j + i + half_stage;
                out[u1] ^= out[u2];
            }
        }
    }
    trace!("polar encoded N={} K={}", code.n, code.k);
    out
}

/// Forward rate matching: sub-block interleave the N-bit codeword, then
/// repeat (E>=N), puncture (16K<=7E), or shorten (otherwise) to length E.
pub fn rate_match_tx(code: &PolarCode, d: &[u8]) -> Vec<u8> {
    let n = code.n;
    let e = code.e;
    let k = code.k;

    let mut interleaved = vec![0u8; n];
    for (i, &idx) in code.block_interleaver.iter().enumerate() {
        interleaved[i] = d[idx];
    }

    if e >= n {
        (0..e).map(|i| interleaved[i % n]).collect()
    } else if 16 * k <= 7 * e {
        interleaved[(n - e)..].to_vec()
    } else {
        interleaved[..e].to_vec()
    }
}

/// Inverse rate matching over soft LLRs: undo bit selection (combining
/// repeated positions, zeroing punctured positions, saturating shortened
/// positions to a strong "known zero" LLR) and de-interleave back to the
/// N-bit pre-decode (d) domain.
pub fn rate_match_rx(code: &PolarCode, llr_e: &[f32]) -> Vec<f32> {
    let n = code.n;
    let e = code.e;
    let k = code.k;
    const SHORTENED_LLR: f32 = 1.0e6;

    let mut interleaved_llr = vec![0f32; n];

    if e >= n {
        for (i, &llr) in llr_e.iter().enumerate() {
            interleaved_llr[i % n] += llr;
        }
    } else if 16 * k <= 7 * e {
        for i in 0..e {
            interleaved_llr[n - e + i] = llr_e[i];
        }
        // positions [0, n-e) were punctured: erasure (LLR = 0)
    } else {
        for i in 0..e {
            interleaved_llr[i] = llr_e[i];
        }
        for slot in interleaved_llr.iter_mut().skip(e) {
            *slot = SHORTENED_LLR;
        }
    }

    let mut d_llr = vec![0f32; n];
    for (i, &idx) in code.block_interleaver.iter().enumerate() {
        d_llr[idx] = interleaved_llr[i];
    }
    d_llr
}

/// Box-plus (min-sum) check-node combination in the LLR domain.
fn boxplus(a: f32, b: f32) -> f32 {
    a.signum() * b.signum() * a.abs().min(b.abs())
}

/// Recursive successive-cancellation decoder. `frozen` is the same
/// information-set mask used by `chanalloc_tx`/`chanalloc_rx`.
fn sc_decode(llr: &[f32], frozen: &[bool]) -> Vec<u8> {
    let n = llr.len();
    if n == 1 {
        return vec![if frozen[0] { 0 } else { (llr[0] < 0.0) as u8 }];
    }

    let m = n / 2;
    let (llr_a, llr_b) = llr.split_at(m);
    let (frozen_a, frozen_b) = frozen.split_at(m);

    let upper: Vec<f32> = (0..m).map(|i| boxplus(llr_a[i], llr_b[i])).collect();
    let u_a = sc_decode(&upper, frozen_a);

    let lower: Vec<f32> = (0..m)
        .map(|i| {
            let sign = if u_a[i] == 1 { -1.0 } else { 1.0 };
            llr_b[i] + sign * llr_a[i]
        })
        .collect();
    let u_b = sc_decode(&lower, frozen_b);

    let mut out = u_a;
    out.extend(u_b);
    out
}

/// Polar-decode an N-bit LLR sequence (d domain) into the N-bit u-domain hard decisions.
pub fn decode(code: &PolarCode, d_llr: &[f32]) -> Vec<u8> {
    sc_decode(d_llr, &code.frozen_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_llr(bits: &[u8]) -> Vec<f32> {
        bits.iter().map(|&b| if b == 0 { 10.0 } else { -10.0 }).collect()
    }

    #[test]
    fn test_encode_decode_roundtrip_no_rate_matching() {
        let k = 18;
        let e = 64;
        let code = PolarCode::new(k, e, NMAX_LOG);
        let info: Vec<u8> = (0..k).map(|i| (i % 3 == 0) as u8).collect();

        let allocated = chanalloc_tx(&code, &info);
        let encoded = encode(&code, &allocated);

        let llr = to_llr(&encoded);
        let decoded_u = decode(&code, &llr);
        let decoded_info = chanalloc_rx(&code, &decoded_u);

        assert_eq!(decoded_info, info);
    }

    #[test]
    fn test_encode_decode_roundtrip_with_rate_matching_puncture() {
        // N is fixed at 32 (the minimum mother code length); E < N and
        // 16*K <= 7*E (80 <= 217) selects the puncturing branch.
        let k = 5;
        let e = 31;
        let code = PolarCode::new(k, e, NMAX_LOG);
        let info: Vec<u8> = (0..k).map(|i| (i % 2 == 0) as u8).collect();

        let allocated = chanalloc_tx(&code, &info);
        let encoded = encode(&code, &allocated);
        let rm = rate_match_tx(&code, &encoded);
        assert_eq!(rm.len(), e);

        let llr_e = to_llr(&rm);
        let d_llr = rate_match_rx(&code, &llr_e);
        let decoded_u = decode(&code, &d_llr);
        let decoded_info = chanalloc_rx(&code, &decoded_u);

        assert_eq!(decoded_info, info);
    }

    #[test]
    fn test_encode_decode_roundtrip_with_repetition() {
        let k = 18;
        let e = 120; // E >= N likely
        let code = PolarCode::new(k, e, NMAX_LOG);
        let info: Vec<u8> = (0..k).map(|i| (i % 5 == 0) as u8).collect();

        let allocated = chanalloc_tx(&code, &info);
        let encoded = encode(&code, &allocated);
        let rm = rate_match_tx(&code, &encoded);
        assert_eq!(rm.len(), e);

        let llr_e = to_llr(&rm);
        let d_llr = rate_match_rx(&code, &llr_e);
        let decoded_u = decode(&code, &d_llr);
        let decoded_info = chanalloc_rx(&code, &decoded_u);

        assert_eq!(decoded_info, info);
    }
}
