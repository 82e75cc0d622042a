//! Reed-Muller (32, 11) block code.
//!
//! Covers the 3 <= A <= 11 UCI payload class, based on 3GPP TS 38.212
//! Table 5.3.3.3-1's basis sequences M_i,n.

/// Basis sequences M_i,n, i = 0..31 (output bit index), n = 0..10 (input bit index).
const BASIS: [[u8; 11]; 32] = [
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1],
    [1, 0, 0, 1, 0, 0, 1, 0, 1, 1, 1],
    [1, 0, 1, 1, 0, 0, 0, 0, 1, 0, 1],
    [1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1],
    [1, 1, 0, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 1],
    [1, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1],
    [1, 0, 0, 1, 1, 0, 1, 1, 0, 0, 1],
    [1, 1, 0, 1, 1, 0, 0, 0, 1, 1, 1],
    [1, 0, 1, 1, 1, 0, 1, 1, 0, 1, 1],
    [1, 0, 0, 0, 0, 1, 1, 0, 0, 1, 1],
    [1, 1, 0, 0, 0, 1, 0, 0, 1, 1, 1],
    [1, 0, 1, 0, 0, 1, 0, 1, 0, 1, 1],
    [1, 1, 1, 0, 0, 1, 1, 1, 0, 1, 1],
    [1, 0, 0, 1, 0, 1, 1, 1, 1, 0, 1],
    [1, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1],
    [1, 0, 1, 1, 0, 1, 0, 0, 1, 1, 1],
    [1, 1, 1, 1, 0, 1, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 1, 1, 1, 1, 0, 1, 1],
    [1, 1, 0, 0, 1, 1, 1, 0, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 0, 1, 1, 0, 1],
    [1, 1, 1, 0, 1, 1, 0, 0, 0, 1, 1],
    [1, 0, 0, 1, 1, 1, 0, 0, 1, 1, 1],
    [1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 1, 1, 1, 0, 1, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 0, 0, 0, 0, 1, 1, 0, 0, 1],
    [1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 0, 0, 0, 1, 0, 1, 1, 1],
];

/// Encode `A` (3..=11) payload bits into a 32-bit codeword.
pub fn encode(payload: &[u8], a: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, row) in BASIS.iter().enumerate() {
        let mut acc = 0u8;
        for n in 0..a {
            acc ^= row[n] & payload[n];
        }
        out[i] = acc;
    }
    out
}

/// Decode a length-`e` LLR sequence against all 2^A candidate payloads,
/// returning the best-correlating payload and its normalized correlation
/// in `[-1, 1]` (the raw sum of `±llr[i]` divided by the total LLR
/// magnitude), so it is comparable against a `(0, 1]`-range confidence
/// threshold the same way the A=1 decoder's `norm` metric is.
///
/// LLR sign convention: positive -> 0.
pub fn decode(llr: &[i8], e: usize, a: usize) -> (Vec<u8>, f32) {
    let mut best_payload = vec![0u8; a];
    let mut best_corr = f32::MIN;

    for candidate in 0u32..(1u32 << a) {
        let mut payload = vec![0u8; a];
        for (n, slot) in payload.iter_mut().enumerate() {
            *slot = ((candidate >> (a - 1 - n)) & 1) as u8;
        }
        let codeword = encode(&payload, a);

        let mut corr = 0f32;
        for i in 0..e {
            let c = codeword[i % 32];
            let symbol = if c == 0 { 1.0 } else { -1.0 };
            corr += symbol * llr[i] as f32;
        }

        if corr > best_corr {
            best_corr = corr;
            best_payload = payload;
        }
    }

    let magnitude: f32 = (0..e).map(|i| (llr[i] as f32).abs()).sum();
    let norm_corr = if magnitude > 0.0 { best_corr / magnitude } else { 0.0 };

    (best_payload, norm_corr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_length_is_32() {
        let payload = vec![1u8, 0, 1, 1, 0];
        let codeword = encode(&payload, 5);
        assert_eq!(codeword.len(), 32);
    }

    #[test]
    fn test_roundtrip_noise_free() {
        let payload = vec![1u8, 0, 1, 1, 0];
        let codeword = encode(&payload, 5);
        let llr: Vec<i8> = codeword.iter().map(|&c| if c == 0 { 100 } else { -100 }).collect();
        let (decoded, corr) = decode(&llr, 32, 5);
        assert_eq!(decoded, payload);
        // Noise-free: every sample agrees with the winning candidate, so
        // the normalized correlation saturates at 1.0.
        assert!((corr - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_correlation_is_bounded_and_reachable_by_threshold() {
        // Every other sample flipped relative to the noise-free codeword:
        // the normalized correlation must stay within [-1, 1], and a
        // realistic (0,1]-range threshold must be able to reject it --
        // unlike the old unnormalized magnitude (up to ~e*100), which no
        // such threshold could ever exceed.
        let payload = vec![1u8, 0, 1, 1, 0];
        let codeword = encode(&payload, 5);
        let llr: Vec<i8> = codeword
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let sign: i8 = if c == 0 { 100 } else { -100 };
                if i % 2 == 0 { sign } else { -sign }
            })
            .collect();
        let (_, corr) = decode(&llr, 32, 5);
        assert!((-1.0..=1.0).contains(&corr));
    }

    #[test]
    fn test_roundtrip_full_11_bits() {
        let payload: Vec<u8> = vec![1, 1, 0, 1, 0, 0, 1, 1, 0, 1, 1];
        let codeword = encode(&payload, 11);
        let llr: Vec<i8> = codeword.iter().map(|&c| if c == 0 { 100 } else { -100 }).collect();
        let (decoded, _) = decode(&llr, 32, 11);
        assert_eq!(decoded, payload);
    }
}
