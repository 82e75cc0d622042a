//! PUSCH multiplexer entry points (TS 38.212 §6.3.2): independent HARQ-ACK
//! and CSI Part 1 encode/decode paths, each sizing its own allocation via
//! the rate-matching sizer before dispatching to the class coder.

use crate::csi::csi_part1_pack;
use crate::types::{UciConfig, UciValue};
use crate::{dispatch, polar_coder, ratematch, UciCodecArgs, UciError};

fn ack_promotion(cfg: &UciConfig, a: usize) -> bool {
    cfg.pusch.k_sum == 0 && cfg.csi.len() > 1 && !cfg.pusch.csi_part2_present && a < 2
}

/// Encode HARQ-ACK on PUSCH. Returns the encoded bits and the `Q'_ack`
/// symbol count actually consumed by this encode (for reporting; the CSI
/// Part 1 sizer recomputes its own promoted `Q'_ack` independently).
pub fn encode_ack(cfg: &UciConfig, value: &UciValue) -> Result<(Vec<u8>, u32), UciError> {
    let mut a = cfg.o_ack;
    let payload;

    if ack_promotion(cfg, a) {
        let first = if a == 0 { 0 } else { value.ack[0] };
        payload = vec![first, 0];
        a = 2;
    } else if a == 0 {
        return Ok((Vec::new(), 0));
    } else {
        payload = value.ack[..a].to_vec();
    }

    let q_ack = ratematch::q_prime_ack(&cfg.pusch, a, polar_coder::crc_len(a))?;
    let e_uci = ratematch::ack_bit_count(&cfg.pusch, q_ack) as usize;
    let qm = cfg.pusch.modulation.bits_per_symbol();
    let out = dispatch::encode_payload(&payload, a, e_uci, qm)?;
    Ok((out, q_ack))
}

/// Decode HARQ-ACK on PUSCH, mirroring the promotion rule `encode_ack` applied.
pub fn decode_ack(cfg: &UciConfig, llr: &[i8], args: &UciCodecArgs) -> Result<(UciValue, u32), UciError> {
    let o_ack = cfg.o_ack;
    let promoted = ack_promotion(cfg, o_ack);
    let a = if promoted { 2 } else { o_ack };

    if !promoted && a == 0 {
        return Ok((UciValue { ack: Vec::new(), sr: 0, csi: Vec::new(), valid: true }, 0));
    }

    let q_ack = ratematch::q_prime_ack(&cfg.pusch, a, polar_coder::crc_len(a))?;
    let e_uci = ratematch::ack_bit_count(&cfg.pusch, q_ack) as usize;
    if llr.len() < e_uci {
        return Err(UciError::InvalidInput(format!("LLR buffer too short: got {}, need {}", llr.len(), e_uci)));
    }
    let qm = cfg.pusch.modulation.bits_per_symbol();
    let (payload, valid) = dispatch::decode_payload(&llr[..e_uci], a, qm, args)?;
    let ack = if promoted { vec![payload[0]] } else { payload };
    Ok((UciValue { ack, sr: 0, csi: Vec::new(), valid }, q_ack))
}

/// Encode CSI Part 1 on PUSCH. The CSI1 sizer recomputes its own promoted
/// `Q'_ack` from `cfg.o_ack` internally, independent of whatever `Q'_ack`
/// the real HARQ-ACK encode on this same allocation used.
pub fn encode_csi1(cfg: &UciConfig, value: &UciValue) -> Result<Vec<u8>, UciError> {
    let mut buf = Vec::new();
    let n = csi_part1_pack(&cfg.csi, &value.csi, &mut buf)?;
    if n == 0 {
        return Ok(Vec::new());
    }
    let l_csi1 = polar_coder::crc_len(n);
    let q_csi = ratematch::q_prime_csi1(&cfg.pusch, n, l_csi1, cfg.o_ack)?;
    let e_uci = ratematch::csi1_bit_count(&cfg.pusch, q_csi) as usize;
    let qm = cfg.pusch.modulation.bits_per_symbol();
    dispatch::encode_payload(&buf, n, e_uci, qm)
}

/// Decode CSI Part 1 on PUSCH.
pub fn decode_csi1(cfg: &UciConfig, llr: &[i8], args: &UciCodecArgs) -> Result<UciValue, UciError> {
    let n = crate::csi::csi_part1_nof_bits(&cfg.csi);
    if n == 0 {
        return Ok(UciValue { ack: Vec::new(), sr: 0, csi: Vec::new(), valid: true });
    }
    let l_csi1 = polar_coder::crc_len(n);
    let q_csi = ratematch::q_prime_csi1(&cfg.pusch, n, l_csi1, cfg.o_ack)?;
    let e_uci = ratematch::csi1_bit_count(&cfg.pusch, q_csi) as usize;
    if llr.len() < e_uci {
        return Err(UciError::InvalidInput(format!("LLR buffer too short: got {}, need {}", llr.len(), e_uci)));
    }
    let qm = cfg.pusch.modulation.bits_per_symbol();
    let (payload, valid) = dispatch::decode_payload(&llr[..e_uci], n, qm, args)?;
    Ok(UciValue { ack: Vec::new(), sr: 0, csi: payload, valid })
}
