//! Bit sequence builder (3GPP TS 38.212 §6.3.1.1): concatenates HARQ-ACK,
//! SR, and CSI Part 1 into the ordered payload `a[0..A-1]`, and its strict
//! inverse.

use crate::codec::bitops::{bit_pack, bit_unpack};
use crate::csi::{csi_part1_nof_bits, csi_part1_pack, csi_part1_unpack};
use crate::types::{UciConfig, UciValue};
use crate::UciError;

fn has_csi(cfg: &UciConfig) -> bool {
    !cfg.csi.is_empty()
}

/// Payload bit width for the layout `cfg` selects, without packing.
pub fn a(cfg: &UciConfig) -> Result<usize, UciError> {
    if !has_csi(cfg) {
        Ok(cfg.o_ack + cfg.o_sr)
    } else if cfg.o_ack == 0 && cfg.o_sr == 0 {
        Ok(csi_part1_nof_bits(&cfg.csi))
    } else {
        Ok(cfg.o_ack + cfg.o_sr + csi_part1_nof_bits(&cfg.csi))
    }
}

/// Total UCI bit width across all configured fields.
pub fn total_bits(cfg: &UciConfig) -> usize {
    cfg.o_ack + cfg.o_sr + csi_part1_nof_bits(&cfg.csi)
}

/// Pack `value` into the ordered payload for `cfg`'s layout.
pub fn pack_pucch(cfg: &UciConfig, value: &UciValue) -> Result<(Vec<u8>, usize), UciError> {
    if !has_csi(cfg) {
        let mut buf = Vec::with_capacity(cfg.o_ack + cfg.o_sr);
        buf.extend_from_slice(&value.ack[..cfg.o_ack]);
        let mut sr_bits = vec![0u8; cfg.o_sr];
        bit_unpack(value.sr as u64, cfg.o_sr, &mut sr_bits);
        buf.extend_from_slice(&sr_bits);
        let n = buf.len();
        Ok((buf, n))
    } else if cfg.o_ack == 0 && cfg.o_sr == 0 {
        let mut buf = Vec::new();
        let n = csi_part1_pack(&cfg.csi, &value.csi, &mut buf)?;
        Ok((buf, n))
    } else {
        let mut buf = Vec::with_capacity(cfg.o_ack + cfg.o_sr + csi_part1_nof_bits(&cfg.csi));
        buf.extend_from_slice(&value.ack[..cfg.o_ack]);
        let mut sr_bits = vec![0u8; cfg.o_sr];
        bit_unpack(value.sr as u64, cfg.o_sr, &mut sr_bits);
        buf.extend_from_slice(&sr_bits);
        let csi_bits = csi_part1_unpack_as_values(&cfg.csi, &value.csi)?;
        buf.extend_from_slice(&csi_bits);
        let n = buf.len();
        Ok((buf, n))
    }
}

/// CSI values are already a flat bit sequence (treated as opaque here);
/// this just validates length and returns the slice owned.
fn csi_part1_unpack_as_values(csi: &[crate::types::CsiReportDesc], values: &[u8]) -> Result<Vec<u8>, UciError> {
    let total = csi_part1_nof_bits(csi);
    if values.len() < total {
        return Err(UciError::InvalidInput(format!("CSI values too short: got {}, need {}", values.len(), total)));
    }
    Ok(values[..total].to_vec())
}

/// Strict inverse of `pack_pucch`. CSI-only decode is unsupported; the
/// mixed ACK/SR+CSI layout is decoded symmetrically with its encode
/// counterpart.
pub fn unpack_pucch(cfg: &UciConfig, buf: &[u8], decoded_ok: bool) -> Result<UciValue, UciError> {
    if !has_csi(cfg) {
        let ack = buf[..cfg.o_ack].to_vec();
        let sr = bit_pack(&buf[cfg.o_ack..cfg.o_ack + cfg.o_sr], cfg.o_sr) as u32;
        Ok(UciValue { ack, sr, csi: Vec::new(), valid: decoded_ok })
    } else if cfg.o_ack == 0 && cfg.o_sr == 0 {
        Err(UciError::Unsupported("CSI-only decode on PUCCH".into()))
    } else {
        let ack = buf[..cfg.o_ack].to_vec();
        let sr = bit_pack(&buf[cfg.o_ack..cfg.o_ack + cfg.o_sr], cfg.o_sr) as u32;
        let csi_start = cfg.o_ack + cfg.o_sr;
        let csi = csi_part1_unpack(&cfg.csi, &buf[csi_start..])?;
        Ok(UciValue { ack, sr, csi, valid: decoded_ok })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CsiReportDesc, Modulation, PuschUciConfig};

    fn base_pusch() -> PuschUciConfig {
        PuschUciConfig {
            modulation: Modulation::Qpsk,
            nof_layers: 1,
            beta_harq_ack_offset: 1.0,
            beta_csi1_offset: 1.0,
            alpha: 1.0,
            code_rate: 0.5,
            k_sum: 0,
            m_uci_sc: [0; 14],
            l0: 0,
            csi_part2_present: false,
        }
    }

    #[test]
    fn test_ack_sr_only_layout_roundtrip() {
        let cfg = UciConfig { o_ack: 2, o_sr: 1, csi: vec![], pusch: base_pusch() };
        let value = UciValue { ack: vec![1, 0], sr: 1, csi: vec![], valid: true };
        let (buf, n) = pack_pucch(&cfg, &value).unwrap();
        assert_eq!(n, 3);
        let decoded = unpack_pucch(&cfg, &buf, true).unwrap();
        assert_eq!(decoded.ack, value.ack);
        assert_eq!(decoded.sr, value.sr);
    }

    #[test]
    fn test_csi_only_decode_unsupported() {
        let cfg = UciConfig { o_ack: 0, o_sr: 0, csi: vec![CsiReportDesc { nof_bits: 4, has_part2: false }], pusch: base_pusch() };
        let buf = vec![1u8, 0, 1, 1];
        assert!(unpack_pucch(&cfg, &buf, true).is_err());
    }

    #[test]
    fn test_mixed_layout_roundtrip_symmetric() {
        let cfg = UciConfig {
            o_ack: 1,
            o_sr: 0,
            csi: vec![CsiReportDesc { nof_bits: 3, has_part2: false }],
            pusch: base_pusch(),
        };
        let value = UciValue { ack: vec![1], sr: 0, csi: vec![0, 1, 1], valid: true };
        let (buf, n) = pack_pucch(&cfg, &value).unwrap();
        assert_eq!(n, 4);
        let decoded = unpack_pucch(&cfg, &buf, true).unwrap();
        assert_eq!(decoded.ack, value.ack);
        assert_eq!(decoded.csi, value.csi);
    }

    #[test]
    fn test_a_matches_total_for_ack_sr_only() {
        let cfg = UciConfig { o_ack: 3, o_sr: 1, csi: vec![], pusch: base_pusch() };
        assert_eq!(a(&cfg).unwrap(), 4);
        assert_eq!(total_bits(&cfg), 4);
    }
}
