//! PUCCH framer (3GPP TS 38.212 §6.3.1.4): computes `E_tot`/`E_uci` from
//! the PUCCH resource and dispatches to the payload-size-class coder.

use crate::csi::csi_has_part2;
use crate::types::{PucchFormat, PucchResource, UciConfig, UciValue};
use crate::{UciCodecArgs, UciError};

/// PUCCH's modulation order: pi/2-BPSK when enabled, QPSK otherwise.
/// TS 38.212 does not carry an independent modulation field on the PUCCH
/// resource — it is implied by the pi/2-BPSK toggle.
fn qm(res: &PucchResource) -> usize {
    if res.enable_pi2_bpsk {
        1
    } else {
        2
    }
}

/// Total number of coded bits available on this PUCCH resource.
pub fn pucch_e(res: &PucchResource) -> Result<u32, UciError> {
    let n_sym = res.nof_symbols;
    let n_prb = res.nof_prb;

    let e_tot = match res.format {
        PucchFormat::Format2 => 16 * n_sym * n_prb,
        PucchFormat::Format3 => {
            if res.enable_pi2_bpsk {
                12 * n_sym * n_prb
            } else {
                24 * n_sym * n_prb
            }
        }
        PucchFormat::Format4 => {
            if res.occ_length != 1 && res.occ_length != 2 {
                return Err(UciError::InvalidInput(format!(
                    "Format 4 OCC length must be 1 or 2, got {}",
                    res.occ_length
                )));
            }
            if res.enable_pi2_bpsk {
                12 * n_sym / res.occ_length
            } else {
                24 * n_sym / res.occ_length
            }
        }
    };
    Ok(e_tot)
}

/// Part-1/Part-2 splitting is not implemented: `E_uci == E_tot`, gated on
/// simultaneous CSI Part 1 + Part 2 multiplexing being unsupported.
pub fn pucch_e_uci(res: &PucchResource, cfg: &UciConfig) -> Result<u32, UciError> {
    if csi_has_part2(&cfg.csi) {
        return Err(UciError::Unsupported("simultaneous CSI Part 1 + CSI Part 2 multiplexing".into()));
    }
    pucch_e(res)
}

/// Encode one UCI value onto a PUCCH resource, dispatching to the
/// appropriate payload-size-class coder.
pub fn pucch_encode(res: &PucchResource, cfg: &UciConfig, value: &UciValue, _args: &UciCodecArgs) -> Result<Vec<u8>, UciError> {
    let e_uci = pucch_e_uci(res, cfg)? as usize;
    let (payload, a) = crate::bitseq::pack_pucch(cfg, value)?;
    crate::dispatch::encode_payload(&payload, a, e_uci, qm(res))
}

/// Decode one UCI value from a PUCCH LLR stream.
pub fn pucch_decode(res: &PucchResource, cfg: &UciConfig, llr: &[i8], args: &UciCodecArgs) -> Result<UciValue, UciError> {
    let e_uci = pucch_e_uci(res, cfg)? as usize;
    if llr.len() < e_uci {
        return Err(UciError::InvalidInput(format!("LLR buffer too short: got {}, need {}", llr.len(), e_uci)));
    }
    let a = crate::bitseq::a(cfg)?;
    let (payload, valid) = crate::dispatch::decode_payload(&llr[..e_uci], a, qm(res), args)?;
    crate::bitseq::unpack_pucch(cfg, &payload, valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CsiReportDesc;

    fn mixed_cfg() -> UciConfig {
        use crate::types::{Modulation, PuschUciConfig};
        UciConfig {
            o_ack: 0,
            o_sr: 0,
            csi: vec![],
            pusch: PuschUciConfig {
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
            },
        }
    }

    #[test]
    fn test_format3_pi2bpsk_halves_e_tot() {
        let res = PucchResource { format: PucchFormat::Format3, nof_symbols: 8, nof_prb: 1, enable_pi2_bpsk: false, occ_length: 1 };
        assert_eq!(pucch_e(&res).unwrap(), 192);
        let res_bpsk = PucchResource { enable_pi2_bpsk: true, ..res };
        assert_eq!(pucch_e(&res_bpsk).unwrap(), 96);
    }

    #[test]
    fn test_format2_ignores_pi2bpsk() {
        let res = PucchResource { format: PucchFormat::Format2, nof_symbols: 2, nof_prb: 3, enable_pi2_bpsk: true, occ_length: 1 };
        assert_eq!(pucch_e(&res).unwrap(), 16 * 2 * 3);
    }

    #[test]
    fn test_format4_rejects_invalid_occ() {
        let res = PucchResource { format: PucchFormat::Format4, nof_symbols: 8, nof_prb: 1, enable_pi2_bpsk: false, occ_length: 3 };
        assert!(pucch_e(&res).is_err());
    }

    #[test]
    fn test_e_uci_gated_on_csi_part2() {
        let res = PucchResource { format: PucchFormat::Format2, nof_symbols: 2, nof_prb: 1, enable_pi2_bpsk: false, occ_length: 1 };
        let mut cfg = mixed_cfg();
        cfg.csi.push(CsiReportDesc { nof_bits: 4, has_part2: true });
        assert!(pucch_e_uci(&res, &cfg).is_err());
    }

    #[test]
    fn test_roundtrip_small_payload_on_pucch() {
        let res = PucchResource { format: PucchFormat::Format2, nof_symbols: 2, nof_prb: 8, enable_pi2_bpsk: false, occ_length: 1 };
        let mut cfg = mixed_cfg();
        cfg.o_ack = 2;
        let args = UciCodecArgs::default();
        let value = UciValue { ack: vec![1, 0], sr: 0, csi: vec![], valid: true };

        let encoded = pucch_encode(&res, &cfg, &value, &args).unwrap();
        let llr: Vec<i8> = encoded
            .iter()
            .map(|&b| if b == crate::types::UciBit::Zero.as_u8() || b == crate::types::UciBit::Placeholder.as_u8() { 100 } else { -100 })
            .collect();
        let decoded = pucch_decode(&res, &cfg, &llr, &args).unwrap();
        assert!(decoded.valid);
        assert_eq!(decoded.ack, value.ack);
    }
}
