//! PUSCH rate-matching sizer (TS 38.212 §6.3.2.4): computes `Q'` symbol
//! counts and the resulting coded bit counts for HARQ-ACK and CSI Part 1.

use crate::types::{Modulation, PuschUciConfig};
use crate::UciError;

fn m_uci_sum_from(l0: usize, m_uci_sc: &[u32; 14]) -> u32 {
    m_uci_sc[l0..].iter().sum()
}

fn validate(cfg: &PuschUciConfig) -> Result<(), UciError> {
    if !cfg.code_rate.is_finite() || cfg.code_rate <= 0.0 {
        return Err(UciError::InvalidInput(format!("non-finite or non-positive code rate {}", cfg.code_rate)));
    }
    if cfg.nof_layers == 0 {
        return Err(UciError::InvalidInput("nof_layers must be nonzero".into()));
    }
    if !(cfg.alpha > 0.0 && cfg.alpha <= 1.0) {
        return Err(UciError::InvalidInput(format!("alpha must be in (0, 1], got {}", cfg.alpha)));
    }
    Ok(())
}

/// `Q'_ack`: number of coded modulation symbols per layer for HARQ-ACK.
pub fn q_prime_ack(cfg: &PuschUciConfig, o_ack: usize, l_ack: usize) -> Result<u32, UciError> {
    validate(cfg)?;
    let qm = cfg.modulation.bits_per_symbol() as f32;
    let m_uci_from_l0 = m_uci_sum_from(cfg.l0, &cfg.m_uci_sc) as f32;
    let cap = (cfg.alpha * m_uci_from_l0).floor() as u32;

    let numerator = (o_ack + l_ack) as f32 * cfg.beta_harq_ack_offset;
    let q = if cfg.k_sum == 0 {
        (numerator / (qm * cfg.code_rate)).ceil() as u32
    } else {
        let m_uci_sum: u32 = cfg.m_uci_sc.iter().sum();
        ((numerator * m_uci_sum as f32 / cfg.k_sum as f32).ceil()) as u32
    };
    Ok(q.min(cap))
}

/// `Q'_csi1`: number of coded modulation symbols per layer for CSI Part 1.
///
/// The HARQ-ACK budget this subtracts is always recomputed here against the
/// promoted `O_ack' = max(2, O_ack)`, independent of whatever (possibly
/// unpromoted) `Q'_ack` the real ACK encode/decode path used on this same
/// PUSCH allocation — mirroring the reference `uci_nr_pusch_Q_prime_csi1`,
/// which calls `uci_nr_pusch_Q_prime_ack(cfg, max(2, O_ack))` internally
/// rather than accepting the caller's value.
pub fn q_prime_csi1(cfg: &PuschUciConfig, o_csi1: usize, l_csi1: usize, o_ack: usize) -> Result<u32, UciError> {
    validate(cfg)?;
    let qm = cfg.modulation.bits_per_symbol() as f32;
    let o_ack_prime = o_ack.max(2);
    let l_ack = crate::polar_coder::crc_len(o_ack_prime);
    let q_prime_ack = q_prime_ack(cfg, o_ack_prime, l_ack)?;
    let m_uci_sum: u32 = cfg.m_uci_sc.iter().sum();

    let numerator = (o_csi1 + l_csi1) as f32 * cfg.beta_csi1_offset;

    let q = if cfg.k_sum == 0 {
        if cfg.csi_part2_present {
            let cap = (cfg.alpha * m_uci_sum as f32).floor() as u32 - q_prime_ack;
            ((numerator / (qm * cfg.code_rate)).ceil() as u32).min(cap)
        } else {
            m_uci_sum - q_prime_ack
        }
    } else {
        let cap = (cfg.alpha * m_uci_sum as f32).ceil() as u32 - q_prime_ack;
        ((numerator * m_uci_sum as f32 / cfg.k_sum as f32).ceil() as u32).min(cap)
    };
    Ok(q)
}

pub fn ack_bit_count(cfg: &PuschUciConfig, q_prime: u32) -> u32 {
    q_prime * cfg.nof_layers * cfg.modulation.bits_per_symbol() as u32
}

pub fn csi1_bit_count(cfg: &PuschUciConfig, q_prime: u32) -> u32 {
    q_prime * cfg.nof_layers * cfg.modulation.bits_per_symbol() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cfg() -> PuschUciConfig {
        PuschUciConfig {
            modulation: Modulation::Qpsk,
            nof_layers: 1,
            beta_harq_ack_offset: 2.0,
            beta_csi1_offset: 1.0,
            alpha: 0.8,
            code_rate: 0.5,
            k_sum: 0,
            m_uci_sc: [12; 14],
            l0: 2,
            csi_part2_present: false,
        }
    }

    #[test]
    fn test_q_prime_ack_k_sum_zero() {
        let cfg = base_cfg();
        let q = q_prime_ack(&cfg, 2, 6).unwrap();
        assert!(q > 0);
        let m_from_l0: u32 = cfg.m_uci_sc[cfg.l0..].iter().sum();
        let cap = (cfg.alpha * m_from_l0 as f32).floor() as u32;
        assert!(q <= cap);
    }

    #[test]
    fn test_q_prime_ack_rejects_zero_layers() {
        let mut cfg = base_cfg();
        cfg.nof_layers = 0;
        assert!(q_prime_ack(&cfg, 2, 6).is_err());
    }

    #[test]
    fn test_q_prime_csi1_no_part2_consumes_remaining_budget() {
        let cfg = base_cfg();
        let o_ack = 1;
        let q_csi = q_prime_csi1(&cfg, 4, 11, o_ack).unwrap();

        // q_prime_csi1 must subtract the *promoted* Q'_ack, not whatever
        // Q'_ack an unpromoted caller would have computed for O_ack=1.
        let o_ack_prime = o_ack.max(2);
        let l_ack = crate::polar_coder::crc_len(o_ack_prime);
        let q_ack_promoted = q_prime_ack(&cfg, o_ack_prime, l_ack).unwrap();
        let m_sum: u32 = cfg.m_uci_sc.iter().sum();
        assert_eq!(q_csi, m_sum - q_ack_promoted);
    }

    #[test]
    fn test_q_prime_ack_rejects_alpha_out_of_range() {
        let mut cfg = base_cfg();
        cfg.alpha = 1.5;
        assert!(q_prime_ack(&cfg, 2, 6).is_err());
        cfg.alpha = 0.0;
        assert!(q_prime_ack(&cfg, 2, 6).is_err());
    }

    #[test]
    fn test_q_prime_ack_rejects_non_finite_rate() {
        let mut cfg = base_cfg();
        cfg.code_rate = f32::NAN;
        assert!(q_prime_ack(&cfg, 1, 6).is_err());
    }
}
