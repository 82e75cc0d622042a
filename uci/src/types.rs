//! Data model for the UCI codec.
//!
//! Mirrors 3GPP TS 38.212 §5.3.3/§6.3 structures: payload size classes,
//! PUCCH resource description, and the PUSCH/PUCCH UCI configuration and
//! value containers.

use serde::{Deserialize, Serialize};

/// Maximum number of UCI payload bits (A >= 1707 is invalid).
pub const MAX_UCI_BITS: usize = 1706;
/// Maximum CRC length attached to a polar-coded UCI payload (CRC-11).
pub const MAX_CRC_L: usize = 11;
/// Maximum polar mother code length (N = 2^10).
pub const POLAR_MAX: usize = 2048;
/// Number of OFDM symbols per slot, used to size `m_uci_sc`.
pub const NOF_SYMB_PER_SLOT: usize = 14;

/// One-bit-per-byte UCI bit sentinels used on encoder output for A=1/A=2.
///
/// Ordinary payload/coded bits elsewhere on the wire are plain 0/1 bytes;
/// only the A=1 and A=2 coders emit these extra sentinel kinds, reserved
/// for downstream modulation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciBit {
    Zero,
    One,
    Repetition,
    Placeholder,
}

impl UciBit {
    pub fn from_payload_bit(bit: u8) -> Self {
        if bit == 0 { UciBit::Zero } else { UciBit::One }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            UciBit::Zero => 0,
            UciBit::One => 1,
            UciBit::Repetition => 2,
            UciBit::Placeholder => 3,
        }
    }

    pub fn is_placeholder(self) -> bool {
        matches!(self, UciBit::Placeholder)
    }
}

/// Modulation order used on the PUSCH/PUCCH allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modulation {
    Bpsk,
    Qpsk,
    Qam16,
    Qam64,
    Qam256,
}

impl Modulation {
    /// Bits per modulation symbol (Qm).
    pub fn bits_per_symbol(self) -> usize {
        match self {
            Modulation::Bpsk => 1,
            Modulation::Qpsk => 2,
            Modulation::Qam16 => 4,
            Modulation::Qam64 => 6,
            Modulation::Qam256 => 8,
        }
    }
}

/// PUCCH format (Format 1 is out of scope: it carries no polar/block-coded UCI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PucchFormat {
    Format2,
    Format3,
    Format4,
}

/// PUCCH resource allocation relevant to computing `E_tot` (3GPP TS 38.212 §6.3.1.4).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PucchResource {
    pub format: PucchFormat,
    pub nof_symbols: u32,
    pub nof_prb: u32,
    pub enable_pi2_bpsk: bool,
    /// Orthogonal cover code length, Format 4 only (1 or 2).
    pub occ_length: u32,
}

/// PUSCH-specific rate-matching configuration (`cfg.pusch`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PuschUciConfig {
    pub modulation: Modulation,
    pub nof_layers: u32,
    pub beta_harq_ack_offset: f32,
    pub beta_csi1_offset: f32,
    pub alpha: f32,
    /// Target code rate R of the accompanying UL-SCH transmission.
    pub code_rate: f32,
    /// Sum of information bits across UL-SCH code blocks sharing this PUSCH.
    pub k_sum: u32,
    /// Per-OFDM-symbol UCI-usable subcarrier counts.
    pub m_uci_sc: [u32; NOF_SYMB_PER_SLOT],
    /// Index of the first DMRS-free OFDM symbol.
    pub l0: usize,
    pub csi_part2_present: bool,
}

/// A single, opaque CSI Part 1 report descriptor.
///
/// CSI (de)serialization is treated as an external collaborator; this
/// descriptor only carries what the UCI layer needs to size and flag the
/// report without knowing its internal structure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CsiReportDesc {
    pub nof_bits: usize,
    pub has_part2: bool,
}

/// Full UCI configuration for one PUCCH/PUSCH transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UciConfig {
    pub o_ack: usize,
    pub o_sr: usize,
    pub csi: Vec<CsiReportDesc>,
    pub pusch: PuschUciConfig,
}

/// UCI payload value: HARQ-ACK bits, SR field, opaque CSI Part 1 bits.
#[derive(Debug, Clone, Default)]
pub struct UciValue {
    /// One-bit-per-byte ACK bits, length `cfg.o_ack`.
    pub ack: Vec<u8>,
    /// SR field value in `[0, 2^o_sr)`.
    pub sr: u32,
    /// Opaque CSI Part 1 report bits (one-bit-per-byte).
    pub csi: Vec<u8>,
    /// Set by the decoder: whether the payload is trustworthy.
    pub valid: bool,
}

impl UciValue {
    /// A short human-readable summary, used for logging (mirrors
    /// `srslte_uci_nr_info` from the reference implementation).
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.ack.is_empty() {
            let ack_str: String = self.ack.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect();
            parts.push(format!("ack={}", ack_str));
        }
        if !self.csi.is_empty() {
            parts.push(format!("csi_bits={}", self.csi.len()));
        }
        parts.push(format!("sr={}", self.sr));
        parts.push(format!("valid={}", self.valid));
        parts.join(", ")
    }
}
