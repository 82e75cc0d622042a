//! TOML scenario configuration for the UCI codec demo.
//!
//! Describes one PUCCH resource, one PUSCH UCI configuration, and the UCI
//! payload to carry, via a `config.toml`-via-`serde` convention.

use serde::{Deserialize, Serialize};

use uci::{CsiReportDesc, Modulation, PucchFormat, PucchResource, PuschUciConfig, UciConfig, UciValue};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub pucch: PucchResourceConfig,
    pub pusch: PuschConfig,
    pub uci: UciConfigToml,
    pub value: UciValueConfig,
    #[serde(default)]
    pub codec: CodecArgsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PucchResourceConfig {
    pub format: String,
    pub nof_symbols: u32,
    pub nof_prb: u32,
    #[serde(default)]
    pub enable_pi2_bpsk: bool,
    #[serde(default = "default_occ_length")]
    pub occ_length: u32,
}

fn default_occ_length() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PuschConfig {
    pub modulation: String,
    #[serde(default = "default_nof_layers")]
    pub nof_layers: u32,
    pub beta_harq_ack_offset: f32,
    pub beta_csi1_offset: f32,
    pub alpha: f32,
    pub code_rate: f32,
    #[serde(default)]
    pub k_sum: u32,
    /// Per-OFDM-symbol UCI-usable subcarrier counts, one entry per symbol
    /// in the slot. Shorter lists are zero-padded; longer ones truncated.
    #[serde(default = "default_m_uci_sc")]
    pub m_uci_sc: Vec<u32>,
    #[serde(default)]
    pub l0: usize,
    #[serde(default)]
    pub csi_part2_present: bool,
}

fn default_nof_layers() -> u32 {
    1
}

fn default_m_uci_sc() -> Vec<u32> {
    vec![0; uci::NOF_SYMB_PER_SLOT]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UciConfigToml {
    pub o_ack: usize,
    #[serde(default)]
    pub o_sr: usize,
    #[serde(default)]
    pub csi: Vec<CsiReportConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CsiReportConfig {
    pub nof_bits: usize,
    #[serde(default)]
    pub has_part2: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UciValueConfig {
    #[serde(default)]
    pub ack: Vec<u8>,
    #[serde(default)]
    pub sr: u32,
    #[serde(default)]
    pub csi: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecArgsConfig {
    #[serde(default)]
    pub disable_simd: bool,
    #[serde(default = "default_threshold")]
    pub block_code_threshold: f32,
    #[serde(default = "default_threshold")]
    pub one_bit_threshold: f32,
}

fn default_threshold() -> f32 {
    0.5
}

impl Default for CodecArgsConfig {
    fn default() -> Self {
        Self { disable_simd: false, block_code_threshold: default_threshold(), one_bit_threshold: default_threshold() }
    }
}

impl ScenarioConfig {
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn pucch_resource(&self) -> anyhow::Result<PucchResource> {
        let format = match self.pucch.format.as_str() {
            "Format2" | "format2" | "2" => PucchFormat::Format2,
            "Format3" | "format3" | "3" => PucchFormat::Format3,
            "Format4" | "format4" | "4" => PucchFormat::Format4,
            other => return Err(anyhow::anyhow!("unknown PUCCH format: {other}")),
        };
        Ok(PucchResource {
            format,
            nof_symbols: self.pucch.nof_symbols,
            nof_prb: self.pucch.nof_prb,
            enable_pi2_bpsk: self.pucch.enable_pi2_bpsk,
            occ_length: self.pucch.occ_length,
        })
    }

    pub fn pusch_uci_config(&self) -> anyhow::Result<PuschUciConfig> {
        let modulation = match self.pusch.modulation.as_str() {
            "Qpsk" | "qpsk" | "QPSK" => Modulation::Qpsk,
            "Qam16" | "qam16" | "16QAM" => Modulation::Qam16,
            "Qam64" | "qam64" | "64QAM" => Modulation::Qam64,
            "Qam256" | "qam256" | "256QAM" => Modulation::Qam256,
            "Bpsk" | "bpsk" | "BPSK" => Modulation::Bpsk,
            other => return Err(anyhow::anyhow!("unknown modulation: {other}")),
        };
        let mut m_uci_sc = [0u32; uci::NOF_SYMB_PER_SLOT];
        for (slot, &value) in m_uci_sc.iter_mut().zip(self.pusch.m_uci_sc.iter()) {
            *slot = value;
        }

        Ok(PuschUciConfig {
            modulation,
            nof_layers: self.pusch.nof_layers,
            beta_harq_ack_offset: self.pusch.beta_harq_ack_offset,
            beta_csi1_offset: self.pusch.beta_csi1_offset,
            alpha: self.pusch.alpha,
            code_rate: self.pusch.code_rate,
            k_sum: self.pusch.k_sum,
            m_uci_sc,
            l0: self.pusch.l0,
            csi_part2_present: self.pusch.csi_part2_present,
        })
    }

    pub fn uci_config(&self) -> anyhow::Result<UciConfig> {
        Ok(UciConfig {
            o_ack: self.uci.o_ack,
            o_sr: self.uci.o_sr,
            csi: self.uci.csi.iter().map(|c| CsiReportDesc { nof_bits: c.nof_bits, has_part2: c.has_part2 }).collect(),
            pusch: self.pusch_uci_config()?,
        })
    }

    pub fn uci_value(&self) -> UciValue {
        UciValue { ack: self.value.ack.clone(), sr: self.value.sr, csi: self.value.csi.clone(), valid: true }
    }
}
