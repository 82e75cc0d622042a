//! UCI codec demo.
//!
//! Loads a PUCCH/PUSCH scenario from a TOML file, runs one PUCCH and one
//! PUSCH round trip through `uci::UciCodec`, and logs the result.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use uci::{UciBit, UciCodec, UciCodecArgs};

mod config;
use config::ScenarioConfig;

/// UCI codec demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to scenario configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Map coded bits to LLRs for a noiseless loopback: `Zero`/`Placeholder`
/// push the decoder toward 0, `One` toward 1, matching the sign convention
/// `codec::polar::boxplus` and the small-payload decoders assume.
fn loopback_llr(bits: &[u8]) -> Vec<i8> {
    bits.iter().map(|&b| if b == UciBit::One.as_u8() { -100 } else { 100 }).collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(env_filter).with_target(true).with_line_number(true).init();

    info!("Starting UCI codec demo");
    info!("Scenario file: {}", args.config);

    let scenario = ScenarioConfig::from_toml_file(&args.config)?;
    let pucch_res = scenario.pucch_resource()?;
    let uci_cfg = scenario.uci_config()?;
    let value = scenario.uci_value();

    let codec_args = UciCodecArgs {
        disable_simd: scenario.codec.disable_simd,
        block_code_threshold: scenario.codec.block_code_threshold,
        one_bit_threshold: scenario.codec.one_bit_threshold,
    };
    let mut codec = UciCodec::new(codec_args);

    info!("PUCCH resource: {:?}", pucch_res);
    let e_uci = uci::pucch_e(&pucch_res)?;
    info!("PUCCH E_uci = {}", e_uci);

    let encoded = codec.pucch_encode(&pucch_res, &uci_cfg, &value)?;
    let llr = loopback_llr(&encoded);
    let decoded = codec.pucch_decode(&pucch_res, &uci_cfg, &llr)?;
    info!("PUCCH round trip: sent ack={:?} received {}", value.ack, decoded.summary());

    let (ack_bits, _q_ack) = codec.pusch_encode_ack(&uci_cfg, &value)?;
    if !ack_bits.is_empty() {
        let ack_llr = loopback_llr(&ack_bits);
        let (ack_decoded, _) = codec.pusch_decode_ack(&uci_cfg, &ack_llr)?;
        info!("PUSCH HARQ-ACK round trip: {}", ack_decoded.summary());
    }

    if !uci_cfg.csi.is_empty() {
        let csi1_bits = codec.pusch_encode_csi1(&uci_cfg, &value)?;
        if !csi1_bits.is_empty() {
            let csi1_llr = loopback_llr(&csi1_bits);
            let csi1_decoded = codec.pusch_decode_csi1(&uci_cfg, &csi1_llr)?;
            info!("PUSCH CSI Part 1 round trip: {}", csi1_decoded.summary());
        }
    }

    info!("UCI codec demo complete");
    Ok(())
}
