//! Payload-size-class dispatch shared by the PUCCH and PUSCH entry points:
//! `A==0`, small-payload (3GPP TS 38.212 §5.3.3), large-payload (§5.3.1).

use crate::{polar_coder, small, UciCodecArgs, UciError};

pub fn encode_payload(payload: &[u8], a: usize, e: usize, qm: usize) -> Result<Vec<u8>, UciError> {
    if a == 0 {
        return Ok(Vec::new());
    }
    if a <= 11 {
        small::encode(payload, a, e, qm)
    } else {
        polar_coder::encode(payload, a, e)
    }
}

pub fn decode_payload(llr: &[i8], a: usize, qm: usize, args: &UciCodecArgs) -> Result<(Vec<u8>, bool), UciError> {
    if a == 0 {
        return Ok((Vec::new(), true));
    }
    if a <= 11 {
        small::decode(llr, a, qm, args.block_code_threshold, args.one_bit_threshold)
    } else {
        polar_coder::decode(llr, a, llr.len())
    }
}
