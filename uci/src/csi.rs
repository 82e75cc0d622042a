//! Opaque CSI Part 1 report (de)serialization.
//!
//! Real CSI report formats (CQI/PMI/RI/LI tables per report quantity) are
//! treated as an external collaborator: this module only needs to size,
//! pack, and unpack reports as flat bit sequences, not interpret their
//! contents.

use crate::types::CsiReportDesc;
use crate::UciError;

/// Total number of CSI Part 1 bits across all configured reports.
pub fn csi_part1_nof_bits(csi: &[CsiReportDesc]) -> usize {
    csi.iter().map(|c| c.nof_bits).sum()
}

/// Whether any configured report carries a CSI Part 2.
pub fn csi_has_part2(csi: &[CsiReportDesc]) -> bool {
    csi.iter().any(|c| c.has_part2)
}

/// Pack CSI Part 1 values (already flattened one-bit-per-byte by the
/// caller) into `out`, returning the number of bits written.
pub fn csi_part1_pack(csi: &[CsiReportDesc], values: &[u8], out: &mut Vec<u8>) -> Result<usize, UciError> {
    let total = csi_part1_nof_bits(csi);
    if values.len() < total {
        return Err(UciError::InvalidInput(format!(
            "CSI values too short: got {} bits, need {}",
            values.len(),
            total
        )));
    }
    out.extend_from_slice(&values[..total]);
    Ok(total)
}

/// Unpack `bit_count` CSI Part 1 bits from `bits`, returning the opaque
/// report payload.
pub fn csi_part1_unpack(csi: &[CsiReportDesc], bits: &[u8]) -> Result<Vec<u8>, UciError> {
    let total = csi_part1_nof_bits(csi);
    if bits.len() < total {
        return Err(UciError::InvalidInput(format!(
            "CSI bit buffer too short: got {} bits, need {}",
            bits.len(),
            total
        )));
    }
    Ok(bits[..total].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nof_bits_sums_reports() {
        let csi = vec![
            CsiReportDesc { nof_bits: 4, has_part2: false },
            CsiReportDesc { nof_bits: 7, has_part2: false },
        ];
        assert_eq!(csi_part1_nof_bits(&csi), 11);
    }

    #[test]
    fn test_has_part2_detection() {
        let csi = vec![
            CsiReportDesc { nof_bits: 4, has_part2: false },
            CsiReportDesc { nof_bits: 7, has_part2: true },
        ];
        assert!(csi_has_part2(&csi));
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let csi = vec![CsiReportDesc { nof_bits: 5, has_part2: false }];
        let values = vec![1u8, 0, 1, 1, 0];
        let mut out = Vec::new();
        let n = csi_part1_pack(&csi, &values, &mut out).unwrap();
        assert_eq!(n, 5);
        let unpacked = csi_part1_unpack(&csi, &out).unwrap();
        assert_eq!(unpacked, values);
    }
}
