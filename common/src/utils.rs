//! Common Utilities
//!
//! Bit-level helpers shared between the UCI codec and its CLI demo.

use bytes::{Bytes, BytesMut, BufMut};

/// Convert a byte slice to hex string for debugging
pub fn bytes_to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// LTE CRC-6 polynomial (D^6 + D^5 + D + 1), used for 12 <= A <= 19 UCI payloads.
pub const CRC6_POLY: u64 = 0x61;
/// LTE CRC-11 polynomial (D^11 + D^10 + D^9 + D^5 + D + 1), used for A >= 20 UCI payloads.
pub const CRC11_POLY: u64 = 0xE21;

/// Compute a bit-domain CRC checksum without appending it.
///
/// `bits` is one-bit-per-byte (each entry 0 or 1), matching the UCI wire
/// convention. `order` is the CRC length in bits (6 or 11 for this codec).
pub fn crc_checksum(poly: u64, order: u32, bits: &[u8]) -> u32 {
    let highbit = 1u64 << order;
    let mut remainder: u64 = 0;

    for &bit in bits {
        remainder = (remainder << 1) | (bit as u64 & 1);
        if remainder & highbit != 0 {
            remainder ^= poly;
        }
    }
    for _ in 0..order {
        remainder <<= 1;
        if remainder & highbit != 0 {
            remainder ^= poly;
        }
    }

    (remainder & (highbit - 1)) as u32
}

/// Compute the CRC over `bits` and append it as `order` MSB-first one-bit-per-byte entries.
pub fn crc_attach(poly: u64, order: u32, bits: &mut Vec<u8>) {
    let checksum = crc_checksum(poly, order, bits);
    for i in (0..order).rev() {
        bits.push(((checksum >> i) & 1) as u8);
    }
}

/// Pack bits into bytes (MSB first)
pub fn pack_bits(bits: &[bool]) -> Bytes {
    let mut bytes = BytesMut::with_capacity((bits.len() + 7) / 8);

    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            if bit {
                byte |= 1 << (7 - i);
            }
        }
        bytes.put_u8(byte);
    }

    bytes.freeze()
}

/// Unpack bytes into bits (MSB first)
pub fn unpack_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);

    for &byte in bytes {
        for i in 0..8 {
            bits.push((byte & (1 << (7 - i))) != 0);
        }
    }

    bits
}

/// Round up to next power of 2
pub fn next_power_of_2(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }

    let mut v = n;
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_hex() {
        let data = vec![0x12, 0x34, 0xAB, 0xCD];
        assert_eq!(bytes_to_hex(&data), "12 34 ab cd");
    }

    #[test]
    fn test_bit_packing() {
        let bits = vec![true, false, true, false, true, false, true, false];
        let packed = pack_bits(&bits);
        assert_eq!(packed[0], 0xAA); // 10101010

        let unpacked = unpack_bits(&packed);
        assert_eq!(unpacked[..8], bits);
    }

    #[test]
    fn test_next_power_of_2() {
        assert_eq!(next_power_of_2(0), 1);
        assert_eq!(next_power_of_2(1), 1);
        assert_eq!(next_power_of_2(5), 8);
        assert_eq!(next_power_of_2(16), 16);
        assert_eq!(next_power_of_2(17), 32);
    }

    #[test]
    fn test_crc6_len_is_six_bits() {
        let bits = vec![1u8, 0, 1, 1, 0, 0, 1, 0, 1, 0, 1, 1];
        let checksum = crc_checksum(CRC6_POLY, 6, &bits);
        assert!(checksum < (1 << 6));
    }

    #[test]
    fn test_crc_attach_roundtrip() {
        let info = vec![1u8, 0, 1, 1, 0, 0, 1, 0, 1, 0, 1, 1];
        let mut attached = info.clone();
        crc_attach(CRC11_POLY, 11, &mut attached);
        assert_eq!(attached.len(), info.len() + 11);

        // Recomputing the checksum over the info bits must reproduce the tail.
        let checksum = crc_checksum(CRC11_POLY, 11, &info);
        let tail = &attached[info.len()..];
        let mut tail_value = 0u32;
        for &b in tail {
            tail_value = (tail_value << 1) | (b as u32);
        }
        assert_eq!(checksum, tail_value);
    }
}
