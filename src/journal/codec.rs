//! Binary encoding of encrypted entries.
//!
//! A serialized entry is a fixed 40-byte header followed by the ciphertext:
//!
//! ```text
//! +0  timestamp          8 bytes, big-endian u64
//! +8  salt              12 bytes
//! +20 nonce_prefix      16 bytes
//! +36 ciphertext_length  4 bytes, big-endian u32
//! +40 ciphertext         ciphertext_length bytes
//! ```
//!
//! Records are simply concatenated. Decoding is defensive: it walks the
//! buffer by cumulative offset and stops at the first record whose header or
//! declared ciphertext does not fit, returning everything parsed up to that
//! point. Truncated trailing data is tolerated, never an error — the atomic
//! rename on the write path is the primary defense against truncation being
//! observed at all, this is the second line.

use crate::constants::{NONCE_PREFIX_LEN, RECORD_HEADER_LEN, SALT_LEN};
use crate::journal::Entry;

/// Serializes entries into the concatenated record format.
///
/// Entries are written in iteration order; the journal holds them in an
/// unordered map, so no meaning may ever be attached to record order.
pub fn encode_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Vec<u8> {
    let mut buf = Vec::new();
    for entry in entries {
        buf.extend_from_slice(&entry.timestamp.to_be_bytes());
        buf.extend_from_slice(&entry.salt);
        buf.extend_from_slice(&entry.nonce_prefix);
        buf.extend_from_slice(&(entry.ciphertext.len() as u32).to_be_bytes());
        buf.extend_from_slice(&entry.ciphertext);
    }
    buf
}

/// Parses as many complete records as the buffer holds.
pub fn decode_entries(data: &[u8]) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut offset = 0usize;
    loop {
        if data.len() < offset + RECORD_HEADER_LEN {
            break; // no more complete headers
        }
        let timestamp = u64::from_be_bytes(data[offset..offset + 8].try_into().unwrap());
        let salt: [u8; SALT_LEN] = data[offset + 8..offset + 20].try_into().unwrap();
        let nonce_prefix: [u8; NONCE_PREFIX_LEN] =
            data[offset + 20..offset + 36].try_into().unwrap();
        let ciphertext_len =
            u32::from_be_bytes(data[offset + 36..offset + RECORD_HEADER_LEN].try_into().unwrap())
                as usize;
        if data.len() < offset + RECORD_HEADER_LEN + ciphertext_len {
            break; // declared ciphertext not fully present
        }
        let start = offset + RECORD_HEADER_LEN;
        let ciphertext = data[start..start + ciphertext_len].to_vec();
        entries.push(Entry {
            timestamp,
            salt,
            nonce_prefix,
            ciphertext,
        });
        offset = start + ciphertext_len;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: u64, ciphertext: Vec<u8>) -> Entry {
        Entry {
            timestamp,
            salt: [timestamp as u8; SALT_LEN],
            nonce_prefix: [timestamp.wrapping_mul(3) as u8; NONCE_PREFIX_LEN],
            ciphertext,
        }
    }

    #[test]
    fn test_roundtrip_preserves_entries_and_order() {
        let entries = vec![
            entry(3, b"ccc".to_vec()),
            entry(1, b"a".to_vec()),
            entry(2, Vec::new()),
        ];

        let encoded = encode_entries(&entries);
        let decoded = decode_entries(&encoded);

        assert_eq!(decoded.len(), entries.len());
        for (original, parsed) in entries.iter().zip(&decoded) {
            assert_eq!(parsed.timestamp, original.timestamp);
            assert_eq!(parsed.salt, original.salt);
            assert_eq!(parsed.nonce_prefix, original.nonce_prefix);
            assert_eq!(parsed.ciphertext, original.ciphertext);
        }
    }

    #[test]
    fn test_roundtrip_multi_megabyte_ciphertext() {
        let big = vec![0xabu8; 3 * 1024 * 1024];
        let entries = vec![entry(9, big.clone()), entry(10, b"after".to_vec())];

        let decoded = decode_entries(&encode_entries(&entries));
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].ciphertext, big);
        assert_eq!(decoded[1].ciphertext, b"after");
    }

    #[test]
    fn test_empty_buffer_decodes_to_nothing() {
        assert!(decode_entries(&[]).is_empty());
    }

    #[test]
    fn test_truncated_header_stops_cleanly() {
        let encoded = encode_entries(&[entry(1, b"hello".to_vec())]);
        // Chop into the middle of the header.
        let decoded = decode_entries(&encoded[..RECORD_HEADER_LEN - 5]);
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_truncated_ciphertext_keeps_preceding_records() {
        let mut encoded = encode_entries(&[entry(1, b"first".to_vec())]);
        encoded.extend_from_slice(&encode_entries(&[entry(2, b"second".to_vec())]));
        // Drop the last two bytes of the second record's ciphertext.
        encoded.truncate(encoded.len() - 2);

        let decoded = decode_entries(&encoded);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].timestamp, 1);
        assert_eq!(decoded[0].ciphertext, b"first");
    }

    #[test]
    fn test_declared_length_beyond_buffer_stops_cleanly() {
        let mut encoded = encode_entries(&[entry(1, b"x".to_vec())]);
        // Inflate the declared ciphertext length far past the buffer end.
        encoded[36..40].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(decode_entries(&encoded).is_empty());
    }
}
