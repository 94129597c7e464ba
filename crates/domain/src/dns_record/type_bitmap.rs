//! NSEC/NSEC3 type bitmaps (RFC 4034 §4.1.2).

/// Encode type codes into window blocks. Input order and duplicates do not
/// matter.
pub fn encode_type_bitmap(types: &[u16]) -> Vec<u8> {
    let mut sorted = types.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut out = Vec::new();
    let mut index = 0;

    while index < sorted.len() {
        let window = (sorted[index] >> 8) as u8;
        let mut bitmap = [0u8; 32];
        let mut used = 0usize;

        while index < sorted.len() && (sorted[index] >> 8) as u8 == window {
            let low = (sorted[index] & 0xFF) as usize;
            bitmap[low / 8] |= 0x80 >> (low % 8);
            used = used.max(low / 8 + 1);
            index += 1;
        }

        out.push(window);
        out.push(used as u8);
        out.extend_from_slice(&bitmap[..used]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4034 §4.3: A MX RRSIG NSEC TYPE1234
    #[test]
    fn test_rfc4034_example_bitmap() {
        let encoded = encode_type_bitmap(&[1, 15, 46, 47, 1234]);
        assert_eq!(
            encoded,
            vec![
                0x00, 0x06, 0x40, 0x01, 0x00, 0x00, 0x00, 0x03, 0x04, 0x1b, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20,
            ]
        );
    }

    #[test]
    fn test_order_and_duplicates_ignored() {
        assert_eq!(encode_type_bitmap(&[47, 1, 46, 1]), encode_type_bitmap(&[1, 46, 47]));
    }

    #[test]
    fn test_empty_bitmap() {
        assert!(encode_type_bitmap(&[]).is_empty());
    }
}
