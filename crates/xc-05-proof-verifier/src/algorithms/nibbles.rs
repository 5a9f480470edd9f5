//! # Nibble Paths
//!
//! Trie keys are walked half a byte at a time. A 32-byte hashed key becomes 64
//! nibbles.

/// Split bytes into nibbles, high half first.
pub fn to_nibbles(bytes: &[u8]) -> Vec<u8> {
    let mut nibbles = Vec::with_capacity(bytes.len() * 2);
    for byte in bytes {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0F);
    }
    nibbles
}

/// Hex-prefix encode a nibble path.
///
/// Flag nibble: 0 extension even, 1 extension odd, 2 leaf even, 3 leaf odd.
pub fn encode_hex_prefix(nibbles: &[u8], is_leaf: bool) -> Vec<u8> {
    let odd = nibbles.len() % 2 == 1;
    let flag = if is_leaf { 2 } else { 0 } + u8::from(odd);

    let mut out = Vec::with_capacity(nibbles.len() / 2 + 1);
    let rest = if odd {
        out.push((flag << 4) | nibbles[0]);
        &nibbles[1..]
    } else {
        out.push(flag << 4);
        nibbles
    };
    for pair in rest.chunks(2) {
        out.push((pair[0] << 4) | pair.get(1).copied().unwrap_or(0));
    }
    out
}

/// Decode a hex-prefix path into `(nibbles, is_leaf)`.
///
/// Returns `None` for an unknown flag or a non-zero pad nibble.
pub fn decode_hex_prefix(encoded: &[u8]) -> Option<(Vec<u8>, bool)> {
    let (&first, rest) = encoded.split_first()?;
    let flag = first >> 4;
    if flag > 3 {
        return None;
    }
    let is_leaf = flag >= 2;
    let odd = flag % 2 == 1;

    let mut nibbles = Vec::with_capacity(rest.len() * 2 + 1);
    if odd {
        nibbles.push(first & 0x0F);
    } else if first & 0x0F != 0 {
        return None;
    }
    nibbles.extend(to_nibbles(rest));
    Some((nibbles, is_leaf))
}
