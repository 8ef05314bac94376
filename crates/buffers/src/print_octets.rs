//! Debug utility for printing octets as hex strings.

use std::fmt::Write;

/// Formats a byte slice as a hex string for diagnostics.
///
/// At most `max` bytes are shown; the rest are summarized as a count.
///
/// # Example
///
/// ```
/// use msgpack_codec_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0x01, 0x02, 0x0a, 0xff], 16), "01 02 0a ff");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let mut result = String::with_capacity(octets.len().min(max) * 3);
    for (i, byte) in octets.iter().take(max).enumerate() {
        if i > 0 {
            result.push(' ');
        }
        let _ = write!(result, "{byte:02x}");
    }

    if octets.len() > max {
        let _ = write!(result, "... ({} more)", octets.len() - max);
    }

    result
}

/// Formats a byte slice as a hex string with default max of 16 bytes.
///
/// # Example
///
/// ```
/// use msgpack_codec_buffers::print_octets_default;
///
/// assert_eq!(print_octets_default(&[0xc1]), "c1");
/// ```
pub fn print_octets_default(octets: &[u8]) -> String {
    print_octets(octets, 16)
}
