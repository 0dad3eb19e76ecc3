//! Hex rendering of buffer contents for `Debug` output.

use std::fmt::Write;

/// Renders up to `max` bytes as space-separated lowercase hex, noting how
/// many bytes were left out.
///
/// ```
/// use dybuf::print_octets;
///
/// assert_eq!(print_octets(&[0x80, 0x00, 0xff], 16), "80 00 ff");
/// assert_eq!(print_octets(&[1, 2, 3], 2), "01 02 ... (1 more)");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let mut out = String::with_capacity(octets.len().min(max) * 3);
    for (i, byte) in octets.iter().take(max).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    if octets.len() > max {
        let _ = write!(out, " ... ({} more)", octets.len() - max);
    }
    out
}
