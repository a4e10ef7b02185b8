//! Text transforms required by the verification upstream.

/// Hex-encodes a message body for the backup-path verification call.
///
/// Each UTF-16 code unit is rendered as four lowercase hex digits and
/// concatenated, matching what the verification service expects. Only the
/// backup path applies this transform.
#[must_use]
pub fn text_to_hex(text: &str) -> String {
    text.encode_utf16().map(|unit| format!("{unit:04x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_each_code_unit_to_four_digits() {
        assert_eq!(text_to_hex("Hi"), "00480069");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(text_to_hex(""), "");
    }

    #[test]
    fn non_ascii_uses_code_units() {
        // 'é' is U+00E9, a single code unit.
        assert_eq!(text_to_hex("é"), "00e9");
    }
}
