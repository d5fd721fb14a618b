//! XML and Excel `_xHHHH_` escaping for cell text

/// Escape text content and attribute values for XML.
pub(crate) fn escape_xml(s: &str) -> String {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Whether `<t>` needs `xml:space="preserve"` to keep the text intact.
pub(crate) fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}

/// Returns true if `s` begins with an `_xHHHH_` sequence.
fn starts_with_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[0] == b'_'
        && b[1] == b'x'
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}

/// Encode text so Excel reads it back unchanged.
///
/// Control characters other than tab and line feed, and the noncharacters
/// U+FFFE and U+FFFF, are written as `_xHHHH_`: XML 1.0 forbids them (and
/// folds CR into LF). A literal
/// `_xHHHH_` in the text has its underscore escaped as `_x005F_` so it is
/// not decoded on read.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    if !s.contains('_') && !s.chars().any(needs_excel_escape) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 8);
    for (i, ch) in s.char_indices() {
        if ch == '_' && starts_with_escape(&s[i..]) {
            out.push_str("_x005F_");
        } else if needs_excel_escape(ch) {
            out.push_str(&format!("_x{:04X}_", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}

fn needs_excel_escape(ch: char) -> bool {
    match ch {
        '\t' | '\n' => false,
        '\u{FFFE}' | '\u{FFFF}' => true,
        _ => (ch as u32) < 0x20,
    }
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = if starts_with_escape(tail) {
            u32::from_str_radix(&tail[2..6], 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(ch) => {
                result.push(ch);
                rest = &tail[7..];
            }
            None => {
                result.push('_');
                rest = &tail[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_xml("H₂O"), "H₂O");
        assert_eq!(escape_xml("\"'"), "&quot;&apos;");
    }

    #[test]
    fn test_space_preserve() {
        assert!(needs_space_preserve(" lead"));
        assert!(needs_space_preserve("trail\n"));
        assert!(!needs_space_preserve("in side"));
        assert!(!needs_space_preserve(""));
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("a_x000d_b"), "a\rb");
        assert_eq!(decode_excel_escapes("a_x000A_b"), "a\nb");
        assert_eq!(decode_excel_escapes("_x005f_x0041_"), "_x0041_");
        assert_eq!(decode_excel_escapes("snake_case"), "snake_case");
        assert_eq!(decode_excel_escapes("_x12_"), "_x12_");
        assert_eq!(decode_excel_escapes("tail_"), "tail_");
    }

    #[test]
    fn test_encode_excel_escapes() {
        assert_eq!(encode_excel_escapes("plain"), "plain");
        assert_eq!(encode_excel_escapes("snake_case"), "snake_case");
        assert_eq!(encode_excel_escapes("_x0041_"), "_x005F_x0041_");
        assert_eq!(encode_excel_escapes("a\u{1}b"), "a_x0001_b");
        assert_eq!(encode_excel_escapes("tab\tkept"), "tab\tkept");
        assert_eq!(encode_excel_escapes("crlf\r\n"), "crlf_x000D_\n");
        assert_eq!(encode_excel_escapes("a\u{FFFE}b\u{FFFF}"), "a_xFFFE_b_xFFFF_");
        assert_eq!(encode_excel_escapes("\u{FFFD}"), "\u{FFFD}");
    }

    #[test]
    fn test_encode_then_decode_preserves_text() {
        for text in ["2x10⁹", "H₂O", "_x0041_", "a\u{1}b", "a\r\nb", "a\u{FFFE}b", "测试_x下划线"] {
            assert_eq!(decode_excel_escapes(&encode_excel_escapes(text)), text);
        }
    }
}
