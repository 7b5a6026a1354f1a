/// Drop control characters a converter may leave in its output.
///
/// Line structure is kept: `\r\n` and lone `\r` become `\n`, form feeds
/// (page breaks in PDF text layers) become a blank line, tabs survive.
/// Everything else in the `Cc` category is removed.
pub fn strip_control_characters(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\x0C' => out.push_str("\n\n"),
            '\n' | '\t' => out.push(c),
            c if c.is_control() => {}
            // Zero-width and BOM characters from OCR layers
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        assert_eq!(strip_control_characters("Gaceta\x00 1403"), "Gaceta 1403");
    }

    #[test]
    fn strips_control_characters_keeps_text() {
        let clean = strip_control_characters("Ley 5ª\x01\x02\x03 de 1992");
        assert_eq!(clean, "Ley 5ª de 1992");
    }

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(strip_control_characters("uno\r\ndos\rtres"), "uno\ndos\ntres");
    }

    #[test]
    fn form_feed_becomes_blank_line() {
        assert_eq!(strip_control_characters("página 1\x0Cpágina 2"), "página 1\n\npágina 2");
    }

    #[test]
    fn keeps_tabs_and_spanish_text() {
        let raw = "AÑO XXXIV\t- Nº 1403 «Cámara» — señoría";
        assert_eq!(strip_control_characters(raw), raw);
    }

    #[test]
    fn removes_bom_and_zero_width() {
        assert_eq!(strip_control_characters("\u{FEFF}SENA\u{200B}DO"), "SENADO");
    }

    #[test]
    fn empty_input() {
        assert_eq!(strip_control_characters(""), "");
    }
}
