// Character encoding detection for inventory exports

use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Guess the encoding of raw file contents.
///
/// Returns one of `"UTF-8"`, `"UTF-16LE"`, `"UTF-16BE"`, `"windows-1252"` or
/// `"ISO-8859-1"`. Single-byte text is reported as ISO-8859-1 unless it uses
/// the C1 range, which only windows-1252 assigns printable characters to.
pub fn detect_encoding(bytes: &[u8]) -> &'static str {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return match encoding.name() {
            "UTF-16LE" => "UTF-16LE",
            "UTF-16BE" => "UTF-16BE",
            _ => "UTF-8",
        };
    }

    if std::str::from_utf8(bytes).is_ok() {
        return "UTF-8";
    }

    if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
        "windows-1252"
    } else {
        "ISO-8859-1"
    }
}

/// Resolve a detected or configured encoding name to a decoder.
///
/// ISO-8859-1 is decoded as windows-1252, its superset.
pub fn encoding_for_name(name: &str) -> Result<&'static Encoding, String> {
    match name.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Ok(UTF_8),
        "iso-8859-1" | "latin1" | "windows-1252" | "cp1252" => Ok(WINDOWS_1252),
        _ => Err(format!("unsupported encoding: {name}")),
    }
}

/// Read `path`, detect its encoding and resolve it.
pub fn detect_file_encoding(path: &Path) -> Result<&'static Encoding, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("failed to open file '{}': {e}", path.display()))?;
    let name = detect_encoding(&bytes);
    log::info!("File {} has encoding: {name}", path.display());
    encoding_for_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detect_plain_ascii_as_utf8() {
        assert_eq!(detect_encoding(b"Ebene;Inventar Nr\n1;0591-S00001\n"), "UTF-8");
    }

    #[test]
    fn test_detect_utf8_umlauts() {
        assert_eq!(detect_encoding("Verfügbar;Gerätenr.".as_bytes()), "UTF-8");
    }

    #[test]
    fn test_detect_boms() {
        assert_eq!(detect_encoding(b"\xEF\xBB\xBFa;b"), "UTF-8");
        assert_eq!(detect_encoding(b"\xFF\xFEa\x00"), "UTF-16LE");
        assert_eq!(detect_encoding(b"\xFE\xFF\x00a"), "UTF-16BE");
    }

    #[test]
    fn test_detect_latin1() {
        assert_eq!(detect_encoding(b"Verf\xfcgbar;Ger\xe4tenr."), "ISO-8859-1");
    }

    #[test]
    fn test_detect_windows_1252() {
        // 0x80 is the euro sign in windows-1252
        assert_eq!(detect_encoding(b"Preis \x80 12"), "windows-1252");
    }

    #[test]
    fn test_encoding_for_supported_names() {
        assert_eq!(encoding_for_name("UTF-8").unwrap(), UTF_8);
        assert_eq!(encoding_for_name("utf-8").unwrap(), UTF_8);
        assert_eq!(encoding_for_name("ISO-8859-1").unwrap(), WINDOWS_1252);
        assert_eq!(encoding_for_name("windows-1252").unwrap(), WINDOWS_1252);
    }

    #[test]
    fn test_encoding_for_unsupported_name() {
        assert_eq!(
            encoding_for_name("UTF-16LE").unwrap_err(),
            "unsupported encoding: UTF-16LE"
        );
        assert_eq!(
            encoding_for_name("Shift_JIS").unwrap_err(),
            "unsupported encoding: Shift_JIS"
        );
    }

    #[test]
    fn test_detect_file_encoding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"Verf\xfcgbar\n").unwrap();

        let encoding = detect_file_encoding(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let (decoded, _, _) = encoding.decode(&bytes);
        assert_eq!(decoded, "Verfügbar\n");
    }

    #[test]
    fn test_detect_missing_file() {
        let err = detect_file_encoding(Path::new("does-not-exist.csv")).unwrap_err();
        assert!(err.contains("does-not-exist.csv"), "{err}");
    }
}
