//! Hex input files for clonectl.
//!
//! Inline hex arguments are parsed by clap straight into [`Bytes`]; this module only covers
//! the `--*-file` variants, whose contents may span lines or come from stdin.

use std::{fs, io::Read};

use alloy_primitives::Bytes;

use super::Result;

/// Reads hex-encoded bytes from `path`, or from stdin when `path` is `-`.
///
/// Surrounding whitespace (such as a trailing newline) is ignored and the `0x` prefix is optional.
pub fn read_hex_file(path: &str) -> Result<Bytes> {
    let contents = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };
    Ok(contents.trim().parse::<Bytes>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CloneCtlError;
    use rstest::rstest;
    use std::path::PathBuf;

    fn hex_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("clonectl-hex-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(name);
        fs::write(&file, contents).unwrap();
        file
    }

    #[rstest]
    #[case::empty("empty", "", &[])]
    #[case::bare_prefix("bare_prefix", "0x", &[])]
    #[case::prefixed("prefixed", "0xdeadBEEF", &[0xde, 0xad, 0xbe, 0xef])]
    #[case::unprefixed("unprefixed", "0102", &[0x01, 0x02])]
    #[case::trailing_newline("trailing_newline", "0xaabb\n", &[0xaa, 0xbb])]
    #[case::surrounding_whitespace("surrounding_whitespace", "  0x0a \r\n", &[0x0a])]
    fn test_read_hex_file(#[case] name: &str, #[case] contents: &str, #[case] expected: &[u8]) {
        let file = hex_file(name, contents);
        assert_eq!(read_hex_file(file.to_str().unwrap()).unwrap().to_vec(), expected);
    }

    #[rstest]
    #[case::odd_length("odd_length", "0x123")]
    #[case::not_hex("not_hex", "0xzz")]
    #[case::inner_whitespace("inner_whitespace", "0x01 02")]
    fn test_read_hex_file_rejects(#[case] name: &str, #[case] contents: &str) {
        let file = hex_file(name, contents);
        assert!(matches!(
            read_hex_file(file.to_str().unwrap()).unwrap_err(),
            CloneCtlError::InvalidHex(_)
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let missing = std::env::temp_dir().join("clonectl-hex-does-not-exist.hex");
        assert!(matches!(
            read_hex_file(missing.to_str().unwrap()).unwrap_err(),
            CloneCtlError::FileRead(_)
        ));
    }
}
