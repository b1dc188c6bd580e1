//! Project directory name encoding
//!
//! Claude Code stores each project's logs under `projects/<encoded>`, where the
//! encoded name is the project's absolute path with `/` replaced by `-`. The
//! encoding is lossy (a literal `-` in a path component decodes as `/`), so the
//! decoded path is display metadata, not a validated filesystem path.
//!
//! ```
//! use ccmeter_core::path_codec;
//!
//! assert_eq!(path_codec::decode("-Users-liang-Downloads-Data"), "/Users/liang/Downloads/Data");
//! assert_eq!(path_codec::encode("/Users/liang/Downloads/Data"), "-Users-liang-Downloads-Data");
//! ```

const PLACEHOLDER: char = '-';
const SEPARATOR: char = '/';

/// Decode an encoded project directory name into a path string
pub fn decode(encoded_dir_name: &str) -> String {
    match encoded_dir_name.strip_prefix(PLACEHOLDER) {
        Some(rest) => {
            let mut decoded = String::with_capacity(encoded_dir_name.len());
            decoded.push(SEPARATOR);
            decoded.push_str(&rest.replace(PLACEHOLDER, "/"));
            decoded
        }
        // Malformed directory name, no leading separator to restore
        None => encoded_dir_name.replace(PLACEHOLDER, "/"),
    }
}

/// Encode a path into the directory-name form
pub fn encode(path: &str) -> String {
    path.replace(SEPARATOR, "-")
}

/// Last non-empty component of a decoded project path
pub fn project_name(path: &str) -> String {
    path.rsplit(SEPARATOR)
        .find(|component| !component.is_empty())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_absolute() {
        assert_eq!(
            decode("-Users-liang-Downloads-Data"),
            "/Users/liang/Downloads/Data"
        );
        assert_eq!(decode("-"), "/");
    }

    #[test]
    fn test_decode_without_leading_placeholder() {
        assert_eq!(decode("relative-dir"), "relative/dir");
        assert_eq!(decode("plain"), "plain");
        assert_eq!(decode(""), "");
    }

    #[test]
    fn test_decode_is_lossy_for_dashes() {
        assert_eq!(decode("-home-dev-my-app"), "/home/dev/my/app");
    }

    #[test]
    fn test_encode_roundtrip() {
        let path = "/Users/liang/Downloads/Data";
        assert_eq!(decode(&encode(path)), path);
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name("/Users/liang/Downloads/Data"), "Data");
        assert_eq!(project_name("/Users/liang/"), "liang");
        assert_eq!(project_name("solo"), "solo");
        assert_eq!(project_name("/"), "/");
        assert_eq!(project_name(""), "");
    }
}
