use std::sync::LazyLock;

use regex::Regex;

static NULL_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""type"\s*:\s*"null""#).expect("valid regex"));

/// Textual repairs applied before the document is parsed.
///
/// - `"type": "null"` (any spacing) becomes `"nullable": true`, which the
///   typed decoder and downstream generators understand.
/// - Stray `null%` / `nil%` tokens emitted by the upstream server become `null`.
pub fn sanitize(input: &str) -> String {
    let replaced = NULL_TYPE.replace_all(input, r#""nullable": true"#);
    replaced.replace("null%", "null").replace("nil%", "null")
}

/// Byte-level entry point. Invalid UTF-8 is reported rather than replaced.
pub fn sanitize_bytes(input: Vec<u8>) -> Result<String, std::string::FromUtf8Error> {
    String::from_utf8(input).map(|text| sanitize(&text))
}
