//! Language tag to file extension resolution.
//!
//! Used only at room-creation time to name the default file; a fixed
//! finite mapping with a generic fallback. No state, no failure mode.

/// Fallback extension for unrecognized language tags
const FALLBACK_EXTENSION: &str = "txt";

/// Resolve a language tag to its default file extension.
pub fn default_extension(language: &str) -> &'static str {
    match language {
        "javascript" => "js",
        "python" => "py",
        "java" => "java",
        "cpp" => "cpp",
        "html" => "html",
        "css" => "css",
        "typescript" => "ts",
        _ => FALLBACK_EXTENSION,
    }
}

/// The name of the default file a room is created with.
pub fn default_file_name(language: &str) -> String {
    format!("Solution.{}", default_extension(language))
}
