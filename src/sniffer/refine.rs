//! File-name based refinement of content results.
//!
//! Content alone cannot tell a C header from a C source file, or a shared
//! library from a position-independent executable. The file name can.

use crate::core::MagicResult;

/// Adjust `result` using the name of the file it came from.
pub fn refine(result: MagicResult, name: &str) -> MagicResult {
    let MagicResult {
        mime_type,
        accuracy,
    } = result;

    let refined = match mime_type.as_str() {
        "text/x-c" | "text/x-objc" => {
            let suffix = if name.ends_with(".h") { "hdr" } else { "src" };
            format!("{mime_type}{suffix}")
        }
        "text/x-c++" => {
            let tail: String = {
                let chars: Vec<char> = name.chars().collect();
                chars[chars.len().saturating_sub(4)..].iter().collect()
            };
            let header = name.ends_with(".h")
                || name.ends_with(".hh")
                || name.ends_with(".H")
                || !tail.contains('.');
            let suffix = if header { "hdr" } else { "src" };
            format!("{mime_type}{suffix}")
        }
        "application/x-sharedlib" if !name.contains(".so") => "application/x-executable".to_string(),
        _ => mime_type,
    };

    MagicResult {
        mime_type: refined,
        accuracy,
    }
}
