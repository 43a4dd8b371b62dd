//! Directive detection in configuration content
//!
//! Full parsing and merging of configuration documents happens elsewhere.
//! Import only needs to know whether the document asks for a persistent
//! tunnel, so it can seed the profile's `persist_tun` flag once.

/// Directive that requests a persistent tunnel device.
pub const PERSIST_TUN_DIRECTIVE: &str = "persist-tun";

/// Check if configuration content declares a directive.
///
/// A directive is the first word of a line. Blank lines, `#` and `;`
/// comments, and the bodies of inline `<tag>...</tag>` blocks are skipped.
/// A leading `--` is accepted so command-line style spellings match too.
///
/// # Examples
///
/// ```
/// use profile_core::directives::declares_directive;
///
/// let content = "client\n# persist-tun\n<ca>\npersist-tun\n</ca>\n";
/// assert!(!declares_directive(content, "persist-tun"));
/// assert!(declares_directive("client\n  persist-tun\n", "persist-tun"));
/// ```
pub fn declares_directive(content: &str, directive: &str) -> bool {
    let mut open_block: Option<&str> = None;

    for line in content.lines() {
        let line = line.trim();

        if let Some(tag) = open_block {
            if line.strip_prefix("</").and_then(|rest| rest.strip_suffix('>')) == Some(tag) {
                open_block = None;
            }
            continue;
        }

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(tag) = line.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
            if !tag.starts_with('/') {
                open_block = Some(tag);
            }
            continue;
        }

        let word = line.split_whitespace().next().unwrap_or_default();
        if word.trim_start_matches("--") == directive {
            return true;
        }
    }

    false
}

/// Check if configuration content asks for a persistent tunnel.
pub fn declares_persist_tun(content: &str) -> bool {
    declares_directive(content, PERSIST_TUN_DIRECTIVE)
}
