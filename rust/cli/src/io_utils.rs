//! File and stdin helpers shared by the commands.

use std::io::BufRead;

/// Reads one trimmed line; `None` on EOF or read error.
///
/// ```rust
/// # use scopa_cli::io_utils::read_stdin_line;
/// let mut input = std::io::Cursor::new("  2\n");
/// assert_eq!(read_stdin_line(&mut input).as_deref(), Some("2"));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Ensure parent directory exists for given path, creating if needed.
pub fn ensure_parent_dir(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Strip UTF-8 BOM (Byte Order Mark) from the beginning of a string if present.
pub fn strip_utf8_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}
