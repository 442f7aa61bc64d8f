//! JSON rendering: pretty-printed with two-space indent and a trailing newline.

use super::Export;

pub fn render_json(export: &Export) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(export)?;
    out.push('\n');
    Ok(out)
}
