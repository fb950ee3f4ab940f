//! YAML front matter extraction.
//!
//! Front matter is a YAML mapping delimited by `---` lines at the very
//! start of the file:
//!
//! ```text
//! ---
//! title: My Page
//! ---
//! body...
//! ```

use serde_yaml::Mapping;

/// Splits front matter from the markdown body.
///
/// Returns an empty mapping and the full input when no front matter
/// delimiter is present (including an opening `---` with no closing
/// line). Scalar values keep their YAML types: `count: 42` stays a
/// number, `draft: true` stays a boolean.
///
/// # Errors
///
/// Returns the YAML error when the delimited block is not a valid
/// mapping.
pub(crate) fn extract(content: &str) -> Result<(Mapping, &str), serde_yaml::Error> {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok((Mapping::new(), content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']).trim() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let mapping = if yaml.trim().is_empty() {
                Mapping::new()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((mapping, body));
        }
        offset += line.len();
    }

    // Opening delimiter without a closing one: treat as content.
    Ok((Mapping::new(), content))
}
