//! Short display names for model identifiers
//!
//! `claude-opus-4-1-20250805` becomes `Opus 4.1`, `claude-3.5-sonnet` becomes
//! `Sonnet 3.5`. Identifiers outside the opus/sonnet/haiku families are shown
//! unchanged.
//!
//! ```
//! use ccmeter::model_formatter::format_model_name;
//!
//! assert_eq!(format_model_name("claude-opus-4-1-20250805", false), "Opus 4.1");
//! assert_eq!(format_model_name("claude-opus-4-1-20250805", true), "claude-opus-4-1-20250805");
//! ```

use ccmeter_pricing::PricingFamily;

/// Display name for a model, or the raw identifier when `use_full_name` is set
pub fn format_model_name(model_name: &str, use_full_name: bool) -> String {
    if use_full_name {
        return model_name.to_string();
    }
    let Some(family) = PricingFamily::from_model_name(model_name) else {
        return model_name.to_string();
    };

    let label = family_label(family);
    match version_of(&model_name.to_lowercase()) {
        Some(version) => format!("{label} {version}"),
        None => label.to_string(),
    }
}

/// Format several model names and join them with `separator`
pub fn format_model_list<'a>(
    models: impl IntoIterator<Item = &'a str>,
    use_full_name: bool,
    separator: &str,
) -> String {
    models
        .into_iter()
        .map(|m| format_model_name(m, use_full_name))
        .collect::<Vec<_>>()
        .join(separator)
}

fn family_label(family: PricingFamily) -> &'static str {
    match family {
        PricingFamily::Opus => "Opus",
        PricingFamily::Sonnet => "Sonnet",
        PricingFamily::Haiku => "Haiku",
    }
}

/// First run of numeric `-`-separated parts, skipping the 8-digit date suffix
fn version_of(model_name: &str) -> Option<String> {
    let parts: Vec<&str> = model_name
        .split('-')
        .skip_while(|part| !is_version_part(part))
        .take_while(|part| is_version_part(part))
        .take(2)
        .collect();

    match parts.as_slice() {
        [] => None,
        [dotted, ..] if dotted.contains('.') => Some(dotted.to_string()),
        [major, minor] if !minor.contains('.') => Some(format!("{major}.{minor}")),
        [major, ..] => Some(major.to_string()),
    }
}

fn is_version_part(part: &str) -> bool {
    !part.is_empty()
        && part.len() < 8
        && !part.starts_with('.')
        && part.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_model_ids() {
        assert_eq!(format_model_name("claude-opus-4-20250514", false), "Opus 4");
        assert_eq!(format_model_name("claude-opus-4-1-20250805", false), "Opus 4.1");
        assert_eq!(format_model_name("claude-sonnet-4-5-20250929", false), "Sonnet 4.5");
        assert_eq!(format_model_name("claude-haiku-4-5", false), "Haiku 4.5");
    }

    #[test]
    fn test_legacy_model_ids() {
        assert_eq!(format_model_name("claude-3-opus-20240229", false), "Opus 3");
        assert_eq!(format_model_name("claude-3.5-sonnet-20241022", false), "Sonnet 3.5");
        assert_eq!(format_model_name("claude-3-haiku", false), "Haiku 3");
    }

    #[test]
    fn test_unversioned_and_unknown() {
        assert_eq!(format_model_name("opus", false), "Opus");
        assert_eq!(format_model_name("gpt-4o", false), "gpt-4o");
        assert_eq!(format_model_name("unknown", false), "unknown");
    }

    #[test]
    fn test_format_model_list() {
        let models = ["claude-opus-4-1-20250805", "claude-sonnet-4-20250514"];
        assert_eq!(format_model_list(models, false, ", "), "Opus 4.1, Sonnet 4");
        assert_eq!(
            format_model_list(models, true, " | "),
            "claude-opus-4-1-20250805 | claude-sonnet-4-20250514"
        );
    }
}
