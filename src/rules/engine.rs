use regex::NoExpand;
use tracing::{debug, trace};

use super::date::{recognize_date, DateError};
use super::types::RuleConfiguration;

/// Split a file name into stem and extension at the last dot.
///
/// Leading dots belong to the stem (`.bashrc` has no extension), and a
/// trailing dot yields no extension (`notes.` keeps the dot in its stem), so
/// `stem + "." + extension` always rebuilds the original name.
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();

    match name[leading_dots..].rfind('.') {
        Some(pos) => {
            let dot = leading_dots + pos;
            let extension = &name[dot + 1..];
            if extension.is_empty() {
                (name, None)
            } else {
                (&name[..dot], Some(extension))
            }
        }
        None => (name, None),
    }
}

/// Compute the new name for `original` under `rules`.
///
/// Steps run in a fixed order, each on the output of the previous one:
/// trim from start, trim from end, first regex match, first date, then
/// prefix/suffix and extension. Never fails; an empty result is allowed.
pub fn compute_name(original: &str, rules: &RuleConfiguration) -> String {
    let (stem, extension) = split_name(original);
    let mut stem = stem.to_string();

    if rules.remove_from_start() > 0 {
        stem = stem.chars().skip(rules.remove_from_start()).collect();
    }

    if rules.remove_from_end() > 0 {
        let keep = stem.chars().count().saturating_sub(rules.remove_from_end());
        stem = stem.chars().take(keep).collect();
    }

    if let Some(pattern) = rules.regex_find() {
        let replacement = rules.regex_replace().unwrap_or("");
        stem = pattern
            .regex()
            .replacen(&stem, 1, NoExpand(replacement))
            .into_owned();
    }

    if let Some(format) = rules.date_format() {
        match recognize_date(&stem, format) {
            Ok(rewritten) => stem = rewritten,
            Err(DateError::NotFound(_)) => {}
            Err(e) => debug!(name = original, error = %e, "Date left unchanged"),
        }
    }

    let mut name = String::with_capacity(
        rules.prefix().len() + stem.len() + rules.suffix().len() + original.len(),
    );
    name.push_str(rules.prefix());
    name.push_str(&stem);
    name.push_str(rules.suffix());

    match (rules.add_extension(), extension) {
        (Some(replacement), _) => name.push_str(replacement),
        (None, Some(extension)) => {
            name.push('.');
            name.push_str(extension);
        }
        (None, None) => {}
    }

    trace!(from = original, to = %name, "Computed name");
    name
}
