use super::RubricError;

/// Normalizes free text into a criterion identifier.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_`, and strips leading and trailing underscores.
pub fn to_snake_case(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut output = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !output.is_empty() {
                output.push('_');
            }
            pending_separator = false;
            output.push(ch);
        } else {
            pending_separator = true;
        }
    }

    output
}

/// Best-effort display label for an identifier: `python_skills` -> `Python Skills`.
pub fn to_title_case(input: &str) -> String {
    input
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the identifier for a human-entered label, rejecting labels with
/// nothing left after normalization.
pub fn criterion_name(display_name: &str) -> Result<String, RubricError> {
    let name = to_snake_case(display_name);
    if name.is_empty() {
        return Err(RubricError::EmptyName {
            input: display_name.to_string(),
        });
    }
    Ok(name)
}
