use std::fmt::Display;

/// Renders values as a 1-indexed list, one `N. value` per line.
pub fn enumerate_values<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| format!("{}. {}", idx + 1, value))
        .collect::<Vec<_>>()
        .join("\n")
}
