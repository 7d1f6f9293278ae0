/// Identifiers and labels are stored byte for byte, so surrounding
/// whitespace is refused instead of trimmed away.
pub fn is_padded(value: &str) -> bool {
    value.trim() != value
}

pub fn padding_error(field: &str) -> String {
    format!("{} cannot have leading or trailing whitespace", field)
}
