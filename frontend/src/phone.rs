// WhatsApp number masking, Brazilian style: (DD) DDDDD-DDDD

pub const MAX_DIGITS: usize = 11;

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats raw keystroke input as it is typed. Anything past the
/// eleventh digit is dropped.
pub fn format_whatsapp(value: &str) -> String {
    let numbers: String = digits_only(value).chars().take(MAX_DIGITS).collect();
    // only ascii digits remain, so byte slicing is safe
    match numbers.len() {
        0..=2 => numbers,
        3..=7 => format!("({}) {}", &numbers[..2], &numbers[2..]),
        _ => format!("({}) {}-{}", &numbers[..2], &numbers[2..7], &numbers[7..]),
    }
}
