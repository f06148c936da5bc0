use uuid::Uuid;

/// Length of generated short codes
pub const SHORT_CODE_LENGTH: usize = 6;

/// Generates a random short code from the leading characters of a v4 UUID.
///
/// Codes are not checked for uniqueness here; callers must look the code up
/// before saving it.
pub fn generate_short_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(SHORT_CODE_LENGTH);
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_six_hex_chars() {
        let code = generate_short_code();
        assert_eq!(code.len(), SHORT_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..32).map(|_| generate_short_code()).collect();
        assert!(codes.len() > 1);
    }
}
