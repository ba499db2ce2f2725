//! Filename sanitization for staged artifacts.

/// Characters that are not portable in file names.
const FORBIDDEN: [char; 8] = ['/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace every filesystem-forbidden character with `_`.
///
/// Output length (in characters) equals input length and the function is
/// idempotent. Control characters and reserved device names pass through.
#[must_use]
pub fn sanitize(filename: &str) -> String {
    filename
        .chars()
        .map(|ch| if FORBIDDEN.contains(&ch) { '_' } else { ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn forbidden_characters_become_underscores() {
        assert_eq!(sanitize("a:b*c?.jar"), "a_b_c_.jar");
        assert_eq!(sanitize(r#"x\y/z"<>|"#), r"x\y_z____");
        assert_eq!(sanitize("plain-1.0.tgz"), "plain-1.0.tgz");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn sanitize_is_idempotent_and_length_preserving() {
        for input in ["a/b\\c/", "ünï:cødé", "????", "CON"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
            assert_eq!(once.chars().count(), input.chars().count());
        }
    }
}
