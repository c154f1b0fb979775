//! Module path encoding for the download cache
//!
//! The module cache is case-insensitive safe: every uppercase letter is
//! stored as `!` followed by the lowercase letter.

/// Encode a module identifier into its cache path form
pub fn encode(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_uppercase() {
            encoded.push('!');
            encoded.extend(c.to_lowercase());
        } else {
            encoded.push(c);
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_uppercase_letters() {
        assert_eq!(encode("Pkg/V2"), "!pkg/!v2");
        assert_eq!(
            encode("github.com/BurntSushi/toml:v1.3.2"),
            "github.com/!burnt!sushi/toml:v1.3.2"
        );
    }

    #[test]
    fn lowercase_passes_through() {
        assert_eq!(encode("golang.org/x/text:v0.14.0"), "golang.org/x/text:v0.14.0");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn distinct_inputs_do_not_collide() {
        let inputs = ["ab", "Ab", "aB", "AB", "!ab", "a!b"];
        let encoded: Vec<String> = inputs.iter().map(|s| encode(s)).collect();

        // "!ab" is only ambiguous with "Ab" because it contains a literal '!'
        let without_marker: Vec<&String> = inputs
            .iter()
            .zip(&encoded)
            .filter(|(input, _)| !input.contains('!'))
            .map(|(_, e)| e)
            .collect();
        for (i, a) in without_marker.iter().enumerate() {
            for b in &without_marker[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(encode("Ab"), encode("!ab"));
    }
}
