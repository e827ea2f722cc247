use crate::error::{Error, Result};

/// Resolves user input against known values: exact (case-insensitive) match
/// first, then a unique prefix.
pub fn expand_prefix<'a, S: AsRef<str>>(key: &str, candidates: &'a [S]) -> Result<&'a str> {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return Err(Error::invalid("Empty value"));
    }

    // 1. Exact match
    if let Some(exact) = candidates.iter().find(|c| c.as_ref().to_lowercase() == key) {
        return Ok(exact.as_ref());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| c.to_lowercase().starts_with(&key))
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(Error::invalid(format!("Unknown value: '{}'", key))),
        _ => Err(Error::invalid(format!("Ambiguous value: '{}' matches {:?}", key, matches))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_prefix() {
        let candidates = vec!["Karts", "Krater", "Carrusel", "Montaña Rusa"];

        assert_eq!(expand_prefix("karts", &candidates).unwrap(), "Karts");
        assert_eq!(expand_prefix("Ka", &candidates).unwrap(), "Karts");
        assert_eq!(expand_prefix("kr", &candidates).unwrap(), "Krater");
        assert_eq!(expand_prefix("montaña", &candidates).unwrap(), "Montaña Rusa");

        // Ambiguous
        assert!(expand_prefix("k", &candidates).is_err());

        // Unknown
        assert!(expand_prefix("x", &candidates).is_err());
        assert!(expand_prefix("  ", &candidates).is_err());
    }

    #[test]
    fn test_exact_wins_over_prefix() {
        let candidates = vec!["Rapids".to_string(), "Rapids II".to_string()];
        assert_eq!(expand_prefix("rapids", &candidates).unwrap(), "Rapids");
    }
}
