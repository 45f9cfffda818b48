//! Deterministic node naming from reward addresses.
//!
//! The derived name doubles as the container runtime name and the
//! directory key, so the same address must always map to the same name.
//! Two addresses sharing a suffix resolve to the same node and the
//! second install replaces the first; the suffix scheme is kept anyway
//! because idempotent re-install depends on it.

/// Derive a node name from a reward address.
///
/// Strips one leading `0x`/`0X`, takes the final `suffix_len` characters,
/// and joins them to the prefix as `<prefix>-<suffix>`. Pure and
/// deterministic; callers validate that the address is non-empty before
/// deriving.
pub fn derive_name(prefix: &str, address: &str, suffix_len: usize) -> String {
    let trimmed = address.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let chars: Vec<char> = stripped.chars().collect();
    let start = chars.len().saturating_sub(suffix_len);
    let suffix: String = chars[start..].iter().collect();

    format!("{prefix}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_basic() {
        assert_eq!(derive_name("nodedock", "0xABCDEF123456", 6), "nodedock-123456");
    }

    #[test]
    fn test_derive_name_deterministic() {
        let a = derive_name("nodedock", "0xDEADBEEF00112233", 6);
        let b = derive_name("nodedock", "0xDEADBEEF00112233", 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_name_prefix_stripped() {
        assert_eq!(
            derive_name("nodedock", "0xABCDEF123456", 6),
            derive_name("nodedock", "ABCDEF123456", 6)
        );
        assert_eq!(
            derive_name("nodedock", "0XABCDEF123456", 6),
            derive_name("nodedock", "ABCDEF123456", 6)
        );
    }

    #[test]
    fn test_derive_name_short_address() {
        assert_eq!(derive_name("nodedock", "abc", 6), "nodedock-abc");
    }

    #[test]
    fn test_derive_name_exact_length() {
        assert_eq!(derive_name("nodedock", "123456", 6), "nodedock-123456");
    }

    #[test]
    fn test_derive_name_trims_whitespace() {
        assert_eq!(
            derive_name("nodedock", "  0xABCDEF123456  ", 6),
            "nodedock-123456"
        );
    }

    #[test]
    fn test_derive_name_only_strips_leading_0x() {
        // "0x" in the middle is part of the address
        assert_eq!(derive_name("nodedock", "ff0x1234", 6), "nodedock-0x1234");
    }

    #[test]
    fn test_derive_name_colliding_suffixes() {
        // Known weakness: suffix collisions resolve to the same name
        assert_eq!(
            derive_name("nodedock", "0xAAAA123456", 6),
            derive_name("nodedock", "0xBBBB123456", 6)
        );
    }

    #[test]
    fn test_derive_name_custom_prefix_and_length() {
        assert_eq!(derive_name("fleet", "0xABCDEF123456", 4), "fleet-3456");
    }
}
