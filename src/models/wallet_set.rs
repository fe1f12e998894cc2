use crate::error::ConfigError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Configured set of addresses treated as owned by the user.
///
/// Iteration order follows the wallets file; membership checks are O(1).
/// Addresses are opaque base58 strings compared for equality only.
#[derive(Debug, Clone)]
pub struct WalletSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl WalletSet {
    /// Load the wallet set from a JSON array of address strings
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            return Err(ConfigError::WalletsFileNotFound(path.to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|_| ConfigError::WalletsFileNotFound(path.to_string()))?;

        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::WalletsFileInvalid(format!("{}: {}", path, e)))?;

        let entries = value
            .as_array()
            .ok_or_else(|| ConfigError::WalletsFileInvalid(path.to_string()))?;

        let mut wallets = Vec::with_capacity(entries.len());
        for entry in entries {
            let address = entry
                .as_str()
                .ok_or_else(|| ConfigError::WalletsFileInvalid(path.to_string()))?;
            wallets.push(address.to_string());
        }

        Self::from_addresses(wallets).ok_or_else(|| ConfigError::WalletsFileEmpty(path.to_string()))
    }

    /// Build a wallet set from raw address strings. Returns None when no
    /// non-empty address remains after trimming.
    pub fn from_addresses<I, S>(addresses: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();
        for address in addresses {
            let trimmed = address.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if members.insert(trimmed.to_string()) {
                ordered.push(trimmed.to_string());
            }
        }

        if ordered.is_empty() {
            None
        } else {
            Some(Self { ordered, members })
        }
    }

    /// Check whether an address belongs to the configured set
    pub fn contains(&self, address: &str) -> bool {
        self.members.contains(address.trim())
    }

    /// Like `contains`, but for the optional endpoints Helius returns
    pub fn contains_opt(&self, address: Option<&str>) -> bool {
        address.map(|a| self.contains(a)).unwrap_or(false)
    }

    /// Wallets in file order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_wallets_file() {
        let file = write_temp(r#"["walletA", "walletB", "walletC"]"#);
        let set = WalletSet::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(set.len(), 3);
        assert!(set.contains("walletA"));
        assert!(set.contains("walletB"));
        assert!(!set.contains("walletD"));
    }

    #[test]
    fn test_iteration_preserves_file_order() {
        let file = write_temp(r#"["zeta", "alpha", "mid"]"#);
        let set = WalletSet::load(file.path().to_str().unwrap()).unwrap();

        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_addresses_are_trimmed() {
        let file = write_temp(r#"["  walletA  ", "walletB"]"#);
        let set = WalletSet::load(file.path().to_str().unwrap()).unwrap();

        assert!(set.contains("walletA"));
        assert!(set.contains("  walletA "));
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = WalletSet::from_addresses(["a", "b", "a"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_file() {
        let result = WalletSet::load("/nonexistent/wallets.json");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::WalletsFileNotFound(_)
        ));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_temp("not json at all");
        let result = WalletSet::load(file.path().to_str().unwrap());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::WalletsFileInvalid(_)
        ));
    }

    #[test]
    fn test_non_array_json() {
        let file = write_temp(r#"{"wallets": ["a"]}"#);
        let result = WalletSet::load(file.path().to_str().unwrap());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::WalletsFileInvalid(_)
        ));
    }

    #[test]
    fn test_non_string_element() {
        let file = write_temp(r#"["a", 42]"#);
        let result = WalletSet::load(file.path().to_str().unwrap());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::WalletsFileInvalid(_)
        ));
    }

    #[test]
    fn test_empty_array() {
        let file = write_temp("[]");
        let result = WalletSet::load(file.path().to_str().unwrap());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::WalletsFileEmpty(_)
        ));
    }

    #[test]
    fn test_contains_opt() {
        let set = WalletSet::from_addresses(["a"]).unwrap();
        assert!(set.contains_opt(Some("a")));
        assert!(!set.contains_opt(Some("b")));
        assert!(!set.contains_opt(None));
    }
}
