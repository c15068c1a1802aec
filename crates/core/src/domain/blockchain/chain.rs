use std::collections::HashSet;

/// Balance strategy family a chain identifier resolves to.
#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum ChainKind {
    Evm,
    Solana,
    Dora,
    Aura,
    Substrate,
    Unknown,
}

/// Chains handled by a dedicated strategy regardless of configuration.
pub const SOLANA: &str = "solana";
pub const DORA: &str = "dora";
pub const AURA: &str = "aura";

pub fn normalize_chain(chain: &str) -> String {
    chain.trim().to_lowercase()
}

/// Maps chain identifiers to a [`ChainKind`] using the configured EVM and
/// substrate sets. The EVM set wins over the named special cases, which win
/// over the substrate set.
#[derive(Debug, Clone, Default)]
pub struct ChainClassifier {
    evm: HashSet<String>,
    substrate: HashSet<String>,
}

impl ChainClassifier {
    pub fn new<I, J, S, T>(evm_chains: I, substrate_chains: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            evm: evm_chains
                .into_iter()
                .map(|c| normalize_chain(c.as_ref()))
                .collect(),
            substrate: substrate_chains
                .into_iter()
                .map(|c| normalize_chain(c.as_ref()))
                .collect(),
        }
    }

    pub fn classify(&self, chain: &str) -> ChainKind {
        let chain = normalize_chain(chain);
        if self.evm.contains(&chain) {
            return ChainKind::Evm;
        }

        match chain.as_str() {
            SOLANA => ChainKind::Solana,
            DORA => ChainKind::Dora,
            AURA => ChainKind::Aura,
            other if self.substrate.contains(other) => ChainKind::Substrate,
            _ => ChainKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ChainClassifier {
        ChainClassifier::new(["ethereum", "BSC"], ["polkadot", "kusama"])
    }

    #[test]
    fn test_classify_evm() {
        assert_eq!(classifier().classify("ethereum"), ChainKind::Evm);
        assert_eq!(classifier().classify("bsc"), ChainKind::Evm);
    }

    #[test]
    fn test_classify_named_chains() {
        assert_eq!(classifier().classify("solana"), ChainKind::Solana);
        assert_eq!(classifier().classify("dora"), ChainKind::Dora);
        assert_eq!(classifier().classify("aura"), ChainKind::Aura);
    }

    #[test]
    fn test_classify_substrate() {
        assert_eq!(classifier().classify("kusama"), ChainKind::Substrate);
    }

    #[test]
    fn test_classify_normalizes_input() {
        assert_eq!(classifier().classify("  Ethereum "), ChainKind::Evm);
        assert_eq!(classifier().classify("SOLANA"), ChainKind::Solana);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classifier().classify("bitcoin"), ChainKind::Unknown);
        assert_eq!(classifier().classify(""), ChainKind::Unknown);
    }

    #[test]
    fn test_evm_set_takes_precedence() {
        let classifier = ChainClassifier::new(["solana"], ["solana"]);
        assert_eq!(classifier.classify("solana"), ChainKind::Evm);
    }

    #[test]
    fn test_named_chain_takes_precedence_over_substrate() {
        let classifier = ChainClassifier::new(Vec::<String>::new(), ["aura"]);
        assert_eq!(classifier.classify("aura"), ChainKind::Aura);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ChainKind::Substrate.to_string(), "substrate");
    }
}
