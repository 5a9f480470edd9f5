//! # Bridge Configuration
//!
//! Built once at module initialization and passed to the dispatcher; no
//! subsystem reads process-wide settings.
//!
//! ```toml
//! local_chain_id = 7
//! module_address = "xc-bridge"
//!
//! [[routes]]
//! router = 2
//! verifier = "evm"
//!
//! [header_sync]
//! epoch_length = 200
//!
//! [custody]
//! script_kind = "p2wsh"
//! ```
//!
//! Omitted tables and keys take their defaults.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared_types::ChainId;
use xc_03_consensus_vote::VoteConfig;
use xc_04_header_sync::HeaderSyncConfig;
use xc_05_proof_verifier::ProofConfig;
use xc_06_btc_custody::CustodyConfig;

use crate::domain::{
    DispatchError, Route, VerifierKind, ROUTER_ALT_MPT, ROUTER_EVM, ROUTER_RELAY,
    ROUTER_SIGNATURE,
};

/// Standard router table.
pub fn default_routes() -> Vec<Route> {
    vec![
        Route {
            router: ROUTER_RELAY,
            verifier: VerifierKind::Relay,
        },
        Route {
            router: ROUTER_EVM,
            verifier: VerifierKind::Evm,
        },
        Route {
            router: ROUTER_SIGNATURE,
            verifier: VerifierKind::Signature,
        },
        Route {
            router: ROUTER_ALT_MPT,
            verifier: VerifierKind::AltMpt,
        },
    ]
}

/// Whole-bridge configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Chain ID of the host chain; admitted payloads must target it.
    pub local_chain_id: ChainId,
    /// Prefix of every record key the bridge writes.
    pub module_address: String,
    /// Router tag to verifier family.
    pub routes: Vec<Route>,
    /// PoA light client.
    pub header_sync: HeaderSyncConfig,
    /// Relay vote engine.
    pub vote: VoteConfig,
    /// Proof verifiers.
    pub proof: ProofConfig,
    /// BTC custody.
    pub custody: CustodyConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            local_chain_id: 0,
            module_address: "xc-bridge".to_string(),
            routes: default_routes(),
            header_sync: HeaderSyncConfig::default(),
            vote: VoteConfig::default(),
            proof: ProofConfig::default(),
            custody: CustodyConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Create a config for testing (local chain 7, small limits).
    pub fn for_testing() -> Self {
        Self {
            local_chain_id: 7,
            module_address: "xc".to_string(),
            routes: default_routes(),
            header_sync: HeaderSyncConfig::for_testing(),
            vote: VoteConfig::for_testing(),
            proof: ProofConfig::for_testing(),
            custody: CustodyConfig::for_testing(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, DispatchError> {
        let config: Self =
            toml::from_str(content).map_err(|e| DispatchError::Config(e.to_string()))?;
        config.validate().map_err(DispatchError::Config)?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.module_address.is_empty() {
            return Err("module_address must not be empty".to_string());
        }
        let mut routers = BTreeSet::new();
        for route in &self.routes {
            if !routers.insert(route.router) {
                return Err(format!("router {} is bound twice", route.router));
            }
        }
        self.header_sync
            .validate()
            .map_err(|e| format!("header_sync: {e}"))?;
        self.vote.validate().map_err(|e| format!("vote: {e}"))?;
        self.proof.validate().map_err(|e| format!("proof: {e}"))?;
        self.custody
            .validate()
            .map_err(|e| format!("custody: {e}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xc_06_btc_custody::ScriptKind;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.routes.len(), 4);
    }

    #[test]
    fn test_testing_config() {
        let config = BridgeConfig::for_testing();
        assert!(config.validate().is_ok());
        assert_eq!(config.header_sync.epoch_length, 8);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = BridgeConfig::from_toml_str(
            r#"
            local_chain_id = 7
            module_address = "bridge"

            [header_sync]
            epoch_length = 30000

            [custody]
            script_kind = "p2sh"
            "#,
        )
        .unwrap();
        assert_eq!(config.local_chain_id, 7);
        assert_eq!(config.module_address, "bridge");
        assert_eq!(config.header_sync.epoch_length, 30000);
        assert_eq!(
            config.header_sync.block_period_secs,
            HeaderSyncConfig::default().block_period_secs
        );
        assert_eq!(config.custody.script_kind, ScriptKind::P2sh);
        assert_eq!(config.routes, default_routes());
    }

    #[test]
    fn test_from_toml_routes() {
        let config = BridgeConfig::from_toml_str(
            r#"
            [[routes]]
            router = 6
            verifier = "evm"

            [[routes]]
            router = 9
            verifier = "alt_mpt"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.routes,
            vec![
                Route {
                    router: 6,
                    verifier: VerifierKind::Evm
                },
                Route {
                    router: 9,
                    verifier: VerifierKind::AltMpt
                },
            ]
        );
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            BridgeConfig::from_toml_str("local_chain_id = \"seven\""),
            Err(DispatchError::Config(_))
        ));
        assert!(matches!(
            BridgeConfig::from_toml_str("[header_sync]\nepoch_length = 0"),
            Err(DispatchError::Config(_))
        ));

        let doubled = r#"
            [[routes]]
            router = 2
            verifier = "evm"

            [[routes]]
            router = 2
            verifier = "relay"
        "#;
        let err = BridgeConfig::from_toml_str(doubled).unwrap_err();
        assert!(err.to_string().contains("router 2 is bound twice"));
    }
}
