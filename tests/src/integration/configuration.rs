//! # Configuration
//!
//! Dispatchers built from TOML: custom router tables, module prefixes and
//! per-subsystem limits must reach the verifiers they configure.

#[cfg(test)]
mod tests {
    use bridge_telemetry::{gather_metrics, register_metrics, TelemetryConfig};
    use shared_types::{Classify, ErrorKind, SideChain};
    use xc_01_bridge_storage::{InMemoryKVStore, KeyValueStore};
    use xc_07_dispatcher::{
        BridgeConfig, CrossChainDispatcher, DepositClaim, DispatchError, SideChainRegistry,
        VerifierKind,
    };

    use crate::integration::fixtures::{payload, relayers, Bridge, LOCAL, RELAY_CHAIN};

    const CONFIG: &str = r#"
        local_chain_id = 7
        module_address = "bridge-v2"

        [[routes]]
        router = 40
        verifier = "relay"

        [[routes]]
        router = 41
        verifier = "evm"

        [vote]
        max_message_len = 256

        [custody]
        script_kind = "p2sh"
        dust_limit_sat = 1000
    "#;

    #[test]
    fn test_toml_routes_reach_dispatcher() {
        let config = BridgeConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.local_chain_id, LOCAL);
        let mut bridge = Bridge::with_config(config);
        bridge.side_chains.register(SideChain {
            chain_id: 90,
            name: "relay-v2".to_string(),
            router: 40,
            ccm_contract: vec![],
            blocks_to_wait: 1,
        });

        assert_eq!(bridge.dispatcher.verifiers().len(), 2);
        let resolved = bridge
            .dispatcher
            .verifiers()
            .resolve(&bridge.side_chains.side_chain(90).unwrap())
            .unwrap();
        assert_eq!(resolved.kind(), VerifierKind::Relay);

        // The default relay tag is no longer routed.
        let claim = DepositClaim::Relay {
            signer: relayers()[0],
            payload: payload(&[0x01]),
        };
        assert!(matches!(
            bridge.propose(RELAY_CHAIN, &claim),
            Err(DispatchError::UnroutedChain { router: 1, .. })
        ));

        for signer in &relayers()[..3] {
            let claim = DepositClaim::Relay {
                signer: *signer,
                payload: payload(&[0x01]),
            };
            let _ = bridge.propose(90, &claim).unwrap();
        }
        assert!(bridge.is_applied(90, &[0x01]));
    }

    #[test]
    fn test_vote_limit_applies_to_relay() {
        let mut bridge = Bridge::with_config(BridgeConfig::from_toml_str(CONFIG).unwrap());
        bridge.side_chains.register(SideChain {
            chain_id: 90,
            name: "relay-v2".to_string(),
            router: 40,
            ccm_contract: vec![],
            blocks_to_wait: 1,
        });

        // Vote message is the 8-byte chain ID plus the payload.
        let mut long = shared_types::EventPayload::decode(&payload(&[0x02])).unwrap();
        long.args = vec![0; 300];
        let claim = DepositClaim::Relay {
            signer: relayers()[0],
            payload: long.encode(),
        };
        let err = bridge.propose(90, &claim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_module_address_prefixes_records() {
        let config = BridgeConfig::from_toml_str(CONFIG).unwrap();
        let dispatcher = CrossChainDispatcher::new(config).unwrap();
        let mut state = dispatcher.open_state(InMemoryKVStore::new());
        let custodians = xc_06_btc_custody::test_utils::Custodians::new(2);
        dispatcher
            .register_redeem(&mut state, 1, &custodians.redeem_script(1))
            .unwrap();

        let total = state.store().len();
        assert!(total > 0);
        assert_eq!(state.store().prefix_scan(b"bridge-v2").unwrap().len(), total);
        assert_eq!(dispatcher.config().custody.dust_limit_sat, 1000);
    }

    #[test]
    fn test_invalid_toml_never_builds() {
        let err = BridgeConfig::from_toml_str("module_address = \"\"").unwrap_err();
        assert!(matches!(err, DispatchError::Config(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_metrics_exposition() {
        register_metrics().unwrap();
        let mut bridge = Bridge::new();
        for signer in &relayers()[..3] {
            let claim = DepositClaim::Relay {
                signer: *signer,
                payload: payload(&[0x03]),
            };
            let _ = bridge.propose(RELAY_CHAIN, &claim).unwrap();
        }
        let text = gather_metrics().unwrap();
        assert!(text.contains("xc_instructions_admitted_total"));
        assert!(text.contains("verifier=\"relay\""));
    }

    #[test]
    fn test_telemetry_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "xc-bridge");
        assert_eq!(config.log_level, "info");
    }
}
