//! Tests against a locally running development node.
//!
//! These expect a Hardhat/Anvil node on `http://127.0.0.1:8545` with its
//! default funded accounts, and `COMMUNITY_FACTORY_ARTIFACT` pointing at the
//! compiled factory artifact. Run them with `cargo test -- --ignored`.

use std::{collections::HashMap, env, path::PathBuf};

use community_scripts::{
    artifacts::ContractArtifact, commands::deploy_factory, config::HarnessConfig,
    types::TxOptions, utils::setup_client,
};
use ethers::providers::Middleware;

/// The first default account of a Hardhat/Anvil node
const DEVNET_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[tokio::test]
#[ignore = "requires a local node and a compiled factory artifact"]
async fn test_deploy_factory_on_local_node() {
    let config = HarnessConfig::builtin().unwrap();
    let secrets: HashMap<String, String> =
        [("HARDHAT_PRIVATE_KEY".to_string(), DEVNET_KEY.to_string())]
            .into_iter()
            .collect();
    let network = config.resolve_network("hardhat", &secrets).unwrap();
    let client = setup_client(&network, 0).await.unwrap();

    let artifact_path = env::var("COMMUNITY_FACTORY_ARTIFACT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.artifact_path("CommunityFactory"));
    let artifact = ContractArtifact::load(&artifact_path).unwrap();

    let address = deploy_factory(artifact, TxOptions::default(), client.clone())
        .await
        .unwrap();

    assert!(!address.is_zero());
    assert_eq!(format!("{address:#x}").len(), 42);
    let code = client.get_code(address, None).await.unwrap();
    assert!(!code.is_empty());
}
