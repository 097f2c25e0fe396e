//! Utilities for the community scripts.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use ethers::{
    abi::{Address, Detokenize},
    contract::ContractCall,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::Signer,
    types::U256,
    utils::{parse_ether, parse_units},
};
use json::JsonValue;
use tracing::info;

use crate::{
    config::ResolvedNetwork,
    constants::{DEPLOYMENTS_KEY, ETHER_SUFFIX, GWEI_SUFFIX, POLL_INTERVAL_MS},
    errors::ScriptError,
    types::{CommunityClient, TxOptions},
};

/// Sets up the signing client for the given network, using the signer at
/// index `account`.
///
/// Fails if the account index is out of range, the RPC endpoint is
/// unreachable, or it reports a chain ID different from the configured one.
pub async fn setup_client(
    network: &ResolvedNetwork,
    account: usize,
) -> Result<Arc<CommunityClient>, ScriptError> {
    let wallet = network.signer(account)?;

    let url = reqwest::Url::parse(&network.url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let mut http_client = reqwest::Client::builder();
    if let Some(timeout) = network.timeout {
        http_client = http_client.timeout(timeout);
    }
    let http_client = http_client
        .build()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let provider = Provider::new(Http::new_with_client(url, http_client))
        .interval(Duration::from_millis(POLL_INTERVAL_MS));

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();

    if let Some(expected) = network.chain_id {
        if expected != chain_id {
            return Err(ScriptError::ChainIdMismatch {
                expected,
                actual: chain_id,
            });
        }
    }

    let wallet = wallet.with_chain_id(chain_id);
    info!(
        network = %network.name,
        chain_id,
        signer = %format!("{:#x}", wallet.address()),
        "connected"
    );

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Parse an operator-supplied address, rejecting empty placeholders and the
/// zero address
pub fn parse_address(field: &str, value: &str) -> Result<Address, ScriptError> {
    let invalid = || ScriptError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let address = Address::from_str(trimmed).map_err(|_| invalid())?;
    if address.is_zero() {
        return Err(invalid());
    }

    Ok(address)
}

/// Parse an amount of wei, given either as a decimal integer or as a decimal
/// with an `ether` or `gwei` suffix
pub fn parse_amount(value: &str) -> Result<U256, ScriptError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScriptError::InvalidAmount("empty amount".to_string()));
    }

    let invalid = |e: String| ScriptError::InvalidAmount(format!("{:?}: {}", value, e));
    if let Some(ether) = trimmed.strip_suffix(ETHER_SUFFIX) {
        parse_ether(ether.trim()).map_err(|e| invalid(e.to_string()))
    } else if let Some(gwei) = trimmed.strip_suffix(GWEI_SUFFIX) {
        parse_units(gwei.trim(), GWEI_SUFFIX)
            .map(U256::from)
            .map_err(|e| invalid(e.to_string()))
    } else {
        U256::from_dec_str(trimmed).map_err(|e| invalid(format!("{:?}", e)))
    }
}

/// Apply the network's transaction options to a contract call
pub(crate) fn apply_tx_options<M: Middleware, D: Detokenize>(
    mut call: ContractCall<M, D>,
    opts: &TxOptions,
) -> ContractCall<M, D> {
    if opts.legacy {
        call = call.legacy();
    }
    match opts.gas_limit {
        Some(gas) => call.gas(gas),
        None => call,
    }
}

/// Read and parse the JSON file at `file_path`
pub fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Read the address recorded for `contract_key` on `network` in the deployments file.
///
/// Returns `None` if the file or the entry does not exist.
pub fn read_deployed_address(
    file_path: &Path,
    network: &str,
    contract_key: &str,
) -> Result<Option<Address>, ScriptError> {
    if !file_path.exists() {
        return Ok(None);
    }

    let parsed_json = get_json_from_file(file_path)?;
    parsed_json[DEPLOYMENTS_KEY][network][contract_key]
        .as_str()
        .map(|addr| parse_address(contract_key, addr))
        .transpose()
}

/// Record `address` for `contract_key` on `network` in the deployments file,
/// creating the file if needed
pub fn write_deployed_address(
    file_path: &Path,
    network: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][network][contract_key] =
        JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_parse_address() {
        let address = parse_address("token", TOKEN).unwrap();
        assert_eq!(
            format!("{address:#x}"),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );

        // Without prefix and with surrounding whitespace
        assert_eq!(
            parse_address("token", " 5FbDB2315678afecb367f032d93F642f64180aa3 ").unwrap(),
            address
        );
    }

    #[test]
    fn test_placeholder_addresses_rejected() {
        for value in ["", "   ", "...", "0x1234", "0x0000000000000000000000000000000000000000"] {
            let err = parse_address("treasury", value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "accepted {value:?}");
            assert!(err.to_string().contains("treasury"));
        }
    }

    #[test]
    fn test_parse_amount() {
        let wei = U256::from(5_000_000_000_000_000u64);

        assert_eq!(parse_amount("5000000000000000").unwrap(), wei);
        assert_eq!(parse_amount("0.005ether").unwrap(), wei);
        assert_eq!(parse_amount("0.005 ether").unwrap(), wei);
        assert_eq!(parse_amount("5000000gwei").unwrap(), wei);
    }

    #[test]
    fn test_invalid_amounts() {
        for value in ["", "abc", "1.5", "-1", "1.2.3ether"] {
            let err = parse_amount(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "accepted {value:?}");
        }
    }

    #[test]
    fn test_deployments_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let address = parse_address("factory", TOKEN).unwrap();

        assert_eq!(
            read_deployed_address(&path, "local", "community_factory_contract").unwrap(),
            None
        );

        write_deployed_address(&path, "local", "community_factory_contract", address).unwrap();
        write_deployed_address(&path, "aurora", "community_factory_contract", address).unwrap();

        assert_eq!(
            read_deployed_address(&path, "local", "community_factory_contract").unwrap(),
            Some(address)
        );
        assert_eq!(
            read_deployed_address(&path, "moonrabbit", "community_factory_contract").unwrap(),
            None
        );

        let parsed = get_json_from_file(&path).unwrap();
        assert_eq!(
            parsed[DEPLOYMENTS_KEY]["aurora"]["community_factory_contract"].as_str(),
            Some("0x5fbdb2315678afecb367f032d93f642f64180aa3")
        );
    }

    #[test]
    fn test_malformed_deployments_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, "not json").unwrap();

        let err = read_deployed_address(&path, "local", "community_factory_contract").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
