//! Implementations of the maintenance tasks and deploy scripts

use std::sync::Arc;

use ethers::{
    abi::{Address, Detokenize},
    contract::{ContractCall, ContractFactory},
    providers::Middleware,
    types::{TransactionReceipt, U256, U64},
};
use tracing::{debug, info};

use crate::{
    artifacts::ContractArtifact,
    config::HarnessConfig,
    errors::ScriptError,
    secrets::SecretSource,
    solidity::{CommunityFactoryContract, CommunityTokenContract},
    types::TxOptions,
    utils::apply_tx_options,
};

/// Parameters of a new community and its token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityParams {
    /// The token name
    pub name: String,
    /// The token symbol
    pub symbol: String,
    /// The token price, in wei
    pub price: U256,
    /// The community treasury wallet
    pub treasury: Address,
    /// The identifier of the community's creator
    pub creator_id: String,
}

/// Whether a configured network can be used, as reported by `networks`
#[derive(Debug, Clone)]
pub struct NetworkStatus {
    /// The network's name
    pub name: String,
    /// The RPC URL, before secret substitution
    pub url: String,
    /// The configured chain ID
    pub chain_id: Option<u64>,
    /// The number of usable signers, or the reason the network is unusable
    pub signers: Result<usize, String>,
}

/// Read the current token price
pub async fn get_price<M: Middleware + 'static>(
    token: Address,
    client: Arc<M>,
) -> Result<U256, ScriptError> {
    let token = CommunityTokenContract::new(token, client);

    info!(token = %format!("{:#x}", token.address()), "reading token price");
    token
        .get_price()
        .call()
        .await
        .map_err(ScriptError::from_contract_error)
}

/// Mint `amount` tokens to the signer, attaching `value` wei if given
pub async fn mint_tokens<M: Middleware + 'static>(
    token: Address,
    amount: U256,
    value: Option<U256>,
    opts: TxOptions,
    client: Arc<M>,
) -> Result<TransactionReceipt, ScriptError> {
    let token = CommunityTokenContract::new(token, client);

    let mut call = token.mint(amount);
    if let Some(value) = value {
        call = call.value(value);
    }

    info!(token = %format!("{:#x}", token.address()), %amount, "minting tokens");
    send_and_confirm(call, opts).await
}

/// Create a new community with its token through the community factory
pub async fn create_com_token<M: Middleware + 'static>(
    factory: Address,
    params: CommunityParams,
    opts: TxOptions,
    client: Arc<M>,
) -> Result<TransactionReceipt, ScriptError> {
    let factory = CommunityFactoryContract::new(factory, client);

    info!(
        factory = %format!("{:#x}", factory.address()),
        name = %params.name,
        symbol = %params.symbol,
        price = %params.price,
        "creating community token"
    );

    let call = factory.create_community_with_token(
        params.name,
        params.symbol,
        params.price,
        params.treasury,
        params.creator_id,
    );
    send_and_confirm(call, opts).await
}

/// Deploy a new community factory from its compiled artifact, returning its
/// address once the creation transaction is mined without reverting
pub async fn deploy_factory<M: Middleware + 'static>(
    artifact: ContractArtifact,
    opts: TxOptions,
    client: Arc<M>,
) -> Result<Address, ScriptError> {
    if artifact.constructor_takes_args() {
        return Err(ScriptError::ArtifactParsing(
            "factory constructor unexpectedly takes arguments".to_string(),
        ));
    }

    let factory = ContractFactory::new(artifact.abi, artifact.bytecode, client);

    let mut deployer = factory
        .deploy(())
        .map_err(ScriptError::from_contract_error)?
        .confirmations(opts.confirmations);
    if opts.legacy {
        deployer = deployer.legacy();
    }
    if let Some(gas) = opts.gas_limit {
        deployer.tx.set_gas(gas);
    }

    info!("deploying community factory");
    let (contract, receipt) =
        deployer
            .send_with_receipt()
            .await
            .map_err(|e| match ScriptError::from_contract_error(e) {
                ScriptError::ContractInteraction(s) => ScriptError::ContractDeployment(s),
                other => other,
            })?;

    // Nodes may report a contract address for a failed creation
    debug!(?receipt, "deployment confirmed");
    if receipt.status == Some(U64::zero()) {
        return Err(ScriptError::ContractRevert(format!(
            "deployment transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(contract.address())
}

/// Check every configured network against the configured network invariant
pub fn list_networks(config: &HarnessConfig, secrets: &impl SecretSource) -> Vec<NetworkStatus> {
    config
        .networks
        .iter()
        .map(|(name, descriptor)| NetworkStatus {
            name: name.clone(),
            url: descriptor.url.clone(),
            chain_id: descriptor.chain_id,
            signers: descriptor
                .resolve(name, secrets)
                .map(|network| network.signers.len())
                .map_err(|e| e.to_string()),
        })
        .collect()
}

/// Send a state-changing call and wait for its confirmations, failing if the
/// transaction reverted
async fn send_and_confirm<M: Middleware + 'static, D: Detokenize>(
    call: ContractCall<M, D>,
    opts: TxOptions,
) -> Result<TransactionReceipt, ScriptError> {
    let call = apply_tx_options(call, &opts);

    let receipt = call
        .send()
        .await
        .map_err(ScriptError::from_contract_error)?
        .confirmations(opts.confirmations)
        .await
        .map_err(|e| ScriptError::from_provider_error(&e))?
        .ok_or(ScriptError::TransactionDropped)?;

    debug!(?receipt, "transaction confirmed");
    if receipt.status == Some(U64::zero()) {
        return Err(ScriptError::ContractRevert(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(receipt)
}
