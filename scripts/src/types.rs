//! Type definitions used throughout the scripts

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::LocalWallet,
    types::U256,
};

use crate::{config::ResolvedNetwork, constants::NUM_CONFIRMATIONS};

/// The signing client used against a live network
pub type CommunityClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Per-network settings applied to every transaction the scripts send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    /// Gas limit to set on each transaction, estimated by the node when unset
    pub gas_limit: Option<U256>,
    /// The number of confirmations to wait for
    pub confirmations: usize,
    /// Send pre-EIP-1559 transactions priced with `eth_gasPrice`
    pub legacy: bool,
}

impl TxOptions {
    /// Transaction options configured for the given network
    pub fn for_network(network: &ResolvedNetwork) -> Self {
        Self {
            gas_limit: network.gas.map(U256::from),
            legacy: network.legacy,
            ..Default::default()
        }
    }
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            gas_limit: None,
            confirmations: NUM_CONFIRMATIONS,
            legacy: false,
        }
    }
}
