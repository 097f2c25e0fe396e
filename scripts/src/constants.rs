//! Constants used in the community scripts

/// The built-in network and build configuration
pub const DEFAULT_CONFIG: &str = include_str!("../harness.toml");

/// The network used when the configuration does not name one
pub const DEFAULT_NETWORK: &str = "hardhat";

/// The default Solidity compiler version
pub const DEFAULT_SOLC_VERSION: &str = "0.8.2";

/// The default number of optimizer runs
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Default path of the contract sources
pub const DEFAULT_SOURCES_PATH: &str = "./contracts";

/// Default path of the contract tests
pub const DEFAULT_TESTS_PATH: &str = "./test";

/// Default path of the compiler cache
pub const DEFAULT_CACHE_PATH: &str = "./cache";

/// Default path of the compiled artifacts
pub const DEFAULT_ARTIFACTS_PATH: &str = "./artifacts";

/// Default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The number of confirmations to wait for state-changing transactions
pub const NUM_CONFIRMATIONS: usize = 1;

/// The interval at which pending transactions are polled
pub const POLL_INTERVAL_MS: u64 = 1000;

/// The number of tokens minted when no amount is given
pub const DEFAULT_MINT_AMOUNT: u64 = 1;

/// The name of the community factory contract, as found in its artifact
pub const COMMUNITY_FACTORY_CONTRACT_NAME: &str = "CommunityFactory";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The community factory contract key in the `deployments.json` file
pub const COMMUNITY_FACTORY_CONTRACT_KEY: &str = "community_factory_contract";

/// Suffix selecting ether units in amount arguments
pub const ETHER_SUFFIX: &str = "ether";

/// Suffix selecting gwei units in amount arguments
pub const GWEI_SUFFIX: &str = "gwei";
