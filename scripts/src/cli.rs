//! Definitions of CLI arguments and commands for the community scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ethers::types::U256;
use tracing::{info, warn};

use crate::{
    artifacts::ContractArtifact,
    commands::{
        create_com_token, deploy_factory, get_price, list_networks, mint_tokens, CommunityParams,
    },
    config::{HarnessConfig, ResolvedNetwork},
    constants::{
        COMMUNITY_FACTORY_CONTRACT_KEY, COMMUNITY_FACTORY_CONTRACT_NAME, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_MINT_AMOUNT,
    },
    errors::ScriptError,
    secrets::SecretSource,
    types::TxOptions,
    utils::{
        parse_address, parse_amount, read_deployed_address, setup_client, write_deployed_address,
    },
};

/// Deploy and manage the community token contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the network and build configuration file.
    /// The built-in configuration is used when unset.
    #[arg(short, long, env = "COMMUNITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Network to run against, defaults to the configuration's default network
    #[arg(short, long, env = "COMMUNITY_NETWORK")]
    pub network: Option<String>,

    /// Index of the network account to sign with
    #[arg(short, long, default_value_t = 0)]
    pub account: usize,

    /// Path to the file recording deployed contract addresses
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available tasks and deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Read a community token's price
    #[command(alias = "getPrice")]
    GetPrice(GetPriceArgs),
    /// Mint community tokens to the signer
    #[command(alias = "mintTokens")]
    MintTokens(MintTokensArgs),
    /// Create a community and its token through the community factory
    #[command(alias = "create_com_token")]
    CreateComToken(CreateComTokenArgs),
    /// Deploy a new community factory
    #[command(alias = "deploy_factory")]
    DeployFactory(DeployFactoryArgs),
    /// List the configured networks and whether they are usable
    Networks,
}

/// Read the price of a community token
#[derive(Args)]
pub struct GetPriceArgs {
    /// Community token contract address in hex
    #[arg(short, long)]
    pub token: String,
}

/// Mint community tokens
#[derive(Args)]
pub struct MintTokensArgs {
    /// Community token contract address in hex
    #[arg(short, long)]
    pub token: String,

    /// Number of tokens to mint
    #[arg(long, default_value_t = DEFAULT_MINT_AMOUNT)]
    pub amount: u64,

    /// Value to attach to the mint, in wei or with an `ether`/`gwei` suffix
    #[arg(long)]
    pub value: Option<String>,
}

/// Create a community with its token.
///
/// The factory address defaults to the one recorded in the deployments file
/// for the selected network.
#[derive(Args)]
pub struct CreateComTokenArgs {
    /// Community factory (proxy) contract address in hex
    #[arg(short, long)]
    pub factory: Option<String>,

    /// Token name
    #[arg(long)]
    pub name: String,

    /// Token symbol
    #[arg(long)]
    pub symbol: String,

    /// Token price, in wei or with an `ether`/`gwei` suffix
    #[arg(long)]
    pub price: String,

    /// Community treasury wallet address in hex
    #[arg(long)]
    pub treasury: String,

    /// Identifier of the community's creator
    #[arg(long)]
    pub creator_id: String,
}

/// Deploy the community factory contract
#[derive(Args)]
pub struct DeployFactoryArgs {
    /// Path to the compiled factory artifact, defaults to the one under the
    /// configured artifacts path
    #[arg(long)]
    pub artifact: Option<PathBuf>,
}

/// Whether a command line parse error is a request for help or version
/// output rather than a usage error
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}

impl Cli {
    /// Run the selected command, resolving secrets through `secrets`
    pub async fn run(self, secrets: &impl SecretSource) -> Result<(), ScriptError> {
        let config = HarnessConfig::load(self.config.as_deref())?;
        let network_name = config.network_name(self.network.as_deref()).to_string();

        let session = Session {
            config,
            network_name,
            account: self.account,
            deployments_path: self.deployments_path,
        };

        self.command.run(&session, secrets).await
    }
}

/// State shared by all commands of a single invocation
struct Session {
    /// The loaded configuration
    config: HarnessConfig,
    /// The name of the selected network
    network_name: String,
    /// The index of the signing account
    account: usize,
    /// The deployments file
    deployments_path: PathBuf,
}

impl Session {
    /// Resolve the selected network against `secrets`
    fn resolve_network(&self, secrets: &impl SecretSource) -> Result<ResolvedNetwork, ScriptError> {
        self.config.resolve_network(&self.network_name, secrets)
    }
}

impl Command {
    /// Run the command. Arguments are validated before the network is
    /// resolved or contacted.
    async fn run(self, session: &Session, secrets: &impl SecretSource) -> Result<(), ScriptError> {
        match self {
            Command::GetPrice(args) => {
                let token = parse_address("token", &args.token)?;

                let network = session.resolve_network(secrets)?;
                let client = setup_client(&network, session.account).await?;

                let price = get_price(token, client).await?;
                println!("Token price: {}", price);
            }
            Command::MintTokens(args) => {
                let token = parse_address("token", &args.token)?;
                let value = args.value.as_deref().map(parse_amount).transpose()?;

                let network = session.resolve_network(secrets)?;
                let client = setup_client(&network, session.account).await?;

                let receipt = mint_tokens(
                    token,
                    U256::from(args.amount),
                    value,
                    TxOptions::for_network(&network),
                    client,
                )
                .await?;
                println!("Minted! (tx {:#x})", receipt.transaction_hash);
            }
            Command::CreateComToken(args) => {
                let params = CommunityParams {
                    name: args.name,
                    symbol: args.symbol,
                    price: parse_amount(&args.price)?,
                    treasury: parse_address("treasury", &args.treasury)?,
                    creator_id: args.creator_id,
                };
                let factory = match args.factory {
                    Some(factory) => parse_address("factory", &factory)?,
                    None => read_deployed_address(
                        &session.deployments_path,
                        &session.network_name,
                        COMMUNITY_FACTORY_CONTRACT_KEY,
                    )?
                    .ok_or_else(|| {
                        ScriptError::MissingArgument(format!(
                            "no --factory given and no factory recorded for `{}` in {}",
                            session.network_name,
                            session.deployments_path.display()
                        ))
                    })?,
                };

                let network = session.resolve_network(secrets)?;
                let client = setup_client(&network, session.account).await?;

                let receipt = create_com_token(
                    factory,
                    params,
                    TxOptions::for_network(&network),
                    client,
                )
                .await?;
                println!(
                    "CommunityToken created in tx {:#x} (block {})",
                    receipt.transaction_hash,
                    receipt
                        .block_number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "pending".to_string())
                );
            }
            Command::DeployFactory(args) => {
                let artifact_path = args.artifact.unwrap_or_else(|| {
                    session
                        .config
                        .artifact_path(COMMUNITY_FACTORY_CONTRACT_NAME)
                });
                let artifact = ContractArtifact::load(&artifact_path)?;

                let network = session.resolve_network(secrets)?;
                let client = setup_client(&network, session.account).await?;

                let address =
                    deploy_factory(artifact, TxOptions::for_network(&network), client)
                        .await?;
                println!("DAOFactory deployed at: {:#x}", address);

                write_deployed_address(
                    &session.deployments_path,
                    &network.name,
                    COMMUNITY_FACTORY_CONTRACT_KEY,
                    address,
                )?;
                info!(
                    path = %session.deployments_path.display(),
                    "recorded factory address"
                );
            }
            Command::Networks => {
                for status in list_networks(&session.config, secrets) {
                    let marker = if status.name == session.network_name {
                        "*"
                    } else {
                        " "
                    };
                    let chain_id = status
                        .chain_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string());

                    match status.signers {
                        Ok(n) => println!(
                            "{} {:<16} chain {:<12} {} ({} signer(s))",
                            marker, status.name, chain_id, status.url, n
                        ),
                        Err(reason) => {
                            warn!(network = %status.name, "{}", reason);
                            println!(
                                "{} {:<16} chain {:<12} {} (unusable)",
                                marker, status.name, chain_id, status.url
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
