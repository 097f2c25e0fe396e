//! Definitions of the Solidity interfaces called by the scripts

use ethers::contract::abigen;

abigen!(
    CommunityTokenContract,
    r#"[
        function getPrice() external view returns (uint256)
        function mint(uint256 amount) external payable
    ]"#
);

abigen!(
    CommunityFactoryContract,
    r#"[
        function createCommunityWithToken(string memory name, string memory symbol, uint256 price, address wallet, string memory creatorId) external
    ]"#
);
