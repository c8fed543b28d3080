//! Definitions of RealEstateToken functions called after deployment

use ethers::contract::abigen;

abigen!(
    RealEstateTokenContract,
    r#"[
        function addMinter(address minter) external
        function mint(address to, uint256 tokenId, uint256 amount, string memory tokenUri, bytes32 data) external
    ]"#
);
