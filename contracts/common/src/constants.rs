//! Protocol Constants
//!
//! Operation tags, persisted-state keys and group shapes shared by the
//! asaswap programs, plus the table of known pool deployments.
//!
//! # Network Configuration
//!
//! Use feature flags to compile for different networks:
//! - `mainnet` - Production deployment table
//! - Default (no feature) - TestNet deployment table
//!
//! ```toml
//! # For mainnet deployment:
//! asaswap-common = { path = "...", features = ["mainnet"] }
//! ```

/// Operation tags carried in application argument 0
pub mod tags {
    // ===== Escrow operations (controlling application calls) =====

    /// Escrow opts into an asset
    pub const ASSET_OPT_IN: &[u8] = b"E";
    /// User withdraws funds held by the escrow
    pub const WITHDRAW: &[u8] = b"W";
    /// User withdraws liquidity tokens held by the escrow
    pub const WITHDRAW_LIQUIDITY: &[u8] = b"X";

    // ===== Pool computation modes =====

    /// Liquidity tokens minted for a primary deposit
    pub const ADD_LIQUIDITY: &[u8] = b"L";
    /// Secondary tokens out for primary tokens in
    pub const SWAP_PRIMARY_TO_SECONDARY: &[u8] = b"SA";
    /// Primary tokens out for secondary tokens in
    pub const SWAP_SECONDARY_TO_PRIMARY: &[u8] = b"SB";
    /// Primary tokens returned for burned liquidity tokens
    pub const REMOVE_LIQUIDITY_PRIMARY: &[u8] = b"a";
    /// Secondary tokens returned for burned liquidity tokens
    pub const REMOVE_LIQUIDITY_SECONDARY: &[u8] = b"b";
}

/// Persisted global-state keys
pub mod keys {
    /// Total liquidity token supply (controlling application)
    pub const TOTAL_LIQUIDITY: &[u8] = b"L";
    /// Primary asset balance of the pool (controlling application)
    pub const PRIMARY_BALANCE: &[u8] = b"A";
    /// Secondary asset balance of the pool (controlling application)
    pub const SECONDARY_BALANCE: &[u8] = b"B";
    /// Guard application id (computation engine)
    pub const GUARD_APP_ID: &[u8] = b"G";
    /// First result slot (computation engine)
    pub const RESULT_SLOT_1: &[u8] = b"1";
    /// Second result slot (computation engine)
    pub const RESULT_SLOT_2: &[u8] = b"2";
}

/// Group shapes and ledger limits
pub mod group {
    /// Escrow asset opt-in: [app call, asset transfer]
    pub const ASSET_OPT_IN_SIZE: usize = 2;
    /// Escrow liquidity withdrawal: [app call, asset transfer, fee payment]
    pub const WITHDRAW_LIQUIDITY_SIZE: usize = 3;
    /// Escrow withdrawal: [app call, asset transfer, transfer, fee payment]
    pub const WITHDRAW_SIZE: usize = 4;

    /// Smallest group the ledger accepts
    pub const MIN_GROUP_SIZE: usize = 1;
    /// Largest group the ledger accepts
    pub const MAX_GROUP_SIZE: usize = 16;

    /// Position of the controlling application call in every group
    pub const CONTROLLER_INDEX: usize = 0;
}

/// Ledger field limits
pub mod ledger {
    /// Widest integer argument accepted by `btoi`
    pub const MAX_INT_ARG_BYTES: usize = 8;
    /// First application id handed out by a fresh ledger
    pub const FIRST_APP_ID: u64 = 1;
}

/// Escrow parameterization
pub mod escrow {
    /// Controlling application id used when none is configured (sandbox)
    pub const DEFAULT_CONTROLLER_APP_ID: u64 = 123;

    /// Domain prefix hashed in front of a program when deriving its address
    pub const PROGRAM_DOMAIN: &[u8] = b"Program";
}

/// Known pool deployments
pub mod deployments {
    /// One deployed asset pair
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AssetPairDeployment {
        /// Pair name, e.g. "ALGOS/USDTG"
        pub name: &'static str,
        /// Controlling application id
        pub application_id: u64,
    }

    /// Deployed pairs
    #[cfg(feature = "mainnet")]
    pub const ASSET_PAIRS: &[AssetPairDeployment] = &[];
    #[cfg(not(feature = "mainnet"))]
    pub const ASSET_PAIRS: &[AssetPairDeployment] = &[
        AssetPairDeployment {
            name: "ALGOS/USDTG",
            application_id: 14_201_326,
        },
        AssetPairDeployment {
            name: "TOX/USDTG",
            application_id: 14_201_343,
        },
    ];

    /// Look up a deployment by pair name
    pub fn find(name: &str) -> Option<&'static AssetPairDeployment> {
        ASSET_PAIRS.iter().find(|pair| pair.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_slots_are_distinct_from_pool_keys() {
        for slot in [keys::RESULT_SLOT_1, keys::RESULT_SLOT_2] {
            assert_ne!(slot, keys::TOTAL_LIQUIDITY);
            assert_ne!(slot, keys::PRIMARY_BALANCE);
            assert_ne!(slot, keys::SECONDARY_BALANCE);
            assert_ne!(slot, keys::GUARD_APP_ID);
        }
    }

    #[cfg(not(feature = "mainnet"))]
    #[test]
    fn test_find_deployment() {
        let pair = deployments::find("TOX/USDTG").unwrap();
        assert_eq!(pair.application_id, 14_201_343);

        assert!(deployments::find("BTC/USDTG").is_none());
    }
}
