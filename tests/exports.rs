// tests/exports.rs
//
// The crate root must expose the client facade, the three domain types and
// a version constant matching the package manifest.

use self_sdk::{Block, BlockchainStatus, ClientConfig, SelfClient, Transaction, VERSION};

#[test]
fn version_matches_package_manifest() {
    assert_eq!(VERSION, "0.1.0");
    assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
}

#[test]
fn core_types_are_exported() {
    fn assert_exported<T: Sized>() {}
    assert_exported::<SelfClient>();
    assert_exported::<Block>();
    assert_exported::<Transaction>();
    assert_exported::<BlockchainStatus>();
}

#[test]
fn client_is_constructible_from_the_root_exports() {
    let client = SelfClient::new(ClientConfig::default()).expect("default client");
    assert_eq!(client.config().api_url, "https://api.self.app/v1");
}
