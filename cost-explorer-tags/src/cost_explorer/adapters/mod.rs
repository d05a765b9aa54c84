pub mod local_client;
pub mod sdk_client;

pub use local_client::LocalCostExplorer;
pub use sdk_client::SdkCostExplorer;
