pub mod apollo_client;
pub mod enricher;
pub mod search_client;

pub use apollo_client::*;
pub use enricher::*;
pub use search_client::*;
