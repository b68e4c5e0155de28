pub mod api_key;
pub mod request_id;

pub use api_key::{derive_api_key, verify_api_key, ApiKeyAuth};
pub use request_id::RequestId;
