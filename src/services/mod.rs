// Service exports
pub mod auth;
pub mod gemini;
pub mod store;

pub use auth::{
    decode_token, hash_password, issue_token, verify_password, AuthError, AuthUser, Claims,
};
pub use gemini::{ChatError, GeminiClient};
pub use store::{StoreClient, StoreCollections, StoreError};
