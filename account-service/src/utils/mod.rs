pub mod password;

pub use password::{hash_credential, verify_credential, CredentialHash, Password};
