mod credential;

pub use credential::CredentialStore;
