pub mod hashing;
pub mod local;
pub mod remote;

pub use hashing::HashingProvider;
pub use local::LocalProvider;
pub use remote::RemoteProvider;
