pub mod local;

pub use local::DirectoryLocalClient;
