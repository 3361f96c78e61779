//! Registrar adapter implementations

/// Shared utilities used by adapter implementations.
pub mod common;

#[cfg(feature = "aliyun")]
mod aliyun;
#[cfg(feature = "godaddy")]
mod godaddy;
#[cfg(feature = "route53")]
mod route53;

#[cfg(feature = "aliyun")]
pub use aliyun::{AliyunClient, AliyunClientBuilder};
#[cfg(feature = "godaddy")]
pub use godaddy::{GODADDY_OTE_API_BASE, GodaddyClient, GodaddyClientBuilder};
#[cfg(feature = "route53")]
pub use route53::{Route53Client, Route53ClientBuilder};
