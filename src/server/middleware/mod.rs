//! HTTP middleware implementations

mod trusted_subnet;


pub use trusted_subnet::{TrustedSubnet, TrustedSubnetService};
