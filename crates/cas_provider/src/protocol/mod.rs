//! Wire formats of the CAS protocol

pub mod v1;
pub mod v2;

/// XML namespace of CAS v2 responses
pub const CAS_NAMESPACE: &str = "http://www.yale.edu/tp/cas";
