//! Types shared between the verification client and its front ends: input
//! modalities, the normalized display model, and the detection service wire
//! contract.

pub mod domain;
pub mod error;
pub mod protocol;
