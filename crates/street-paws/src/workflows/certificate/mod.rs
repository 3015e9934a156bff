//! Certificate data for approved adoptions.

pub mod assembler;
pub mod router;
pub mod service;


pub use assembler::{assemble, certificate_number, AssemblyError, Certificate};
pub use router::certificate_router;
pub use service::{CertificateError, CertificateService};
