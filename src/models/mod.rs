mod activation;
mod audit_log;
mod brand;
mod customer;
mod license;
mod product;

pub use activation::*;
pub use audit_log::*;
pub use brand::*;
pub use customer::*;
pub use license::*;
pub use product::*;
