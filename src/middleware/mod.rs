mod brand_auth;

pub use brand_auth::{AuthedBrand, brand_auth};
