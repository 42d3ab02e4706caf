pub mod auth;
pub mod bootcast;
pub mod compile;
pub mod entitlement;
pub mod payment;
pub mod quota;
pub mod shared;
pub mod voice;
