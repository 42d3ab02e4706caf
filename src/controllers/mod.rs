pub mod compile;
pub mod download;
pub mod entitlement;
pub mod health;
pub mod keys;
pub mod payments;
pub mod podcasts;
pub mod voices;
