pub mod admin;
pub mod auth;
pub mod comparisons;
pub mod family;
pub mod goals;
pub mod health;
pub mod interests;
pub mod onboarding;
pub mod paths;
pub mod profile;
pub mod retrospectives;
