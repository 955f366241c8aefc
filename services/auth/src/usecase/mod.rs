pub mod oauth;
pub mod otp;
pub mod password;
pub mod rate_limit;
pub mod registration;
pub mod session;
pub mod user;
