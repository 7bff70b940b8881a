pub mod fitness;
pub mod google_auth;
