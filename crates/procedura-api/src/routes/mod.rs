pub mod extraction;
pub mod flows;
pub mod health;
pub mod search;
pub mod verification;
