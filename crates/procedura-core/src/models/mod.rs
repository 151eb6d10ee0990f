pub mod classification;
pub mod decode;
pub mod procedure;
pub mod similarity;
pub mod usage;
pub mod verification;
