pub mod benchmark;
pub mod profiles;
pub mod runner;
pub mod util;
