//! Library server collaborators: the track model, a blocking REST client and
//! the play reporter that records completed plays.

mod client;
mod model;
mod reporter;

pub use client::LibraryClient;
pub use model::*;
pub use reporter::HttpPlayReporter;

#[cfg(test)]
mod tests;
