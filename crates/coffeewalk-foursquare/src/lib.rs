pub mod client;
pub mod error;
mod in_flight;
pub mod outcome;
pub mod parse;

pub use client::{Credentials, VenueClient};
pub use error::{ErrorKind, VenueError};
pub use outcome::{FetchOutcome, PendingFetch};
pub use parse::{parse_details, parse_nearby_list};
