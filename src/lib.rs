mod error;
pub mod timestamp;
pub mod venue;

pub use error::Error;
pub use timestamp::{parse_iso_string, Field, ParseError, Timestamp};
pub use venue::{DeleteButton, DeleteOutcome, LogNavigator, Navigator, VenueClient};
