mod dates;
mod error;
mod fields;
mod pipeline;
mod run;
mod segment;
mod store;

pub use run::run;
pub use store::load_records;

use dates::*;
use error::*;
use fields::*;
use pipeline::*;
use segment::*;
