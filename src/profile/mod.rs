pub mod load;
pub mod normalize;
pub mod types;

pub use load::{dedupe_profiles, load_profiles, parse_profiles};
pub use normalize::profile_url;
pub use types::{Education, Experience, Location, ProfileRecord};
