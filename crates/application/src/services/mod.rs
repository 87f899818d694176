pub mod response_matcher;
pub mod search_planner;
pub mod session;

pub use response_matcher::{match_response, ExpectedResponse, Mismatch};
pub use search_planner::SearchPlanner;
pub use session::DnsSession;
