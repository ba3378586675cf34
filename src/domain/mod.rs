pub mod confidence;
pub mod contact;
pub mod industry;
pub mod profile;
pub mod search_query;
pub mod search_result;
