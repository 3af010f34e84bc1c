pub mod logging;
pub mod remote_url;
