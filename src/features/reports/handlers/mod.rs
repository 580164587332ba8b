pub mod inbound_handler;
pub mod report_handler;

pub use inbound_handler::inbound_message;
pub use report_handler::{
    list_reports, run_moderation, submit_report, track_report, update_report,
};
