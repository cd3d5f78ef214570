pub mod dispatch_message;
pub mod helpers;

pub use dispatch_message::{
    build_request, extract_message, is_reply_command, parse_reply_command, DispatchFields,
    DriverReply,
};
