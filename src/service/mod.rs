pub mod stdio;

pub use stdio::{
    CANCEL_METHOD, CANCEL_VOLUME_METHOD, LISTEN_METHOD, LISTEN_VOLUME_METHOD, StdioService,
};
