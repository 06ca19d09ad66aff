pub mod device;
pub mod volume;

pub use device::{OutputDevice, device_list_to_json_string};
pub use volume::DEFAULT_VOLUME_STEP;
