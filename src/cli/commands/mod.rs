mod admin;
mod inquiry;
mod profile;

pub use admin::{cmd_admin_set_password, cmd_admin_show};
pub use inquiry::{cmd_inquiry_list, cmd_inquiry_remove};
pub use profile::{
    cmd_profile_add, cmd_profile_edit, cmd_profile_list, cmd_profile_remove, cmd_profile_show,
};
