mod migrate;
mod serve;
mod user;

pub use migrate::cmd_migrate;
pub use serve::cmd_serve;
pub use user::{
    cmd_user_create, cmd_user_delete, cmd_user_grant, cmd_user_list, cmd_user_reset_token,
    cmd_user_revoke, cmd_user_token,
};
