use redis::Script;
use std::sync::LazyLock;

pub const USER_INSERT_SCRIPT_BODY: &str = include_str!("../../lua/user_insert.lua");
pub const FRIENDS_UPDATE_SCRIPT_BODY: &str = include_str!("../../lua/friends_update.lua");
pub const PROFILE_UPDATE_SCRIPT_BODY: &str = include_str!("../../lua/profile_update.lua");
pub const POST_INSERT_SCRIPT_BODY: &str = include_str!("../../lua/post_insert.lua");
pub const POST_LIKE_SCRIPT_BODY: &str = include_str!("../../lua/post_like.lua");
pub const POST_COMMENT_SCRIPT_BODY: &str = include_str!("../../lua/post_comment.lua");
pub const POST_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/post_delete.lua");

pub static USER_INSERT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(USER_INSERT_SCRIPT_BODY));
pub static FRIENDS_UPDATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FRIENDS_UPDATE_SCRIPT_BODY));
pub static PROFILE_UPDATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(PROFILE_UPDATE_SCRIPT_BODY));
pub static POST_INSERT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(POST_INSERT_SCRIPT_BODY));
pub static POST_LIKE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(POST_LIKE_SCRIPT_BODY));
pub static POST_COMMENT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(POST_COMMENT_SCRIPT_BODY));
pub static POST_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(POST_DELETE_SCRIPT_BODY));
