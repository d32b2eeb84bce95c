pub mod posts;
pub mod users;

use amity::{RedisStore, SocialClient};

pub type Social = SocialClient<RedisStore>;
