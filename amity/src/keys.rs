/// Redis key layout for users, posts and their secondary indexes.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
    pub service: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str, service: &'a str) -> Self {
        Self { prefix, service }
    }

    pub fn user(&self, user_id: &str) -> String {
        format!("{}:{}:users:{}", self.prefix, self.service, user_id)
    }

    /// Unique index from a case-folded email to the owning user id.
    pub fn user_email(&self, email: &str) -> String {
        format!(
            "{}:{}:users:email:{}",
            self.prefix,
            self.service,
            email.trim().to_lowercase()
        )
    }

    pub fn post(&self, post_id: &str) -> String {
        format!("{}:{}:posts:{}", self.prefix, self.service, post_id)
    }

    /// Sorted set of post ids scored by insertion sequence.
    pub fn post_feed(&self) -> String {
        format!("{}:{}:posts:feed", self.prefix, self.service)
    }

    pub fn post_sequence(&self) -> String {
        format!("{}:{}:posts:seq", self.prefix, self.service)
    }

    /// Pattern matching every key this context owns.
    pub fn namespace_pattern(&self) -> String {
        format!("{}:{}:*", self.prefix, self.service)
    }
}
