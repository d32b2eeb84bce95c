use crate::commands::{posts, users};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "register",
            groups: users::REGISTER_EXAMPLES,
        },
        CommandExample {
            name: "friend",
            groups: users::FRIEND_EXAMPLES,
        },
        CommandExample {
            name: "like",
            groups: posts::LIKE_EXAMPLES,
        },
        CommandExample {
            name: "feed",
            groups: posts::FEED_EXAMPLES,
        },
    ]
}
