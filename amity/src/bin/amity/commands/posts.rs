use amity::NewPost;
use anyhow::{Context, Result};
use clap::Args;

use super::Social;
use crate::examples::ExampleGroup;
use crate::output::{FeedReport, LikeReport, OutputManager, ThreadReport};

pub const LIKE_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Toggle a like",
    commands: &[
        "amity like <post-id> <user-id>         # likes, or unlikes if already liked",
        "amity --output json like <post-id> <user-id>",
    ],
}];

pub const FEED_EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Read the feed",
        commands: &[
            "amity feed                             # every post, newest first",
            "amity feed --user <user-id>            # one author's posts",
        ],
    },
    ExampleGroup {
        title: "Publish and comment",
        commands: &[
            "amity post <user-id> \"Hello world\" --image sunset.jpeg",
            "amity comment <post-id> <user-id> \"Nice shot\"",
        ],
    },
];

#[derive(Args)]
pub struct PostArgs {
    /// Author of the post
    user_id: String,

    description: String,

    /// Stored image reference
    #[arg(long)]
    image: Option<String>,
}

#[derive(Args)]
pub struct LikeArgs {
    post_id: String,
    user_id: String,
}

#[derive(Args)]
pub struct CommentArgs {
    post_id: String,
    user_id: String,
    text: String,
}

#[derive(Args)]
pub struct DeletePostArgs {
    post_id: String,

    /// Requesting user; must be the post's author
    user_id: String,
}

#[derive(Args)]
pub struct FeedArgs {
    /// Only show posts written by this user
    #[arg(long)]
    user: Option<String>,
}

pub async fn handle_post(args: PostArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let feed = social
        .engagement()
        .create_post(
            &args.user_id,
            NewPost {
                description: args.description,
                image_ref: args.image,
            },
        )
        .await
        .context("Failed to create post")?;

    output.success("Post published");
    output.display(&FeedReport {
        posts: &feed,
        assets: &social.config().assets,
    })
}

pub async fn handle_like(args: LikeArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let outcome = social
        .engagement()
        .toggle_like(&args.post_id, &args.user_id)
        .await
        .context("Failed to toggle like")?;

    output.verbose(&format!("post {} is now at version {}", outcome.post.id, outcome.post.version));
    output.display(&LikeReport { outcome: &outcome })
}

pub async fn handle_comment(args: CommentArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let post = social
        .engagement()
        .add_comment(&args.post_id, &args.user_id, &args.text)
        .await
        .context("Failed to add comment")?;

    output.success("Comment added");
    output.display(&ThreadReport { post: &post })
}

pub async fn handle_delete_post(args: DeletePostArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let feed = social
        .engagement()
        .delete_post(&args.post_id, &args.user_id)
        .await
        .context("Failed to delete post")?;

    output.success(&format!("Deleted post {}", args.post_id));
    output.display(&FeedReport {
        posts: &feed,
        assets: &social.config().assets,
    })
}

pub async fn handle_feed(args: FeedArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let feed = social.feed();
    let posts = match args.user.as_deref() {
        Some(user_id) => feed.list_user_feed(user_id).await,
        None => feed.list_feed().await,
    }
    .context("Failed to load feed")?;

    output.display_list(
        &FeedReport {
            posts: &posts,
            assets: &social.config().assets,
        },
        posts.len(),
        "No posts yet",
    )
}
