use amity::{FriendView, NewUser, ProfilePatch};
use anyhow::{Context, Result};
use clap::Args;

use super::Social;
use crate::examples::ExampleGroup;
use crate::output::{FriendsReport, OutputManager, ProfileReport};

pub const REGISTER_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Create an account",
    commands: &[
        "amity register --first-name Ada --last-name Lovelace --email ada@example.com --password-hash '$2b$10$...'",
        "amity register --first-name Bob --last-name Tester --email bob@example.com --password-hash h --picture bob.png",
    ],
}];

pub const FRIEND_EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Toggle a friendship",
        commands: &[
            "amity friend <user-id> <friend-id>     # adds when absent, removes when present",
            "amity friends <user-id>                # list resolved friends",
        ],
    },
    ExampleGroup {
        title: "Repair a one-sided friendship",
        commands: &["amity reconcile <user-id> <friend-id>  # copy <user-id>'s view to the other side"],
    },
];

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    /// Pre-hashed password; amity never sees plaintext
    #[arg(long)]
    password_hash: String,

    /// Stored picture reference (file name or absolute URL)
    #[arg(long, default_value = "")]
    picture: String,

    #[arg(long, default_value = "")]
    location: String,

    #[arg(long, default_value = "")]
    occupation: String,

    #[arg(long, default_value = "")]
    twitter: String,

    #[arg(long, default_value = "")]
    linkedin: String,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// User id to look up
    #[arg(required_unless_present = "email")]
    user_id: Option<String>,

    /// Look the user up by email instead
    #[arg(long, conflicts_with = "user_id")]
    email: Option<String>,
}

#[derive(Args)]
pub struct UpdateProfileArgs {
    user_id: String,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    occupation: Option<String>,

    #[arg(long)]
    twitter: Option<String>,

    #[arg(long)]
    linkedin: Option<String>,
}

#[derive(Args)]
pub struct PairArgs {
    /// Acting user
    user_id: String,

    /// The other side of the friendship
    friend_id: String,
}

#[derive(Args)]
pub struct FriendsArgs {
    user_id: String,
}

pub async fn handle_register(args: RegisterArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let profile = social
        .accounts()
        .register(NewUser {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password_hash: args.password_hash,
            picture_ref: args.picture,
            location: args.location,
            occupation: args.occupation,
            twitter: args.twitter,
            linkedin: args.linkedin,
        })
        .await
        .context("Failed to register user")?;

    output.success(&format!("Registered {} {}", profile.first_name, profile.last_name));
    output.display(&ProfileReport {
        profile: &profile,
        assets: &social.config().assets,
    })
}

pub async fn handle_profile(args: ProfileArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let accounts = social.accounts();
    let profile = match (args.user_id, args.email) {
        (_, Some(email)) => accounts.find_by_email(&email).await,
        (Some(user_id), None) => accounts.profile(&user_id).await,
        (None, None) => anyhow::bail!("Provide a user id or --email"),
    }
    .context("Failed to load profile")?;

    output.display(&ProfileReport {
        profile: &profile,
        assets: &social.config().assets,
    })
}

pub async fn handle_update_profile(args: UpdateProfileArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let patch = ProfilePatch {
        first_name: args.first_name,
        last_name: args.last_name,
        location: args.location,
        occupation: args.occupation,
        twitter: args.twitter,
        linkedin: args.linkedin,
    };
    if patch.is_empty() {
        output.warning("No fields given; profile left unchanged");
    }

    let profile = social
        .accounts()
        .update_profile(&args.user_id, patch)
        .await
        .with_context(|| format!("Failed to update profile of {}", args.user_id))?;

    output.success("Profile updated");
    output.display(&ProfileReport {
        profile: &profile,
        assets: &social.config().assets,
    })
}

pub async fn handle_friend(args: PairArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let friends = social
        .relationships()
        .toggle_friend(&args.user_id, &args.friend_id)
        .await
        .context("Failed to toggle friendship")?;

    output.success(&toggle_message(&args.friend_id, &friends));
    output.display(&FriendsReport {
        friends: &friends,
        assets: &social.config().assets,
    })
}

pub async fn handle_friends(args: FriendsArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let friends = social
        .relationships()
        .list_friends(&args.user_id)
        .await
        .context("Failed to load friends")?;

    output.display_list(
        &FriendsReport {
            friends: &friends,
            assets: &social.config().assets,
        },
        friends.len(),
        &format!("{} has no friends yet", args.user_id),
    )
}

/// Describes a toggle from the caller's friend list as it stands afterwards.
fn toggle_message(friend_id: &str, friends: &[FriendView]) -> String {
    if friends.iter().any(|friend| friend.id == friend_id) {
        format!("Added {friend_id} as a friend")
    } else {
        format!("Removed {friend_id} from friends")
    }
}

pub async fn handle_reconcile(args: PairArgs, social: &Social, output: &OutputManager) -> Result<()> {
    let repaired = social
        .relationships()
        .reconcile(&args.user_id, &args.friend_id)
        .await
        .context("Failed to reconcile friendship")?;

    if repaired {
        output.success(&format!("Repaired {}'s view of {}", args.friend_id, args.user_id));
    } else {
        output.info("Friendship already symmetric");
    }
    Ok(())
}
