use amity::{FriendView, LikeOutcome, Post, UserProfile, config::AssetConfig};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::{Color as ThemeColor, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use serde::Serialize;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Displays a list report. An empty list is announced with `empty_message`
    /// instead, except in JSON mode where the empty array itself is printed.
    pub fn display_list<T>(&self, data: &T, len: usize, empty_message: &str) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.announces_empty(len) {
            self.info(empty_message);
            return Ok(());
        }
        self.display(data)
    }

    fn announces_empty(&self, len: usize) -> bool {
        len == 0 && self.options.output_format != OutputFormat::Json
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet && self.options.output_format != OutputFormat::Json {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.success)
            } else {
                format!("{} {}", ICONS.success.color(THEME.success), message.color(THEME.success))
            };
            println!("{output}");
        }
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", ICONS.error)
        } else {
            format!("{} {}", ICONS.error.color(THEME.error), message.color(THEME.error))
        };
        eprintln!("{output}");
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.warning)
            } else {
                format!("{} {}", ICONS.warning.color(THEME.warning), message.color(THEME.warning))
            };
            eprintln!("{output}");
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.arrow)
            } else {
                format!("{} {}", ICONS.arrow.color(THEME.muted), message.color(THEME.muted))
            };
            eprintln!("{output}");
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet && self.options.output_format != OutputFormat::Json {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.info)
            } else {
                format!("{} {}", ICONS.info.color(THEME.info), message.color(THEME.info))
            };
            println!("{output}");
        }
    }
}

fn table_color(color: ThemeColor) -> TableColor {
    match color {
        ThemeColor::Black => TableColor::Black,
        ThemeColor::Red => TableColor::DarkRed,
        ThemeColor::Green => TableColor::DarkGreen,
        ThemeColor::Yellow => TableColor::DarkYellow,
        ThemeColor::Blue => TableColor::DarkBlue,
        ThemeColor::Magenta => TableColor::DarkMagenta,
        ThemeColor::Cyan => TableColor::DarkCyan,
        ThemeColor::White => TableColor::Grey,
        ThemeColor::BrightBlack => TableColor::DarkGrey,
        ThemeColor::BrightRed => TableColor::Red,
        ThemeColor::BrightGreen => TableColor::Green,
        ThemeColor::BrightYellow => TableColor::Yellow,
        ThemeColor::BrightBlue => TableColor::Blue,
        ThemeColor::BrightMagenta => TableColor::Magenta,
        ThemeColor::BrightCyan => TableColor::Cyan,
        ThemeColor::BrightWhite => TableColor::White,
        ThemeColor::TrueColor { r, g, b } => TableColor::Rgb { r, g, b },
    }
}

fn themed(cell: Cell, color: ThemeColor, options: &GlobalOptions) -> Cell {
    if options.no_color { cell } else { cell.fg(table_color(color)) }
}

fn base_table(headers: &[&str], options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|header| themed(Cell::new(header).add_attribute(Attribute::Bold), THEME.highlight, options)),
    );
    table
}

fn key_cell(key: &str, options: &GlobalOptions) -> Cell {
    themed(Cell::new(key).add_attribute(Attribute::Bold), THEME.key, options)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn picture(assets: &AssetConfig, picture_ref: &str) -> String {
    assets.asset_url(picture_ref).unwrap_or_else(|| "-".to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct ProfileReport<'a> {
    pub profile: &'a UserProfile,
    #[serde(skip)]
    pub assets: &'a AssetConfig,
}

impl TableDisplay for ProfileReport<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let profile = self.profile;
        let mut table = base_table(&["Field", "Value"], options);
        let rows = [
            ("Id", profile.id.clone()),
            ("Name", format!("{} {}", profile.first_name, profile.last_name)),
            ("Email", profile.email.clone()),
            ("Location", profile.location.clone()),
            ("Occupation", profile.occupation.clone()),
            ("Picture", picture(self.assets, &profile.picture_ref)),
            ("Twitter", profile.twitter.clone()),
            ("LinkedIn", profile.linkedin.clone()),
            ("Friends", profile.friend_count.to_string()),
            ("Profile views", profile.viewed_profile.to_string()),
            ("Impressions", profile.impressions.to_string()),
            ("Joined", timestamp(profile.created_at)),
        ];
        for (key, value) in rows {
            table.add_row(vec![key_cell(key, options), themed(Cell::new(value), THEME.value, options)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "{} {} {} <{}> friends={}",
            self.profile.id,
            self.profile.first_name,
            self.profile.last_name,
            self.profile.email,
            self.profile.friend_count
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct FriendsReport<'a> {
    pub friends: &'a [FriendView],
    #[serde(skip)]
    pub assets: &'a AssetConfig,
}

impl TableDisplay for FriendsReport<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = base_table(&["Id", "Name", "Occupation", "Location", "Picture"], options);
        for friend in self.friends {
            table.add_row(vec![
                Cell::new(&friend.id),
                Cell::new(format!("{} {}", friend.first_name, friend.last_name)),
                Cell::new(&friend.occupation),
                Cell::new(&friend.location),
                Cell::new(picture(self.assets, &friend.picture_ref)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.friends
            .iter()
            .map(|friend| format!("{}:{} {}", friend.id, friend.first_name, friend.last_name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct FeedReport<'a> {
    pub posts: &'a [Post],
    #[serde(skip)]
    pub assets: &'a AssetConfig,
}

impl TableDisplay for FeedReport<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = base_table(
            &["Id", "Author", "Description", "Likes", "Comments", "Posted", "Image"],
            options,
        );
        for post in self.posts {
            let image = post
                .image_ref
                .as_deref()
                .map(|image| picture(self.assets, image))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(&post.id),
                themed(Cell::new(post.author.display_name()), THEME.primary, options),
                Cell::new(truncate(&post.description, 60)),
                Cell::new(post.like_count()),
                Cell::new(post.comments.len()),
                Cell::new(timestamp(post.created_at)),
                Cell::new(image),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.posts
            .iter()
            .map(|post| format!("{} {} likes={} comments={}", post.id, post.author_id, post.like_count(), post.comments.len()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single post with its comment thread.
#[derive(Serialize)]
#[serde(transparent)]
pub struct ThreadReport<'a> {
    pub post: &'a Post,
}

impl TableDisplay for ThreadReport<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = base_table(&["Author", "Comment", "Written"], options);
        for comment in &self.post.comments {
            let author = if comment.is_legacy() {
                themed(Cell::new(comment.author_name()), THEME.muted, options)
            } else {
                themed(Cell::new(comment.author_name()), THEME.secondary, options)
            };
            table.add_row(vec![
                author,
                Cell::new(comment.text()),
                Cell::new(comment.created_at().map(timestamp).unwrap_or_else(|| "-".to_string())),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!("{} comments={}", self.post.id, self.post.comments.len())
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct LikeReport<'a> {
    pub outcome: &'a LikeOutcome,
}

impl TableDisplay for LikeReport<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = base_table(&["Post", "Liked", "Likes"], options);
        let liked = if self.outcome.liked { ICONS.heart } else { "-" };
        table.add_row(vec![
            Cell::new(&self.outcome.post.id),
            Cell::new(liked),
            Cell::new(self.outcome.like_count),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "{} liked={} likes={}",
            self.outcome.post.id, self.outcome.liked, self.outcome.like_count
        )
    }
}
