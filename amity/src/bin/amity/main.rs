mod commands;
mod examples;
mod output;
mod theme;

use std::fmt::Write;
use std::io::{self, Write as IoWrite};
use std::path::PathBuf;

use amity::{AmityConfig, SocialClient};
use anyhow::{Context, Result};
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, RgbColor, Style},
    },
    error::ErrorKind,
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};

use commands::{
    Social,
    posts::{CommentArgs, DeletePostArgs, FeedArgs, LikeArgs, PostArgs, handle_comment, handle_delete_post, handle_feed, handle_like, handle_post},
    users::{
        FriendsArgs, PairArgs, ProfileArgs, RegisterArgs, UpdateProfileArgs, handle_friend, handle_friends,
        handle_profile, handle_reconcile, handle_register, handle_update_profile,
    },
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("REDIS_URL", "Redis connection URL (used when [store].url is \"${REDIS_URL}\")"),
    ("RUST_LOG", "Log filter, e.g. amity=debug"),
];

#[derive(Parser)]
#[command(name = "amity")]
#[command(version)]
#[command(
    about = "Friends, posts, likes and comments for the Amity social network",
    long_about = r#"Command-line client for the Amity social network store:

• Symmetric friendships with one-sided repair
• Posts with toggled likes and append-only comments
• A feed ordered newest first

Configuration is read from amity.toml when present.
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "amity.toml")]
    config: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output and debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let command = build_cli_command();
        match command.styles(help_styles()).try_get_matches() {
            Ok(matches) => Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit()),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = print_blank_line_stdout();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display help: {print_err}");
                    }
                    let _ = print_blank_line_stdout();
                    std::process::exit(0);
                }
                _ => {
                    let exit_code = err.exit_code();
                    let _ = print_blank_line_stderr();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display error: {print_err}");
                    }
                    let _ = print_blank_line_stderr();
                    std::process::exit(exit_code);
                }
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register(RegisterArgs),

    /// Show a user's public profile
    Profile(ProfileArgs),

    /// Edit profile fields; blank names are ignored
    UpdateProfile(UpdateProfileArgs),

    /// Add or remove a friend (toggles)
    Friend(PairArgs),

    /// List a user's friends
    Friends(FriendsArgs),

    /// Make the friend's side agree with the user's side
    Reconcile(PairArgs),

    /// Publish a post
    Post(PostArgs),

    /// Like or unlike a post (toggles)
    Like(LikeArgs),

    /// Comment on a post
    Comment(CommentArgs),

    /// Delete one of your posts
    DeletePost(DeletePostArgs),

    /// Show the feed, newest first
    Feed(FeedArgs),
}

fn build_cli_command() -> Command {
    let use_color = detect_color_support();
    let appendix = render_top_level_appendix(use_color);
    let mut command = Cli::command().after_long_help(appendix);
    command = command.color(if use_color { ColorChoice::Auto } else { ColorChoice::Never });
    attach_command_examples(&mut command, use_color);
    command
}

fn attach_command_examples(command: &mut Command, use_color: bool) {
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            let help_text = render_examples(example.groups, use_color);
            *subcommand = subcommand.clone().after_long_help(help_text);
        }
    }
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let heading = stylize("Examples:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{heading}");

    for (index, group) in groups.iter().enumerate() {
        let title = stylize(group.title, theme.primary, true, use_color);
        let _ = writeln!(buffer, "  {title}");

        for command in group.commands {
            let arrow = stylize(ICONS.arrow, theme.secondary, false, use_color);
            let command_text = stylize(command, theme.secondary, false, use_color);
            let _ = writeln!(buffer, "    {arrow} {command_text}");
        }

        if index + 1 < groups.len() {
            buffer.push('\n');
        }
    }

    buffer
}

fn render_top_level_appendix(use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let env_heading = stylize("Environment Variables:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{env_heading}");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let key_text = stylize(key, theme.key, true, use_color);
        let value_text = stylize(description, theme.value, false, use_color);
        let _ = writeln!(buffer, "  {key_text}  {value_text}");
    }

    buffer.push('\n');

    let tip_heading = stylize("Tip:", theme.highlight, true, use_color);
    let tip_text = stylize(
        "Use 'amity <command> --help' to view examples for each command.",
        theme.secondary,
        false,
        use_color,
    );
    let _ = writeln!(buffer, "{tip_heading} {tip_text}");

    buffer
}

fn print_blank_line_stdout() -> io::Result<()> {
    let mut stdout = io::stdout();
    IoWrite::write_all(&mut stdout, b"\n")?;
    IoWrite::flush(&mut stdout)
}

fn print_blank_line_stderr() -> io::Result<()> {
    let mut stderr = io::stderr();
    IoWrite::write_all(&mut stderr, b"\n")?;
    IoWrite::flush(&mut stderr)
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    let styled = text.color(color);
    if bold { styled.bold().to_string() } else { styled.to_string() }
}

fn detect_color_support() -> bool {
    ShouldColorize::from_env().should_colorize()
}

fn help_styles() -> Styles {
    let theme = &THEME;
    Styles::styled()
        .usage(style_from_color(theme.primary).bold())
        .header(style_from_color(theme.highlight).bold())
        .literal(style_from_color(theme.secondary))
        .placeholder(style_from_color(theme.muted))
        .valid(style_from_color(theme.success))
        .invalid(style_from_color(theme.warning))
        .error(style_from_color(theme.error).bold())
}

fn style_from_color(color: ThemeColor) -> Style {
    Style::new().fg_color(Some(color_to_clap_color(color)))
}

fn color_to_clap_color(color: ThemeColor) -> ClapColor {
    match color {
        ThemeColor::Black => ClapColor::Ansi(AnsiColor::Black),
        ThemeColor::Red => ClapColor::Ansi(AnsiColor::Red),
        ThemeColor::Green => ClapColor::Ansi(AnsiColor::Green),
        ThemeColor::Yellow => ClapColor::Ansi(AnsiColor::Yellow),
        ThemeColor::Blue => ClapColor::Ansi(AnsiColor::Blue),
        ThemeColor::Magenta => ClapColor::Ansi(AnsiColor::Magenta),
        ThemeColor::Cyan => ClapColor::Ansi(AnsiColor::Cyan),
        ThemeColor::White => ClapColor::Ansi(AnsiColor::White),
        ThemeColor::BrightBlack => ClapColor::Ansi(AnsiColor::BrightBlack),
        ThemeColor::BrightRed => ClapColor::Ansi(AnsiColor::BrightRed),
        ThemeColor::BrightGreen => ClapColor::Ansi(AnsiColor::BrightGreen),
        ThemeColor::BrightYellow => ClapColor::Ansi(AnsiColor::BrightYellow),
        ThemeColor::BrightBlue => ClapColor::Ansi(AnsiColor::BrightBlue),
        ThemeColor::BrightMagenta => ClapColor::Ansi(AnsiColor::BrightMagenta),
        ThemeColor::BrightCyan => ClapColor::Ansi(AnsiColor::BrightCyan),
        ThemeColor::BrightWhite => ClapColor::Ansi(AnsiColor::BrightWhite),
        ThemeColor::TrueColor { r, g, b } => ClapColor::Rgb(RgbColor(r, g, b)),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "amity=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_with_styles();
    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let _ = print_blank_line_stdout();

    let global_options = GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    let output = OutputManager::new(global_options);

    match execute(cli, &output).await {
        Ok(()) => {
            let _ = print_blank_line_stdout();
        }
        Err(err) => {
            output.error(&format!("{err:#}"));
            let _ = print_blank_line_stdout();
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let config = AmityConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    output.verbose(&format!(
        "store {}:{} with {} like attempts",
        config.store.prefix, config.store.service, config.engagement.max_conflict_retries
    ));

    let social: Social = SocialClient::connect(config)
        .await
        .context("Failed to connect to the store")?;

    match cli.command {
        Commands::Register(args) => handle_register(args, &social, output).await?,
        Commands::Profile(args) => handle_profile(args, &social, output).await?,
        Commands::UpdateProfile(args) => handle_update_profile(args, &social, output).await?,
        Commands::Friend(args) => handle_friend(args, &social, output).await?,
        Commands::Friends(args) => handle_friends(args, &social, output).await?,
        Commands::Reconcile(args) => handle_reconcile(args, &social, output).await?,
        Commands::Post(args) => handle_post(args, &social, output).await?,
        Commands::Like(args) => handle_like(args, &social, output).await?,
        Commands::Comment(args) => handle_comment(args, &social, output).await?,
        Commands::DeletePost(args) => handle_delete_post(args, &social, output).await?,
        Commands::Feed(args) => handle_feed(args, &social, output).await?,
    }

    Ok(())
}
