mod config;
mod error;
mod notification;
mod terminal;
mod title;
mod window;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, error, info, warn};

use config::Config;
use notification::{ToastKind, default_sink};
use title::TitleResolver;

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"))?;

    let config = Config::from_env();
    debug!(
        event = "cli.config_loaded",
        project_root = %config.project_root.display(),
        sink = ?config.sink,
    );

    run_command(&matches, config);
    Ok(())
}

fn build_cli() -> Command {
    let window_id = Arg::new("window-id")
        .long("window-id")
        .value_name("ID")
        .help("Window id to use instead of the one derived from the environment");

    Command::new("terminal-notifier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Window titles and desktop toasts for terminal hooks")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("stop")
                .about("Toast: task stopped")
                .arg(window_id.clone()),
        )
        .subcommand(
            Command::new("notify")
                .about("Toast: tool needs attention")
                .arg(window_id.clone()),
        )
        .subcommand(
            Command::new("toast")
                .about("Toast by legacy tag (Send-StopToast, Send-NotificationToast)")
                .arg(Arg::new("tag").required(true))
                .arg(window_id.clone()),
        )
        .subcommand(
            Command::new("title")
                .about("Print the resolved window title and project name")
                .arg(window_id.clone())
                .subcommand(
                    Command::new("set")
                        .about("Persist a title for this window and apply it")
                        .arg(Arg::new("title").required(true))
                        .arg(window_id),
                ),
        )
}

/// Logs go to stderr; hook stdout may be read by the calling tool
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber: {e}"))
}

/// Hook commands never fail the process
fn run_command(matches: &ArgMatches, config: Config) {
    let sink_config = config.clone();
    let resolver = TitleResolver::from_config(config);

    match matches.subcommand() {
        Some(("stop", sub)) => toast(&resolver, &sink_config, ToastKind::Stop, sub),
        Some(("notify", sub)) => toast(&resolver, &sink_config, ToastKind::Notification, sub),
        Some(("toast", sub)) => {
            let tag = sub.get_one::<String>("tag").map_or("", String::as_str);
            let info = resolver.get_window_info(window_id(sub));
            let sink = default_sink(&sink_config);
            let sent = notification::invoke_toast_with_fallback(
                sink.as_ref(),
                tag,
                &info.window_name,
                &info.project_name,
            );
            debug!(event = "cli.toast_completed", tag, sent);
        }
        Some(("title", sub)) => match sub.subcommand() {
            Some(("set", set)) => {
                let title = set.get_one::<String>("title").map_or("", String::as_str);
                let id = window_id(set).or(window_id(sub));
                match resolver.set_window_title(title, id) {
                    Ok(()) => info!(event = "cli.title_set", title),
                    Err(e) => error!(event = "cli.title_set_failed", kind = ?e.kind(), error = %e),
                }
            }
            _ => {
                let info = resolver.get_window_info(window_id(sub));
                println!("{}\t{}", info.window_name, info.project_name);
            }
        },
        _ => warn!(event = "cli.unknown_command"),
    }
}

fn toast(resolver: &TitleResolver, config: &Config, kind: ToastKind, sub: &ArgMatches) {
    let info = resolver.get_window_info(window_id(sub));
    let sink = default_sink(config);

    let sent = match kind {
        ToastKind::Stop => {
            notification::send_stop_toast(sink.as_ref(), &info.window_name, &info.project_name)
        }
        ToastKind::Notification => notification::send_notification_toast(
            sink.as_ref(),
            &info.window_name,
            &info.project_name,
        ),
    };
    debug!(event = "cli.toast_completed", kind = %kind, sent);
}

fn window_id(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("window-id").map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_cli_parses_title_set() {
        let matches = build_cli()
            .try_get_matches_from([
                "terminal-notifier",
                "title",
                "set",
                "Deploy",
                "--window-id",
                "w1",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "title");
        let (_, set) = sub.subcommand().unwrap();
        assert_eq!(set.get_one::<String>("title").unwrap(), "Deploy");
        assert_eq!(window_id(set), Some("w1"));
    }

    #[test]
    fn test_cli_parses_legacy_toast_tag() {
        let matches = build_cli()
            .try_get_matches_from(["terminal-notifier", "-v", "toast", "Send-StopToast"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "toast");
        assert_eq!(sub.get_one::<String>("tag").unwrap(), "Send-StopToast");
        assert_eq!(window_id(sub), None);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(build_cli().try_get_matches_from(["terminal-notifier"]).is_err());
    }
}
