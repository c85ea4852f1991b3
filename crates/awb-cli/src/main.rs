//! `awb` - run the Accessible Web A11Y Center plugin against a local
//! option store.
//!
//! Every invocation is one request: the plugin is loaded, wired to a fresh
//! host, and the request is dispatched through the normal lifecycle.

mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use awb_core::{config_path, JsonFileOptionStore, PluginConfig};
use awb_plugin::{
    html::add_query_arg, Host, Plugin, PluginCell, RequestContext, Response, ShortcodeAttrs,
    SHORTCODE_TAG,
};

use error::{CliError, CliResult};

static PLUGIN: PluginCell = PluginCell::new();

const DEFAULT_ENTRY: &str = "accessible-web-badge/accessible-web-badge.php";

#[derive(Parser)]
#[command(name = "awb")]
#[command(author, version, about = "Accessible Web A11Y Center plugin host")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to <config dir>/awb/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Option store JSON file (overrides store_path from config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Plugin entry file, used to derive paths and the plugin basename
    #[arg(long, global = true, default_value = DEFAULT_ENTRY)]
    entry: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the settings page
    Settings {
        /// Section to show
        #[arg(long)]
        tab: Option<String>,

        /// Request URL (defaults to the settings page URL)
        #[arg(long)]
        url: Option<String>,
    },

    /// Submit the settings form
    Save {
        /// Section the form was rendered for
        #[arg(long)]
        tab: Option<String>,

        /// Field values as FIELD_ID=VALUE
        #[arg(value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },

    /// Render the front-end footer
    Footer,

    /// Expand the target-snippet shortcode
    Shortcode {
        /// Inner content for the text-link variant
        #[arg(long)]
        content: Option<String>,
    },

    /// Store a raw option value
    SetOption { key: String, value: String },

    /// Print a raw option value
    GetOption { key: String },

    /// Print the plugin list action links
    Links,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected FIELD_ID=VALUE, got '{}'", raw))
}

/// Initialize the tracing subscriber for structured logging.
///
/// Log levels can be controlled via the `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Enable debug logs for all modules
/// - `RUST_LOG=warn` - Only degraded paths and failures
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,awb=debug")
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> CliResult<PluginConfig> {
    let config = match path {
        Some(path) => PluginConfig::load(path)?,
        None => match config_path() {
            Some(path) => PluginConfig::load(&path)?,
            None => PluginConfig::default(),
        },
    };
    Ok(config)
}

fn settings_url(config: &PluginConfig) -> String {
    format!("options-general.php?page={}_settings", config.token)
}

fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;
    let store_path = cli
        .store
        .clone()
        .or_else(|| config.resolved_store_path())
        .ok_or(CliError::NoStorePath)?;
    let store = Arc::new(JsonFileOptionStore::open(&store_path)?);
    tracing::debug!("Using option store {:?}", store.path());

    let host = Host::new(store);
    let plugin = PLUGIN.instance(&host, config.clone(), &cli.entry);

    match cli.command {
        Commands::Settings { tab, url } => {
            let mut uri = url.unwrap_or_else(|| settings_url(&config));
            if let Some(tab) = tab {
                uri = add_query_arg(&uri, "tab", &tab);
            }
            print_html(host.dispatch(&RequestContext::admin(&uri))?)?;
        }
        Commands::Save { tab, values } => save(&host, &plugin, tab, values)?,
        Commands::Footer => {
            print_html(host.dispatch(&RequestContext::front("/"))?)?;
        }
        Commands::Shortcode { content } => {
            let html = host
                .do_shortcode(
                    &RequestContext::front("/"),
                    SHORTCODE_TAG,
                    &ShortcodeAttrs::new(),
                    content.as_deref(),
                )
                .unwrap_or_default();
            println!("{}", html);
        }
        Commands::SetOption { key, value } => {
            host.store().set(&key, &value)?;
            tracing::info!("Set option '{}'", key);
        }
        Commands::GetOption { key } => match host.store().get(&key)? {
            Some(value) => println!("{}", value),
            None => println!("(not set)"),
        },
        Commands::Links => {
            for link in host.plugin_action_links(&plugin.paths().basename, Vec::new()) {
                println!("{}", link);
            }
        }
    }

    Ok(())
}

fn save(
    host: &Host,
    plugin: &Plugin,
    tab: Option<String>,
    values: Vec<(String, String)>,
) -> CliResult<()> {
    let page = plugin.settings().page_id();
    let mut referer = settings_url(plugin.config());
    if let Some(tab) = &tab {
        referer = add_query_arg(&referer, "tab", tab);
    }

    let mut form = vec![
        ("option_page".to_string(), page),
        ("tab".to_string(), tab.unwrap_or_default()),
        ("_wp_http_referer".to_string(), referer),
    ];
    let prefix = plugin.settings().prefix();
    form.extend(
        values
            .into_iter()
            .map(|(id, value)| (format!("{}{}", prefix, id), value)),
    );

    match host.dispatch(&RequestContext::admin_post("options.php", form))? {
        Response::Redirect { location, outcome } => {
            for key in &outcome.updated {
                println!("updated {}", key);
            }
            for error in &outcome.errors {
                eprintln!("rejected {}", error);
            }
            for key in &outcome.failed {
                eprintln!("failed {}", key);
            }
            println!("redirect {}", location);
            Ok(())
        }
        Response::Html(_) => Err(CliError::UnexpectedResponse(
            "settings submission rendered a page".to_string(),
        )),
    }
}

fn print_html(response: Response) -> CliResult<()> {
    match response {
        Response::Html(html) => {
            print!("{}", html);
            Ok(())
        }
        Response::Redirect { location, .. } => {
            Err(CliError::UnexpectedResponse(format!("redirect to {}", location)))
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("api_key=XYZ=1"),
            Ok(("api_key".to_string(), "XYZ=1".to_string()))
        );
        assert!(parse_key_value("api_key").is_err());
    }

    #[test]
    fn test_save_args() {
        let cli = Cli::try_parse_from(["awb", "--store", "/tmp/o.json", "save", "--tab", "standard", "api_key=abc"]).unwrap();
        match cli.command {
            Commands::Save { tab, values } => {
                assert_eq!(tab.as_deref(), Some("standard"));
                assert_eq!(values, vec![("api_key".to_string(), "abc".to_string())]);
            }
            _ => panic!("expected save"),
        }
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/o.json")));
        assert_eq!(cli.entry, PathBuf::from(DEFAULT_ENTRY));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "token = \"demo\"\nscript_debug = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.token, "demo");
        assert!(config.script_debug);
        assert_eq!(settings_url(&config), "options-general.php?page=demo_settings");
    }
}
