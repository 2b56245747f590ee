use anyhow::{bail, Context, Result};
use api_client::ResourceService;
use clap::{Args, Parser, Subcommand};
use formatting::{
    date::{format_date, local_time_zone, parse_time_zone, DateFormat},
    FormatKind, Pipe, PipeArgs,
};
use serde_json::Value;
use shared::domain::LangCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppContext;
use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "toolkit", about = "Formatting, translation and API helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one formatter over the input.
    Format {
        kind: FormatKind,
        input: String,
        #[command(flatten)]
        options: FormatOptions,
    },
    /// Render a date with a named format or a raw pattern.
    Date {
        input: String,
        #[arg(long, default_value = "format-1")]
        format: String,
        #[arg(long, default_value = "en")]
        locale: LangCode,
        #[arg(long)]
        tz: Option<String>,
    },
    /// GET an endpoint relative to the configured base URL.
    Get { endpoint: String },
    /// Translate keys with the loaded catalogs.
    Translate {
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(long)]
        lang: Option<LangCode>,
    },
}

#[derive(Args, Debug, Default)]
struct FormatOptions {
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    trail: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    count: Option<i64>,
    #[arg(long)]
    plural: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    unit: Option<String>,
    #[arg(long)]
    decimals: Option<usize>,
    #[arg(long)]
    digits_info: Option<String>,
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    display: Option<String>,
    #[arg(long)]
    default: Option<String>,
    #[arg(long)]
    tz: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    order: Option<String>,
    #[arg(long)]
    spaces: Option<usize>,
}

impl From<FormatOptions> for PipeArgs {
    fn from(options: FormatOptions) -> Self {
        PipeArgs {
            limit: options.limit,
            trail: options.trail,
            count: options.count,
            plural: options.plural,
            search: options.search,
            unit: options.unit,
            decimals: options.decimals,
            digits_info: options.digits_info,
            locale: options.locale,
            currency: options.currency,
            display: options.display,
            default: options.default,
            time_zone: options.tz,
            end: options.end,
            order: options.order,
            spaces: options.spaces,
        }
    }
}

fn run_format(kind: FormatKind, input: &str, options: FormatOptions) -> Result<String> {
    let pipe = Pipe::build(kind, &options.into())
        .with_context(|| format!("invalid arguments for '{}'", kind.name()))?;
    debug!(kind = kind.name(), "applying formatter");
    pipe.apply(input)
        .with_context(|| format!("'{}' could not format {input:?}", kind.name()))
}

fn run_date(input: &str, format: &str, locale: LangCode, tz: Option<&str>) -> Result<String> {
    let tz = match tz {
        Some(name) => parse_time_zone(name)?,
        None => local_time_zone(),
    };
    let rendered = format_date(input, DateFormat::resolve(format), locale, tz);
    if rendered.is_empty() {
        bail!("'{input}' is not a recognizable date");
    }
    Ok(rendered)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Format {
            kind,
            input,
            options,
        } => {
            println!("{}", run_format(kind, &input, options)?);
        }
        Command::Date {
            input,
            format,
            locale,
            tz,
        } => {
            println!("{}", run_date(&input, &format, locale, tz.as_deref())?);
        }
        Command::Get { endpoint } => {
            let settings = load_settings()?;
            let context = AppContext::bootstrap(&settings).await?;
            let resource = ResourceService::<Value>::new(context.api.clone(), endpoint);
            let body = resource
                .store()
                .fetch_entity(resource.api().get(resource.path(), None))
                .await
                .with_context(|| format!("GET {} failed", resource.path()))?;
            info!(endpoint = resource.path(), "fetched");
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Translate { keys, lang } => {
            let settings = load_settings()?;
            let context = AppContext::bootstrap(&settings).await?;
            if let Some(lang) = lang {
                context.translations.change_language(lang).await?;
            }
            println!("{}", context.translations.safe_translate(&keys));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
