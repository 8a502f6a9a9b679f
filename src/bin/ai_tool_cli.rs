//! ai-tool-cli: 工具集查询与语音合成的命令行工具
//!
//! Usage:
//!   ai-tool-cli list [--config <path>]             List registered tool sets and tools
//!   ai-tool-cli info <toolset> [--locale <tag>]    Show tool-set metadata
//!   ai-tool-cli schema <tool>                      Print a tool's input/output schema
//!   ai-tool-cli tts --text <t> --model <m> --voice <id> [options]

use ai_tool_plugins::packages::{self, minimax_tts};
use ai_tool_plugins::tool::FALLBACK_LOCALE;
use ai_tool_plugins::{get_tool_registry, PluginConfig};
use anyhow::{anyhow, bail, Context};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "list" => cmd_list(&args[2..]),
        "info" => cmd_info(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "tts" => cmd_tts(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("ai-tool-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"ai-tool-cli: AI 工具包命令行工具

USAGE:
    ai-tool-cli <COMMAND> [OPTIONS]

COMMANDS:
    list                        List registered tool sets and tools
    info <toolset>              Show tool-set metadata (--locale <tag>)
    schema <tool>               Print a tool's input and output JSON Schema
    tts                         Synthesize speech and print the hosted URL
        --text <text>           Text to synthesize
        --model <model>         MiniMax model id
        --voice <voice_id>      Voice id
        --speed <n>             Default 1
        --vol <n>               Default 1
        --pitch <n>             Default 0
        --emotion <name>        Default neutral
        --no-en-normalization   Disable English normalization
        --api-key <key>         Default $MINIMAX_API_KEY
    version                     Show version information
    help                        Show this help message

GLOBAL OPTIONS:
    --config <path>             YAML configuration file

ENVIRONMENT:
    MINIMAX_API_KEY             MiniMax API key
    MINIMAX_BASE_URL            Vendor base URL
    TOOL_UPLOAD_URL             Storage upload endpoint
    TOOL_UPLOAD_TOKEN           Storage bearer token
    RUST_LOG                    Log filter"#
    );
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn positional(args: &[String]) -> Option<&str> {
    args.first().filter(|a| !a.starts_with("--")).map(String::as_str)
}

fn load_config(args: &[String]) -> anyhow::Result<PluginConfig> {
    let config = match flag(args, "--config") {
        Some(path) => PluginConfig::from_yaml_file(path)
            .with_context(|| format!("loading {path}"))?
            .with_env_overrides()?,
        None => PluginConfig::from_env()?,
    };
    Ok(config)
}

fn init_registry(args: &[String]) -> anyhow::Result<()> {
    let config = load_config(args)?;
    packages::register_builtin(get_tool_registry(), &config)?;
    Ok(())
}

fn cmd_list(args: &[String]) -> anyhow::Result<()> {
    init_registry(args)?;
    let registry = get_tool_registry();
    println!("=== Tool Sets ===");
    for set in registry.tool_sets() {
        println!(
            "  {:<16} [{}] {}",
            set.id,
            set.tool_type.as_str(),
            set.name.get(FALLBACK_LOCALE).unwrap_or("")
        );
    }
    println!("\n=== Tools ===");
    let tools = registry.tools();
    if tools.is_empty() {
        println!("  (none; set TOOL_UPLOAD_URL to enable {})", minimax_tts::TOOL_ID);
    }
    for tool in tools {
        println!("  {:<16} {}", tool.id(), tool.description());
    }
    Ok(())
}

fn cmd_info(args: &[String]) -> anyhow::Result<()> {
    let id = positional(args).ok_or_else(|| anyhow!("usage: ai-tool-cli info <toolset>"))?;
    init_registry(args)?;
    let set = get_tool_registry()
        .tool_set(id)
        .ok_or_else(|| anyhow!("unknown tool set: {id}"))?;
    let locale = flag(args, "--locale").unwrap_or(FALLBACK_LOCALE);
    println!("id:          {}", set.id);
    println!("name:        {}", set.name.get(locale).unwrap_or(""));
    println!("type:        {}", set.tool_type.as_str());
    println!("description: {}", set.description.get(locale).unwrap_or(""));
    println!("for model:   {}", set.ai_description().unwrap_or(""));
    println!("icon:        {}", set.icon);
    println!(
        "locales:     {}",
        set.name.locales().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

fn cmd_schema(args: &[String]) -> anyhow::Result<()> {
    let id = positional(args).ok_or_else(|| anyhow!("usage: ai-tool-cli schema <tool>"))?;
    let mut config = load_config(args)?;
    // Schemas are static; a placeholder endpoint lets the tool register.
    if config.upload.endpoint.is_none() {
        config.upload.endpoint = Some("http://localhost/upload".to_string());
    }
    packages::register_builtin(get_tool_registry(), &config)?;
    let tool = get_tool_registry()
        .tool(id)
        .ok_or_else(|| anyhow!("unknown tool: {id}"))?;
    let out = json!({
        "input": tool.input_schema(),
        "output": tool.output_schema(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn number(args: &[String], name: &str, default: f64) -> anyhow::Result<f64> {
    match flag(args, name) {
        Some(v) => v
            .parse::<f64>()
            .with_context(|| format!("{name} expects a number, got {v:?}")),
        None => Ok(default),
    }
}

async fn cmd_tts(args: &[String]) -> anyhow::Result<()> {
    let api_key = match flag(args, "--api-key") {
        Some(k) => k.to_string(),
        None => std::env::var("MINIMAX_API_KEY")
            .context("API key required (--api-key or MINIMAX_API_KEY)")?,
    };
    let (Some(text), Some(model), Some(voice)) = (
        flag(args, "--text"),
        flag(args, "--model"),
        flag(args, "--voice"),
    ) else {
        bail!("tts requires --text, --model and --voice");
    };

    init_registry(args)?;
    if get_tool_registry().tool(minimax_tts::TOOL_ID).is_none() {
        bail!("no upload endpoint configured; set TOOL_UPLOAD_URL or upload.endpoint");
    }
    let input = json!({
        "apiKey": api_key,
        "text": text,
        "model": model,
        "voice_setting": {
            "voice_id": voice,
            "speed": number(args, "--speed", 1.0)?,
            "vol": number(args, "--vol", 1.0)?,
            "pitch": number(args, "--pitch", 0.0)?,
            "emotion": flag(args, "--emotion").unwrap_or("neutral"),
            "en_normalization": !args.iter().any(|a| a == "--no-en-normalization"),
        }
    });

    let output = get_tool_registry()
        .invoke(minimax_tts::TOOL_ID, input)
        .await?;
    println!("{}", output["audioUrl"].as_str().unwrap_or_default());
    Ok(())
}
