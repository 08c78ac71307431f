use std::sync::Arc;

use bichat::{
    spawn_session_sweeper, AgentMessage, AppState, DynLlmClient, FlowContext, FlowExecutor,
    GenericHttpClient, LoggingConfig, MemorySessionStore, RoutingPolicy, ServerConfig,
    SessionStore, ToolRegistry, DEFAULT_MAX_STEPS,
};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "bichat", version, about = "BI chat workflow service", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 启动 HTTP 服务
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },
    /// 对配置的模型执行一次对话并打印结果
    Ask {
        message: String,
        #[arg(long, default_value_t = RoutingPolicy::ModelDriven)]
        routing: RoutingPolicy,
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u32,
    },
    /// 以 JSON 打印能力声明
    Capabilities,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config } => handle_serve(config).await?,
        Command::Ask {
            message,
            routing,
            max_steps,
        } => handle_ask(message, routing, max_steps).await?,
        Command::Capabilities => handle_capabilities()?,
    }
    Ok(())
}

fn http_client() -> anyhow::Result<DynLlmClient> {
    Ok(Arc::new(GenericHttpClient::new()?))
}

async fn handle_serve(config: ServerConfig) -> anyhow::Result<()> {
    let executor = FlowExecutor::bi_chat(http_client()?, config.routing, config.system_prompt.clone())?
        .with_max_iterations(config.max_steps);
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let sweeper = spawn_session_sweeper(
        Arc::clone(&sessions),
        config.session_idle(),
        config.session_sweep(),
    );

    let result = bichat::serve(&config, AppState::new(sessions, executor)).await;
    sweeper.abort();
    result
}

async fn handle_ask(message: String, routing: RoutingPolicy, max_steps: u32) -> anyhow::Result<()> {
    let executor =
        FlowExecutor::bi_chat(http_client()?, routing, None)?.with_max_iterations(max_steps);
    let ctx = FlowContext::new();
    let execution = executor.start(&ctx, AgentMessage::user(message)).await?;

    println!("{}", execution.response_text().unwrap_or_default());
    println!();
    println!("trace ({} steps): {}", execution.steps, execution.trace.join(" -> "));
    Ok(())
}

fn handle_capabilities() -> anyhow::Result<()> {
    let schemas: Vec<_> = ToolRegistry::builtin()
        .manifests()
        .iter()
        .map(|manifest| manifest.to_function_schema())
        .collect();
    println!("{}", serde_json::to_string_pretty(&json!(schemas))?);
    Ok(())
}
