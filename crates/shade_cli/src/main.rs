//! Shade CLI
//!
//! A demo host application: builds a document, registers the scope tag,
//! instantiates scope elements from a JSON configuration, and drives their
//! attach/detach lifecycle from the document's notification queue.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shade_dom::{Document, NodeId, NotificationKind, ScriptHost, ScriptSource};
use shade_scope::{
    BindingAdapter, EntryKind, ScopeConfig, ScopeFactory, ScopeRegistry, StaticGenerator,
    PROPS_ATTRIBUTE, SCOPE_TAG,
};

#[derive(Parser)]
#[command(name = "shade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shade scope element demo host", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a document with one scope element and walk its lifecycle
    Demo {
        /// Scope configuration file (JSON); a built-in sample is used if absent
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Instance descriptor placed in the data-props attribute
        #[arg(short, long, default_value = r#"{"type":"card","id":7}"#)]
        props: String,
    },

    /// Show how each configured style/script source is classified
    Classify {
        /// Scope configuration file (JSON)
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Demo { config, props } => cmd_demo(config.as_deref(), &props),
        Commands::Classify { config } => cmd_classify(&config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ScopeConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))
        }
        None => Ok(sample_config()),
    }
}

fn sample_config() -> ScopeConfig {
    ScopeConfig {
        style: vec![
            "https://cdn.example/base.css".to_string(),
            ".btn{color:red}".to_string(),
        ],
        script: vec!["console.log('registry script')".to_string()],
        ..ScopeConfig::default()
    }
}

/// Logs binding hook calls so the demo output shows the lifecycle
#[derive(Debug, Default)]
struct LoggingBinding;

impl BindingAdapter for LoggingBinding {
    fn initialize_tree(&self, _doc: &mut Document, root: NodeId) {
        info!(?root, "binding engine: initialize tree");
    }

    fn destroy_tree(&self, _doc: &mut Document, root: NodeId) {
        info!(?root, "binding engine: destroy tree");
    }
}

/// Logs scripts as they would execute in the boundary
#[derive(Debug, Default)]
struct LoggingScriptHost;

impl ScriptHost for LoggingScriptHost {
    fn execute(&self, node: NodeId, source: ScriptSource) {
        match source {
            ScriptSource::Inline(code) => info!(?node, code, "script host: execute inline"),
            ScriptSource::Remote(src) => info!(?node, src, "script host: load and execute"),
        }
    }
}

fn cmd_demo(config_path: Option<&std::path::Path>, props: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let factory = ScopeFactory::new(
        &config,
        &StaticGenerator::new("*{box-sizing:border-box}"),
        Arc::new(LoggingBinding),
    );

    let mut doc = Document::new();
    doc.set_script_host(Arc::new(LoggingScriptHost));
    factory.register(&mut doc)?;

    // Host markup: a scope element carrying light content.
    let host = doc.create_element(SCOPE_TAG);
    doc.set_attribute(host, PROPS_ATTRIBUTE, props);
    let content = doc.create_element("div");
    let text = doc.create_text("hello from the boundary");
    doc.append_child(content, text)?;
    doc.append_child(host, content)?;

    let mut scope = factory.upgrade(&mut doc, host);
    info!("constructed; content migrated into the boundary");

    doc.append_child(doc.root(), host)?;
    drive(&mut doc, &mut scope);
    println!("--- attached ---\n{}", doc.dump(host));

    doc.detach(host)?;
    drive(&mut doc, &mut scope);
    info!(state = ?scope.state(), "after detach");

    doc.append_child(doc.root(), host)?;
    drive(&mut doc, &mut scope);
    println!("--- reattached ---\n{}", doc.dump(host));

    Ok(())
}

/// Drain the notification queue into the controller
fn drive(doc: &mut Document, scope: &mut shade_scope::ScopeElement) {
    for notification in doc.take_notifications() {
        if notification.node != scope.host() {
            continue;
        }
        match notification.kind {
            NotificationKind::Connected => scope.connected(doc),
            NotificationKind::Disconnected => scope.disconnected(doc),
        }
    }
}

fn cmd_classify(path: &std::path::Path) -> Result<()> {
    let config = load_config(Some(path))?;
    let registry = ScopeRegistry::from_config(&config);

    println!("styles:");
    print_entries(registry.styles());
    println!("scripts:");
    print_entries(registry.scripts());
    Ok(())
}

fn print_entries(entries: &[shade_scope::RegistryEntry]) {
    for entry in entries {
        let kind = match entry.kind {
            EntryKind::RemoteReference => "remote",
            EntryKind::InlineContent => "inline",
        };
        println!("  [{kind}] {}", entry.content);
    }
}
