//! Command execution
//!
//! Every query command loads its input files into a fresh [`TraceStore`] and
//! renders the answer as pretty-printed JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sigflow_dialog_core::packet::load_packets_path;
use sigflow_dialog_core::{CorrelationConfig, PacketQuery, TraceStore};
use tracing::debug;

use super::{Command, TraceArgs};
use crate::config::AppConfig;

/// Run `command` and return what should be printed on stdout
pub async fn run(command: Command, config: &AppConfig) -> Result<String> {
    match command {
        Command::Flows { input } => {
            let store = load_store(&input, config.correlation).await?;
            render(&store.dialogues(input.trace.as_deref()).await?)
        }
        Command::Unanswered { orphan_errors, input } => {
            let mut correlation = config.correlation;
            if orphan_errors {
                correlation = correlation.with_orphan_errors();
            }
            let store = load_store(&input, correlation).await?;
            render(&store.unanswered(input.trace.as_deref()).await?)
        }
        Command::Stats { input } => {
            let store = load_store(&input, config.correlation).await?;
            render(&store.stats(input.trace.as_deref()).await?)
        }
        Command::Search { query, input } => {
            let store = load_store(&input, config.correlation).await?;
            render(&store.search(input.trace.as_deref(), &query).await?)
        }
        Command::Packets {
            proto,
            search,
            offset,
            limit,
            input,
        } => {
            let query = PacketQuery::default()
                .with_proto(proto.unwrap_or_default())
                .with_search(search.unwrap_or_default())
                .with_page(offset, limit);
            let store = load_store(&input, config.correlation).await?;
            render(&store.packets(input.trace.as_deref(), &query).await?)
        }
        Command::Packet { frame, input } => {
            let store = load_store(&input, config.correlation).await?;
            render(&store.packet(input.trace.as_deref(), frame).await?)
        }
        Command::Config => Ok(config.to_toml()?),
    }
}

/// Load every input file as a trace named after its file stem
async fn load_store(input: &TraceArgs, correlation: CorrelationConfig) -> Result<TraceStore> {
    let store = TraceStore::with_config(correlation);
    for path in &input.files {
        let packets = load_packets_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        store.insert(trace_name(path), packets).await;
    }
    debug!("Loaded {} traces", input.files.len());
    Ok(store)
}

fn trace_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to render output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_names_come_from_file_stems() {
        assert_eq!(trace_name(Path::new("/tmp/captures/hlr-01.json")), "hlr-01");
        assert_eq!(trace_name(Path::new("trace")), "trace");
    }
}
