//! Status command: where data lives and which endpoint is used.

use anyhow::Result;
use console::style;

use personabot_core::storage::KeyValueStorage;

use crate::state::AppState;

/// Display the status summary.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let bots = state.store.list();
    let messages: usize = bots.iter().map(|b| b.messages.len()).sum();
    let backend = state.store.storage().backend_name();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "storage": {
                "backend": backend,
                "durable": state.is_durable(),
                "key": state.store.key(),
            },
            "api_base_url": state.config.api_base_url,
            "endpoint": state.client.url(),
            "bots": bots.len(),
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} personabot v{}",
        style("*").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Bots ──").dim());
    println!("  Total:     {}", style(bots.len()).bold());
    println!("  Messages:  {}", messages);
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Data dir:  {}", style(state.data_dir.display()).dim());
    if state.is_durable() {
        println!("  Backend:   {}", style(backend).green());
    } else {
        println!(
            "  Backend:   {} {}",
            style(backend).yellow(),
            style("(not saved between runs)").dim()
        );
    }
    println!("  Key:       {}", state.store.key());
    println!();

    println!("  {}", style("── Generation ──").dim());
    println!("  Endpoint:  {}", style(state.client.url()).cyan());
    println!();

    Ok(())
}
