//! The `lookout check` command.

use lookout_core::{ChatCompletionsClient, Config, VisionModel};

/// Check that the configured model endpoint is reachable.
pub async fn execute(config: &Config) -> anyhow::Result<()> {
    let client = ChatCompletionsClient::new(&config.model);

    if client.is_available().await {
        println!("Model endpoint reachable: {}", client.endpoint());
        Ok(())
    } else {
        anyhow::bail!(
            "Model endpoint not reachable: {}\nIs the model server running?",
            client.endpoint()
        )
    }
}
