//! Startup must not depend on the directory the binary is launched from.
//! Kept in its own test binary because it changes the process working
//! directory.

use std::path::Path;

use astrocompanion::{Container, ContainerConfig};

#[tokio::test]
async fn shipped_prompt_loads_from_any_working_directory() {
    let shipped = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts/astrologer_system.md"),
    )
    .unwrap();

    let elsewhere = tempfile::tempdir().unwrap();
    std::env::set_current_dir(elsewhere.path()).unwrap();

    let container = Container::new(ContainerConfig {
        mock_llm: true,
        ..ContainerConfig::default()
    })
    .await
    .unwrap();

    assert_eq!(container.chat_session().system_prompt_base(), shipped);
}
