use anyhow::{bail, Result};

use crate::{BirthArgs, Commands};

use super::container::Container;
use super::controller::{ChartController, ChartView, ChatController};

/// Dispatches the one-shot commands. `chat` and `serve` run their own loops
/// and are driven from `main`.
pub struct Router<'a> {
    chart_controller: ChartController<'a>,
    chat_controller: ChatController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chart_controller: ChartController::new(container),
            chat_controller: ChatController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chart { birth, json } => {
                let view = self.chart_controller.generate(&birth.to_details()).await;
                if json {
                    if let Some(record) = self.chart_controller.current_json().await? {
                        return Ok(record);
                    }
                }
                Ok(format_view(&view))
            }
            Commands::Ask { message, birth } => {
                let mut output = String::new();
                if let Some(view) = self.prepare_chart(&birth).await {
                    output.push_str(&view.status);
                    output.push_str("\n\n");
                }
                output.push_str(&self.chat_controller.send(&message, &[]).await);
                Ok(output)
            }
            Commands::Prompts { birth } => {
                self.prepare_chart(&birth).await;
                let prompts = self.chat_controller.suggested_prompts().await;
                Ok(prompts
                    .iter()
                    .enumerate()
                    .map(|(i, prompt)| format!("{}. {}", i + 1, prompt))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Commands::Timezones => Ok(self.chart_controller.timezones()),
            Commands::Chat { .. } | Commands::Serve { .. } => {
                bail!("interactive commands are not routed")
            }
        }
    }

    /// Generates a chart first when birth flags were given.
    pub async fn prepare_chart(&self, birth: &BirthArgs) -> Option<ChartView> {
        if !birth.is_given() {
            return None;
        }
        Some(self.chart_controller.generate(&birth.to_details()).await)
    }
}

fn format_view(view: &ChartView) -> String {
    let mut output = format!("{}\n\n{}", view.markdown.trim_end(), view.status);
    if let Some(path) = &view.visual_path {
        output.push_str(&format!("\nChart image: {}", path));
    }
    output
}
