use super::{CommandContext, CommandResult};
use crate::components::gmail::DraftMessage;

/// Create a Gmail draft and print its id
pub async fn create(ctx: &CommandContext, to: Vec<String>, subject: String, body: String) -> CommandResult {
    let message = DraftMessage::new(to, subject, body);
    let draft_id = ctx.gmail.create_draft(&message).await?;
    println!("Draft created in Gmail. Draft ID: {}", draft_id);
    Ok(())
}
