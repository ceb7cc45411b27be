use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{Message, ParseMode},
    utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{
    database::store::ProgressStore, keyboard::first_question_keyboard, runner::identify_user,
    HandlerResult,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "greeting.")]
    Start,
    #[command(description = "get a question.")]
    Question,
    #[command(description = "show your progress.")]
    Progress,
}

const START_TEXT: &str = "<b>Hi!</b> I am a JavaScript quiz bot.\n\n\
Every question is a short snippet: pick what it prints to the console. \
Press <b>First question</b> to begin.";

pub(crate) fn help_text() -> String {
    format!(
        "<b>JavaScript quiz</b>\n\n\
Answer with the <b>Option 1-4</b> buttons. Each answer is counted in your progress.\n\n{}",
        Command::descriptions()
    )
}

#[instrument(level = "info", skip(bot, msg), fields(chat_id = %msg.chat.id))]
pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, help_text())
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, msg), fields(chat_id = %msg.chat.id))]
pub(crate) async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, START_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_markup(first_question_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, msg, store), fields(chat_id = %msg.chat.id))]
pub(crate) async fn progress<Store: ProgressStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
) -> HandlerResult {
    let Some(user_id) = identify_user(&bot, &msg).await? else {
        return Ok(());
    };

    let text = match store.get(user_id).await {
        Ok(progress) => progress.to_string(),
        Err(e) => {
            tracing::error!(user_id, error = %e, "failed to load progress");
            "Sorry, I could not load your progress. Please try again later.".to_owned()
        }
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_command() {
        let text = help_text();
        for command in ["/help", "/start", "/question", "/progress"] {
            assert!(text.contains(command), "missing {command}");
        }
    }
}
