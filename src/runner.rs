use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{Message, ParseMode},
    Bot, RequestError,
};
use tracing::instrument;

use crate::{
    database::store::ProgressStore,
    keyboard::{first_question_keyboard, next_question_keyboard, options_keyboard},
    questions::QUESTIONS,
    quiz::Quiz,
    state::QuizState,
    HandlerResult, UserDialogue,
};

/// Sender id of `msg`, or `None` after telling the user they could not be
/// identified. Id 0 is never a real account.
pub(crate) async fn identify_user(bot: &Bot, msg: &Message) -> Result<Option<u64>, RequestError> {
    match msg.from.as_ref().map(|user| user.id.0).filter(|id| *id != 0) {
        Some(user_id) => Ok(Some(user_id)),
        None => {
            tracing::warn!(chat_id = %msg.chat.id, "message without a sender");
            bot.send_message(msg.chat.id, "Could not identify you.")
                .await?;
            Ok(None)
        }
    }
}

#[instrument(level = "info", skip(bot, msg, dialogue), fields(chat_id = %msg.chat.id))]
pub(crate) async fn start_game(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    let quiz = match Quiz::random(QUESTIONS) {
        Ok(quiz) => quiz,
        Err(e) => {
            tracing::error!(error = %e, "failed to draw a question");
            bot.send_message(msg.chat.id, "Sorry, no questions are available right now.")
                .await?;
            return Ok(());
        }
    };

    tracing::info!(question_id = quiz.id(), "asking question");
    bot.send_message(msg.chat.id, quiz.render_question())
        .parse_mode(ParseMode::Html)
        .reply_markup(options_keyboard())
        .await?;
    dialogue.update(QuizState::Answering { quiz }).await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, msg, dialogue, store, quiz), fields(chat_id = %msg.chat.id, question_id = quiz.id()))]
pub(crate) async fn take_answer<Store: ProgressStore>(
    bot: Bot,
    msg: Message,
    dialogue: UserDialogue,
    store: Arc<Store>,
    mut quiz: Quiz,
    choice: usize,
) -> HandlerResult {
    let Some(user_id) = identify_user(&bot, &msg).await? else {
        return Ok(());
    };

    let is_correct = quiz.is_correct_choice(choice);
    match store.record_answer(user_id, is_correct).await {
        Ok(progress) => {
            tracing::info!(
                user_id,
                choice,
                is_correct,
                quiz_count = progress.quiz_count(),
                correct_count = progress.correct_count(),
                "answer recorded"
            );
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "failed to record answer");
            bot.send_message(
                msg.chat.id,
                "Sorry, I could not record your answer. Please try again.",
            )
            .await?;
            return Ok(());
        }
    }
    dialogue.update(QuizState::Idle).await?;

    quiz.set_correct(is_correct);
    bot.send_message(msg.chat.id, quiz.render_result())
        .parse_mode(ParseMode::Html)
        .reply_markup(next_question_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, msg), fields(chat_id = %msg.chat.id))]
pub(crate) async fn no_active_quiz(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Start a game first with /question.")
        .reply_markup(first_question_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, msg), fields(chat_id = %msg.chat.id))]
pub(crate) async fn invalid_input(bot: Bot, msg: Message) -> HandlerResult {
    tracing::info!(text = ?msg.text(), "unrecognized input");
    bot.send_message(
        msg.chat.id,
        "I don't understand this message. Enter /help to see usages.",
    )
    .await?;
    Ok(())
}
