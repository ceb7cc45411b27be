use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        UpdateFilterExt, UpdateHandler,
    },
    dptree,
    types::{Message, Update},
};

use crate::{
    commands::{self, Command},
    database::store::ProgressStore,
    keyboard::{asks_for_question, parse_option},
    runner,
    state::QuizState,
};

/// Dispatch tree of the bot. Expects `InMemStorage<QuizState>` and
/// `Arc<Store>` among the dependencies.
pub fn schema<Store>() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>>
where
    Store: ProgressStore + 'static,
{
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(commands::help))
        .branch(case![Command::Start].endpoint(commands::start))
        .branch(case![Command::Question].endpoint(runner::start_game))
        .branch(case![Command::Progress].endpoint(commands::progress::<Store>));

    let answer_handler = dptree::filter_map(|msg: Message| msg.text().and_then(parse_option))
        .branch(case![QuizState::Answering { quiz }].endpoint(runner::take_answer::<Store>))
        .endpoint(runner::no_active_quiz);

    let question_handler = dptree::filter(|msg: Message| msg.text().is_some_and(asks_for_question))
        .endpoint(runner::start_game);

    let handler = Update::filter_message()
        .branch(command_handler)
        .branch(answer_handler)
        .branch(question_handler)
        .endpoint(runner::invalid_input);

    dialogue::enter::<Update, InMemStorage<QuizState>, QuizState, _>().branch(handler)
}
