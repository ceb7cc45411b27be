use crate::quiz::Quiz;

#[derive(Debug, Clone, Default)]
pub enum QuizState {
    #[default]
    Idle,
    Answering {
        quiz: Quiz,
    },
}
