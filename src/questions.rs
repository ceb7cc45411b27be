use crate::quiz::QuizEntry;

pub static QUESTIONS: &[QuizEntry] = &[
    QuizEntry {
        id: 0,
        question: "console.log(typeof null)",
        options: &["\"null\"", "\"object\"", "\"undefined\"", "\"number\""],
        correct: 1,
        explanation: "typeof null is \"object\". This is a historical bug kept for compatibility.",
    },
    QuizEntry {
        id: 1,
        question: "console.log(0.1 + 0.2 === 0.3)",
        options: &["true", "false", "NaN", "TypeError"],
        correct: 1,
        explanation: "Numbers are IEEE 754 doubles, so 0.1 + 0.2 is 0.30000000000000004.",
    },
    QuizEntry {
        id: 2,
        question: "console.log([] + [])",
        options: &["[]", "0", "\"\" (empty string)", "undefined"],
        correct: 2,
        explanation: "Both arrays are converted to primitives with toString(), which gives \"\" for an empty array.",
    },
    QuizEntry {
        id: 3,
        question: "console.log('5' - 3)",
        options: &["\"53\"", "2", "NaN", "\"5-3\""],
        correct: 1,
        explanation: "The minus operator has no string form, so '5' is converted to the number 5.",
    },
    QuizEntry {
        id: 4,
        question: "console.log('5' + 3)",
        options: &["8", "\"53\"", "NaN", "TypeError"],
        correct: 1,
        explanation: "When one operand of + is a string, the other is converted to a string and they are concatenated.",
    },
    QuizEntry {
        id: 5,
        question: "console.log(NaN === NaN)",
        options: &["true", "false", "undefined", "NaN"],
        correct: 1,
        explanation: "NaN is not equal to anything, including itself. Use Number.isNaN to test for it.",
    },
    QuizEntry {
        id: 6,
        question: "let a = [1, 2, 3];\na.length = 0;\nconsole.log(a[0])",
        options: &["1", "0", "null", "undefined"],
        correct: 3,
        explanation: "Setting length to 0 removes every element, so a[0] is undefined.",
    },
    QuizEntry {
        id: 7,
        question: "console.log([10, 1, 2].sort())",
        options: &["[1, 2, 10]", "[10, 2, 1]", "[1, 10, 2]", "[2, 1, 10]"],
        correct: 2,
        explanation: "Without a comparator, sort() compares elements as strings, and \"10\" < \"2\".",
    },
    QuizEntry {
        id: 8,
        question: "for (var i = 0; i < 3; i++) {\n  setTimeout(() => console.log(i));\n}",
        options: &["0 1 2", "3 3 3", "0 0 0", "undefined x3"],
        correct: 1,
        explanation: "var is function scoped, so every callback sees the same i, which is 3 once the loop ends.",
    },
    QuizEntry {
        id: 9,
        question: "for (let i = 0; i < 3; i++) {\n  setTimeout(() => console.log(i));\n}",
        options: &["0 1 2", "3 3 3", "2 2 2", "undefined x3"],
        correct: 0,
        explanation: "let creates a fresh binding for each iteration, so each callback keeps its own i.",
    },
    QuizEntry {
        id: 10,
        question: "console.log(1 < 2 < 3, 3 > 2 > 1)",
        options: &["true true", "true false", "false true", "false false"],
        correct: 1,
        explanation: "3 > 2 is true, and true > 1 becomes 1 > 1, which is false.",
    },
    QuizEntry {
        id: 11,
        question: "console.log(typeof typeof 1)",
        options: &["\"number\"", "\"string\"", "\"undefined\"", "\"object\""],
        correct: 1,
        explanation: "typeof 1 is the string \"number\", and typeof of any string is \"string\".",
    },
    QuizEntry {
        id: 12,
        question: "console.log(!!'false' === !!'true')",
        options: &["true", "false", "TypeError", "undefined"],
        correct: 0,
        explanation: "Both are non-empty strings and therefore truthy, so both sides are true.",
    },
    QuizEntry {
        id: 13,
        question: "const obj = { a: 1 };\nconst copy = obj;\ncopy.a = 2;\nconsole.log(obj.a)",
        options: &["1", "2", "undefined", "ReferenceError"],
        correct: 1,
        explanation: "Objects are assigned by reference, so obj and copy point to the same object.",
    },
    QuizEntry {
        id: 14,
        question: "console.log(Promise.resolve(1) instanceof Promise, typeof Promise)",
        options: &["true \"function\"", "true \"object\"", "false \"function\"", "false \"object\""],
        correct: 0,
        explanation: "Promise.resolve returns a Promise instance, and constructors are functions.",
    },
    QuizEntry {
        id: 15,
        question: "console.log('start');\nsetTimeout(() => console.log('timeout'));\nPromise.resolve().then(() => console.log('promise'));\nconsole.log('end');",
        options: &[
            "start end timeout promise",
            "start timeout promise end",
            "start end promise timeout",
            "start promise end timeout",
        ],
        correct: 2,
        explanation: "Synchronous code runs first, then the microtask queue (promises), then macrotasks (timers).",
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::quiz::Quiz;

    #[test]
    fn every_question_is_well_formed() {
        for entry in QUESTIONS {
            entry.validate().unwrap();
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<u32> = QUESTIONS.iter().map(|entry| entry.id).collect();
        assert_eq!(ids.len(), QUESTIONS.len());
    }

    #[test]
    fn random_quiz_comes_from_the_list() {
        let quiz = Quiz::random(QUESTIONS).unwrap();
        assert!(QUESTIONS.iter().any(|entry| entry.id == quiz.id()));
    }
}
