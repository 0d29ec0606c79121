mod answers;
mod ids;
mod question;
mod result;
mod session;

pub use ids::{ParseIdError, QuestionId, ResultId};

pub use answers::{AnswerError, AnswerRecord};
pub use question::{Question, QuestionError, QuestionSet};
pub use result::{QuizResult, ResultRecord, ResultRecordError, Verdict};
pub use session::{Session, Username, UsernameError};
