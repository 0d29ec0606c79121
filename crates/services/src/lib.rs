#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod question_source;
pub mod quiz_service;
pub mod result_sink;
pub mod speech;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::{QuizConfig, WelcomeMessage};
pub use error::{
    AppServicesError, QuestionSourceError, QuizServiceError, ResultSinkError, SpeechError,
};
pub use question_source::{HttpQuestionSource, QuestionSource, RepositoryQuestionSource};
pub use quiz_service::QuizService;
pub use result_sink::{
    HttpResultSink, PublishedResult, RepositoryResultSink, ResultBoard, ResultPayload, ResultSink,
};
pub use speech::{Capability, Narrator, SpeechRecognizer, SpeechSynthesizer, Transcriber, Utterance};
