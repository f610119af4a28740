use std::sync::Arc;

use crate::{
    auth::Caller,
    constants::prompts::{document_question, DOCUMENT_QA_PROMPT, STUDY_ASSISTANT_PROMPT},
    errors::{AppError, AppResult},
    models::domain::StudyDocument,
    models::dto::request::{ChatRole, ChatTurn},
    models::dto::response::DocumentUploadResponse,
    repositories::StudyDocumentRepository,
    services::language_model::{ChatMessage, LanguageModel},
    services::passage_ranking::{
        rank_passages, split_passages, word_count, MAX_PASSAGE_WORDS, TOP_PASSAGES,
    },
};

pub const MAX_HISTORY_TURNS: usize = 20;
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

pub struct AssistantService {
    model: Arc<dyn LanguageModel>,
    documents: Arc<dyn StudyDocumentRepository>,
}

impl AssistantService {
    pub fn new(model: Arc<dyn LanguageModel>, documents: Arc<dyn StudyDocumentRepository>) -> Self {
        Self { model, documents }
    }

    pub async fn chat(&self, caller: &Caller, message: &str, history: &[ChatTurn]) -> AppResult<String> {
        let messages = conversation(STUDY_ASSISTANT_PROMPT, history, message.trim());
        log::debug!("Assistant request from {} with {} messages", caller.user_id, messages.len());
        self.model.complete(messages).await
    }

    pub async fn upload_document(
        &self,
        caller: &Caller,
        filename: Option<&str>,
        body: &[u8],
    ) -> AppResult<DocumentUploadResponse> {
        if body.len() > MAX_DOCUMENT_BYTES {
            return Err(AppError::ValidationError(
                "Document is larger than 1 MiB".to_string(),
            ));
        }
        let content = std::str::from_utf8(body).map_err(|_| {
            AppError::ValidationError("Document must be UTF-8 text".to_string())
        })?;
        if content.trim().is_empty() {
            return Err(AppError::ValidationError("Document is empty".to_string()));
        }

        let filename = filename
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or("document.txt");
        let document = self
            .documents
            .create(StudyDocument::new(&caller.user_id, filename, content))
            .await?;

        log::info!("Study document {} uploaded by {}", document.id, caller.user_id);
        Ok(DocumentUploadResponse {
            words: word_count(&document.content),
            passages: split_passages(&document.content, MAX_PASSAGE_WORDS).len(),
            id: document.id,
            filename: document.filename,
        })
    }

    /// Answers from the caller's latest upload, sending only the best passages.
    pub async fn ask_document(
        &self,
        caller: &Caller,
        question: &str,
        history: &[ChatTurn],
    ) -> AppResult<String> {
        let document = self
            .documents
            .find_latest_for_owner(&caller.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload a document first".to_string()))?;

        let passages = split_passages(&document.content, MAX_PASSAGE_WORDS);
        let selected: Vec<&str> = rank_passages(&passages, question, TOP_PASSAGES)
            .into_iter()
            .map(|i| passages[i].as_str())
            .collect();

        let prompt = document_question(&document.filename, &selected, question.trim());
        self.model
            .complete(conversation(DOCUMENT_QA_PROMPT, history, &prompt))
            .await
    }
}

/// System prompt, the newest history turns, then the new user message.
fn conversation(system: &str, history: &[ChatTurn], message: &str) -> Vec<ChatMessage> {
    let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);

    let mut messages = vec![ChatMessage::system(system)];
    messages.extend(
        history
            .iter()
            .skip(skip)
            .filter(|turn| !turn.content.trim().is_empty())
            .map(|turn| match turn.role {
                ChatRole::User => ChatMessage::user(turn.content.as_str()),
                ChatRole::Assistant => ChatMessage::assistant(turn.content.as_str()),
            }),
    );
    messages.push(ChatMessage::user(message));
    messages
}
