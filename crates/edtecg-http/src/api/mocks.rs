//! Mock exams ("mocks"): quizzes with scored answers.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use edtecg_core::{ApiRequest, Result};

use crate::client::ApiClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub answer: String,
    pub correct: bool,
    #[serde(default)]
    pub point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub question: String,
    #[serde(default)]
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: u64,
    pub score: f64,
    /// Server timestamp; see [`crate::api::parse_timestamp`].
    #[serde(default)]
    pub submitted_at: Option<String>,
    pub user_id: u64,
    pub mock_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mock {
    pub id: u64,
    pub name_mock: String,
    #[serde(default)]
    pub language_name: Option<String>,
    #[serde(default)]
    pub number_of_questions: u32,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub scores: Vec<Score>,
}

impl Mock {
    pub fn question(&self, id: u64) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == Some(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: u64,
    pub language_name: String,
}

/// Parameters for [`Mocks::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMock {
    pub name: String,
    pub user_id: u64,
    pub language_id: u64,
    pub number_of_questions: u32,
    pub questions: Vec<QuizQuestion>,
}

/// Partial update for [`Mocks::update`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_questions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
}

/// Mock endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Mocks<'a> {
    api: &'a ApiClient,
}

impl<'a> Mocks<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn languages(&self) -> Result<Vec<Language>> {
        self.api.get("mock/languages").await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Mock>> {
        self.api.get("mock/all").await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Mock> {
        self.api.get(&format!("mock/getMock/{}", id)).await
    }

    /// Current score of the user on a mock.
    #[instrument(skip(self))]
    pub async fn score(&self, id: u64) -> Result<f64> {
        self.api.get(&format!("mock/{}/score", id)).await
    }

    /// Submit one answer. Returns whether it was correct.
    #[instrument(skip(self))]
    pub async fn submit(&self, id: u64, question_id: u64, answer_id: u64) -> Result<bool> {
        let request = ApiRequest::post(format!("mock/{}/submit", id))
            .query("questionId", question_id)
            .query("answerId", answer_id);
        self.api.json(request).await
    }

    #[instrument(skip(self, mock), fields(name = %mock.name))]
    pub async fn create(&self, mock: &NewMock) -> Result<Mock> {
        let request = ApiRequest::post("mock/create")
            .query("nameMock", &mock.name)
            .query("userId", mock.user_id)
            .query("languageId", mock.language_id)
            .query("numberOfQuestions", mock.number_of_questions)
            .json(&mock.questions)?;
        self.api.json(request).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: u64, update: &MockUpdate) -> Result<Mock> {
        self.api.patch(&format!("mock/update/{}", id), update).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api.delete(&format!("mock/delete/{}", id)).await
    }
}
