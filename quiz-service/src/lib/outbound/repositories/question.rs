use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::question::errors::QuestionError;
use crate::domain::question::models::AnswerIndex;
use crate::domain::question::models::Question;
use crate::domain::question::models::QuestionId;
use crate::domain::question::ports::QuestionRepository;

const SELECT_QUESTION: &str =
    "SELECT id, ask, answer1, answer2, answer3, answer4, correct, created_at FROM questions";

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    ask: String,
    answer1: String,
    answer2: String,
    answer3: String,
    answer4: String,
    correct: i16,
    created_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self) -> Result<Question, QuestionError> {
        Ok(Question {
            id: QuestionId(self.id),
            ask: self.ask,
            answers: [self.answer1, self.answer2, self.answer3, self.answer4],
            correct: AnswerIndex::new(self.correct)?,
            created_at: self.created_at,
        })
    }
}

pub struct PostgresQuestionRepository {
    pool: PgPool,
}

impl PostgresQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn create(&self, question: Question) -> Result<Question, QuestionError> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, ask, answer1, answer2, answer3, answer4, correct, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(question.id.0)
        .bind(&question.ask)
        .bind(&question.answers[0])
        .bind(&question.answers[1])
        .bind(&question.answers[2])
        .bind(&question.answers[3])
        .bind(question.correct.value())
        .bind(question.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| QuestionError::DatabaseError(e.to_string()))?;

        Ok(question)
    }

    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<Question>, QuestionError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!("{} WHERE id = $1", SELECT_QUESTION))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| QuestionError::DatabaseError(e.to_string()))?;

        row.map(QuestionRow::into_question).transpose()
    }

    async fn find_by_ids(&self, ids: &[QuestionId]) -> Result<Vec<Question>, QuestionError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows =
            sqlx::query_as::<_, QuestionRow>(&format!("{} WHERE id = ANY($1)", SELECT_QUESTION))
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| QuestionError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(QuestionRow::into_question).collect()
    }

    async fn list(&self, page: u32, size: u32) -> Result<Vec<Question>, QuestionError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(size);

        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "{} ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_QUESTION
        ))
        .bind(i64::from(size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QuestionError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(QuestionRow::into_question).collect()
    }

    async fn update(&self, question: Question) -> Result<Question, QuestionError> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET ask = $2, answer1 = $3, answer2 = $4, answer3 = $5, answer4 = $6, correct = $7
            WHERE id = $1
            "#,
        )
        .bind(question.id.0)
        .bind(&question.ask)
        .bind(&question.answers[0])
        .bind(&question.answers[1])
        .bind(&question.answers[2])
        .bind(&question.answers[3])
        .bind(question.correct.value())
        .execute(&self.pool)
        .await
        .map_err(|e| QuestionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(QuestionError::NotFound(question.id.to_string()));
        }

        Ok(question)
    }

    async fn delete(&self, id: &QuestionId) -> Result<(), QuestionError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| QuestionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(QuestionError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
