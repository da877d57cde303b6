use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use kernel::model::reservation::Reservation;
use shared::error::{AppError, AppResult};
use strum::IntoStaticStr;
use tower_sessions::{session, Session};

const RESERVATION_KEY: &str = "reservation";
const CSRF_TOKEN_KEY: &str = "csrf_token";

// 次のページ表示時に一度だけ表示されるメッセージの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Flash,
    Error,
    Warning,
}

// tower-sessions のセッションを型付きで扱うためのラッパー
#[derive(Clone)]
pub struct AppSession(Session);

impl AppSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    // 値がない場合も、型が合わない場合も MissingOrWrongType とする。
    // ストアの障害はそのまま SessionError として返す
    pub async fn reservation(&self) -> AppResult<Reservation> {
        match self.0.get::<Reservation>(RESERVATION_KEY).await {
            Ok(Some(reservation)) => Ok(reservation),
            Ok(None) | Err(session::Error::SerdeJson(_)) => {
                Err(AppError::MissingOrWrongType(RESERVATION_KEY.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn put_reservation(&self, reservation: &Reservation) -> AppResult<()> {
        self.0.insert(RESERVATION_KEY, reservation).await?;
        Ok(())
    }

    // 取得と同時にセッションから削除する
    pub async fn take_reservation(&self) -> AppResult<Reservation> {
        let reservation = self.reservation().await?;
        self.0.remove_value(RESERVATION_KEY).await?;
        Ok(reservation)
    }

    pub async fn put_message(&self, kind: MessageKind, message: impl Into<String>) -> AppResult<()> {
        let key: &'static str = kind.into();
        self.0.insert(key, message.into()).await?;
        Ok(())
    }

    pub async fn pop_message(&self, kind: MessageKind) -> AppResult<Option<String>> {
        let key: &'static str = kind.into();
        Ok(self.0.remove::<String>(key).await?)
    }

    // アンチフォージェリトークンはセッションごとに一度だけ発行する
    pub async fn csrf_token(&self) -> AppResult<String> {
        if let Some(token) = self.0.get::<String>(CSRF_TOKEN_KEY).await? {
            return Ok(token);
        }
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.0.insert(CSRF_TOKEN_KEY, &token).await?;
        Ok(token)
    }

    pub async fn verify_csrf(&self, token: &str) -> AppResult<()> {
        match self.0.get::<String>(CSRF_TOKEN_KEY).await? {
            Some(expected) if !token.is_empty() && expected == token => Ok(()),
            _ => Err(AppError::ForbiddenOperation(
                "anti-forgery token does not match the session".into(),
            )),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AppSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state)
            .await
            .map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower_sessions::{
        session::{Id, Record},
        session_store, MemoryStore, SessionStore,
    };

    // 読み込みが常に失敗するストア
    #[derive(Debug)]
    struct UnavailableStore;

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn save(&self, _: &Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store is down".into()))
        }

        async fn load(&self, _: &Id) -> session_store::Result<Option<Record>> {
            Err(session_store::Error::Backend("store is down".into()))
        }

        async fn delete(&self, _: &Id) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store is down".into()))
        }
    }

    fn session() -> AppSession {
        AppSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    fn reservation() -> Reservation {
        Reservation::for_range(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_reservation_is_reported() {
        let session = session();
        assert!(matches!(
            session.reservation().await,
            Err(AppError::MissingOrWrongType(key)) if key == "reservation"
        ));
    }

    #[tokio::test]
    async fn wrongly_typed_reservation_is_reported() {
        let session = session();
        session.0.insert(RESERVATION_KEY, 42).await.unwrap();
        assert!(matches!(
            session.reservation().await,
            Err(AppError::MissingOrWrongType(_))
        ));
    }

    #[tokio::test]
    async fn store_failure_is_not_reported_as_missing() {
        let session = AppSession::new(Session::new(
            Some(Id::default()),
            Arc::new(UnavailableStore),
            None,
        ));
        assert!(matches!(
            session.reservation().await,
            Err(AppError::SessionError(_))
        ));
        assert!(matches!(
            session.take_reservation().await,
            Err(AppError::SessionError(_))
        ));
    }

    #[tokio::test]
    async fn take_reservation_reads_once() {
        let session = session();
        session.put_reservation(&reservation()).await.unwrap();

        assert_eq!(session.reservation().await.unwrap(), reservation());
        assert_eq!(session.take_reservation().await.unwrap(), reservation());
        assert!(session.take_reservation().await.is_err());
    }

    #[tokio::test]
    async fn messages_are_popped_once() {
        let session = session();
        session
            .put_message(MessageKind::Error, "No availability")
            .await
            .unwrap();

        assert_eq!(session.pop_message(MessageKind::Flash).await.unwrap(), None);
        assert_eq!(
            session.pop_message(MessageKind::Error).await.unwrap(),
            Some("No availability".to_string())
        );
        assert_eq!(session.pop_message(MessageKind::Error).await.unwrap(), None);
    }

    #[tokio::test]
    async fn csrf_token_is_stable_and_verified() {
        let session = session();
        let token = session.csrf_token().await.unwrap();

        assert_eq!(session.csrf_token().await.unwrap(), token);
        assert!(session.verify_csrf(&token).await.is_ok());
        assert!(matches!(
            session.verify_csrf("forged").await,
            Err(AppError::ForbiddenOperation(_))
        ));
        assert!(session.verify_csrf("").await.is_err());
    }
}
