//! Shared test utilities for lx-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use crate::LxDb;
    use crate::seed::seed_demo;
    use crate::service::LxService;

    /// Create an empty in-memory `LxService`.
    pub async fn test_service() -> LxService {
        let db = LxDb::open_local(":memory:").await.unwrap();
        LxService::from_db(db)
    }

    /// Create an in-memory `LxService` loaded with the demo dataset.
    pub async fn seeded_service() -> LxService {
        let svc = test_service().await;
        seed_demo(&svc).await.unwrap();
        svc
    }
}
