//! Per-request state for callers that fetch or submit documents

use serde::{Deserialize, Serialize};

/// State of a single request, owned by whoever issued it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum RequestState<T, E> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(E),
}

impl<T, E> RequestState<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestState::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RequestState::Failure(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            RequestState::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RequestState<U, E> {
        match self {
            RequestState::Idle => RequestState::Idle,
            RequestState::Loading => RequestState::Loading,
            RequestState::Success(value) => RequestState::Success(f(value)),
            RequestState::Failure(err) => RequestState::Failure(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for RequestState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => RequestState::Success(value),
            Err(err) => RequestState::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PurchaseError;

    #[test]
    fn test_from_result() {
        let ok: RequestState<u32, PurchaseError> = Ok(3).into();
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&3));
        assert_eq!(ok.map(|v| v * 2).value(), Some(&6));

        let failed: RequestState<u32, PurchaseError> =
            Err(PurchaseError::DocumentNotFound("x".to_string())).into();
        assert!(failed.is_failure());
        assert!(failed.value().is_none());
        assert!(matches!(
            failed.error(),
            Some(PurchaseError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_default_is_idle() {
        let state: RequestState<(), String> = RequestState::default();
        assert_eq!(state, RequestState::Idle);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_serialized_shape() {
        let state: RequestState<u32, String> = RequestState::Success(5);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"state": "success", "data": 5}));
    }
}
