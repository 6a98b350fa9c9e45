use thiserror::Error;

use crate::model::PrefCode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchFailure {
    #[error("通信に失敗しました: {0}")]
    Transport(String),
    #[error("HTTP ステータス {0} が返されました")]
    Status(u16),
    #[error("API がエラーを返しました ({status}): {message}")]
    Api { status: String, message: String },
    #[error("レスポンスの解析に失敗しました: {0}")]
    Decode(String),
    #[error("レスポンスに人口データが含まれていません")]
    EmptyPayload,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("都道府県一覧の取得に失敗しました: {0}")]
    Catalog(#[source] FetchFailure),
    #[error("都道府県コード {pref_code} の人口構成の取得に失敗しました: {source}")]
    Series {
        pref_code: PrefCode,
        #[source]
        source: FetchFailure,
    },
}

impl FetchError {
    pub fn catalog(failure: FetchFailure) -> Self {
        FetchError::Catalog(failure)
    }

    pub fn series(pref_code: PrefCode, failure: FetchFailure) -> Self {
        FetchError::Series {
            pref_code,
            source: failure,
        }
    }

    pub fn failure(&self) -> &FetchFailure {
        match self {
            FetchError::Catalog(failure) => failure,
            FetchError::Series { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_error_mentions_pref_code() {
        let err = FetchError::series(13, FetchFailure::Status(500));
        let message = err.to_string();
        assert!(message.contains("13"));
        assert!(message.contains("500"));
        assert_eq!(err.failure(), &FetchFailure::Status(500));
    }
}
